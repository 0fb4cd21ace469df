//! Mutation operation implementations.
//!
//! Each operation family (store, delete, move, copy, clone, reorder) lives in
//! its own module. Every function appends the changes it applies to a
//! caller-owned list, so a failed call can be undone exactly.

mod clone;
mod copy;
mod delete;
mod moves;
mod reorder;
mod store;

pub use clone::{clone_from, CloneIdentifiers};
pub use copy::copy_node;
pub use delete::{delete_nodes, delete_properties, ReferenceCheck};
pub use moves::{move_node_immediately, move_nodes};
pub use reorder::reorder_children;
pub use store::{store_nodes, store_property};

use arbor_core::{Identifier, Path, WorkspaceName};
use arbor_store::Repository;

use crate::error::{MutationError, MutationResult};

/// Resolve a node path or fail with PathNotFound.
pub(crate) fn resolve_node(
    repo: &Repository,
    workspace: &WorkspaceName,
    path: &Path,
) -> MutationResult<Identifier> {
    repo.workspace(workspace)?
        .resolve(path)
        .ok_or_else(|| MutationError::path_not_found(path))
}

/// Resolve the parent of `path` and return it with the final segment.
pub(crate) fn resolve_parent<'p>(
    repo: &Repository,
    workspace: &WorkspaceName,
    path: &'p Path,
) -> MutationResult<(Identifier, &'p str)> {
    let (parent, name) = path.split_last()?;
    let id = resolve_node(repo, workspace, &parent)?;
    Ok((id, name))
}
