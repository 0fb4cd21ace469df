//! Mutation executor - coordinates mutation operations.
//!
//! The executor delegates to specialized operation modules in `ops/`:
//! - `ops/store.rs` - node creation and property writes
//! - `ops/delete.rs` - staged subtree removal and property removal
//! - `ops/moves.rs` - logged and immediate moves
//! - `ops/copy.rs` - copy under fresh identifiers
//! - `ops/clone.rs` - cross-workspace clone
//! - `ops/reorder.rs` - child reordering
//!
//! Every call is atomic: if it fails part way, the changes it already
//! applied are reverted before the error is returned. On success the
//! applied changes are handed back so the caller can journal them.

use arbor_core::{NameValidator, Path, PropertySnapshot, WorkspaceName};
use arbor_store::{Change, Repository};
use tracing::warn;

use crate::error::MutationResult;
use crate::log::{AddNodeOperation, MoveSpec, RemoveNodeOperation, RemovePropertyOperation};
use crate::ops::{self, CloneIdentifiers, ReferenceCheck};
use crate::reorder::{ChildOrder, ReorderStrategy};

/// Mutation executor bound to one workspace of a repository.
pub struct MutationExecutor<'a> {
    repo: &'a mut Repository,
    workspace: &'a WorkspaceName,
    validator: &'a NameValidator,
    references: ReferenceCheck,
}

impl<'a> MutationExecutor<'a> {
    /// Create a new executor.
    pub fn new(
        repo: &'a mut Repository,
        workspace: &'a WorkspaceName,
        validator: &'a NameValidator,
    ) -> Self {
        Self {
            repo,
            workspace,
            validator,
            references: ReferenceCheck::default(),
        }
    }

    /// Choose when deletes check references into the removed subtrees.
    pub fn with_reference_check(mut self, references: ReferenceCheck) -> Self {
        self.references = references;
        self
    }

    pub fn store_nodes(&mut self, operations: &[AddNodeOperation]) -> MutationResult<Vec<Change>> {
        let (ws, validator) = (self.workspace, self.validator);
        atomically(self.repo, |repo, changes| {
            ops::store_nodes(repo, ws, validator, operations, changes)
        })
    }

    pub fn store_property(&mut self, property: &PropertySnapshot) -> MutationResult<Vec<Change>> {
        let (ws, validator) = (self.workspace, self.validator);
        atomically(self.repo, |repo, changes| {
            ops::store_property(repo, ws, validator, property, changes)
        })
    }

    pub fn move_nodes(&mut self, operations: &[MoveSpec]) -> MutationResult<Vec<Change>> {
        let (ws, validator) = (self.workspace, self.validator);
        atomically(self.repo, |repo, changes| {
            ops::move_nodes(repo, ws, validator, operations, changes)
        })
    }

    pub fn delete_nodes(&mut self, operations: &[RemoveNodeOperation]) -> MutationResult<Vec<Change>> {
        let (ws, references) = (self.workspace, self.references);
        atomically(self.repo, |repo, changes| {
            ops::delete_nodes(repo, ws, operations, references, changes)
        })
    }

    pub fn delete_properties(
        &mut self,
        operations: &[RemovePropertyOperation],
    ) -> MutationResult<Vec<Change>> {
        let ws = self.workspace;
        atomically(self.repo, |repo, changes| {
            ops::delete_properties(repo, ws, operations, changes)
        })
    }

    /// Move `src` below `dst_parent`, keeping its name.
    pub fn move_node_immediately(&mut self, src: &Path, dst_parent: &Path) -> MutationResult<Vec<Change>> {
        let ws = self.workspace;
        atomically(self.repo, |repo, changes| {
            ops::move_node_immediately(repo, ws, src, dst_parent, changes)
        })
    }

    pub fn copy_node(
        &mut self,
        src_workspace: &WorkspaceName,
        src: &Path,
        dst: &Path,
    ) -> MutationResult<Vec<Change>> {
        let (ws, validator) = (self.workspace, self.validator);
        atomically(self.repo, |repo, changes| {
            ops::copy_node(repo, ws, validator, src_workspace, src, dst, changes)
        })
    }

    pub fn clone_from(
        &mut self,
        policy: CloneIdentifiers,
        src_workspace: &WorkspaceName,
        src: &Path,
        dst: &Path,
        remove_existing: bool,
    ) -> MutationResult<Vec<Change>> {
        let (ws, validator) = (self.workspace, self.validator);
        atomically(self.repo, |repo, changes| {
            ops::clone_from(
                repo,
                ws,
                validator,
                policy,
                src_workspace,
                src,
                dst,
                remove_existing,
                changes,
            )
        })
    }

    pub fn reorder_children(
        &mut self,
        strategy: ReorderStrategy,
        path: &Path,
        order: &ChildOrder,
    ) -> MutationResult<Vec<Change>> {
        let ws = self.workspace;
        atomically(self.repo, |repo, changes| {
            ops::reorder_children(repo, ws, strategy, path, order, changes)
        })
    }
}

/// Run `f`, reverting whatever it applied if it fails.
fn atomically<F>(repo: &mut Repository, f: F) -> MutationResult<Vec<Change>>
where
    F: FnOnce(&mut Repository, &mut Vec<Change>) -> MutationResult<()>,
{
    let mut changes = Vec::new();
    match f(repo, &mut changes) {
        Ok(()) => Ok(changes),
        Err(e) => {
            for change in changes.iter().rev() {
                if let Err(revert_err) = repo.revert(change) {
                    warn!(kind = change.kind(), error = %revert_err, "failed to undo partial mutation");
                }
            }
            Err(e)
        }
    }
}
