//! Move operations.
//!
//! Two distinct forms: the logged move names the full destination path,
//! the immediate move names only the new parent.

use arbor_core::{NameValidator, Path, WorkspaceName};
use arbor_store::{Change, Repository};
use tracing::debug;

use super::{resolve_node, resolve_parent};
use crate::error::{MutationError, MutationResult};
use crate::log::MoveSpec;

/// Apply moves strictly in order. Each `dst` includes the new name.
pub fn move_nodes(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    validator: &NameValidator,
    operations: &[MoveSpec],
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    for op in operations {
        if op.src.is_root() || op.dst.is_root() {
            return Err(MutationError::RootNode { operation: "move" });
        }
        let id = resolve_node(repo, workspace, &op.src)?;
        let (parent, name) = resolve_parent(repo, workspace, &op.dst)?;
        validator.assert_valid_qualified_name(name)?;
        changes.push(repo.relink_node(workspace, id, parent, name)?);
        debug!(src = %op.src, dst = %op.dst, "moved node");
    }
    Ok(())
}

/// Move `src` below `dst_parent`, keeping its name.
pub fn move_node_immediately(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    src: &Path,
    dst_parent: &Path,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    let Some(name) = src.name() else {
        return Err(MutationError::RootNode { operation: "move" });
    };
    let id = resolve_node(repo, workspace, src)?;
    let parent = resolve_node(repo, workspace, dst_parent)?;
    changes.push(repo.relink_node(workspace, id, parent, name)?);
    debug!(src = %src, parent = %dst_parent, "moved node immediately");
    Ok(())
}
