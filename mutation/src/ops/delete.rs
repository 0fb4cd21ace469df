//! Delete operations - node subtrees and single properties.

use arbor_core::{Identifier, WorkspaceName, JCR_PRIMARY_TYPE};
use arbor_store::{Change, Repository};
use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::resolve_node;
use super::store::{check_stored_node, node_types_of};
use crate::error::{MutationError, MutationResult};
use crate::log::{RemoveNodeOperation, RemovePropertyOperation};

/// When hard references from outside a removed subtree are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceCheck {
    /// Before anything is removed.
    #[default]
    Eager,
    /// Left to the integrity check at commit, so a later call of the same
    /// save cycle may still drop the reference.
    AtCommit,
}

/// Remove a batch of nodes that may reference each other.
///
/// The batch is staged: every path is resolved first, nodes nested below
/// another removed node are folded into it, and only then is referential
/// integrity checked against the whole removed set. References whose source
/// is itself being removed are severed rather than blocking the delete.
pub fn delete_nodes(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    operations: &[RemoveNodeOperation],
    references: ReferenceCheck,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    // 1. Resolve
    let mut targets = Vec::with_capacity(operations.len());
    for op in operations {
        if op.path.is_root() {
            return Err(MutationError::RootNode { operation: "remove" });
        }
        targets.push(resolve_node(repo, workspace, &op.path)?);
    }

    // 2. Fold nested and repeated targets into their topmost ancestor
    let ws = repo.workspace(workspace)?;
    let requested: BTreeSet<Identifier> = targets.iter().copied().collect();
    let mut tops = Vec::new();
    let mut seen = BTreeSet::new();
    for id in targets {
        let nested = requested.iter().any(|other| *other != id && ws.is_ancestor(*other, id));
        if !nested && seen.insert(id) {
            tops.push(id);
        }
    }

    // 3. The full removed set
    let removed: BTreeSet<Identifier> = tops.iter().flat_map(|id| ws.subtree(*id)).collect();
    trace!(roots = tops.len(), nodes = removed.len(), "staged delete");

    // 4. Only references from outside the set block removal
    if references == ReferenceCheck::Eager {
        repo.check_removable(workspace, &removed)?;
    }

    // 5. Remove
    for id in tops {
        changes.push(repo.remove_node(workspace, id)?);
    }
    debug!(count = operations.len(), "deleted nodes");
    Ok(())
}

/// Remove properties in order.
pub fn delete_properties(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    operations: &[RemovePropertyOperation],
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    for op in operations {
        let (node_path, name) = op.path.split_last()?;
        let id = resolve_node(repo, workspace, &node_path)?;

        let (primary, mixins) = node_types_of(repo, workspace, id)?;
        let exists = repo
            .workspace(workspace)?
            .node(id)
            .map(|n| n.properties.contains_key(name))
            .unwrap_or(false);
        if !exists {
            return Err(MutationError::path_not_found(&op.path));
        }
        if name == JCR_PRIMARY_TYPE || repo.node_types().is_protected(&primary, &mixins, name) {
            return Err(MutationError::protected_property(name));
        }

        changes.push(repo.remove_property(workspace, id, name)?);
        check_stored_node(repo, workspace, id)?;
        debug!(path = %op.path, "deleted property");
    }
    Ok(())
}
