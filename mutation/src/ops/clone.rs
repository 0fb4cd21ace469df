//! CLONE operation - duplicate a subtree from another workspace.

use arbor_core::{Identifier, NameValidator, Path, TransportError, WorkspaceName};
use arbor_store::{Change, Repository, StoredNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::copy::{collect_subtree, fresh_identifiers, insert_subtree};
use super::{resolve_node, resolve_parent};
use crate::error::{MutationError, MutationResult};

/// Identifier policy for clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneIdentifiers {
    /// Clones share identity with their source nodes.
    #[default]
    Preserve,
    /// Clones get new identifiers, like a cross-workspace copy.
    Fresh,
}

/// Clone `src` from `src_workspace` to `dst` in `workspace`.
#[allow(clippy::too_many_arguments)]
pub fn clone_from(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    validator: &NameValidator,
    policy: CloneIdentifiers,
    src_workspace: &WorkspaceName,
    src: &Path,
    dst: &Path,
    remove_existing: bool,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    if policy == CloneIdentifiers::Preserve && src_workspace == workspace {
        return Err(MutationError::SameWorkspaceClone {
            workspace: workspace.to_string(),
        });
    }
    if dst.is_root() {
        return Err(MutationError::RootNode { operation: "clone onto" });
    }
    let src_id = resolve_node(repo, src_workspace, src)?;
    let records = collect_subtree(repo, src_workspace, src_id)?;
    let (parent, name) = resolve_parent(repo, workspace, dst)?;
    validator.assert_valid_qualified_name(name)?;

    // Whatever occupies the destination path
    if let Some(existing) = repo.workspace(workspace)?.child_named(parent, name) {
        if !remove_existing {
            return Err(MutationError::item_exists(dst));
        }
        info!(dst = %dst, "clone replaces existing node");
        changes.push(repo.remove_node(workspace, existing)?);
    }

    let ids: BTreeMap<Identifier, Identifier> = match policy {
        CloneIdentifiers::Preserve => {
            remove_identity_conflicts(repo, workspace, parent, &records, remove_existing, changes)?;
            records.iter().map(|r| (r.id, r.id)).collect()
        }
        CloneIdentifiers::Fresh => fresh_identifiers(&records),
    };

    insert_subtree(repo, workspace, parent, name, &records, &ids, changes)?;
    debug!(
        src_workspace = %src_workspace,
        src = %src,
        dst = %dst,
        nodes = records.len(),
        "cloned subtree"
    );
    Ok(())
}

/// Nodes elsewhere in the destination that already carry one of the
/// preserved identifiers.
fn remove_identity_conflicts(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    parent: Identifier,
    records: &[StoredNode],
    remove_existing: bool,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    for record in records {
        let ws = repo.workspace(workspace)?;
        if !ws.contains(record.id) {
            continue;
        }
        let location = ws
            .path_of(record.id)
            .map(|p| p.to_string())
            .unwrap_or_else(|| record.id.to_string());
        if !remove_existing {
            return Err(MutationError::item_exists(location));
        }
        if record.id == parent || ws.is_ancestor(record.id, parent) {
            return Err(MutationError::Transport(TransportError::repository(
                format!("identifier conflict at {} contains the clone destination", location),
            )));
        }
        info!(existing = %location, "clone removes node with conflicting identifier");
        changes.push(repo.remove_node(workspace, record.id)?);
    }
    Ok(())
}
