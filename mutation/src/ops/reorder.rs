//! REORDER operation - put a node's children into a requested order.

use arbor_core::{Identifier, Path, WorkspaceName};
use arbor_store::{Change, Repository};
use std::collections::BTreeMap;
use tracing::debug;

use super::resolve_node;
use crate::error::{MutationError, MutationResult};
use crate::reorder::{
    apply_order_before, check_permutation, commands_from_sequence, sequence_from_commands,
    ChildOrder, ReorderStrategy,
};

/// Reorder the children of the node at `path`.
///
/// Whichever form the caller supplies is converted to the backend's native
/// form. `Commands` applies one step per moved child; `Sequence` applies
/// the whole order at once. An order equal to the current one applies
/// nothing.
pub fn reorder_children(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    strategy: ReorderStrategy,
    path: &Path,
    order: &ChildOrder,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    let id = resolve_node(repo, workspace, path)?;
    let ws = repo.workspace(workspace)?;
    let node = ws.node(id).ok_or_else(|| MutationError::path_not_found(path))?;
    if !repo.node_types().is_orderable(&node.primary_type, &node.mixins) {
        return Err(MutationError::not_orderable(path));
    }

    let by_name: BTreeMap<String, Identifier> = node
        .children
        .iter()
        .filter_map(|c| ws.node(*c).map(|n| (n.name.clone(), *c)))
        .collect();
    let current: Vec<String> = node
        .children
        .iter()
        .filter_map(|c| ws.node(*c).map(|n| n.name.clone()))
        .collect();

    let target = match order {
        ChildOrder::Commands(commands) => sequence_from_commands(&current, commands),
        ChildOrder::Sequence(sequence) => check_permutation(&current, sequence).map(|_| sequence.clone()),
    }
    .map_err(|e| relabel(e, path))?;
    if target == current {
        return Ok(());
    }

    let to_ids = |names: &[String]| -> Vec<Identifier> {
        names.iter().filter_map(|n| by_name.get(n).copied()).collect()
    };

    match strategy {
        ReorderStrategy::Sequence => {
            let ids = to_ids(&target);
            changes.push(repo.set_child_order(workspace, id, ids)?);
        }
        ReorderStrategy::Commands => {
            let commands = commands_from_sequence(&current, &target).map_err(|e| relabel(e, path))?;
            let mut sequence = current;
            for command in &commands {
                apply_order_before(&mut sequence, command)?;
                let ids = to_ids(&sequence);
                changes.push(repo.set_child_order(workspace, id, ids)?);
            }
        }
    }
    debug!(path = %path, strategy = ?strategy, "reordered children");
    Ok(())
}

fn relabel(e: MutationError, path: &Path) -> MutationError {
    match e {
        MutationError::InvalidOrder { reason, .. } => MutationError::invalid_order(path, reason),
        other => other,
    }
}
