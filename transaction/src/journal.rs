//! Undo journal for a save cycle.

use arbor_core::{Identifier, Path, WorkspaceName, JCR_MIXIN_TYPES};
use arbor_store::{Change, Repository, Workspace};
use std::collections::BTreeSet;
use tracing::warn;

/// Changes applied since the cycle opened, oldest first.
#[derive(Debug, Clone, Default)]
pub struct UndoJournal {
    entries: Vec<Change>,
}

impl UndoJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, change: Change) {
        self.entries.push(change);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> + '_ {
        self.entries.iter()
    }

    /// Workspaces touched by the journaled changes.
    pub fn workspaces(&self) -> BTreeSet<WorkspaceName> {
        self.entries.iter().map(|c| c.workspace().clone()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Locations in `workspace` that unwinding would rewrite, resolved
    /// against the current tree.
    pub fn claimed(&self, repo: &Repository, workspace: &WorkspaceName) -> ClaimedLocations {
        let mut claimed = ClaimedLocations::default();
        let Ok(ws) = repo.workspace(workspace) else {
            return claimed;
        };
        for change in self.entries.iter().filter(|c| c.workspace() == workspace) {
            match change {
                Change::NodeAdded { id, .. } => claimed.paths.extend(ws.path_of(*id)),
                Change::NodeRemoved { parent, nodes, .. } => {
                    if let Some(top) = nodes.first() {
                        claimed.paths.extend(child_path(ws, *parent, &top.name));
                    }
                }
                Change::NodeRelinked {
                    node, parent, name, ..
                } => {
                    claimed.paths.extend(ws.path_of(*node));
                    claimed.paths.extend(child_path(ws, *parent, name));
                }
                Change::PropertySet { node, name, .. }
                | Change::PropertyRemoved { node, name, .. } => {
                    claimed.paths.extend(child_path(ws, *node, name));
                }
                Change::MixinsChanged { node, .. } => {
                    claimed.paths.extend(child_path(ws, *node, JCR_MIXIN_TYPES));
                }
                Change::ChildrenReordered { node, .. } => {
                    claimed.ordered_parents.extend(ws.path_of(*node));
                }
            }
        }
        claimed
    }

    /// Revert every entry newest first and empty the journal.
    /// Returns how many entries failed to revert.
    pub fn unwind(&mut self, repo: &mut Repository) -> usize {
        let mut failed = 0;
        while let Some(change) = self.entries.pop() {
            if let Err(e) = repo.revert(&change) {
                warn!(kind = change.kind(), error = %e, "failed to revert journaled change");
                failed += 1;
            }
        }
        failed
    }
}

fn child_path(ws: &Workspace, parent: Identifier, name: &str) -> Option<Path> {
    ws.path_of(parent)?.child(name).ok()
}

/// Paths a rollback would restore, remove or reorder.
#[derive(Debug, Clone, Default)]
pub struct ClaimedLocations {
    paths: Vec<Path>,
    ordered_parents: Vec<Path>,
}

impl ClaimedLocations {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.ordered_parents.is_empty()
    }

    /// The claimed location at, above or below `path`, if any.
    pub fn overlapping(&self, path: &Path) -> Option<&Path> {
        self.paths
            .iter()
            .find(|c| path.is_same_or_descendant_of(c) || c.is_same_or_descendant_of(path))
    }

    /// Whether the children of `parent` were reordered.
    pub fn orders_children_of(&self, parent: &Path) -> bool {
        self.ordered_parents.iter().any(|p| p == parent)
    }
}

impl Extend<Change> for UndoJournal {
    fn extend<I: IntoIterator<Item = Change>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
