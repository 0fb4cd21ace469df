//! Undo records.
//!
//! Every mutating repository primitive returns a Change describing how to
//! undo it. Reverting a sequence of changes in reverse order restores the
//! repository exactly.

use arbor_core::{Identifier, PropertyValue, WorkspaceName};

use crate::node::StoredNode;

/// An applied mutation and the state needed to invert it.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A node was inserted as the last child of its parent.
    NodeAdded {
        workspace: WorkspaceName,
        id: Identifier,
    },
    /// A subtree was removed. `nodes` holds every record, parents first.
    NodeRemoved {
        workspace: WorkspaceName,
        parent: Identifier,
        index: usize,
        nodes: Vec<StoredNode>,
    },
    /// A property was written.
    PropertySet {
        workspace: WorkspaceName,
        node: Identifier,
        name: String,
        previous: Option<PropertyValue>,
    },
    /// A property was removed.
    PropertyRemoved {
        workspace: WorkspaceName,
        node: Identifier,
        name: String,
        previous: PropertyValue,
    },
    /// A node moved or was renamed.
    NodeRelinked {
        workspace: WorkspaceName,
        node: Identifier,
        parent: Identifier,
        name: String,
        index: usize,
    },
    /// A node's children were put in a new order.
    ChildrenReordered {
        workspace: WorkspaceName,
        node: Identifier,
        previous: Vec<Identifier>,
    },
    /// A node's mixin set changed.
    MixinsChanged {
        workspace: WorkspaceName,
        node: Identifier,
        previous: Vec<String>,
    },
}

impl Change {
    pub fn workspace(&self) -> &WorkspaceName {
        match self {
            Change::NodeAdded { workspace, .. }
            | Change::NodeRemoved { workspace, .. }
            | Change::PropertySet { workspace, .. }
            | Change::PropertyRemoved { workspace, .. }
            | Change::NodeRelinked { workspace, .. }
            | Change::ChildrenReordered { workspace, .. }
            | Change::MixinsChanged { workspace, .. } => workspace,
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::NodeAdded { .. } => "node_added",
            Change::NodeRemoved { .. } => "node_removed",
            Change::PropertySet { .. } => "property_set",
            Change::PropertyRemoved { .. } => "property_removed",
            Change::NodeRelinked { .. } => "node_relinked",
            Change::ChildrenReordered { .. } => "children_reordered",
            Change::MixinsChanged { .. } => "mixins_changed",
        }
    }
}
