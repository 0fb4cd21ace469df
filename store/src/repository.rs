//! The repository and its mutating primitives.

use arbor_core::{
    Identifier, PropertyValue, Value, WorkspaceName, JCR_MIXIN_TYPES, JCR_PRIMARY_TYPE,
};
use arbor_registry::{NamespaceRegistry, NodeTypeRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{trace, warn};

use crate::change::Change;
use crate::error::{StoreError, StoreResult};
use crate::node::{NewNode, StoredNode};
use crate::workspace::Workspace;

/// The in-memory repository: named workspaces plus name-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    workspaces: BTreeMap<WorkspaceName, Workspace>,
    namespaces: NamespaceRegistry,
    node_types: NodeTypeRegistry,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    /// Create a repository with the built-in node types and a `default`
    /// workspace.
    pub fn new() -> Self {
        Self::with_node_types(NodeTypeRegistry::default())
    }

    pub fn with_node_types(node_types: NodeTypeRegistry) -> Self {
        let mut workspaces = BTreeMap::new();
        workspaces.insert(WorkspaceName::default(), Workspace::new());
        Self {
            workspaces,
            namespaces: NamespaceRegistry::new(),
            node_types,
        }
    }

    // ==================== Workspaces ====================

    pub fn create_workspace(&mut self, name: WorkspaceName) -> StoreResult<()> {
        if self.workspaces.contains_key(&name) {
            return Err(StoreError::WorkspaceExists(name.to_string()));
        }
        self.workspaces.insert(name, Workspace::new());
        Ok(())
    }

    pub fn has_workspace(&self, name: &WorkspaceName) -> bool {
        self.workspaces.contains_key(name)
    }

    pub fn workspace_names(&self) -> impl Iterator<Item = &WorkspaceName> + '_ {
        self.workspaces.keys()
    }

    pub fn workspace(&self, name: &WorkspaceName) -> StoreResult<&Workspace> {
        self.workspaces
            .get(name)
            .ok_or_else(|| StoreError::WorkspaceNotFound(name.to_string()))
    }

    fn workspace_mut(&mut self, name: &WorkspaceName) -> StoreResult<&mut Workspace> {
        self.workspaces
            .get_mut(name)
            .ok_or_else(|| StoreError::WorkspaceNotFound(name.to_string()))
    }

    pub(crate) fn workspaces_mut(&mut self) -> impl Iterator<Item = &mut Workspace> + '_ {
        self.workspaces.values_mut()
    }

    // ==================== Registries ====================

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.namespaces
    }

    pub fn node_types(&self) -> &NodeTypeRegistry {
        &self.node_types
    }

    // ==================== Primitives ====================

    /// Insert a node as the last child of `parent`. The type properties are
    /// written from `node.primary_type` and `node.mixins`.
    pub fn insert_node(
        &mut self,
        workspace: &WorkspaceName,
        parent: Identifier,
        node: NewNode,
    ) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        if ws.contains(node.id) {
            return Err(StoreError::IdentifierInUse(node.id));
        }
        if !ws.contains(parent) {
            return Err(StoreError::node_not_found(parent));
        }
        if ws.child_named(parent, &node.name).is_some() {
            let what = ws
                .path_of(parent)
                .and_then(|p| p.child(&node.name).ok())
                .map(|p| p.to_string())
                .unwrap_or_else(|| node.name.clone());
            return Err(StoreError::item_exists(what));
        }

        let mut properties = node.properties;
        properties.insert(
            JCR_PRIMARY_TYPE.to_string(),
            PropertyValue::Single(Value::Name(node.primary_type.clone())),
        );
        write_mixin_property(&mut properties, &node.mixins);

        let id = node.id;
        trace!(workspace = %workspace, id = %id, name = %node.name, "insert node");
        ws.insert_raw(StoredNode {
            id,
            name: node.name,
            parent: Some(parent),
            primary_type: node.primary_type,
            mixins: node.mixins,
            properties,
            children: Vec::new(),
        });
        if let Some(parent) = ws.node_mut(parent) {
            parent.children.push(id);
        }

        Ok(Change::NodeAdded {
            workspace: workspace.clone(),
            id,
        })
    }

    /// Remove a node and its whole subtree.
    pub fn remove_node(&mut self, workspace: &WorkspaceName, id: Identifier) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        let node = ws.node(id).ok_or_else(|| StoreError::node_not_found(id))?;
        let parent = node.parent.ok_or(StoreError::RootNode)?;
        let index = ws
            .node(parent)
            .and_then(|p| p.child_index(id))
            .ok_or_else(|| StoreError::node_not_found(parent))?;

        trace!(workspace = %workspace, id = %id, "remove subtree");
        let nodes: Vec<StoredNode> = ws
            .subtree(id)
            .into_iter()
            .filter_map(|n| ws.remove_raw(n))
            .collect();
        if let Some(parent) = ws.node_mut(parent) {
            parent.children.remove(index);
        }

        Ok(Change::NodeRemoved {
            workspace: workspace.clone(),
            parent,
            index,
            nodes,
        })
    }

    /// Write a property, replacing any previous value.
    pub fn set_property(
        &mut self,
        workspace: &WorkspaceName,
        id: Identifier,
        name: &str,
        value: PropertyValue,
    ) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        let node = ws.node_mut(id).ok_or_else(|| StoreError::node_not_found(id))?;
        trace!(workspace = %workspace, id = %id, property = name, "set property");
        let previous = node.properties.insert(name.to_string(), value.clone());

        if let Some(prev) = &previous {
            ws.references_mut().remove(id, name, prev);
        }
        ws.references_mut().insert(id, name, &value);

        Ok(Change::PropertySet {
            workspace: workspace.clone(),
            node: id,
            name: name.to_string(),
            previous,
        })
    }

    /// Remove a property.
    pub fn remove_property(
        &mut self,
        workspace: &WorkspaceName,
        id: Identifier,
        name: &str,
    ) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        let node = ws.node_mut(id).ok_or_else(|| StoreError::node_not_found(id))?;
        let previous = node
            .properties
            .remove(name)
            .ok_or_else(|| StoreError::property_not_found(format!("{}/{}", id, name)))?;
        trace!(workspace = %workspace, id = %id, property = name, "remove property");
        ws.references_mut().remove(id, name, &previous);

        Ok(Change::PropertyRemoved {
            workspace: workspace.clone(),
            node: id,
            name: name.to_string(),
            previous,
        })
    }

    /// Move and/or rename a node. A rename under the same parent keeps the
    /// node's position; a move to another parent appends it.
    pub fn relink_node(
        &mut self,
        workspace: &WorkspaceName,
        id: Identifier,
        new_parent: Identifier,
        new_name: &str,
    ) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        let node = ws.node(id).ok_or_else(|| StoreError::node_not_found(id))?;
        let old_parent = node.parent.ok_or(StoreError::RootNode)?;
        let old_name = node.name.clone();
        if !ws.contains(new_parent) {
            return Err(StoreError::node_not_found(new_parent));
        }
        if new_parent == id || ws.is_ancestor(id, new_parent) {
            return Err(StoreError::CyclicMove {
                node: ws.path_of(id).map(|p| p.to_string()).unwrap_or_default(),
            });
        }
        if let Some(existing) = ws.child_named(new_parent, new_name) {
            if existing != id {
                let what = ws
                    .path_of(existing)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| new_name.to_string());
                return Err(StoreError::item_exists(what));
            }
        }
        let old_index = ws
            .node(old_parent)
            .and_then(|p| p.child_index(id))
            .ok_or_else(|| StoreError::node_not_found(old_parent))?;

        trace!(workspace = %workspace, id = %id, name = new_name, "relink node");
        if let Some(parent) = ws.node_mut(old_parent) {
            parent.children.remove(old_index);
        }
        if let Some(parent) = ws.node_mut(new_parent) {
            if new_parent == old_parent {
                parent.children.insert(old_index, id);
            } else {
                parent.children.push(id);
            }
        }
        if let Some(node) = ws.node_mut(id) {
            node.parent = Some(new_parent);
            node.name = new_name.to_string();
        }

        Ok(Change::NodeRelinked {
            workspace: workspace.clone(),
            node: id,
            parent: old_parent,
            name: old_name,
            index: old_index,
        })
    }

    /// Replace a node's child order. `order` must be a permutation of the
    /// current children.
    pub fn set_child_order(
        &mut self,
        workspace: &WorkspaceName,
        id: Identifier,
        order: Vec<Identifier>,
    ) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        let node = ws.node_mut(id).ok_or_else(|| StoreError::node_not_found(id))?;

        let mut current: Vec<Identifier> = node.children.clone();
        let mut proposed = order.clone();
        current.sort();
        proposed.sort();
        if current != proposed {
            return Err(StoreError::invalid_child_order(
                id,
                "not a permutation of the current children",
            ));
        }

        trace!(workspace = %workspace, id = %id, "reorder children");
        let previous = std::mem::replace(&mut node.children, order);
        Ok(Change::ChildrenReordered {
            workspace: workspace.clone(),
            node: id,
            previous,
        })
    }

    /// Replace a node's mixins, keeping `jcr:mixinTypes` in step.
    pub fn set_mixins(
        &mut self,
        workspace: &WorkspaceName,
        id: Identifier,
        mixins: Vec<String>,
    ) -> StoreResult<Change> {
        let ws = self.workspace_mut(workspace)?;
        let node = ws.node_mut(id).ok_or_else(|| StoreError::node_not_found(id))?;
        write_mixin_property(&mut node.properties, &mixins);
        let previous = std::mem::replace(&mut node.mixins, mixins);

        Ok(Change::MixinsChanged {
            workspace: workspace.clone(),
            node: id,
            previous,
        })
    }

    // ==================== Undo ====================

    /// Apply the inverse of `change`.
    ///
    /// Fails without touching anything when the tree no longer matches the
    /// change: an added node that gained children the change did not add, a
    /// removed or relinked node whose old name was taken meanwhile, or a
    /// reorder whose children changed.
    pub fn revert(&mut self, change: &Change) -> StoreResult<()> {
        let kind = change.kind();
        let ws = self.workspace_mut(change.workspace())?;
        match change {
            Change::NodeAdded { id, .. } => {
                let Some(node) = ws.node(*id) else {
                    warn!(id = %id, "revert: added node already gone");
                    return Ok(());
                };
                if !node.children.is_empty() {
                    return Err(StoreError::revert_conflict(
                        kind,
                        format!("{} holds children added by another operation", describe(ws, *id)),
                    ));
                }
                let parent = node.parent;
                for n in ws.subtree(*id) {
                    ws.remove_raw(n);
                }
                if let Some(parent) = parent.and_then(|p| ws.node_mut(p)) {
                    parent.children.retain(|c| c != id);
                }
            }
            Change::NodeRemoved {
                parent,
                index,
                nodes,
                ..
            } => {
                if !ws.contains(*parent) {
                    warn!(parent = %parent, "revert: parent of removed subtree is gone");
                    return Ok(());
                }
                let Some(top) = nodes.first() else {
                    return Ok(());
                };
                if ws.child_named(*parent, &top.name).is_some() {
                    return Err(StoreError::revert_conflict(
                        kind,
                        format!("{} is taken", describe_child(ws, *parent, &top.name)),
                    ));
                }
                if let Some(taken) = nodes.iter().find(|n| ws.contains(n.id)) {
                    return Err(StoreError::revert_conflict(
                        kind,
                        format!("identifier {} is in use", taken.id),
                    ));
                }
                let top = top.id;
                for node in nodes {
                    ws.insert_raw(node.clone());
                }
                if let Some(parent) = ws.node_mut(*parent) {
                    let at = (*index).min(parent.children.len());
                    parent.children.insert(at, top);
                }
            }
            Change::PropertySet {
                node,
                name,
                previous,
                ..
            } => {
                let Some(stored) = ws.node_mut(*node) else {
                    warn!(id = %node, property = %name, "revert: node already gone");
                    return Ok(());
                };
                let current = match previous {
                    Some(prev) => stored.properties.insert(name.clone(), prev.clone()),
                    None => stored.properties.remove(name),
                };
                if let Some(current) = current {
                    ws.references_mut().remove(*node, name, &current);
                }
                if let Some(prev) = previous {
                    ws.references_mut().insert(*node, name, prev);
                }
            }
            Change::PropertyRemoved {
                node,
                name,
                previous,
                ..
            } => {
                let Some(stored) = ws.node_mut(*node) else {
                    warn!(id = %node, property = %name, "revert: node already gone");
                    return Ok(());
                };
                stored.properties.insert(name.clone(), previous.clone());
                ws.references_mut().insert(*node, name, previous);
            }
            Change::NodeRelinked {
                node,
                parent,
                name,
                index,
                ..
            } => {
                let Some(current_parent) = ws.node(*node).and_then(|n| n.parent) else {
                    warn!(id = %node, "revert: relinked node already gone");
                    return Ok(());
                };
                if !ws.contains(*parent) || *parent == *node || ws.is_ancestor(*node, *parent) {
                    return Err(StoreError::revert_conflict(
                        kind,
                        format!("former parent of {} is gone or below it", describe(ws, *node)),
                    ));
                }
                if ws.child_named(*parent, name).is_some_and(|c| c != *node) {
                    return Err(StoreError::revert_conflict(
                        kind,
                        format!("{} is taken", describe_child(ws, *parent, name)),
                    ));
                }
                if let Some(p) = ws.node_mut(current_parent) {
                    p.children.retain(|c| c != node);
                }
                if let Some(p) = ws.node_mut(*parent) {
                    let at = (*index).min(p.children.len());
                    p.children.insert(at, *node);
                }
                if let Some(n) = ws.node_mut(*node) {
                    n.parent = Some(*parent);
                    n.name = name.clone();
                }
            }
            Change::ChildrenReordered { node, previous, .. } => {
                let Some(stored) = ws.node_mut(*node) else {
                    warn!(id = %node, "revert: reordered node already gone");
                    return Ok(());
                };
                let mut current = stored.children.clone();
                let mut restored = previous.clone();
                current.sort();
                restored.sort();
                if current != restored {
                    return Err(StoreError::revert_conflict(
                        kind,
                        format!("children of {} changed since the reorder", node),
                    ));
                }
                stored.children = previous.clone();
            }
            Change::MixinsChanged { node, previous, .. } => {
                let Some(stored) = ws.node_mut(*node) else {
                    warn!(id = %node, "revert: node already gone");
                    return Ok(());
                };
                write_mixin_property(&mut stored.properties, previous);
                stored.mixins = previous.clone();
            }
        }
        Ok(())
    }

    // ==================== Integrity ====================

    /// Fail if any hard reference in the workspace points at a missing node.
    pub fn check_integrity(&self, workspace: &WorkspaceName) -> StoreResult<()> {
        let ws = self.workspace(workspace)?;
        for target in ws.references().targets() {
            if ws.contains(target) {
                continue;
            }
            if let Some((source, property)) = ws.referrers(target).next() {
                return Err(StoreError::referential_integrity(
                    target,
                    referrer_path(ws, *source, property),
                ));
            }
        }
        Ok(())
    }

    /// Fail if a node outside `set` holds a hard reference to a node in it.
    /// References whose source is inside `set` are ignored.
    pub fn check_removable(
        &self,
        workspace: &WorkspaceName,
        set: &BTreeSet<Identifier>,
    ) -> StoreResult<()> {
        let ws = self.workspace(workspace)?;
        for target in set {
            if let Some((source, property)) =
                ws.referrers(*target).find(|(source, _)| !set.contains(source))
            {
                return Err(StoreError::referential_integrity(
                    *target,
                    referrer_path(ws, *source, property),
                ));
            }
        }
        Ok(())
    }
}

fn write_mixin_property(properties: &mut arbor_core::Properties, mixins: &[String]) {
    if mixins.is_empty() {
        properties.remove(JCR_MIXIN_TYPES);
    } else {
        properties.insert(
            JCR_MIXIN_TYPES.to_string(),
            PropertyValue::Multiple(mixins.iter().cloned().map(Value::Name).collect()),
        );
    }
}

fn describe(ws: &Workspace, id: Identifier) -> String {
    ws.path_of(id).map(|p| p.to_string()).unwrap_or_else(|| id.to_string())
}

fn describe_child(ws: &Workspace, parent: Identifier, name: &str) -> String {
    match ws.path_of(parent).and_then(|p| p.child(name).ok()) {
        Some(path) => path.to_string(),
        None => name.to_string(),
    }
}

fn referrer_path(ws: &Workspace, source: Identifier, property: &str) -> String {
    match ws.path_of(source) {
        Some(path) if path.is_root() => format!("/{}", property),
        Some(path) => format!("{}/{}", path, property),
        None => format!("{}/{}", source, property),
    }
}
