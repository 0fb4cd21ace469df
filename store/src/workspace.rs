//! A single workspace tree.

use arbor_core::{Identifier, Path, Properties, PropertyValue, Value, JCR_PRIMARY_TYPE};
use arbor_registry::NT_UNSTRUCTURED;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::index::ReferenceIndex;
use crate::node::StoredNode;

/// A named, independently addressable tree of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    root: Identifier,
    nodes: BTreeMap<Identifier, StoredNode>,
    #[serde(skip)]
    references: ReferenceIndex,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a workspace holding only an orderable root node.
    pub fn new() -> Self {
        let root = Identifier::generate();
        let mut properties = Properties::new();
        properties.insert(
            JCR_PRIMARY_TYPE.to_string(),
            PropertyValue::Single(Value::Name(NT_UNSTRUCTURED.to_string())),
        );
        let node = StoredNode {
            id: root,
            name: String::new(),
            parent: None,
            primary_type: NT_UNSTRUCTURED.to_string(),
            mixins: Vec::new(),
            properties,
            children: Vec::new(),
        };
        let mut nodes = BTreeMap::new();
        nodes.insert(root, node);
        Self {
            root,
            nodes,
            references: ReferenceIndex::new(),
        }
    }

    // ==================== Lookups ====================

    pub fn root(&self) -> Identifier {
        self.root
    }

    pub fn node(&self, id: Identifier) -> Option<&StoredNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: Identifier) -> Option<&mut StoredNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: Identifier) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = Identifier> + '_ {
        self.nodes.keys().copied()
    }

    /// Child of `parent` with the given name.
    pub fn child_named(&self, parent: Identifier, name: &str) -> Option<Identifier> {
        self.node(parent)?
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).map(|n| n.name == name).unwrap_or(false))
    }

    /// Resolve a node path by walking names from the root.
    pub fn resolve(&self, path: &Path) -> Option<Identifier> {
        let mut current = self.root;
        for segment in path.segments() {
            current = self.child_named(current, segment)?;
        }
        Some(current)
    }

    pub fn node_at(&self, path: &Path) -> Option<&StoredNode> {
        self.resolve(path).and_then(|id| self.node(id))
    }

    /// Resolve a property path into its owning node and property name.
    pub fn resolve_property<'p>(&self, path: &'p Path) -> Option<(Identifier, &'p str)> {
        let (parent, name) = path.split_last().ok()?;
        let id = self.resolve(&parent)?;
        Some((id, name))
    }

    pub fn property_at(&self, path: &Path) -> Option<&PropertyValue> {
        let (id, name) = self.resolve_property(path)?;
        self.node(id)?.properties.get(name)
    }

    /// Current path of a node.
    pub fn path_of(&self, id: Identifier) -> Option<Path> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent)?;
        }
        names
            .into_iter()
            .rev()
            .try_fold(Path::root(), |path, name| path.child(name).ok())
    }

    /// The node and all its descendants, parents before children.
    pub fn subtree(&self, id: Identifier) -> Vec<Identifier> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// True when `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: Identifier, id: Identifier) -> bool {
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).and_then(|n| n.parent);
        }
        false
    }

    // ==================== References ====================

    /// Nodes and properties holding a hard reference to `target`.
    pub fn referrers(&self, target: Identifier) -> impl Iterator<Item = &(Identifier, String)> + '_ {
        self.references.referrers(target)
    }

    pub(crate) fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    pub(crate) fn references_mut(&mut self) -> &mut ReferenceIndex {
        &mut self.references
    }

    /// Rebuild the reference index from node properties.
    pub(crate) fn rebuild_references(&mut self) {
        self.references.clear();
        for node in self.nodes.values() {
            for (name, value) in &node.properties {
                self.references.insert(node.id, name, value);
            }
        }
    }

    // ==================== Raw storage ====================

    pub(crate) fn insert_raw(&mut self, node: StoredNode) {
        for (name, value) in &node.properties {
            self.references.insert(node.id, name, value);
        }
        self.nodes.insert(node.id, node);
    }

    pub(crate) fn remove_raw(&mut self, id: Identifier) -> Option<StoredNode> {
        let node = self.nodes.remove(&id)?;
        for (name, value) in &node.properties {
            self.references.remove(node.id, name, value);
        }
        Some(node)
    }
}
