//! Stored node records.

use arbor_core::{Identifier, Properties};
use serde::{Deserialize, Serialize};

/// A node as held by a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    pub id: Identifier,
    /// Local name; empty for the root.
    pub name: String,
    /// `None` only for the root.
    pub parent: Option<Identifier>,
    pub primary_type: String,
    pub mixins: Vec<String>,
    pub properties: Properties,
    /// Children in order.
    pub children: Vec<Identifier>,
}

impl StoredNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn child_index(&self, child: Identifier) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }
}

/// Input to `Repository::insert_node`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub id: Identifier,
    pub name: String,
    pub primary_type: String,
    pub mixins: Vec<String>,
    pub properties: Properties,
}

impl NewNode {
    pub fn new(id: Identifier, name: impl Into<String>, primary_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            primary_type: primary_type.into(),
            mixins: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_mixins(mut self, mixins: Vec<String>) -> Self {
        self.mixins = mixins;
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}
