//! Caller-owned snapshots handed to the transport.
//!
//! The object graph that produces an operation log owns its nodes and
//! properties. The transport only ever sees these snapshots, and only for
//! the duration of the call that receives them.

use crate::{Identifier, Path, Properties, PropertyValue, Value};
use serde::{Deserialize, Serialize};

/// Property holding a node's primary type name.
pub const JCR_PRIMARY_TYPE: &str = "jcr:primaryType";
/// Property holding a node's mixin type names.
pub const JCR_MIXIN_TYPES: &str = "jcr:mixinTypes";
/// Property holding a referenceable node's identifier.
pub const JCR_UUID: &str = "jcr:uuid";

/// The state of a single node, excluding its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Primary node type name.
    pub primary_type: String,
    /// Mixin type names.
    pub mixins: Vec<String>,
    /// Identifier proposed by the caller, if any.
    pub identifier: Option<Identifier>,
    /// The node's own properties.
    pub properties: Properties,
}

impl NodeSnapshot {
    /// Create a snapshot with the given primary type and no properties.
    pub fn new(primary_type: impl Into<String>) -> Self {
        Self {
            primary_type: primary_type.into(),
            mixins: Vec::new(),
            identifier: None,
            properties: Properties::new(),
        }
    }

    pub fn with_mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    pub fn with_identifier(mut self, id: Identifier) -> Self {
        self.identifier = Some(id);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    /// The identifier to adopt: the explicit one, else a parseable
    /// `jcr:uuid` property.
    pub fn proposed_identifier(&self) -> Option<Identifier> {
        if let Some(id) = self.identifier {
            return Some(id);
        }
        match self.properties.get(JCR_UUID) {
            Some(PropertyValue::Single(Value::String(s))) => s.parse().ok(),
            _ => None,
        }
    }
}

/// A single property addressed by its full path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    /// Owning node path plus the property name.
    pub path: Path,
    pub value: PropertyValue,
}

impl PropertySnapshot {
    pub fn new(path: Path, value: impl Into<PropertyValue>) -> Self {
        Self {
            path,
            value: value.into(),
        }
    }
}
