//! Node type definition types.

use arbor_core::{Identifier, PropertyValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an autocreated property obtains its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoCreate {
    /// The node's own Identifier, as a string.
    Identifier,
    /// A fixed default.
    Value(PropertyValue),
}

impl AutoCreate {
    /// Produce the value for a node with the given identifier.
    pub fn produce(&self, id: Identifier) -> PropertyValue {
        match self {
            AutoCreate::Identifier => PropertyValue::Single(Value::String(id.to_string())),
            AutoCreate::Value(v) => v.clone(),
        }
    }
}

/// Property definition within a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Whether the property must be present on every node of the type.
    pub mandatory: bool,
    /// Whether callers may write or remove the property.
    pub protected: bool,
    /// Value generated when the node is created without the property.
    pub autocreate: Option<AutoCreate>,
    /// Regex every value's text must match in full.
    pub value_constraint: Option<String>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            protected: false,
            autocreate: None,
            value_constraint: None,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn autocreated(mut self, default: impl Into<PropertyValue>) -> Self {
        self.autocreate = Some(AutoCreate::Value(default.into()));
        self
    }

    pub fn autocreated_identifier(mut self) -> Self {
        self.autocreate = Some(AutoCreate::Identifier);
        self
    }

    pub fn value_constraint(mut self, pattern: impl Into<String>) -> Self {
        self.value_constraint = Some(pattern.into());
        self
    }
}

/// Node type definition, primary or mixin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeDef {
    /// Qualified type name.
    pub name: String,
    /// Mixins decorate nodes; they are never a node's primary type.
    pub is_mixin: bool,
    /// Whether nodes of this type keep a caller-controlled child order.
    pub orderable_children: bool,
    /// Direct supertype names.
    pub supertypes: Vec<String>,
    /// Properties declared by this type itself.
    pub properties: BTreeMap<String, PropertyDef>,
}

impl NodeTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_mixin: false,
            orderable_children: false,
            supertypes: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Get a declared property definition by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }
}
