//! NodeTypeRegistryBuilder for constructing an immutable NodeTypeRegistry.

use crate::{NodeTypeDef, NodeTypeRegistry, PropertyDef, RegistryError, RegistryResult};
use arbor_core::{JCR_MIXIN_TYPES, JCR_PRIMARY_TYPE, JCR_UUID};
use std::collections::BTreeMap;

/// Root of every primary type hierarchy.
pub const NT_BASE: &str = "nt:base";
pub const NT_UNSTRUCTURED: &str = "nt:unstructured";
pub const NT_FOLDER: &str = "nt:folder";
pub const NT_FILE: &str = "nt:file";
pub const NT_RESOURCE: &str = "nt:resource";
pub const MIX_REFERENCEABLE: &str = "mix:referenceable";
pub const MIX_TITLE: &str = "mix:title";

/// Builder for constructing an immutable NodeTypeRegistry.
#[derive(Debug)]
pub struct NodeTypeRegistryBuilder {
    types: BTreeMap<String, NodeTypeDef>,
}

impl Default for NodeTypeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTypeRegistryBuilder {
    /// Create a builder pre-populated with the built-in types.
    pub fn new() -> Self {
        Self {
            types: builtin_types(),
        }
    }

    /// Create a builder with no types at all.
    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Add a primary node type.
    pub fn add_type(&mut self, name: impl Into<String>) -> NodeTypeBuilder<'_> {
        NodeTypeBuilder::new(self, name.into(), false)
    }

    /// Add a mixin node type.
    pub fn add_mixin(&mut self, name: impl Into<String>) -> NodeTypeBuilder<'_> {
        NodeTypeBuilder::new(self, name.into(), true)
    }

    /// Build the immutable NodeTypeRegistry.
    pub fn build(self) -> RegistryResult<NodeTypeRegistry> {
        // Value constraints must compile
        for def in self.types.values() {
            for prop in def.properties.values() {
                if let Some(pattern) = &prop.value_constraint {
                    regex_lite::Regex::new(pattern)
                        .map_err(|e| RegistryError::invalid_constraint(&prop.name, e.to_string()))?;
                }
            }
        }
        Ok(NodeTypeRegistry::new(self.types))
    }
}

/// Builder for a single node type definition.
pub struct NodeTypeBuilder<'a> {
    builder: &'a mut NodeTypeRegistryBuilder,
    def: NodeTypeDef,
}

impl<'a> NodeTypeBuilder<'a> {
    fn new(builder: &'a mut NodeTypeRegistryBuilder, name: String, is_mixin: bool) -> Self {
        let mut def = NodeTypeDef::new(name);
        def.is_mixin = is_mixin;
        Self { builder, def }
    }

    /// Add a supertype by name.
    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.def.supertypes.push(name.into());
        self
    }

    /// Nodes of this type keep a caller-controlled child order.
    pub fn orderable(mut self) -> Self {
        self.def.orderable_children = true;
        self
    }

    /// Declare a property.
    pub fn property(mut self, prop: PropertyDef) -> Self {
        self.def.properties.insert(prop.name.clone(), prop);
        self
    }

    /// Finish building this type.
    pub fn done(mut self) -> RegistryResult<()> {
        if self.builder.types.contains_key(&self.def.name) {
            return Err(RegistryError::DuplicateNodeType(self.def.name));
        }

        // Supertypes must already be defined, which also rules out cycles
        for name in &self.def.supertypes {
            let Some(parent) = self.builder.types.get(name) else {
                return Err(RegistryError::UnknownNodeType(name.clone()));
            };
            if parent.is_mixin && !self.def.is_mixin {
                return Err(RegistryError::MixinAsPrimary { name: name.clone() });
            }
        }

        // Primary types without a declared supertype extend nt:base
        if !self.def.is_mixin
            && self.def.supertypes.is_empty()
            && self.def.name != NT_BASE
            && self.builder.types.contains_key(NT_BASE)
        {
            self.def.supertypes.push(NT_BASE.to_string());
        }

        self.builder.types.insert(self.def.name.clone(), self.def);
        Ok(())
    }
}

pub(crate) fn builtin_types() -> BTreeMap<String, NodeTypeDef> {
    let mut base = NodeTypeDef::new(NT_BASE);
    add(&mut base, PropertyDef::new(JCR_PRIMARY_TYPE).mandatory().protected());
    add(&mut base, PropertyDef::new(JCR_MIXIN_TYPES).protected());

    let mut unstructured = primary(NT_UNSTRUCTURED);
    unstructured.orderable_children = true;

    let folder = primary(NT_FOLDER);
    let file = primary(NT_FILE);

    let mut resource = primary(NT_RESOURCE);
    add(&mut resource, PropertyDef::new("jcr:data").mandatory());
    add(&mut resource, PropertyDef::new("jcr:mimeType"));

    let mut referenceable = mixin(MIX_REFERENCEABLE);
    add(
        &mut referenceable,
        PropertyDef::new(JCR_UUID)
            .mandatory()
            .protected()
            .autocreated_identifier(),
    );

    let mut title = mixin(MIX_TITLE);
    add(&mut title, PropertyDef::new("jcr:title"));
    add(&mut title, PropertyDef::new("jcr:description"));

    [base, unstructured, folder, file, resource, referenceable, title]
        .into_iter()
        .map(|def| (def.name.clone(), def))
        .collect()
}

fn primary(name: &str) -> NodeTypeDef {
    let mut def = NodeTypeDef::new(name);
    def.supertypes.push(NT_BASE.to_string());
    def
}

fn mixin(name: &str) -> NodeTypeDef {
    let mut def = NodeTypeDef::new(name);
    def.is_mixin = true;
    def
}

fn add(def: &mut NodeTypeDef, prop: PropertyDef) {
    def.properties.insert(prop.name.clone(), prop);
}
