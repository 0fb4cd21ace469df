//! The NodeTypeRegistry - node type lookup and node validation.

use crate::builder::builtin_types;
use crate::{NodeTypeDef, PropertyDef, RegistryError, RegistryResult};
use arbor_core::{Identifier, Properties, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Runtime lookup of node type definitions.
/// It is immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTypeRegistry {
    types: BTreeMap<String, NodeTypeDef>,
}

impl Default for NodeTypeRegistry {
    /// A registry holding only the built-in types.
    fn default() -> Self {
        Self::new(builtin_types())
    }
}

impl NodeTypeRegistry {
    /// Use NodeTypeRegistryBuilder for construction.
    pub(crate) fn new(types: BTreeMap<String, NodeTypeDef>) -> Self {
        Self { types }
    }

    /// Get a type definition by name.
    pub fn get(&self, name: &str) -> Option<&NodeTypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All type names.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.types.keys().map(String::as_str)
    }

    /// Check that `primary` names a primary type and every mixin names a
    /// mixin.
    pub fn validate_types(&self, primary: &str, mixins: &[String]) -> RegistryResult<()> {
        let def = self
            .get(primary)
            .ok_or_else(|| RegistryError::UnknownNodeType(primary.to_string()))?;
        if def.is_mixin {
            return Err(RegistryError::MixinAsPrimary {
                name: primary.to_string(),
            });
        }
        for mixin in mixins {
            let def = self
                .get(mixin)
                .ok_or_else(|| RegistryError::UnknownNodeType(mixin.clone()))?;
            if !def.is_mixin {
                return Err(RegistryError::NotAMixin { name: mixin.clone() });
            }
        }
        Ok(())
    }

    /// Every type that applies to a node: the primary type, its mixins and
    /// all their supertypes, each listed once.
    fn closure<'a>(&'a self, primary: &'a str, mixins: &'a [String]) -> Vec<&'a NodeTypeDef> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut queue: Vec<&str> = std::iter::once(primary)
            .chain(mixins.iter().map(String::as_str))
            .collect();
        queue.reverse();

        while let Some(name) = queue.pop() {
            if !seen.insert(name) {
                continue;
            }
            if let Some(def) = self.get(name) {
                out.push(def);
                queue.extend(def.supertypes.iter().rev().map(String::as_str));
            }
        }
        out
    }

    /// Property definitions in effect for a node. The nearest declaration
    /// of a name wins.
    pub fn effective_properties<'a>(
        &'a self,
        primary: &'a str,
        mixins: &'a [String],
    ) -> BTreeMap<&'a str, &'a PropertyDef> {
        let mut props = BTreeMap::new();
        for def in self.closure(primary, mixins) {
            for (name, prop) in &def.properties {
                props.entry(name.as_str()).or_insert(prop);
            }
        }
        props
    }

    /// Whether a node of these types keeps a caller-controlled child order.
    pub fn is_orderable(&self, primary: &str, mixins: &[String]) -> bool {
        self.closure(primary, mixins)
            .iter()
            .any(|def| def.orderable_children)
    }

    pub fn is_protected(&self, primary: &str, mixins: &[String], property: &str) -> bool {
        self.effective_properties(primary, mixins)
            .get(property)
            .map(|def| def.protected)
            .unwrap_or(false)
    }

    /// Fill in missing autocreated properties. Returns the names added.
    pub fn autocreate(
        &self,
        primary: &str,
        mixins: &[String],
        id: Identifier,
        properties: &mut Properties,
    ) -> Vec<String> {
        let mut added = Vec::new();
        for (name, def) in self.effective_properties(primary, mixins) {
            let Some(auto) = &def.autocreate else {
                continue;
            };
            if !properties.contains_key(name) {
                properties.insert(name.to_string(), auto.produce(id));
                added.push(name.to_string());
            }
        }
        added
    }

    /// Validate a node's properties against its types: mandatory
    /// properties are present and every value satisfies its constraint.
    pub fn check_node(
        &self,
        primary: &str,
        mixins: &[String],
        properties: &Properties,
    ) -> RegistryResult<()> {
        self.validate_types(primary, mixins)?;

        for (name, def) in self.effective_properties(primary, mixins) {
            let Some(value) = properties.get(name) else {
                if def.mandatory {
                    return Err(RegistryError::missing_mandatory(primary, name));
                }
                continue;
            };
            if let Some(pattern) = &def.value_constraint {
                let regex = regex_lite::Regex::new(&format!("^(?:{})$", pattern))
                    .map_err(|e| RegistryError::invalid_constraint(name, e.to_string()))?;
                for v in value.values() {
                    let text = constraint_text(v);
                    if !regex.is_match(&text) {
                        return Err(RegistryError::constraint_violation(name, pattern, text));
                    }
                }
            }
        }
        Ok(())
    }
}

fn constraint_text(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
