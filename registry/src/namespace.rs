//! Namespace prefix/URI mappings.
//!
//! The registry keeps the mapping bijective: every prefix maps to at most
//! one URI and every URI is bound to at most one prefix. Registering a pair
//! that collides with existing mappings evicts the stale halves first.

use arbor_core::NameValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{RegistryError, RegistryResult};

/// Mappings every repository starts with. They can be neither remapped nor
/// unregistered.
pub const BUILTIN_NAMESPACES: &[(&str, &str)] = &[
    ("", ""),
    ("jcr", "http://www.jcp.org/jcr/1.0"),
    ("nt", "http://www.jcp.org/jcr/nt/1.0"),
    ("mix", "http://www.jcp.org/jcr/mix/1.0"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
];

/// A single prefix/URI pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceMapping {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceMapping {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// Bidirectional prefix/URI registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRegistry {
    by_prefix: BTreeMap<String, String>,
    by_uri: BTreeMap<String, String>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceRegistry {
    /// Create a registry holding the built-in mappings.
    pub fn new() -> Self {
        let mut registry = Self {
            by_prefix: BTreeMap::new(),
            by_uri: BTreeMap::new(),
        };
        for (prefix, uri) in BUILTIN_NAMESPACES {
            registry.by_prefix.insert(prefix.to_string(), uri.to_string());
            registry.by_uri.insert(uri.to_string(), prefix.to_string());
        }
        registry
    }

    /// URI bound to `prefix`.
    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    /// Prefix bound to `uri`.
    pub fn prefix(&self, uri: &str) -> Option<&str> {
        self.by_uri.get(uri).map(String::as_str)
    }

    /// All mappings ordered by prefix.
    pub fn mappings(&self) -> impl Iterator<Item = NamespaceMapping> + '_ {
        self.by_prefix
            .iter()
            .map(|(prefix, uri)| NamespaceMapping::new(prefix.clone(), uri.clone()))
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    pub fn is_builtin_prefix(prefix: &str) -> bool {
        BUILTIN_NAMESPACES.iter().any(|(p, _)| *p == prefix)
    }

    pub fn is_builtin_uri(uri: &str) -> bool {
        BUILTIN_NAMESPACES.iter().any(|(_, u)| *u == uri)
    }

    /// Bind `prefix` to `uri`, evicting any stale mapping that used either
    /// half. Returns the evicted mappings.
    pub fn register(&mut self, prefix: &str, uri: &str) -> RegistryResult<Vec<NamespaceMapping>> {
        if self.uri(prefix) == Some(uri) {
            return Ok(Vec::new());
        }
        if Self::is_builtin_prefix(prefix) || Self::is_builtin_uri(uri) {
            return Err(RegistryError::builtin_namespace(prefix));
        }
        validate_prefix(prefix)?;
        if uri.is_empty() {
            return Err(RegistryError::EmptyUri {
                prefix: prefix.to_string(),
            });
        }

        let mut evicted = Vec::new();
        if let Some(old_uri) = self.by_prefix.remove(prefix) {
            self.by_uri.remove(&old_uri);
            evicted.push(NamespaceMapping::new(prefix, old_uri));
        }
        if let Some(old_prefix) = self.by_uri.remove(uri) {
            self.by_prefix.remove(&old_prefix);
            evicted.push(NamespaceMapping::new(old_prefix, uri));
        }

        self.by_prefix.insert(prefix.to_string(), uri.to_string());
        self.by_uri.insert(uri.to_string(), prefix.to_string());
        Ok(evicted)
    }

    /// Remove the mapping for `prefix`.
    pub fn unregister(&mut self, prefix: &str) -> RegistryResult<NamespaceMapping> {
        if Self::is_builtin_prefix(prefix) {
            return Err(RegistryError::builtin_namespace(prefix));
        }
        let uri = self
            .by_prefix
            .remove(prefix)
            .ok_or_else(|| RegistryError::UnknownPrefix(prefix.to_string()))?;
        self.by_uri.remove(&uri);
        Ok(NamespaceMapping::new(prefix, uri))
    }
}

fn validate_prefix(prefix: &str) -> RegistryResult<()> {
    NameValidator::default()
        .assert_valid_name(prefix)
        .map_err(|e| RegistryError::invalid_prefix(prefix, e.to_string()))?;
    if prefix.to_ascii_lowercase().starts_with("xml") {
        return Err(RegistryError::invalid_prefix(prefix, "prefixes starting with 'xml' are reserved"));
    }
    Ok(())
}
