//! Arbor Registry
//!
//! Name-level metadata the backend consults while applying writes:
//! - Namespace prefix/URI mappings (write side), kept bijective
//! - Node type definitions: orderable children, mandatory, autocreated and
//!   protected properties, value constraints
//!
//! # Module Structure
//!
//! - `namespace` - NamespaceRegistry and the built-in mappings
//! - `types` - NodeTypeDef and PropertyDef
//! - `registry` - NodeTypeRegistry lookups and node validation
//! - `builder` - NodeTypeRegistryBuilder
//! - `error` - Error types for registry failures

mod builder;
mod error;
mod namespace;
mod registry;
mod types;

pub use builder::{
    NodeTypeBuilder, NodeTypeRegistryBuilder, MIX_REFERENCEABLE, MIX_TITLE, NT_BASE, NT_FILE,
    NT_FOLDER, NT_RESOURCE, NT_UNSTRUCTURED,
};
pub use error::{RegistryError, RegistryResult};
pub use namespace::{NamespaceMapping, NamespaceRegistry, BUILTIN_NAMESPACES};
pub use registry::NodeTypeRegistry;
pub use types::{AutoCreate, NodeTypeDef, PropertyDef};
