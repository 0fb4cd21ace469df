//! Arbor Core Types
//!
//! This crate provides the foundational types shared by every layer of the
//! write transport:
//! - Identity types (Identifier, WorkspaceName)
//! - Absolute repository paths (Path)
//! - Property values (Value, PropertyValue)
//! - Caller-owned snapshots handed to the transport (NodeSnapshot, PropertySnapshot)
//! - Local name validation (NameValidator)
//! - The contract-level error type (TransportError)

mod entity;
mod error;
mod id;
mod name;
mod path;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use name::*;
pub use path::*;
pub use value::*;
