//! Arbor Transport
//!
//! The write transport contract and its in-memory implementation.
//!
//! Responsibilities:
//! - Define the contract traits (save lifecycle, structural mutations,
//!   batch application, namespace writes)
//! - Carry the session's workspace as an explicit context
//! - Load transport configuration from TOML
//! - Route every call through the mutation executor and the save cycle
//! - Persist repository snapshots at the commit point

mod config;
mod context;
mod contract;
mod memory;

pub use config::{ConfigError, ConfigResult, TransportConfig};
pub use context::SessionContext;
pub use contract::{BatchApplier, NamespaceWriter, SaveLifecycle, StructuralMutator, WritingTransport};
pub use memory::{shared, MemoryTransport, SharedRepository};
