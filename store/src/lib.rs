//! Arbor Store
//!
//! In-memory content repository backing the write transport:
//! - Workspaces of nodes keyed by Identifier, with ordered children
//! - Reference index: find the nodes holding hard references to a node
//! - Undo records: every mutating primitive returns a Change that
//!   `Repository::revert` inverts exactly
//! - Integrity: deferred hard-reference checks
//! - JSON snapshot persistence with atomic replace

mod change;
mod error;
mod index;
mod node;
mod persist;
mod repository;
mod workspace;

pub use change::Change;
pub use error::{StoreError, StoreResult};
pub use index::ReferenceIndex;
pub use node::{NewNode, StoredNode};
pub use repository::Repository;
pub use workspace::Workspace;
