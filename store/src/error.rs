//! Store error types.

use arbor_core::{Identifier, TransportError};
use arbor_registry::RegistryError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by repository primitives.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Workspace already exists: {0}")]
    WorkspaceExists(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Item already exists: {0}")]
    ItemExists(String),

    #[error("Identifier already in use: {0}")]
    IdentifierInUse(Identifier),

    #[error("Cannot remove or relink the root node")]
    RootNode,

    #[error("Cannot move {node} below itself")]
    CyclicMove { node: String },

    #[error("Node {target} is still referenced by {referrer}")]
    ReferentialIntegrity { target: Identifier, referrer: String },

    #[error("Invalid child order for {node}: {reason}")]
    InvalidChildOrder { node: String, reason: String },

    #[error("Cannot revert {change}: {reason}")]
    RevertConflict { change: &'static str, reason: String },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn node_not_found(what: impl ToString) -> Self {
        Self::NodeNotFound(what.to_string())
    }

    pub fn property_not_found(what: impl ToString) -> Self {
        Self::PropertyNotFound(what.to_string())
    }

    pub fn item_exists(what: impl ToString) -> Self {
        Self::ItemExists(what.to_string())
    }

    pub fn referential_integrity(target: Identifier, referrer: impl Into<String>) -> Self {
        Self::ReferentialIntegrity {
            target,
            referrer: referrer.into(),
        }
    }

    pub fn revert_conflict(change: &'static str, reason: impl Into<String>) -> Self {
        Self::RevertConflict {
            change,
            reason: reason.into(),
        }
    }

    pub fn invalid_child_order(node: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidChildOrder {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for TransportError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::WorkspaceNotFound(what)
            | StoreError::NodeNotFound(what)
            | StoreError::PropertyNotFound(what) => TransportError::path_not_found(what),
            StoreError::ItemExists(what) | StoreError::WorkspaceExists(what) => {
                TransportError::item_exists(what)
            }
            StoreError::IdentifierInUse(id) => TransportError::item_exists(id.to_string()),
            StoreError::Registry(e) => e.into(),
            other => TransportError::repository(other.to_string()),
        }
    }
}
