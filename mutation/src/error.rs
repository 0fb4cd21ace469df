//! Mutation error types.

use arbor_core::TransportError;
use arbor_registry::RegistryError;
use arbor_store::StoreError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while applying mutations.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Cannot modify protected property: {property}")]
    ProtectedProperty { property: String },

    #[error("Invalid value for {property}: {reason}")]
    InvalidValue { property: String, reason: String },

    #[error("Children of {path} are not orderable")]
    NotOrderable { path: String },

    #[error("Invalid child order for {path}: {reason}")]
    InvalidOrder { path: String, reason: String },

    #[error("Cannot clone within workspace {workspace} while preserving identifiers")]
    SameWorkspaceClone { workspace: String },

    #[error("Cannot {operation} the root node")]
    RootNode { operation: &'static str },
}

impl MutationError {
    pub fn path_not_found(path: impl ToString) -> Self {
        Self::Transport(TransportError::path_not_found(path.to_string()))
    }

    pub fn item_exists(path: impl ToString) -> Self {
        Self::Transport(TransportError::item_exists(path.to_string()))
    }

    pub fn protected_property(property: impl Into<String>) -> Self {
        Self::ProtectedProperty {
            property: property.into(),
        }
    }

    pub fn invalid_value(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            reason: reason.into(),
        }
    }

    pub fn not_orderable(path: impl ToString) -> Self {
        Self::NotOrderable {
            path: path.to_string(),
        }
    }

    pub fn invalid_order(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_path_not_found(&self) -> bool {
        match self {
            MutationError::Transport(e) => e.is_path_not_found(),
            MutationError::Store(StoreError::NodeNotFound(_))
            | MutationError::Store(StoreError::PropertyNotFound(_))
            | MutationError::Store(StoreError::WorkspaceNotFound(_)) => true,
            _ => false,
        }
    }
}

impl From<MutationError> for TransportError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::Transport(e) => e,
            MutationError::Store(e) => e.into(),
            MutationError::Registry(e) => e.into(),
            other => TransportError::repository(other.to_string()),
        }
    }
}
