//! Contract-level error types.
//!
//! Every operation of the write transport fails with one of these kinds.
//! Lower layers keep their own error enums and convert into this one at the
//! transport boundary.

use thiserror::Error;

/// Errors surfaced by the write transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A local name failed validation.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A path string is not an absolute, well-formed repository path.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The operation referenced a node or property absent in the backend.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// The target of the operation already exists.
    #[error("item exists: {0}")]
    ItemExists(String),

    /// Catch-all backend failure: constraint violation, validation failure,
    /// I/O, timeouts.
    #[error("repository error: {message}")]
    Repository { message: String },
}

impl TransportError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound(path.into())
    }

    pub fn item_exists(path: impl Into<String>) -> Self {
        Self::ItemExists(path.into())
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }

    /// True when the item was already absent. Callers of the immediate
    /// delete operations treat this as success.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
