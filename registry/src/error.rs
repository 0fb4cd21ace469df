//! Registry error types.

use arbor_core::TransportError;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by the namespace and node type registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Built-in namespace cannot be changed: {prefix}")]
    BuiltinNamespace { prefix: String },

    #[error("Invalid namespace prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("Namespace URI must not be empty for prefix {prefix}")]
    EmptyUri { prefix: String },

    #[error("Unknown namespace prefix: {0}")]
    UnknownPrefix(String),

    #[error("Duplicate node type name: {0}")]
    DuplicateNodeType(String),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Node type {name} is a mixin and cannot be a primary type")]
    MixinAsPrimary { name: String },

    #[error("Node type {name} is not a mixin")]
    NotAMixin { name: String },

    #[error("Missing mandatory property: {property} required by {node_type}")]
    MissingMandatory { node_type: String, property: String },

    #[error("Invalid value constraint on {property}: {message}")]
    InvalidConstraint { property: String, message: String },

    #[error("Value of {property} violates constraint {constraint}: {value}")]
    ConstraintViolation {
        property: String,
        constraint: String,
        value: String,
    },
}

impl RegistryError {
    pub fn builtin_namespace(prefix: impl Into<String>) -> Self {
        Self::BuiltinNamespace {
            prefix: prefix.into(),
        }
    }

    pub fn invalid_prefix(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_mandatory(node_type: impl Into<String>, property: impl Into<String>) -> Self {
        Self::MissingMandatory {
            node_type: node_type.into(),
            property: property.into(),
        }
    }

    pub fn invalid_constraint(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn constraint_violation(
        property: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::ConstraintViolation {
            property: property.into(),
            constraint: constraint.into(),
            value: value.into(),
        }
    }
}

impl From<RegistryError> for TransportError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::InvalidPrefix { prefix, reason } => {
                TransportError::invalid_name(prefix, reason)
            }
            other => TransportError::repository(other.to_string()),
        }
    }
}
