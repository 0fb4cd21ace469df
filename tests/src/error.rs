//! Error types for the test framework.

use arbor_core::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("fixture setup failed: {0}")]
    Setup(String),

    #[error("[{scenario}] step '{step}': expected {expected}, got {actual}")]
    StepFailed {
        scenario: String,
        step: String,
        expected: String,
        actual: String,
    },

    #[error("[{scenario}] check '{step}' failed: {reason}")]
    CheckFailed {
        scenario: String,
        step: String,
        reason: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ScenarioError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
