//! Transaction error types.

use arbor_core::{TransportError, WorkspaceName};
use arbor_store::StoreError;
use thiserror::Error;

/// Transaction errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The commit-time integrity check failed. The cycle stays open.
    #[error("commit rejected in workspace {workspace}: {source}")]
    CommitRejected {
        workspace: WorkspaceName,
        #[source]
        source: StoreError,
    },

    /// Some journal entries could not be reverted.
    #[error("rollback incomplete: {failed} change(s) could not be reverted")]
    RollbackIncomplete { failed: usize },

    /// Store error during the cycle.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl TransactionError {
    pub fn commit_rejected(workspace: WorkspaceName, source: StoreError) -> Self {
        Self::CommitRejected { workspace, source }
    }
}

impl From<TransactionError> for TransportError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::Store(store) => store.into(),
            other => TransportError::repository(other.to_string()),
        }
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
