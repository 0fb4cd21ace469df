//! Save lifecycle states.

use std::fmt;

/// Transaction state of a save cycle.
///
/// `Idle -> Preparing -> Active -> {Committing | RollingBack} -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// No save cycle is open.
    #[default]
    Idle,
    /// A cycle was opened and nothing has been applied yet.
    Preparing,
    /// At least one mutation succeeded inside the cycle.
    Active,
    /// The cycle is being committed.
    Committing,
    /// The cycle is being undone.
    RollingBack,
}

impl TransactionState {
    /// Whether mutations are journaled in this state.
    pub fn is_open(&self) -> bool {
        matches!(self, TransactionState::Preparing | TransactionState::Active)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionState::Idle => "Idle",
            TransactionState::Preparing => "Preparing",
            TransactionState::Active => "Active",
            TransactionState::Committing => "Committing",
            TransactionState::RollingBack => "RollingBack",
        };
        f.write_str(name)
    }
}
