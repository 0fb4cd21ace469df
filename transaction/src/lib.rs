//! Arbor Transaction
//!
//! Save-cycle management over a repository without native transactions.
//!
//! Responsibilities:
//! - Track the save lifecycle (Idle, Preparing, Active, Committing, RollingBack)
//! - Fail fatally on lifecycle contract violations
//! - Journal every change applied inside a cycle
//! - Check referential integrity at the commit point
//! - Undo a cycle exactly by reverting its journal in reverse
//! - Report the locations an open cycle still has to undo

mod cycle;
mod error;
mod journal;
mod state;

pub use cycle::SaveCycle;
pub use error::{TransactionError, TransactionResult};
pub use journal::{ClaimedLocations, UndoJournal};
pub use state::TransactionState;
