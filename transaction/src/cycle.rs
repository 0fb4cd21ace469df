//! Save cycle state machine.
//!
//! The repository applies every mutation as soon as it arrives. A save cycle
//! journals those changes so the whole unit can be committed after an
//! integrity check or undone exactly.

use arbor_core::WorkspaceName;
use arbor_store::{Change, Repository, StoreError};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::{TransactionError, TransactionResult};
use crate::journal::UndoJournal;
use crate::state::TransactionState;

/// One save cycle at a time: prepare, apply, then commit or roll back.
///
/// Lifecycle contract violations (opening a second cycle, finishing a cycle
/// that was never opened) panic.
#[derive(Debug, Default)]
pub struct SaveCycle {
    state: TransactionState,
    journal: UndoJournal,
}

impl SaveCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Whether mutations are currently journaled.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn journal(&self) -> &UndoJournal {
        &self.journal
    }

    // ========== Lifecycle ==========

    /// Idle -> Preparing.
    ///
    /// # Panics
    ///
    /// If a cycle is already open.
    pub fn prepare(&mut self) {
        if self.state != TransactionState::Idle {
            panic!(
                "prepare_save called in state {}: only one save cycle may be open",
                self.state
            );
        }
        self.journal.clear();
        self.state = TransactionState::Preparing;
        info!("save cycle prepared");
    }

    /// Journal the changes of a successful mutation.
    ///
    /// The first mutation moves a Preparing cycle to Active. Nothing is
    /// recorded when no cycle is open.
    pub fn record(&mut self, changes: Vec<Change>) {
        if !self.is_open() {
            debug!(changes = changes.len(), "no open save cycle, changes not journaled");
            return;
        }
        if self.state == TransactionState::Preparing {
            self.state = TransactionState::Active;
            debug!("save cycle active");
        }
        self.journal.extend(changes);
    }

    /// Preparing/Active -> Committing -> Idle.
    ///
    /// Every workspace the journal touched, plus `session`, must pass the
    /// integrity check. On failure the cycle returns to Active and the
    /// caller is expected to roll back.
    ///
    /// # Panics
    ///
    /// If no cycle is open.
    pub fn commit(&mut self, repo: &Repository, session: &WorkspaceName) -> TransactionResult<()> {
        self.commit_with(repo, session, |_| Ok(()))
    }

    /// Like [`SaveCycle::commit`], running `durable` after the integrity
    /// check and before the cycle closes. If `durable` fails the cycle
    /// returns to Active.
    ///
    /// # Panics
    ///
    /// If no cycle is open.
    pub fn commit_with<F>(
        &mut self,
        repo: &Repository,
        session: &WorkspaceName,
        durable: F,
    ) -> TransactionResult<()>
    where
        F: FnOnce(&Repository) -> Result<(), StoreError>,
    {
        if !self.is_open() {
            panic!(
                "finish_save called in state {}: no save cycle is open",
                self.state
            );
        }
        self.state = TransactionState::Committing;

        let mut workspaces = self.journal.workspaces();
        workspaces.insert(session.clone());
        if let Err(e) = check_all(repo, &workspaces) {
            self.state = TransactionState::Active;
            return Err(e);
        }
        if let Err(e) = durable(repo) {
            self.state = TransactionState::Active;
            return Err(e.into());
        }

        let applied = self.journal.len();
        self.journal.clear();
        self.state = TransactionState::Idle;
        info!(changes = applied, "save cycle committed");
        Ok(())
    }

    /// Any state -> RollingBack -> Idle, undoing everything journaled since
    /// `prepare`. A no-op when Idle. Returns the number of reverted changes.
    pub fn rollback(&mut self, repo: &mut Repository) -> TransactionResult<usize> {
        if self.state == TransactionState::Idle {
            debug!("rollback with no open save cycle");
            return Ok(0);
        }
        self.state = TransactionState::RollingBack;
        let total = self.journal.len();
        let failed = self.journal.unwind(repo);
        self.state = TransactionState::Idle;
        info!(reverted = total - failed, "save cycle rolled back");

        if failed > 0 {
            return Err(TransactionError::RollbackIncomplete { failed });
        }
        Ok(total)
    }

    /// Commit a single call made outside any cycle: check integrity of the
    /// workspaces it touched and undo it if the check fails.
    pub fn auto_commit(repo: &mut Repository, changes: Vec<Change>) -> TransactionResult<()> {
        let mut journal = UndoJournal::new();
        journal.extend(changes);
        if let Err(e) = check_all(repo, &journal.workspaces()) {
            journal.unwind(repo);
            return Err(e);
        }
        Ok(())
    }
}

fn check_all(repo: &Repository, workspaces: &BTreeSet<WorkspaceName>) -> TransactionResult<()> {
    for ws in workspaces {
        repo.check_integrity(ws)
            .map_err(|e| TransactionError::commit_rejected(ws.clone(), e))?;
    }
    Ok(())
}
