//! In-memory write transport.
//!
//! Applies every call to a shared [`Repository`] at once. Calls made while a
//! save cycle is open are journaled so the cycle can be rolled back; calls
//! made while Idle are committed one by one. With a configured snapshot path
//! the repository is written to disk at every commit point.

use arbor_core::{
    NameValidator, Path, PropertySnapshot, TransportError, TransportResult, WorkspaceName,
};
use arbor_mutation::{
    AddNodeOperation, ChildOrder, MoveSpec, MutationExecutor, MutationResult, ReferenceCheck,
    RemoveNodeOperation, RemovePropertyOperation,
};
use arbor_registry::NamespaceMapping;
use arbor_store::{Change, Repository};
use arbor_transaction::{SaveCycle, TransactionState};
use parking_lot::Mutex;
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::TransportConfig;
use crate::context::SessionContext;
use crate::contract::{BatchApplier, NamespaceWriter, SaveLifecycle, StructuralMutator, WritingTransport};

/// A repository shared by several transports.
pub type SharedRepository = Arc<Mutex<Repository>>;

pub fn shared(repository: Repository) -> SharedRepository {
    Arc::new(Mutex::new(repository))
}

/// Whether an operation joins an open save cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Journaling {
    Cycle,
    /// Applied outside the cycle. While a cycle is open the footprint must
    /// stay clear of everything the cycle would undo.
    Immediate(Footprint),
}

/// Paths an immediate operation creates, removes or moves, and the parents
/// whose child lists it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Footprint {
    paths: Vec<Path>,
    parents: Vec<Path>,
}

impl Footprint {
    fn node(path: &Path) -> Self {
        Self {
            paths: vec![path.clone()],
            parents: path.parent().into_iter().collect(),
        }
    }

    fn property(path: &Path) -> Self {
        Self {
            paths: vec![path.clone()],
            parents: Vec::new(),
        }
    }

    fn relocation(src: &Path, dst_parent: &Path) -> Self {
        let mut footprint = Self::node(src);
        if let Some(dst) = src.name().and_then(|name| dst_parent.child(name).ok()) {
            footprint.paths.push(dst);
        }
        footprint.parents.push(dst_parent.clone());
        footprint
    }
}

/// Write transport over an in-memory repository.
pub struct MemoryTransport {
    repository: SharedRepository,
    context: SessionContext,
    config: TransportConfig,
    validator: NameValidator,
    cycle: SaveCycle,
}

impl MemoryTransport {
    /// Open a transport for the session's workspace, which must exist.
    pub fn open(
        repository: SharedRepository,
        context: SessionContext,
        config: TransportConfig,
    ) -> TransportResult<Self> {
        repository.lock().workspace(context.workspace()).map(|_| ())?;
        let validator = config.name_validator();
        info!(workspace = %context.workspace(), "transport opened");
        Ok(Self {
            repository,
            context,
            config,
            validator,
            cycle: SaveCycle::new(),
        })
    }

    /// Open a transport for the workspace named by `config`.
    pub fn from_config(repository: SharedRepository, config: TransportConfig) -> TransportResult<Self> {
        let context = SessionContext::new(config.workspace.clone());
        Self::open(repository, context, config)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }

    /// Run one executor call and settle its changes: journal them inside a
    /// cycle, commit them outside one.
    fn apply<F>(&mut self, operation: &'static str, journaling: Journaling, f: F) -> TransportResult<()>
    where
        F: FnOnce(&mut MutationExecutor<'_>) -> MutationResult<Vec<Change>>,
    {
        let workspace = self.context.workspace();
        let mut repo = self.repository.lock();
        let references = match (&journaling, self.cycle.is_open()) {
            (Journaling::Cycle, true) => ReferenceCheck::AtCommit,
            _ => ReferenceCheck::Eager,
        };
        if let (Journaling::Immediate(footprint), true) = (&journaling, self.cycle.is_open()) {
            check_footprint(operation, &self.cycle, &repo, workspace, footprint)?;
        }

        let mut executor =
            MutationExecutor::new(&mut repo, workspace, &self.validator).with_reference_check(references);
        let changes = f(&mut executor)?;
        debug!(
            operation,
            workspace = %workspace,
            changes = changes.len(),
            state = %self.cycle.state(),
            "applied operation"
        );

        if self.cycle.is_open() {
            if journaling == Journaling::Cycle {
                self.cycle.record(changes);
            }
            return Ok(());
        }
        SaveCycle::auto_commit(&mut repo, changes)?;
        persist(self.config.snapshot_path.as_deref(), &repo)
    }
}

/// Refuse an immediate operation that would write where the open cycle
/// still has changes to undo. Rolling back over it could otherwise destroy
/// or duplicate what the immediate operation wrote.
fn check_footprint(
    operation: &'static str,
    cycle: &SaveCycle,
    repo: &Repository,
    workspace: &WorkspaceName,
    footprint: &Footprint,
) -> TransportResult<()> {
    let claimed = cycle.journal().claimed(repo, workspace);
    if claimed.is_empty() {
        return Ok(());
    }
    for path in &footprint.paths {
        if let Some(pending) = claimed.overlapping(path) {
            warn!(operation, path = %path, pending = %pending, "immediate operation overlaps open save cycle");
            return Err(TransportError::repository(format!(
                "{} on {} conflicts with pending changes at {} in the open save cycle",
                operation, path, pending
            )));
        }
    }
    if let Some(parent) = footprint.parents.iter().find(|p| claimed.orders_children_of(p)) {
        warn!(operation, parent = %parent, "immediate operation changes children reordered in open save cycle");
        return Err(TransportError::repository(format!(
            "{} changes the children of {}, which the open save cycle reordered",
            operation, parent
        )));
    }
    Ok(())
}

fn persist(path: Option<&FsPath>, repo: &Repository) -> TransportResult<()> {
    if let Some(path) = path {
        repo.save_snapshot(path)?;
        debug!(path = %path.display(), "snapshot written");
    }
    Ok(())
}

impl SaveLifecycle for MemoryTransport {
    fn state(&self) -> TransactionState {
        self.cycle.state()
    }

    fn prepare_save(&mut self) -> TransportResult<()> {
        self.cycle.prepare();
        Ok(())
    }

    fn finish_save(&mut self) -> TransportResult<()> {
        let repo = self.repository.lock();
        let snapshot = self.config.snapshot_path.as_deref();
        self.cycle.commit_with(&repo, self.context.workspace(), |repo| match snapshot {
            Some(path) => repo.save_snapshot(path),
            None => Ok(()),
        })?;
        Ok(())
    }

    fn rollback_save(&mut self) -> TransportResult<()> {
        let mut repo = self.repository.lock();
        if self.cycle.state() == TransactionState::Idle {
            return Ok(());
        }
        self.cycle.rollback(&mut repo)?;
        // Immediate operations issued during the cycle survive the rollback.
        persist(self.config.snapshot_path.as_deref(), &repo)
    }
}

impl StructuralMutator for MemoryTransport {
    fn copy_node(
        &mut self,
        src: &Path,
        dst: &Path,
        src_workspace: Option<&WorkspaceName>,
    ) -> TransportResult<()> {
        let src_workspace = src_workspace
            .cloned()
            .unwrap_or_else(|| self.context.workspace().clone());
        self.apply("copy_node", Journaling::Immediate(Footprint::node(dst)), |ex| {
            ex.copy_node(&src_workspace, src, dst)
        })
    }

    fn clone_from(
        &mut self,
        src_workspace: &WorkspaceName,
        src: &Path,
        dst: &Path,
        remove_existing: bool,
    ) -> TransportResult<()> {
        let policy = self.config.clone_identifiers;
        self.apply("clone_from", Journaling::Immediate(Footprint::node(dst)), |ex| {
            ex.clone_from(policy, src_workspace, src, dst, remove_existing)
        })
    }

    fn move_node_immediately(&mut self, src: &Path, dst_parent: &Path) -> TransportResult<()> {
        let footprint = Footprint::relocation(src, dst_parent);
        self.apply("move_node_immediately", Journaling::Immediate(footprint), |ex| {
            ex.move_node_immediately(src, dst_parent)
        })
    }

    fn reorder_children(&mut self, path: &Path, order: &ChildOrder) -> TransportResult<()> {
        let strategy = self.config.reorder_strategy;
        self.apply("reorder_children", Journaling::Cycle, |ex| {
            ex.reorder_children(strategy, path, order)
        })
    }
}

impl BatchApplier for MemoryTransport {
    fn move_nodes(&mut self, operations: &[MoveSpec]) -> TransportResult<()> {
        self.apply("move_nodes", Journaling::Cycle, |ex| ex.move_nodes(operations))
    }

    fn store_nodes(&mut self, operations: &[AddNodeOperation]) -> TransportResult<()> {
        self.apply("store_nodes", Journaling::Cycle, |ex| ex.store_nodes(operations))
    }

    fn store_property(&mut self, property: &PropertySnapshot) -> TransportResult<()> {
        self.apply("store_property", Journaling::Cycle, |ex| ex.store_property(property))
    }

    fn delete_nodes(&mut self, operations: &[RemoveNodeOperation]) -> TransportResult<()> {
        self.apply("delete_nodes", Journaling::Cycle, |ex| ex.delete_nodes(operations))
    }

    fn delete_properties(&mut self, operations: &[RemovePropertyOperation]) -> TransportResult<()> {
        self.apply("delete_properties", Journaling::Cycle, |ex| {
            ex.delete_properties(operations)
        })
    }

    fn delete_node_immediately(&mut self, path: &Path) -> TransportResult<()> {
        let operation = [RemoveNodeOperation::new(path.clone())];
        let footprint = Footprint::node(path);
        let result = self.apply("delete_node_immediately", Journaling::Immediate(footprint), |ex| {
            ex.delete_nodes(&operation)
        });
        if matches!(&result, Err(e) if e.is_path_not_found()) {
            warn!(path = %path, "node to delete is already absent");
        }
        result
    }

    fn delete_property_immediately(&mut self, path: &Path) -> TransportResult<()> {
        let operation = [RemovePropertyOperation::new(path.clone())];
        let footprint = Footprint::property(path);
        let result = self.apply("delete_property_immediately", Journaling::Immediate(footprint), |ex| {
            ex.delete_properties(&operation)
        });
        if matches!(&result, Err(e) if e.is_path_not_found()) {
            warn!(path = %path, "property to delete is already absent");
        }
        result
    }
}

impl NamespaceWriter for MemoryTransport {
    fn register_namespace(&mut self, prefix: &str, uri: &str) -> TransportResult<Vec<NamespaceMapping>> {
        let mut repo = self.repository.lock();
        let evicted = repo.namespaces_mut().register(prefix, uri)?;
        for stale in &evicted {
            info!(prefix = %stale.prefix, uri = %stale.uri, "evicted namespace mapping");
        }
        info!(prefix, uri, "registered namespace");
        if !self.cycle.is_open() {
            persist(self.config.snapshot_path.as_deref(), &repo)?;
        }
        Ok(evicted)
    }

    fn unregister_namespace(&mut self, prefix: &str) -> TransportResult<()> {
        let mut repo = self.repository.lock();
        let removed = repo.namespaces_mut().unregister(prefix)?;
        info!(prefix, uri = %removed.uri, "unregistered namespace");
        if !self.cycle.is_open() {
            persist(self.config.snapshot_path.as_deref(), &repo)?;
        }
        Ok(())
    }
}

impl WritingTransport for MemoryTransport {
    fn name_validator(&self) -> &NameValidator {
        &self.validator
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        if self.cycle.state() == TransactionState::Idle {
            return;
        }
        warn!(state = %self.cycle.state(), "transport dropped with an open save cycle; rolling back");
        let mut repo = self.repository.lock();
        if let Err(e) = self.cycle.rollback(&mut repo) {
            warn!(error = %e, "rollback on drop failed");
        }
    }
}
