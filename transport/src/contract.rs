//! The write transport contract.
//!
//! A backend accepts structural mutations, batched log operations and
//! namespace writes, bracketed by a save lifecycle. Paths always name
//! absolute locations; snapshots are read for the duration of a call only.

use arbor_core::{NameValidator, Path, PropertySnapshot, TransportResult, WorkspaceName};
use arbor_mutation::{
    AddNodeOperation, Batch, ChildOrder, MoveSpec, OperationLog, RemoveNodeOperation,
    RemovePropertyOperation,
};
use arbor_registry::NamespaceMapping;
use arbor_transaction::TransactionState;

/// Save-cycle boundaries.
///
/// `prepare_save` while a cycle is open and `finish_save` without one are
/// contract violations and panic.
pub trait SaveLifecycle {
    fn state(&self) -> TransactionState;

    /// Idle -> Preparing.
    fn prepare_save(&mut self) -> TransportResult<()>;

    /// The single commit point of a cycle.
    fn finish_save(&mut self) -> TransportResult<()>;

    /// Undo everything applied since `prepare_save`. A no-op when Idle.
    fn rollback_save(&mut self) -> TransportResult<()>;
}

/// Immediate operations applied directly to storage, never journaled.
/// `reorder_children` is the exception: it joins an open save cycle.
pub trait StructuralMutator {
    /// Duplicate `src` to `dst` under fresh identifiers. `dst` includes the
    /// new name. `src_workspace` defaults to the session's workspace.
    fn copy_node(
        &mut self,
        src: &Path,
        dst: &Path,
        src_workspace: Option<&WorkspaceName>,
    ) -> TransportResult<()>;

    /// Duplicate `src` from `src_workspace` to `dst` in the session's
    /// workspace. An existing node at `dst` is replaced only when
    /// `remove_existing` is set.
    fn clone_from(
        &mut self,
        src_workspace: &WorkspaceName,
        src: &Path,
        dst: &Path,
        remove_existing: bool,
    ) -> TransportResult<()>;

    /// Move `src` below `dst_parent`. Unlike [`BatchApplier::move_nodes`],
    /// the destination names the new parent and the node keeps its name.
    fn move_node_immediately(&mut self, src: &Path, dst_parent: &Path) -> TransportResult<()>;

    fn reorder_children(&mut self, path: &Path, order: &ChildOrder) -> TransportResult<()>;
}

/// Application of an operation log.
///
/// A failing call applies nothing; earlier calls of the cycle stay applied
/// until the caller rolls back.
pub trait BatchApplier {
    /// Moves in array order. Each destination includes the new name.
    fn move_nodes(&mut self, operations: &[MoveSpec]) -> TransportResult<()>;

    /// Create each node with its own properties, never its children.
    fn store_nodes(&mut self, operations: &[AddNodeOperation]) -> TransportResult<()>;

    fn store_property(&mut self, property: &PropertySnapshot) -> TransportResult<()>;

    /// Remove subtrees. References among the removed nodes do not block
    /// removal.
    fn delete_nodes(&mut self, operations: &[RemoveNodeOperation]) -> TransportResult<()>;

    fn delete_properties(&mut self, operations: &[RemovePropertyOperation]) -> TransportResult<()>;

    /// Remove a single node outside any save cycle. Fails with
    /// PathNotFound when the node is already gone.
    fn delete_node_immediately(&mut self, path: &Path) -> TransportResult<()>;

    /// Remove a single property outside any save cycle. Fails with
    /// PathNotFound when the property is already gone.
    fn delete_property_immediately(&mut self, path: &Path) -> TransportResult<()>;

    /// Apply a whole log, one run of same-kind operations at a time,
    /// stopping at the first failure.
    fn apply_log(&mut self, log: OperationLog) -> TransportResult<()> {
        for batch in log.into_batches() {
            match batch {
                Batch::AddNodes(ops) => self.store_nodes(&ops)?,
                Batch::MoveNodes(ops) => self.move_nodes(&ops)?,
                Batch::RemoveNodes(ops) => self.delete_nodes(&ops)?,
                Batch::RemoveProperties(ops) => self.delete_properties(&ops)?,
            }
        }
        Ok(())
    }
}

/// Namespace writes. Immediate and outside any save cycle.
pub trait NamespaceWriter {
    /// Map `prefix` to `uri`, evicting any mapping that used either half.
    /// Returns the evicted mappings.
    fn register_namespace(&mut self, prefix: &str, uri: &str) -> TransportResult<Vec<NamespaceMapping>>;

    fn unregister_namespace(&mut self, prefix: &str) -> TransportResult<()>;
}

/// A complete write transport.
pub trait WritingTransport: SaveLifecycle + StructuralMutator + BatchApplier + NamespaceWriter {
    fn name_validator(&self) -> &NameValidator;

    /// Succeeds when `name` is a legal local name for this backend.
    fn assert_valid_name(&self, name: &str) -> TransportResult<()> {
        self.name_validator().assert_valid_name(name)
    }
}
