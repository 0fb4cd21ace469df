//! Arbor Mutation
//!
//! Apply write operations against a repository workspace.
//!
//! Responsibilities:
//! - Validate names, node types and protected properties before writing
//! - Store nodes and properties, generating identifiers where none is proposed
//! - Delete subtrees with referential integrity checks
//! - Move, copy, clone and reorder nodes
//! - Group an operation log into maximal same-kind batches
//! - Make every call atomic and report the changes it applied
//!
//! # Module Structure
//!
//! - `executor` - Main MutationExecutor that coordinates operations
//! - `ops/` - Individual operation implementations (store, delete, moves, copy, clone, reorder)
//! - `log` - Operation log and batching
//! - `reorder` - Child order forms and conversions between them
//! - `error` - Error types for mutation failures

mod error;
mod executor;
mod log;
mod ops;
mod reorder;

pub use error::{MutationError, MutationResult};
pub use executor::MutationExecutor;
pub use log::{
    AddNodeOperation, Batch, MoveSpec, Operation, OperationKind, OperationLog,
    RemoveNodeOperation, RemovePropertyOperation,
};
pub use ops::{CloneIdentifiers, ReferenceCheck};
pub use reorder::{
    apply_order_before, commands_from_sequence, sequence_from_commands, ChildOrder, OrderBefore,
    ReorderStrategy,
};
