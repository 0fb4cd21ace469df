//! Arbor Integration Test Framework
//!
//! Shared fixtures for the integration tests in `tests/`.
//!
//! Responsibilities:
//! - Build shared repositories and open transports against them
//! - Capture serialized repository state for exact comparisons
//! - Run named scenarios of transport calls with expected outcomes
//! - Install a tracing subscriber for test output

mod error;
mod fixture;
mod scenario;

pub use error::{ScenarioError, ScenarioResult};
pub use fixture::{init_tracing, path, Fixture};
pub use scenario::{Expect, Scenario};

/// Everything an integration test usually needs.
pub mod prelude {
    pub use crate::{init_tracing, path, Expect, Fixture, Scenario, ScenarioError, ScenarioResult};
    pub use arbor_core::{
        props, Identifier, NodeSnapshot, Path, PropertySnapshot, PropertyValue, TransportError,
        TransportResult, Value, WorkspaceName,
    };
    pub use arbor_mutation::{
        AddNodeOperation, ChildOrder, CloneIdentifiers, MoveSpec, OperationLog, OrderBefore,
        RemoveNodeOperation, RemovePropertyOperation, ReorderStrategy,
    };
    pub use arbor_registry::NamespaceMapping;
    pub use arbor_transaction::TransactionState;
    pub use arbor_transport::{
        BatchApplier, MemoryTransport, NamespaceWriter, SaveLifecycle, StructuralMutator,
        TransportConfig, WritingTransport,
    };
}
