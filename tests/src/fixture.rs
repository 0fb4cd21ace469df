//! Repository fixtures.

use arbor_core::{Identifier, Path, PropertyValue, TransportResult, WorkspaceName};
use arbor_store::Repository;
use arbor_transport::{shared, MemoryTransport, SharedRepository, TransportConfig};
use std::collections::BTreeSet;
use tracing_subscriber::EnvFilter;

use crate::error::{ScenarioError, ScenarioResult};

/// Install a test-friendly subscriber. `RUST_LOG` controls the filter;
/// repeated calls are harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Parse a path literal.
///
/// # Panics
///
/// If `s` is not a valid absolute path.
pub fn path(s: &str) -> Path {
    Path::parse(s).unwrap_or_else(|e| panic!("invalid fixture path {:?}: {}", s, e))
}

/// A shared repository plus the configuration transports are opened with.
pub struct Fixture {
    repository: SharedRepository,
    config: TransportConfig,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self::with_repository(Repository::new(), config)
    }

    pub fn with_repository(repository: Repository, config: TransportConfig) -> Self {
        init_tracing();
        Self {
            repository: shared(repository),
            config,
        }
    }

    pub fn add_workspace(&self, name: &str) -> ScenarioResult<()> {
        self.repository
            .lock()
            .create_workspace(WorkspaceName::new(name))
            .map_err(|e| ScenarioError::setup(e.to_string()))
    }

    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// A transport for the configured workspace.
    pub fn transport(&self) -> TransportResult<MemoryTransport> {
        MemoryTransport::from_config(self.repository.clone(), self.config.clone())
    }

    /// A transport whose session works in `workspace`.
    pub fn transport_in(&self, workspace: &str) -> TransportResult<MemoryTransport> {
        let config = self.config.clone().with_workspace(workspace);
        MemoryTransport::from_config(self.repository.clone(), config)
    }

    /// The serialized repository state.
    pub fn snapshot(&self) -> ScenarioResult<Vec<u8>> {
        self.repository
            .lock()
            .snapshot_bytes()
            .map_err(|e| ScenarioError::setup(e.to_string()))
    }

    pub fn identifier(&self, workspace: &str, at: &str) -> Option<Identifier> {
        let repo = self.repository.lock();
        let ws = repo.workspace(&WorkspaceName::new(workspace)).ok()?;
        ws.resolve(&path(at))
    }

    pub fn exists(&self, workspace: &str, at: &str) -> bool {
        self.identifier(workspace, at).is_some()
    }

    pub fn property(&self, workspace: &str, at: &str) -> Option<PropertyValue> {
        let repo = self.repository.lock();
        let ws = repo.workspace(&WorkspaceName::new(workspace)).ok()?;
        ws.property_at(&path(at)).cloned()
    }

    /// Child names of the node at `at`, in order.
    pub fn child_names(&self, workspace: &str, at: &str) -> Vec<String> {
        let repo = self.repository.lock();
        let Ok(ws) = repo.workspace(&WorkspaceName::new(workspace)) else {
            return Vec::new();
        };
        let Some(node) = ws.node_at(&path(at)) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|c| ws.node(*c).map(|n| n.name.clone()))
            .collect()
    }

    /// Identifiers of the subtree rooted at `at`, root included.
    pub fn subtree_ids(&self, workspace: &str, at: &str) -> BTreeSet<Identifier> {
        let repo = self.repository.lock();
        let Ok(ws) = repo.workspace(&WorkspaceName::new(workspace)) else {
            return BTreeSet::new();
        };
        match ws.resolve(&path(at)) {
            Some(id) => ws.subtree(id).into_iter().collect(),
            None => BTreeSet::new(),
        }
    }

    pub fn namespace_uri(&self, prefix: &str) -> Option<String> {
        self.repository.lock().namespaces().uri(prefix).map(str::to_string)
    }

    pub fn namespace_prefix(&self, uri: &str) -> Option<String> {
        self.repository.lock().namespaces().prefix(uri).map(str::to_string)
    }
}
