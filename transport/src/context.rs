//! Session-scoped context.

use arbor_core::WorkspaceName;

/// What a transport needs to know about the session that drives it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    workspace: WorkspaceName,
}

impl SessionContext {
    pub fn new(workspace: WorkspaceName) -> Self {
        Self { workspace }
    }

    /// The session's workspace. Operations without an explicit source
    /// workspace act here.
    pub fn workspace(&self) -> &WorkspaceName {
        &self.workspace
    }
}
