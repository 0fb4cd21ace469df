//! Transport configuration.

use arbor_core::{NameValidator, WorkspaceName, DEFAULT_RESERVED_CHARACTERS};
use arbor_mutation::{CloneIdentifiers, ReorderStrategy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings of a transport instance.
///
/// ```toml
/// workspace = "default"
/// reserved_characters = "[]|*"
/// clone_identifiers = "preserve"
/// reorder_strategy = "commands"
/// snapshot_path = "/var/lib/arbor/repository.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// The session's workspace.
    #[serde(default = "default_workspace")]
    pub workspace: WorkspaceName,
    /// Characters names may not contain, besides `/` and `:`.
    #[serde(default = "default_reserved_characters")]
    pub reserved_characters: String,
    #[serde(default)]
    pub clone_identifiers: CloneIdentifiers,
    #[serde(default)]
    pub reorder_strategy: ReorderStrategy,
    /// Where to write the repository snapshot on commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

fn default_workspace() -> WorkspaceName {
    WorkspaceName::default()
}

fn default_reserved_characters() -> String {
    DEFAULT_RESERVED_CHARACTERS.to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            reserved_characters: default_reserved_characters(),
            clone_identifiers: CloneIdentifiers::default(),
            reorder_strategy: ReorderStrategy::default(),
            snapshot_path: None,
        }
    }
}

impl TransportConfig {
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: TransportConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let name = self.workspace.as_str();
        if name.is_empty() {
            return Err(ConfigError::invalid("workspace", "must not be empty"));
        }
        if name.contains('/') {
            return Err(ConfigError::invalid("workspace", "must not contain '/'"));
        }
        if let Some(c) = self.reserved_characters.chars().find(|c| c.is_whitespace()) {
            return Err(ConfigError::invalid(
                "reserved_characters",
                format!("whitespace character {:?} cannot be reserved", c),
            ));
        }
        Ok(())
    }

    /// Validator for the configured reserved characters.
    pub fn name_validator(&self) -> NameValidator {
        NameValidator::new(self.reserved_characters.chars())
    }

    pub fn with_workspace(mut self, workspace: impl Into<WorkspaceName>) -> Self {
        self.workspace = workspace.into();
        self
    }

    pub fn with_reserved_characters(mut self, reserved: impl Into<String>) -> Self {
        self.reserved_characters = reserved.into();
        self
    }

    pub fn with_clone_identifiers(mut self, policy: CloneIdentifiers) -> Self {
        self.clone_identifiers = policy;
        self
    }

    pub fn with_reorder_strategy(mut self, strategy: ReorderStrategy) -> Self {
        self.reorder_strategy = strategy;
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }
}
