//! JSON snapshot persistence.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository {
    /// Serialized form of the whole repository. Equal repositories always
    /// produce equal bytes.
    pub fn snapshot_bytes(&self) -> StoreResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Write a snapshot to a sibling temporary file, then rename it over
    /// `path`.
    pub fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let bytes = self.snapshot_bytes()?;
        let tmp = temp_path(path);
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
        Ok(())
    }

    /// Read a snapshot written by `save_snapshot`.
    pub fn load_snapshot(path: &Path) -> StoreResult<Self> {
        let bytes = fs::read(path)?;
        let mut repo: Repository = serde_json::from_slice(&bytes)?;
        for ws in repo.workspaces_mut() {
            ws.rebuild_references();
        }
        debug!(path = %path.display(), "snapshot loaded");
        Ok(repo)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
