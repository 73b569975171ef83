//! Scoped scratch directory for archive staging.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ManagerError, ManagerResult};

/// A uniquely named directory inside the server-local scratch root.
///
/// Dropping the area deletes everything staged in it and removes the
/// scratch root too when nothing else is left there.
#[derive(Debug)]
pub struct ScratchArea {
    dir: Option<TempDir>,
    path: PathBuf,
    root: PathBuf,
}

impl ScratchArea {
    /// Acquire a fresh directory under `root`, creating `root` if needed.
    pub fn acquire(root: &Path) -> ManagerResult<Self> {
        fs::create_dir_all(root).map_err(|e| ManagerError::create_dir(root, e))?;

        let dir = tempfile::Builder::new()
            .prefix("stage-")
            .tempdir_in(root)
            .map_err(|e| ManagerError::create_dir(root, e))?;
        let path = dir.path().to_path_buf();

        tracing::debug!(path = %path.display(), "Acquired scratch area");
        Ok(Self {
            dir: Some(dir),
            path,
            root: root.to_path_buf(),
        })
    }

    /// Directory to stage into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch root shared by all areas.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to clean scratch area");
            }
        }
        // Only succeeds when empty, which is what we want.
        let _ = fs::remove_dir(&self.root);
    }
}
