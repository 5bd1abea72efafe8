//! Version-control staging of export outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SyncError;

/// Stages paths for the next commit.
pub trait VersionControl {
    fn stage(&self, path: &Path) -> Result<(), SyncError>;
}

/// `git add -- <path>`, run from `work_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    work_dir: PathBuf,
}

impl Git {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl VersionControl for Git {
    fn stage(&self, path: &Path) -> Result<(), SyncError> {
        let output = Command::new("git")
            .arg("add")
            .arg("--")
            .arg(path)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| SyncError::Spawn {
                program: PathBuf::from("git"),
                source,
            })?;

        if output.status.success() {
            tracing::info!("staged {}", path.display());
            return Ok(());
        }

        Err(SyncError::Vcs {
            path: path.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Staging disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoVcs;

impl VersionControl for NoVcs {
    fn stage(&self, path: &Path) -> Result<(), SyncError> {
        tracing::debug!("staging disabled, skipping {}", path.display());
        Ok(())
    }
}
