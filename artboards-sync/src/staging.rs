//! Staging of the previous export output.
//!
//! [`StagingDir::stage`] moves the destination directory to the
//! `.oldArtboards` sentinel so reconciliation can compare against it. The
//! sentinel is removed by [`StagingDir::teardown`], or by `Drop` on any
//! early return, so it never outlives the run that created it.
//!
//! Every removal here is best-effort: `NotFound` is expected and silent,
//! any other I/O error is logged and the run continues.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Guard owning the staging sentinel for one run.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    held_previous: bool,
    torn_down: bool,
}

impl StagingDir {
    /// Clear any leftover sentinel, then move `destination` to `staging`.
    ///
    /// A missing destination (first run) is not an error.
    pub fn stage(destination: &Path, staging: &Path) -> Self {
        remove_best_effort(staging, "stale staging directory");

        let held_previous = match std::fs::symlink_metadata(destination) {
            Ok(meta) if meta.is_dir() => match std::fs::rename(destination, staging) {
                Ok(()) => {
                    tracing::info!(
                        "staged previous output {} -> {}",
                        destination.display(),
                        staging.display()
                    );
                    true
                }
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => {
                    tracing::warn!(
                        "could not stage {} (comparisons skipped): {e}",
                        destination.display()
                    );
                    false
                }
            },
            Ok(_) => false,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no previous output at {}", destination.display());
                false
            }
            Err(e) => {
                tracing::warn!("could not inspect {}: {e}", destination.display());
                false
            }
        };

        Self {
            path: staging.to_path_buf(),
            held_previous,
            torn_down: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if a previous output directory was moved aside.
    pub fn held_previous(&self) -> bool {
        self.held_previous
    }

    /// Staged path for `file_name`.
    pub fn staged_file(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Regular files still in staging, as `/`-separated paths relative to
    /// the sentinel, sorted. Empty if nothing was staged.
    ///
    /// Artboards named `Nav/Home` are exported into subdirectories, so the
    /// walk is recursive and directories themselves are never listed.
    pub fn remaining_files(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(&self.path).ok().map(relative_name))
            .collect();
        names.sort();
        names
    }

    /// Remove the sentinel now.
    pub fn teardown(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        remove_best_effort(&self.path, "staging directory");
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        self.remove();
    }
}

fn relative_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Remove whatever occupies `path` (directory tree, file, or symlink).
///
/// Returns `true` if something was removed.
pub fn remove_best_effort(path: &Path, what: &str) -> bool {
    let result = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => {
            tracing::debug!("removed {what} {}", path.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!("could not remove {what} {}: {e}", path.display());
            false
        }
    }
}
