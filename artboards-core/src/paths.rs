//! Upward file discovery.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A candidate path could not be inspected during an upward search.
#[derive(Debug, Error)]
#[error("cannot inspect {path}: {source}")]
pub struct SearchError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Search `start` and each of its ancestors for `file_name`.
///
/// Returns the first entry that exists, nearest directory first. Only
/// `NotFound` moves the search upward; anything else found under that name
/// (a directory, an unreadable entry) is returned or reported so the caller
/// fails on it instead of silently using a farther file.
///
/// A relative `start` ends its walk at the empty path, which resolves against
/// the current directory.
pub fn find_upward(file_name: &str, start: &Path) -> Result<Option<PathBuf>, SearchError> {
    for dir in start.ancestors() {
        let candidate = dir.join(file_name);
        match std::fs::metadata(&candidate) {
            Ok(_) => return Ok(Some(candidate)),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(SearchError {
                    path: candidate,
                    source,
                })
            }
        }
    }
    Ok(None)
}
