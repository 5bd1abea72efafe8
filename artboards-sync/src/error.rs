//! Error types for artboards-sync.

use std::path::PathBuf;

use thiserror::Error;

use artboards_core::ConfigError;
use artboards_gallery::GalleryError;
use artboards_ignore::IgnoreError;

/// All errors that can abort an export run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration or layout error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// `.sketchignore` could not be read or compiled.
    #[error("ignore rules error: {0}")]
    Ignore(#[from] IgnoreError),

    /// The gallery file could not be rendered or written.
    #[error("gallery error: {0}")]
    Gallery(#[from] GalleryError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran but exited unsuccessfully.
    #[error("{program} {action} failed ({status}): {stderr}")]
    Tool {
        program: PathBuf,
        action: String,
        status: String,
        stderr: String,
    },

    /// The artboard listing was not the expected JSON shape.
    #[error("unparseable artboard listing: {source}")]
    ListingParse {
        #[source]
        source: serde_json::Error,
    },

    /// The exporter succeeded but a requested artboard file is missing.
    #[error("exporter produced no file for artboard '{artboard}' (expected {path})")]
    MissingExport { artboard: String, path: PathBuf },

    /// Version-control staging failed.
    #[error("version control could not stage {path}: {message}")]
    Vcs { path: PathBuf, message: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
