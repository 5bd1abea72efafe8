//! Error types for artboards-gallery.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from rendering or writing the gallery.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while writing the gallery file.
    #[error("gallery io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GalleryError {
    GalleryError::Io {
        path: path.into(),
        source,
    }
}
