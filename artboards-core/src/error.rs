//! Error types for artboards-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration and layout operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// No layer supplied `exportFolder`.
    #[error("`exportFolder` is not configured; set it in .artboards.yaml or pass --export-folder")]
    MissingExportFolder,

    /// The source path has no usable file name (e.g. `/` or `..`).
    #[error("source path '{path}' does not name a design file")]
    InvalidSourcePath { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
