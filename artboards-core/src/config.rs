//! Layered export configuration.
//!
//! # Layers (lowest precedence first)
//!
//! ```text
//! built-in defaults
//! <config_dir>/artboards/config.yaml     user-wide, optional
//! .artboards.yaml                         nearest to the design file, optional
//!   (or --config <path>, which must exist)
//! command-line overrides
//! ```
//!
//! # API pattern
//!
//! Loaders that touch the user config directory have two forms:
//! - `fn_at(config_dir: Option<&Path>, …)`: explicit directory; used in tests
//! - `fn(…)`: derives it from `dirs::config_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::paths::find_upward;
use crate::types::{ExportFormat, ExportScale};

/// Project-level config file, discovered upward from the design file.
pub const PROJECT_CONFIG_FILE: &str = ".artboards.yaml";

/// Where `sketchtool` lives inside a standard Sketch install.
pub const DEFAULT_SKETCHTOOL: &str =
    "/Applications/Sketch.app/Contents/Resources/sketchtool/bin/sketchtool";

// ---------------------------------------------------------------------------
// 1. Types
// ---------------------------------------------------------------------------

/// One configuration layer. Every field is optional; absent fields fall
/// through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_format: Option<ExportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_scale: Option<ExportScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_overview_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sketchtool: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_with_git: Option<bool>,
}

impl PartialConfig {
    /// Overlay `higher` on top of `self`; fields set in `higher` win.
    pub fn merge(self, higher: PartialConfig) -> PartialConfig {
        PartialConfig {
            export_folder: higher.export_folder.or(self.export_folder),
            export_format: higher.export_format.or(self.export_format),
            export_scale: higher.export_scale.or(self.export_scale),
            include_overview_file: higher.include_overview_file.or(self.include_overview_file),
            sketchtool: higher.sketchtool.or(self.sketchtool),
            stage_with_git: higher.stage_with_git.or(self.stage_with_git),
        }
    }

    /// Tool path after defaults; usable without a full export config.
    pub fn sketchtool_or_default(&self) -> PathBuf {
        self.sketchtool
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SKETCHTOOL))
    }

    /// Apply defaults and require `exportFolder`.
    pub fn resolve(self) -> Result<ExportConfig, ConfigError> {
        let sketchtool = self.sketchtool_or_default();
        let export_folder = self
            .export_folder
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingExportFolder)?;
        Ok(ExportConfig {
            export_folder,
            export_format: self.export_format.unwrap_or_default(),
            export_scale: self.export_scale.unwrap_or_default(),
            include_overview_file: self.include_overview_file.unwrap_or(false),
            sketchtool,
            stage_with_git: self.stage_with_git.unwrap_or(true),
        })
    }
}

/// Fully resolved configuration for one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Output root, relative to the design file's directory.
    pub export_folder: PathBuf,
    pub export_format: ExportFormat,
    pub export_scale: ExportScale,
    /// Write `<stem>-boards.md` next to the design file.
    pub include_overview_file: bool,
    /// Path to the `sketchtool` binary.
    pub sketchtool: PathBuf,
    /// Run `git add` on the outputs after a successful export.
    pub stage_with_git: bool,
}

// ---------------------------------------------------------------------------
// 2. Path helpers
// ---------------------------------------------------------------------------

/// `<config_dir>/artboards/config.yaml`. Pure, no I/O.
pub fn user_config_path_at(config_dir: &Path) -> PathBuf {
    config_dir.join("artboards").join("config.yaml")
}

/// Nearest `.artboards.yaml` at or above `start_dir`.
pub fn discover_project_config(start_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    find_upward(PROJECT_CONFIG_FILE, start_dir).map_err(|e| io_err(e.path, e.source))
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load one layer from `path`.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
/// An empty file is an empty layer.
pub fn load_layer(path: &Path) -> Result<PartialConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(PartialConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_optional_layer(path: &Path) -> Result<PartialConfig, ConfigError> {
    match load_layer(path) {
        Err(ConfigError::ConfigNotFound { .. }) => Ok(PartialConfig::default()),
        other => other,
    }
}

/// Merge every layer except defaults; `exportFolder` is not yet required.
///
/// `explicit` replaces project-config discovery and must exist.
pub fn load_partial_at(
    config_dir: Option<&Path>,
    source_dir: &Path,
    explicit: Option<&Path>,
    overrides: PartialConfig,
) -> Result<PartialConfig, ConfigError> {
    let user = match config_dir {
        Some(dir) => load_optional_layer(&user_config_path_at(dir))?,
        None => PartialConfig::default(),
    };
    let project = match explicit {
        Some(path) => load_layer(path)?,
        None => match discover_project_config(source_dir)? {
            Some(path) => load_layer(&path)?,
            None => PartialConfig::default(),
        },
    };
    Ok(user.merge(project).merge(overrides))
}

/// `load_partial_at` convenience wrapper.
pub fn load_partial(
    source_dir: &Path,
    explicit: Option<&Path>,
    overrides: PartialConfig,
) -> Result<PartialConfig, ConfigError> {
    load_partial_at(
        dirs::config_dir().as_deref(),
        source_dir,
        explicit,
        overrides,
    )
}

/// Load every layer and resolve to an [`ExportConfig`].
pub fn load_at(
    config_dir: Option<&Path>,
    source_dir: &Path,
    explicit: Option<&Path>,
    overrides: PartialConfig,
) -> Result<ExportConfig, ConfigError> {
    load_partial_at(config_dir, source_dir, explicit, overrides)?.resolve()
}

/// `load_at` convenience wrapper.
pub fn load(
    source_dir: &Path,
    explicit: Option<&Path>,
    overrides: PartialConfig,
) -> Result<ExportConfig, ConfigError> {
    load_at(
        dirs::config_dir().as_deref(),
        source_dir,
        explicit,
        overrides,
    )
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Write a starter `.artboards.yaml` into `dir`.
///
/// Write flow: serialize → `.artboards.yaml.tmp` sibling → `rename`.
/// Idempotent: an existing file is left untouched and `(path, false)` is
/// returned.
pub fn init_project_config(
    dir: &Path,
    layer: &PartialConfig,
) -> Result<(PathBuf, bool), ConfigError> {
    let path = dir.join(PROJECT_CONFIG_FILE);
    if path.exists() {
        return Ok((path, false));
    }
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let yaml = serde_yaml::to_string(layer)?;
    let tmp = dir.join(format!("{PROJECT_CONFIG_FILE}.tmp"));
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok((path, true))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
