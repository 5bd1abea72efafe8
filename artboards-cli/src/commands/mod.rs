//! Subcommand implementations and the config flags they share.

pub mod export;
pub mod init;
pub mod list;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use artboards_core::{config, ExportConfig, ExportFormat, ExportScale, PartialConfig};

/// Flags that map one-to-one onto config keys.
#[derive(Args, Debug, Default, Clone)]
pub struct LayerArgs {
    /// Output folder, relative to the design file (`exportFolder`).
    #[arg(long, value_name = "DIR")]
    pub export_folder: Option<PathBuf>,

    /// Image format token passed to the exporter (`exportFormat`).
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Scale factor(s) passed to the exporter (`exportScale`).
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<String>,

    /// Write `<name>-boards.md` next to the design file.
    #[arg(long, overrides_with = "no_overview")]
    pub overview: bool,

    /// Do not write the overview file, even if config enables it.
    #[arg(long, overrides_with = "overview")]
    pub no_overview: bool,

    /// Path to the `sketchtool` binary.
    #[arg(long, value_name = "PATH")]
    pub sketchtool: Option<PathBuf>,

    /// Skip `git add` after exporting.
    #[arg(long)]
    pub no_stage: bool,
}

impl LayerArgs {
    /// The command-line layer; unset flags leave lower layers alone.
    pub fn overrides(&self) -> PartialConfig {
        let include_overview_file = match (self.overview, self.no_overview) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        PartialConfig {
            export_folder: self.export_folder.clone(),
            export_format: self.format.as_deref().map(ExportFormat::from),
            export_scale: self.scale.as_deref().map(ExportScale::from),
            include_overview_file,
            sketchtool: self.sketchtool.clone(),
            stage_with_git: self.no_stage.then_some(false),
        }
    }
}

/// Config flags for commands that operate on a design file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Use this config file instead of discovering `.artboards.yaml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub layer: LayerArgs,
}

impl ConfigArgs {
    /// Every layer merged, `exportFolder` still optional.
    pub fn load_partial(&self, source: &Path) -> Result<PartialConfig> {
        config::load_partial(
            source_dir(source),
            self.config.as_deref(),
            self.layer.overrides(),
        )
        .context("failed to load configuration")
    }

    /// Every layer merged and resolved.
    pub fn load(&self, source: &Path) -> Result<ExportConfig> {
        Ok(self.load_partial(source)?.resolve()?)
    }
}

/// Absolute path of the design file; it must exist.
pub fn resolve_source(file: &Path) -> Result<PathBuf> {
    file.canonicalize()
        .with_context(|| format!("cannot resolve design file '{}'", file.display()))
}

/// Directory holding `source`.
pub fn source_dir(source: &Path) -> &Path {
    source.parent().unwrap_or_else(|| Path::new("."))
}
