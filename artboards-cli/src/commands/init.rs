//! `artboards init <dir>`: write a starter `.artboards.yaml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use artboards_core::{config, ExportFormat, ExportScale, PartialConfig};

use super::LayerArgs;

const DEFAULT_EXPORT_FOLDER: &str = "artboards";

/// Write a starter `.artboards.yaml`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the config into (usually the one holding the design files).
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub layer: LayerArgs,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let layer = starter_layer(&self.layer);
        let (path, created) = config::init_project_config(&self.dir, &layer)
            .with_context(|| format!("failed to init '{}'", self.dir.display()))?;

        if created {
            println!("✓ Wrote {}", path.display());
        } else {
            println!("✓ {} already exists, left untouched", path.display());
        }
        Ok(())
    }
}

/// Command-line flags with the mandatory keys filled in.
fn starter_layer(args: &LayerArgs) -> PartialConfig {
    let mut layer = args.overrides();
    layer.export_folder = Some(
        layer
            .export_folder
            .unwrap_or_else(|| Path::new(DEFAULT_EXPORT_FOLDER).to_path_buf()),
    );
    layer.export_format.get_or_insert_with(ExportFormat::default);
    layer.export_scale.get_or_insert_with(ExportScale::default);
    layer.include_overview_file.get_or_insert(false);
    layer
}
