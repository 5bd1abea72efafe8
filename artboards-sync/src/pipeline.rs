//! Export pipeline entrypoint used by the CLI.
//!
//! ## Run order
//!
//! 1. Resolve layout and `.sketchignore`, enumerate artboards.
//! 2. Ensure the export root exists.
//! 3. Stage the previous destination directory aside.
//! 4. Clear anything still occupying the destination, recreate it.
//! 5. Rewrite the gallery header (if enabled).
//! 6. Export every artboard in one tool invocation.
//! 7. Reconcile each artboard, appending gallery sections.
//! 8. Stage the export root (and gallery) with version control.
//! 9. Tear down staging. `Drop` covers every early return.

use std::path::{Path, PathBuf};

use serde::Serialize;

use artboards_core::{ExportConfig, ExportJob, ExportLayout};
use artboards_gallery::GalleryWriter;

use crate::enumerate;
use crate::error::{io_err, SyncError};
use crate::reconcile::{self, ReconcileOutcome};
use crate::staging::{remove_best_effort, StagingDir};
use crate::tool::DesignTool;
use crate::vcs::VersionControl;

/// Input for one export run.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// The design file.
    pub source: PathBuf,
    pub config: ExportConfig,
    /// Enumerate and build the job only; touch nothing.
    pub dry_run: bool,
}

/// Summary of an export run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Exported artboard names, in order.
    pub artboards: Vec<String>,
    /// Number of artboards excluded by `.sketchignore`.
    pub ignored: usize,
    /// One entry per artboard; empty for dry runs.
    pub outcomes: Vec<ReconcileOutcome>,
    /// Previously exported files that this run no longer produces, as
    /// `/`-separated paths relative to the destination.
    pub removed: Vec<String>,
    /// Gallery file, if one was written.
    pub gallery: Option<PathBuf>,
    pub dry_run: bool,
}

impl ExportReport {
    pub fn unchanged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_modified()).count()
    }

    pub fn written_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_modified()).count()
    }
}

/// Build the exporter job for `layout` and `config`.
pub fn build_job(
    source: &Path,
    layout: &ExportLayout,
    config: &ExportConfig,
    items: Vec<String>,
) -> ExportJob {
    ExportJob {
        source: source.to_path_buf(),
        output_dir: layout.destination.clone(),
        format: config.export_format.clone(),
        scale: config.export_scale.clone(),
        items,
    }
}

/// Run the export pipeline for one design file.
pub fn run(
    request: &ExportRequest,
    tool: &dyn DesignTool,
    vcs: &dyn VersionControl,
) -> Result<ExportReport, SyncError> {
    let config = &request.config;
    let layout = ExportLayout::new(&request.source, &config.export_folder)?;

    let rules = artboards_ignore::resolve(&layout.source_dir)?;
    let enumeration = enumerate::enumerate(tool, &request.source, &rules)?;
    let job = build_job(&request.source, &layout, config, enumeration.names());

    let mut report = ExportReport {
        source: request.source.clone(),
        destination: layout.destination.clone(),
        artboards: job.items.clone(),
        ignored: enumeration.excluded.len(),
        outcomes: Vec::new(),
        removed: Vec::new(),
        gallery: None,
        dry_run: request.dry_run,
    };

    if request.dry_run {
        tracing::info!(
            "[dry-run] would export {} artboard(s) to {}",
            job.items.len(),
            job.output_dir.display()
        );
        return Ok(report);
    }

    std::fs::create_dir_all(&layout.export_root).map_err(|e| io_err(&layout.export_root, e))?;

    let staging = StagingDir::stage(&layout.destination, &layout.staging);
    if remove_best_effort(&layout.destination, "leftover destination") {
        tracing::info!("cleared {}", layout.destination.display());
    }
    std::fs::create_dir_all(&layout.destination).map_err(|e| io_err(&layout.destination, e))?;

    let mut gallery = if config.include_overview_file {
        Some(GalleryWriter::create(&layout.gallery)?)
    } else {
        None
    };

    tracing::info!(
        "exporting {} artboard(s) to {}",
        job.items.len(),
        job.output_dir.display()
    );
    tool.export_artboards(&job)?;

    report.outcomes = reconcile::reconcile_all(&job, &layout, &staging, gallery.as_mut())?;
    report.removed = removed_files(&staging, &job);

    vcs.stage(&layout.export_root)?;
    if let Some(gallery) = &gallery {
        vcs.stage(gallery.path())?;
        report.gallery = Some(gallery.path().to_path_buf());
    }

    staging.teardown();
    Ok(report)
}

/// Staged files the job did not produce again.
fn removed_files(staging: &StagingDir, job: &ExportJob) -> Vec<String> {
    let produced: std::collections::HashSet<String> =
        job.items.iter().map(|a| job.file_name_for(a)).collect();
    staging
        .remaining_files()
        .into_iter()
        .filter(|name| !produced.contains(name))
        .collect()
}
