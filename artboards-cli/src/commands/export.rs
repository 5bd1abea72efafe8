//! `artboards export`: export, reconcile, and stage one design file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use artboards_sync::{
    pipeline::{self, ExportReport, ExportRequest},
    Git, NoVcs, ReconcileOutcome, Sketchtool,
};

use super::{resolve_source, source_dir, ConfigArgs};

/// Arguments for `artboards export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// The `.sketch` file to export.
    pub file: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show what would be exported without touching any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let source = resolve_source(&self.file)?;
        let config = self.config.load(&source)?;
        let tool = Sketchtool::new(&config.sketchtool);
        let stage = config.stage_with_git;
        let request = ExportRequest {
            source: source.clone(),
            config,
            dry_run: self.dry_run,
        };

        let result = if stage {
            pipeline::run(&request, &tool, &Git::new(source_dir(&source)))
        } else {
            pipeline::run(&request, &tool, &NoVcs)
        };
        let report =
            result.with_context(|| format!("export failed for '{}'", self.file.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
            return Ok(());
        }
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &ExportReport) {
    let name = report
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if report.dry_run {
        println!(
            "[dry-run] '{name}' would export {} artboard(s) to {} ({} ignored)",
            report.artboards.len(),
            report.destination.display(),
            report.ignored
        );
        for artboard in &report.artboards {
            println!("  ~  {artboard}");
        }
        return;
    }

    if report.artboards.is_empty() {
        println!("{} '{name}': no artboards to export", "✓".green());
        return;
    }

    println!(
        "{} '{name}' exported ({} written, {} unchanged, {} ignored)",
        "✓".green(),
        report.written_count(),
        report.unchanged_count(),
        report.ignored
    );
    for outcome in &report.outcomes {
        let marker = match outcome {
            ReconcileOutcome::Added { .. } => "+".green(),
            ReconcileOutcome::Changed { .. } => "✎".yellow(),
            ReconcileOutcome::Unchanged { .. } => "·".bright_black(),
        };
        println!("  {marker}  {}", outcome.path().display());
    }
    for removed in &report.removed {
        println!("  {}  {removed}", "✗".red());
    }
    if let Some(gallery) = &report.gallery {
        println!("  Overview: {}", gallery.display());
    }
}
