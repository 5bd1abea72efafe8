//! External design tool: listing and exporting artboards.
//!
//! [`DesignTool`] is the seam the pipeline talks to; [`Sketchtool`] drives
//! the `sketchtool` binary shipped inside Sketch.app. Calls block until the
//! process exits; there is no timeout and no retry.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use artboards_core::{ArtboardListing, ExportJob};

use crate::error::SyncError;

/// Lists and exports artboards of a design file.
pub trait DesignTool {
    /// Pages and artboards of `source`, symbols included.
    fn list_artboards(&self, source: &Path) -> Result<ArtboardListing, SyncError>;

    /// Write one `<name>.<format>` per job item into `job.output_dir`,
    /// overwriting existing files.
    fn export_artboards(&self, job: &ExportJob) -> Result<(), SyncError>;
}

/// Parse `list artboards` output.
pub fn parse_listing(stdout: &[u8]) -> Result<ArtboardListing, SyncError> {
    serde_json::from_slice(stdout).map_err(|source| SyncError::ListingParse { source })
}

// ---------------------------------------------------------------------------
// Sketchtool
// ---------------------------------------------------------------------------

/// `sketchtool` command-line driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketchtool {
    program: PathBuf,
}

impl Sketchtool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `list artboards <source> --include-symbols=YES`
    pub fn list_args(source: &Path) -> Vec<OsString> {
        vec![
            "list".into(),
            "artboards".into(),
            source.as_os_str().to_owned(),
            "--include-symbols=YES".into(),
        ]
    }

    /// `export artboards <source> --formats=… --scales=… --output=… --overwriting=YES --items=… --include-symbols=YES`
    pub fn export_args(job: &ExportJob) -> Vec<OsString> {
        let mut output = OsString::from("--output=");
        output.push(job.output_dir.as_os_str());
        vec![
            "export".into(),
            "artboards".into(),
            job.source.as_os_str().to_owned(),
            format!("--formats={}", job.format).into(),
            format!("--scales={}", job.scale).into(),
            output,
            "--overwriting=YES".into(),
            format!("--items={}", job.items_arg()).into(),
            "--include-symbols=YES".into(),
        ]
    }

    fn run(&self, action: &str, args: Vec<OsString>) -> Result<Vec<u8>, SyncError> {
        tracing::debug!("running {} {:?}", self.program.display(), args);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| SyncError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        Err(SyncError::Tool {
            program: self.program.clone(),
            action: action.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl DesignTool for Sketchtool {
    fn list_artboards(&self, source: &Path) -> Result<ArtboardListing, SyncError> {
        let stdout = self.run("list artboards", Self::list_args(source))?;
        parse_listing(&stdout)
    }

    fn export_artboards(&self, job: &ExportJob) -> Result<(), SyncError> {
        self.run("export artboards", Self::export_args(job))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
