//! Byte-exact reconciliation of fresh exports against staged output.
//!
//! ## Per-artboard protocol
//!
//! 1. Look for `<name>.<format>` in staging; absent → keep the new file.
//! 2. Read staged and new files in full.
//! 3. Identical bytes → delete the new file and move the staged one into its
//!    place, so the file on disk keeps its previous identity and mtime.
//! 4. Different bytes → keep the new file; the staged one is discarded with
//!    the staging directory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use artboards_core::{ExportJob, ExportLayout};
use artboards_gallery::{GalleryEntryCtx, GalleryWriter};

use crate::error::{io_err, SyncError};
use crate::staging::StagingDir;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What happened to one artboard's exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReconcileOutcome {
    /// Bytes matched the previous export; the previous file was restored.
    Unchanged { artboard: String, path: PathBuf },
    /// Bytes differed from the previous export; the new file was kept.
    Changed { artboard: String, path: PathBuf },
    /// No previous export of this artboard; the new file was kept.
    Added { artboard: String, path: PathBuf },
}

impl ReconcileOutcome {
    pub fn artboard(&self) -> &str {
        match self {
            ReconcileOutcome::Unchanged { artboard, .. }
            | ReconcileOutcome::Changed { artboard, .. }
            | ReconcileOutcome::Added { artboard, .. } => artboard,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ReconcileOutcome::Unchanged { path, .. }
            | ReconcileOutcome::Changed { path, .. }
            | ReconcileOutcome::Added { path, .. } => path,
        }
    }

    /// `true` if the file on disk differs from before the run.
    pub fn is_modified(&self) -> bool {
        !matches!(self, ReconcileOutcome::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// reconcile_artboard
// ---------------------------------------------------------------------------

/// Reconcile one freshly exported file against its staged counterpart.
pub fn reconcile_artboard(
    artboard: &str,
    new_path: &Path,
    staged_path: &Path,
) -> Result<ReconcileOutcome, SyncError> {
    let outcome_path = new_path.to_path_buf();
    let staged = match std::fs::read(staged_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("added: {artboard}");
            return Ok(ReconcileOutcome::Added {
                artboard: artboard.to_string(),
                path: outcome_path,
            });
        }
        Err(e) => return Err(io_err(staged_path, e)),
    };

    let fresh = match std::fs::read(new_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SyncError::MissingExport {
                artboard: artboard.to_string(),
                path: outcome_path,
            });
        }
        Err(e) => return Err(io_err(new_path, e)),
    };

    if fresh != staged {
        tracing::debug!("changed: {artboard}");
        return Ok(ReconcileOutcome::Changed {
            artboard: artboard.to_string(),
            path: outcome_path,
        });
    }

    std::fs::remove_file(new_path).map_err(|e| io_err(new_path, e))?;
    std::fs::rename(staged_path, new_path).map_err(|e| io_err(new_path, e))?;
    tracing::debug!("unchanged, restored previous file: {artboard}");
    Ok(ReconcileOutcome::Unchanged {
        artboard: artboard.to_string(),
        path: outcome_path,
    })
}

// ---------------------------------------------------------------------------
// reconcile_all
// ---------------------------------------------------------------------------

/// Reconcile every job item in order, appending a gallery section for each
/// artboard regardless of its outcome.
///
/// Artboards sharing a name on different pages map to one file; it is
/// compared once and later duplicates repeat the first outcome.
pub fn reconcile_all(
    job: &ExportJob,
    layout: &ExportLayout,
    staging: &StagingDir,
    mut gallery: Option<&mut GalleryWriter>,
) -> Result<Vec<ReconcileOutcome>, SyncError> {
    let mut outcomes = Vec::with_capacity(job.items.len());
    let mut seen: HashMap<String, ReconcileOutcome> = HashMap::new();
    for artboard in &job.items {
        let file_name = job.file_name_for(artboard);
        let outcome = match seen.get(&file_name) {
            Some(previous) => {
                tracing::debug!("duplicate artboard name, reusing outcome: {artboard}");
                previous.clone()
            }
            None => {
                let outcome = reconcile_artboard(
                    artboard,
                    &job.output_path_for(artboard),
                    &staging.staged_file(&file_name),
                )?;
                seen.insert(file_name, outcome.clone());
                outcome
            }
        };
        outcomes.push(outcome);

        if let Some(gallery) = gallery.as_deref_mut() {
            gallery.append(&GalleryEntryCtx::from_layout(layout, artboard, &job.format))?;
        }
    }

    let unchanged = outcomes.iter().filter(|o| !o.is_modified()).count();
    tracing::info!(
        "reconciled {} artboard(s): {} unchanged, {} written",
        outcomes.len(),
        unchanged,
        outcomes.len() - unchanged
    );
    Ok(outcomes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
