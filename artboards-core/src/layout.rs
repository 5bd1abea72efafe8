//! Paths derived from a design file and the configured export folder.
//!
//! ```text
//! <dir>/
//!   Design.sketch
//!   Design-boards.md          (gallery, optional)
//!   .oldArtboards/            (staging sentinel, exists only during a run)
//!   <exportFolder>/
//!     Design/                 (destination, one file per artboard)
//!       Hero.png
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::{artboard_file_name, ExportFormat};

/// Name of the staging sentinel directory, sibling to the design file.
pub const STAGING_DIR_NAME: &str = ".oldArtboards";

/// Suffix appended to the file stem to name the gallery file.
pub const GALLERY_SUFFIX: &str = "-boards.md";

const SKETCH_EXTENSION: &str = ".sketch";

/// Resolved on-disk layout for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    /// The design file itself.
    pub source: PathBuf,
    /// Directory containing the design file.
    pub source_dir: PathBuf,
    /// File name with a trailing `.sketch` removed.
    pub stem: String,
    /// `exportFolder` exactly as configured (relative to `source_dir`).
    pub export_folder: PathBuf,
    /// `<source_dir>/<exportFolder>`
    pub export_root: PathBuf,
    /// `<source_dir>/<exportFolder>/<stem>`
    pub destination: PathBuf,
    /// `<source_dir>/.oldArtboards`
    pub staging: PathBuf,
    /// `<source_dir>/<stem>-boards.md`
    pub gallery: PathBuf,
}

impl ExportLayout {
    /// Derive the layout for `source` exporting into `export_folder`.
    pub fn new(source: &Path, export_folder: &Path) -> Result<Self, ConfigError> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConfigError::InvalidSourcePath {
                path: source.to_path_buf(),
            })?;
        let stem = file_stem(&file_name).to_owned();
        let source_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let export_root = source_dir.join(export_folder);
        let destination = export_root.join(&stem);
        Ok(Self {
            source: source.to_path_buf(),
            staging: source_dir.join(STAGING_DIR_NAME),
            gallery: source_dir.join(format!("{stem}{GALLERY_SUFFIX}")),
            export_folder: export_folder.to_path_buf(),
            export_root,
            destination,
            source_dir,
            stem,
        })
    }

    /// Exported file for `artboard` inside the destination directory.
    pub fn artboard_path(&self, artboard: &str, format: &ExportFormat) -> PathBuf {
        self.destination.join(artboard_file_name(artboard, format))
    }

    /// Segments of the gallery link `<exportFolder>/<stem>/<artboard>.<format>`,
    /// unencoded. The gallery writer encodes each segment.
    ///
    /// A `/` in the artboard name is a directory level on disk, so it splits
    /// the file name into further segments.
    pub fn gallery_link_segments(&self, artboard: &str, format: &ExportFormat) -> Vec<String> {
        let mut segments: Vec<String> = self
            .export_folder
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.push(self.stem.clone());
        segments.extend(
            artboard_file_name(artboard, format)
                .split('/')
                .map(str::to_owned),
        );
        segments
    }
}

/// Strip a trailing `.sketch`; any other extension stays part of the stem.
fn file_stem(file_name: &str) -> &str {
    match file_name.strip_suffix(SKETCH_EXTENSION) {
        Some(stem) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
