//! Domain types for an artboard export run.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Listing types mirror the JSON emitted by `sketchtool list artboards`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Image format token passed to the exporter (`png`, `jpg`, `pdf`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportFormat(pub String);

impl Default for ExportFormat {
    fn default() -> Self {
        Self("png".to_owned())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ExportFormat {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ExportFormat {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Scale factor(s) passed verbatim to the exporter (`"1"`, `"2"`, `"1,2"`).
///
/// Config files may spell it as a string or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ScaleRepr", into = "String")]
pub struct ExportScale(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum ScaleRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<ScaleRepr> for ExportScale {
    fn from(repr: ScaleRepr) -> Self {
        match repr {
            ScaleRepr::Text(s) => Self(s),
            ScaleRepr::Int(n) => Self(n.to_string()),
            ScaleRepr::Float(n) => Self(n.to_string()),
        }
    }
}

impl From<ExportScale> for String {
    fn from(scale: ExportScale) -> Self {
        scale.0
    }
}

impl Default for ExportScale {
    fn default() -> Self {
        Self("1".to_owned())
    }
}

impl fmt::Display for ExportScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ExportScale {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Listing payload
// ---------------------------------------------------------------------------

/// A single artboard entry in the tool listing. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedArtboard {
    pub name: String,
}

/// A page in the tool listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedPage {
    pub name: String,
    #[serde(default)]
    pub artboards: Vec<ListedArtboard>,
}

/// Root of `sketchtool list artboards` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArtboardListing {
    #[serde(default)]
    pub pages: Vec<ListedPage>,
}

impl ArtboardListing {
    /// Flatten pages into descriptors, in listing order.
    pub fn descriptors(&self) -> Vec<ArtboardDescriptor> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.artboards
                    .iter()
                    .map(move |artboard| ArtboardDescriptor::new(&page.name, &artboard.name))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One exportable artboard, identified by its page and its own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtboardDescriptor {
    pub page: String,
    pub name: String,
}

impl ArtboardDescriptor {
    pub fn new(page: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            name: name.into(),
        }
    }

    /// `page/artboard`, the string ignore rules are matched against.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.page, self.name)
    }
}

impl fmt::Display for ArtboardDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.page, self.name)
    }
}

/// Everything the exporter needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJob {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    pub scale: ExportScale,
    /// Bare artboard names, in enumeration order.
    pub items: Vec<String>,
}

impl ExportJob {
    /// Comma-joined item list as passed to `--items`.
    pub fn items_arg(&self) -> String {
        self.items.join(",")
    }

    /// `<artboard>.<format>`
    pub fn file_name_for(&self, artboard: &str) -> String {
        artboard_file_name(artboard, &self.format)
    }

    /// Path of the exported file for `artboard` inside `output_dir`.
    pub fn output_path_for(&self, artboard: &str) -> PathBuf {
        self.output_dir.join(self.file_name_for(artboard))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// `<artboard>.<format>`
pub fn artboard_file_name(artboard: &str, format: &ExportFormat) -> String {
    format!("{artboard}.{format}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
