//! Template context: serializable rendering payload for one gallery entry.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use artboards_core::{ExportFormat, ExportLayout};

use crate::error::GalleryError;

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode each segment and join with `/`.
pub fn encode_link<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| utf8_percent_encode(s.as_ref(), URI_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// One `## name` section of the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntryCtx {
    /// Artboard name, used verbatim as heading and alt text.
    pub name: String,
    /// Encoded link relative to the gallery file.
    pub link: String,
}

impl GalleryEntryCtx {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }

    /// Entry for `artboard` linking to `<exportFolder>/<stem>/<artboard>.<format>`.
    pub fn from_layout(layout: &ExportLayout, artboard: &str, format: &ExportFormat) -> Self {
        let segments = layout.gallery_link_segments(artboard, format);
        Self::new(artboard, encode_link(&segments))
    }

    /// Convert to a `tera::Context`.
    pub fn to_tera_context(&self) -> Result<tera::Context, GalleryError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}
