//! Tera rendering engine: [`GalleryRenderer`].
//!
//! | Template              | Rendered once per      |
//! |-----------------------|------------------------|
//! | `gallery/header.md`   | gallery file (rewrite) |
//! | `gallery/entry.md`    | exported artboard      |

use tera::Tera;

use crate::context::GalleryEntryCtx;
use crate::error::GalleryError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

pub(crate) const HEADER_TEMPLATE: &str = "gallery/header.md";
pub(crate) const ENTRY_TEMPLATE: &str = "gallery/entry.md";

const TPLS: &[(&str, &str)] = &[
    (HEADER_TEMPLATE, include_str!("templates/header.md.tera")),
    (ENTRY_TEMPLATE, include_str!("templates/entry.md.tera")),
];

fn build_tera() -> Result<Tera, GalleryError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// GalleryRenderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for the gallery header and per-artboard sections.
///
/// Uses embedded templates only. Create once with [`GalleryRenderer::new`] and reuse.
pub struct GalleryRenderer {
    tera: Tera,
}

impl GalleryRenderer {
    pub fn new() -> Result<Self, GalleryError> {
        Ok(GalleryRenderer { tera: build_tera()? })
    }

    /// Header written when the gallery file is (re)created.
    pub fn render_header(&self) -> Result<String, GalleryError> {
        Ok(self.tera.render(HEADER_TEMPLATE, &tera::Context::new())?)
    }

    /// One `## name` section with its image reference.
    pub fn render_entry(&self, entry: &GalleryEntryCtx) -> Result<String, GalleryError> {
        let ctx = entry.to_tera_context()?;
        Ok(self.tera.render(ENTRY_TEMPLATE, &ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
