//! # artboards-gallery
//!
//! Tera-based Markdown gallery for exported artboards.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use artboards_core::{ExportFormat, ExportLayout};
//! use artboards_gallery::{GalleryEntryCtx, GalleryWriter};
//!
//! fn write_gallery(layout: &ExportLayout, names: &[&str]) {
//!     if let Ok(mut gallery) = GalleryWriter::create(&layout.gallery) {
//!         for name in names {
//!             let entry = GalleryEntryCtx::from_layout(layout, name, &ExportFormat::default());
//!             let _ = gallery.append(&entry);
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod writer;

pub use context::{encode_link, GalleryEntryCtx};
pub use engine::GalleryRenderer;
pub use error::GalleryError;
pub use writer::GalleryWriter;
