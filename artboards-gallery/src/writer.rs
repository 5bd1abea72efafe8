//! Append-only gallery file writer.
//!
//! [`GalleryWriter::create`] truncates the file and writes the header;
//! each [`GalleryWriter::append`] adds one section. Every chunk is
//! newline-terminated so sections never run together.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::context::GalleryEntryCtx;
use crate::engine::GalleryRenderer;
use crate::error::{io_err, GalleryError};

pub struct GalleryWriter {
    path: PathBuf,
    renderer: GalleryRenderer,
    entries: Vec<String>,
}

impl GalleryWriter {
    /// (Re)create the gallery at `path` containing only the header.
    pub fn create(path: &Path) -> Result<Self, GalleryError> {
        let renderer = GalleryRenderer::new()?;
        let header = terminated(renderer.render_header()?);
        std::fs::write(path, header).map_err(|e| io_err(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            renderer,
            entries: Vec::new(),
        })
    }

    /// Append one artboard section.
    pub fn append(&mut self, entry: &GalleryEntryCtx) -> Result<(), GalleryError> {
        let section = terminated(self.renderer.render_entry(entry)?);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| io_err(&self.path, e))?;
        file.write_all(section.as_bytes())
            .map_err(|e| io_err(&self.path, e))?;
        self.entries.push(entry.name.clone());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names appended so far, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

fn terminated(mut chunk: String) -> String {
    if !chunk.ends_with('\n') {
        chunk.push('\n');
    }
    chunk
}
