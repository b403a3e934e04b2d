//! Page rendering module
//!
//! Rasterizes PDF pages to images by shelling out to `pdftoppm` (poppler).
//! The deskew core never touches PDF structure itself; this module is the
//! renderer collaborator that feeds it.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Rendering error types
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF file not found: {0}")]
    PdfNotFound(PathBuf),

    #[error("Output directory not writable: {0}")]
    OutputNotWritable(PathBuf),

    #[error("pdftoppm not found on PATH; install poppler-utils")]
    ToolMissing,

    #[error("pdftoppm failed: {0}")]
    ToolFailed(String),

    #[error("no pages rendered from {0}")]
    NoPages(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Rasterization resolution in dots per inch
    pub dpi: u32,
    /// Render single-channel grayscale instead of color
    pub grayscale: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            grayscale: false,
        }
    }
}

impl RenderOptions {
    /// Create a new options builder
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }
}

/// Builder for RenderOptions
#[derive(Debug, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    /// Set rasterization DPI (clamped to 72-1200)
    #[must_use]
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi.clamp(72, 1200);
        self
    }

    /// Render grayscale pages
    #[must_use]
    pub fn grayscale(mut self, grayscale: bool) -> Self {
        self.options.grayscale = grayscale;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> RenderOptions {
        self.options
    }
}

/// pdftoppm-based page renderer
pub struct PdftoppmRenderer;

impl PdftoppmRenderer {
    /// Render every page of `pdf_path` to a PNG under `output_dir`.
    ///
    /// Returns the rendered page paths sorted by page index. pdftoppm
    /// zero-pads its page numbering, so a lexicographic sort of the
    /// produced filenames is the page order.
    pub fn render_pages(
        pdf_path: &Path,
        output_dir: &Path,
        options: &RenderOptions,
    ) -> Result<Vec<PathBuf>> {
        if !pdf_path.exists() {
            return Err(RenderError::PdfNotFound(pdf_path.to_path_buf()));
        }

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)?;
        }
        let probe = output_dir.join(".write_test");
        if std::fs::write(&probe, b"test").is_err() {
            return Err(RenderError::OutputNotWritable(output_dir.to_path_buf()));
        }
        let _ = std::fs::remove_file(probe);

        let prefix = output_dir.join("page");

        let mut cmd = Command::new("pdftoppm");
        cmd.arg("-png").arg("-r").arg(options.dpi.to_string());
        if options.grayscale {
            cmd.arg("-gray");
        }
        cmd.arg(pdf_path).arg(&prefix);

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::ToolMissing
            } else {
                RenderError::IoError(e)
            }
        })?;

        if !output.status.success() {
            return Err(RenderError::ToolFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut pages: Vec<PathBuf> = std::fs::read_dir(output_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "png")
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with("page-"))
            })
            .collect();
        pages.sort();

        if pages.is_empty() {
            return Err(RenderError::NoPages(pdf_path.to_path_buf()));
        }

        Ok(pages)
    }
}
