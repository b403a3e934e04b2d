//! pdffixlab - Toolkit for fixing scanned PDFs
//!
//! Detects and corrects the small defects that scanning introduces into
//! PDFs: page skew, wrong page orientation, and documents split across
//! multiple files.
//!
//! # Features
//!
//! - **Skew Estimation** ([`deskew`]) - Otsu-binarized minimum-area-rectangle
//!   angle detection with tolerance gating
//! - **Page Correction** ([`deskew`]) - Same-size bicubic rotation with
//!   edge-replicated borders
//! - **Page Rendering** ([`render`]) - Rasterize PDF pages via `pdftoppm`
//! - **PDF Writing** ([`pdf_writer`]) - Reassemble page images into a PDF
//! - **Structural Operations** ([`pdf_ops`]) - Lossless rotation and merging
//!   on the PDF object graph
//! - **Pipeline** ([`pipeline`]) - Parallel per-page orchestration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pdffixlab::deskew::{correct_page, estimate_skew, DEFAULT_TOLERANCE_DEG};
//!
//! let page = image::open("scan.png").unwrap();
//! let angle = estimate_skew(&page.to_luma8(), DEFAULT_TOLERANCE_DEG).unwrap();
//! let corrected = correct_page(&page, angle).unwrap();
//! ```
//!
//! # Architecture
//!
//! The deskew pipeline renders, corrects, and reassembles:
//!
//! ```text
//! PDF Input -> pdftoppm Rendering -> Skew Estimation -> Page Correction
//!                                                            |
//!                                                       PDF Output
//! ```
//!
//! Structural operations ([`pdf_ops`]) bypass rasterization entirely and
//! edit page dictionaries in place.

pub mod cli;
pub mod deskew;
pub mod geometry;
pub mod pdf_ops;
pub mod pdf_writer;
pub mod pipeline;
pub mod render;

// Re-exports for convenience
pub use cli::{create_page_progress_bar, create_spinner, Cli, Commands, DeskewArgs, ExitCode};
pub use deskew::{
    correct_page, estimate_skew, DeskewError, DeskewOptions, DeskewOptionsBuilder, PageSkew,
    DEFAULT_TOLERANCE_DEG,
};
pub use geometry::{min_area_rect, OrientedRect};
pub use pdf_ops::{merge_pdfs, rotate_all_pages, rotate_even_pages, PdfOpError};
pub use pdf_writer::{PdfWriterError, PdfWriterOptions, PdfWriterOptionsBuilder, PrintPdfWriter};
pub use pipeline::{
    DeskewPipeline, PipelineConfig, PipelineError, ProgressCallback, SilentProgress,
};
pub use render::{PdftoppmRenderer, RenderError, RenderOptions, RenderOptionsBuilder};
