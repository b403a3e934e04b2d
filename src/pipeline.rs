//! Processing pipeline
//!
//! Orchestrates the full PDF deskew flow: render pages, estimate and
//! correct skew per page in parallel, reassemble the corrected pages into
//! a new PDF. Pages are independent, so the per-page stage runs on the
//! rayon pool and results are re-ordered by page index afterwards.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deskew::{correct_page, estimate_skew, PageSkew, ROTATION_EPSILON_DEG};
use crate::pdf_writer::{PdfWriterOptions, PrintPdfWriter};
use crate::render::{PdftoppmRenderer, RenderOptions};

/// Pipeline error types
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input PDF not found: {0}")]
    InputNotFound(PathBuf),

    #[error("render error: {0}")]
    Render(#[from] crate::render::RenderError),

    #[error("deskew error: {0}")]
    Deskew(#[from] crate::deskew::DeskewError),

    #[error("PDF writer error: {0}")]
    Writer(#[from] crate::pdf_writer::PdfWriterError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rasterization resolution in dots per inch
    pub dpi: u32,
    /// Maximum skew magnitude accepted as a scan artifact
    pub tolerance_deg: f64,
    /// Worker thread count; `None` uses the rayon default
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            tolerance_deg: crate::deskew::DEFAULT_TOLERANCE_DEG,
            threads: None,
        }
    }
}

/// Per-step progress reporting hooks
pub trait ProgressCallback: Sync {
    /// A pipeline step is starting; `total` is its unit count
    fn on_step_start(&self, step: &str, total: usize);
    /// One page finished the deskew stage
    fn on_page(&self, page: &PageSkew);
    /// A pipeline step finished
    fn on_step_complete(&self, step: &str, message: &str);
}

/// No-op progress callback for library use
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_step_start(&self, _step: &str, _total: usize) {}
    fn on_page(&self, _page: &PageSkew) {}
    fn on_step_complete(&self, _step: &str, _message: &str) {}
}

/// PDF deskew pipeline
pub struct DeskewPipeline;

impl DeskewPipeline {
    /// Deskew every page of `input` and write the result to `output`.
    ///
    /// Returns one [`PageSkew`] report per page in page order.
    pub fn run(
        input: &Path,
        output: &Path,
        config: &PipelineConfig,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<PageSkew>> {
        if !input.exists() {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }

        match config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| Self::run_inner(input, output, config, progress))
            }
            None => Self::run_inner(input, output, config, progress),
        }
    }

    fn run_inner(
        input: &Path,
        output: &Path,
        config: &PipelineConfig,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<PageSkew>> {
        let scratch = tempfile::tempdir()?;

        progress.on_step_start("render", 1);
        let render_options = RenderOptions::builder().dpi(config.dpi).build();
        let pages = PdftoppmRenderer::render_pages(input, scratch.path(), &render_options)?;
        progress.on_step_complete("render", &format!("{} pages rendered", pages.len()));

        progress.on_step_start("deskew", pages.len());
        let corrected_dir = scratch.path().join("corrected");
        std::fs::create_dir_all(&corrected_dir)?;

        let results: Mutex<Vec<(usize, Result<(PathBuf, PageSkew)>)>> =
            Mutex::new(Vec::with_capacity(pages.len()));

        pages.par_iter().enumerate().for_each(|(index, path)| {
            let outcome = Self::process_page(
                index,
                path,
                &corrected_dir,
                config.tolerance_deg,
            );
            if let Ok((_, report)) = &outcome {
                progress.on_page(report);
            }
            results
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((index, outcome));
        });

        let mut collected = results.into_inner().unwrap_or_else(|p| p.into_inner());
        collected.sort_by_key(|(index, _)| *index);

        let mut corrected_pages = Vec::with_capacity(collected.len());
        let mut reports = Vec::with_capacity(collected.len());
        for (_, outcome) in collected {
            let (path, report) = outcome?;
            corrected_pages.push(path);
            reports.push(report);
        }

        let corrected_count = reports.iter().filter(|r| r.corrected).count();
        progress.on_step_complete(
            "deskew",
            &format!("{} of {} pages corrected", corrected_count, reports.len()),
        );

        progress.on_step_start("write", 1);
        let writer_options = PdfWriterOptions::builder().dpi(config.dpi).build();
        PrintPdfWriter::create_from_images(&corrected_pages, output, &writer_options)?;
        progress.on_step_complete("write", &format!("wrote {}", output.display()));

        Ok(reports)
    }

    fn process_page(
        index: usize,
        path: &Path,
        corrected_dir: &Path,
        tolerance_deg: f64,
    ) -> Result<(PathBuf, PageSkew)> {
        let raster = image::open(path)?;
        let angle = estimate_skew(&raster.to_luma8(), tolerance_deg)?;

        let corrected = angle.abs() > ROTATION_EPSILON_DEG;
        let out_path = corrected_dir.join(format!("deskewed-{:04}.png", index + 1));
        if corrected {
            let rotated = correct_page(&raster, angle)?;
            rotated.save(&out_path)?;
        } else {
            raster.save(&out_path)?;
        }

        Ok((
            out_path,
            PageSkew {
                index,
                angle_deg: angle,
                corrected,
            },
        ))
    }
}
