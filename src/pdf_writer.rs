//! PDF writer module
//!
//! Assembles processed page images back into a single PDF with printpdf.
//! Each image becomes one page sized so the raster maps 1:1 at the chosen
//! DPI. Grayscale pages are embedded as single-channel image XObjects;
//! everything else goes in as 8-bit RGB.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use thiserror::Error;

/// PDF writer error types
#[derive(Debug, Error)]
pub enum PdfWriterError {
    #[error("no images to write")]
    NoImages,

    #[error("image file not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("image decode failed for {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("PDF generation error: {0}")]
    GenerationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdfWriterError>;

const MM_PER_INCH: f64 = 25.4;

/// PDF writer options
#[derive(Debug, Clone)]
pub struct PdfWriterOptions {
    /// Resolution the page rasters were produced at
    pub dpi: u32,
    /// Document title metadata
    pub title: String,
}

impl Default for PdfWriterOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            title: "Processed Document".to_string(),
        }
    }
}

impl PdfWriterOptions {
    /// Create a new options builder
    pub fn builder() -> PdfWriterOptionsBuilder {
        PdfWriterOptionsBuilder::default()
    }
}

/// Builder for PdfWriterOptions
#[derive(Debug, Default)]
pub struct PdfWriterOptionsBuilder {
    options: PdfWriterOptions,
}

impl PdfWriterOptionsBuilder {
    /// Set the DPI used to size pages from pixel dimensions
    #[must_use]
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi.max(1);
        self
    }

    /// Set the document title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = title.into();
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> PdfWriterOptions {
        self.options
    }
}

/// printpdf-based document assembler
pub struct PrintPdfWriter;

impl PrintPdfWriter {
    /// Build a PDF from `images`, one page per image, and write it to
    /// `output_path`. Page order follows the slice order.
    pub fn create_from_images(
        images: &[PathBuf],
        output_path: &Path,
        options: &PdfWriterOptions,
    ) -> Result<()> {
        if images.is_empty() {
            return Err(PdfWriterError::NoImages);
        }
        for path in images {
            if !path.exists() {
                return Err(PdfWriterError::ImageNotFound(path.clone()));
            }
        }

        let first = load_image(&images[0])?;
        let (page_w, page_h) = page_size_mm(&first, options.dpi);
        let (doc, first_page, first_layer) =
            PdfDocument::new(&options.title, page_w, page_h, "Page 1");

        embed_image(first, doc.get_page(first_page).get_layer(first_layer), options.dpi);

        for (index, path) in images.iter().enumerate().skip(1) {
            let raster = load_image(path)?;
            let (page_w, page_h) = page_size_mm(&raster, options.dpi);
            let (page, layer) =
                doc.add_page(page_w, page_h, format!("Page {}", index + 1));
            embed_image(raster, doc.get_page(page).get_layer(layer), options.dpi);
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(output_path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| PdfWriterError::GenerationError(e.to_string()))?;
        Ok(())
    }
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| PdfWriterError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

fn page_size_mm(raster: &DynamicImage, dpi: u32) -> (Mm, Mm) {
    let width_mm = raster.width() as f64 / dpi as f64 * MM_PER_INCH;
    let height_mm = raster.height() as f64 / dpi as f64 * MM_PER_INCH;
    (Mm(width_mm as f32), Mm(height_mm as f32))
}

/// Place a raster on a layer at its native DPI.
///
/// The XObject is built by hand so the embedded sample data stays exactly
/// the decoded bytes, with no intermediate recompression.
fn embed_image(raster: DynamicImage, layer: printpdf::PdfLayerReference, dpi: u32) {
    let (width, height) = (raster.width(), raster.height());
    let (color_space, image_data) = match raster {
        DynamicImage::ImageLuma8(buf) => (ColorSpace::Greyscale, buf.into_raw()),
        other => (ColorSpace::Rgb, other.to_rgb8().into_raw()),
    };

    let xobject = ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    Image::from(xobject).add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );
}
