//! Page correction
//!
//! Applies the estimated corrective rotation to a page raster. The output
//! always has the same dimensions as the input; content rotated past the
//! original frame is lost, which is acceptable for the small angles this
//! module deals in. Corner pixels exposed by the rotation are filled by
//! replicating the nearest edge pixel rather than a fixed color, so
//! corrected pages do not pick up a visible frame.

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};

use super::types::{DeskewError, Result, ROTATION_EPSILON_DEG};

/// Rotate a page raster by `angle_deg` about its pixel center.
///
/// Positive angles rotate content clockwise on screen. Angles at or below
/// [`ROTATION_EPSILON_DEG`] in magnitude return the input unchanged so that
/// a no-op correction never resamples the image.
///
/// # Errors
///
/// Fails on a zero-dimension raster.
pub fn correct_page(raster: &DynamicImage, angle_deg: f64) -> Result<DynamicImage> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(DeskewError::EmptyRaster { width, height });
    }

    if angle_deg.abs() <= ROTATION_EPSILON_DEG {
        return Ok(raster.clone());
    }

    let rotated = match raster {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(rotate_replicate(buf, angle_deg))
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(rotate_replicate(buf, angle_deg))
        }
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(rotate_replicate(buf, angle_deg)),
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(rotate_replicate(buf, angle_deg))
        }
        other => DynamicImage::ImageRgba8(rotate_replicate(&other.to_rgba8(), angle_deg)),
    };

    Ok(rotated)
}

/// Rotate a buffer about its truncated-integer pixel center with bicubic
/// resampling and edge-replicated borders.
pub fn rotate_replicate<P>(src: &ImageBuffer<P, Vec<u8>>, angle_deg: f64) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (width, height) = src.dimensions();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;

    let angle_rad = angle_deg.to_radians();
    let cos_a = angle_rad.cos();
    let sin_a = angle_rad.sin();

    let mut out = ImageBuffer::new(width, height);

    for ny in 0..height {
        for nx in 0..width {
            // Map each output pixel back into the source frame.
            let dx = nx as f64 - cx;
            let dy = ny as f64 - cy;
            let ox = dx * cos_a + dy * sin_a + cx;
            let oy = -dx * sin_a + dy * cos_a + cy;

            out.put_pixel(nx, ny, bicubic_replicate(src, ox, oy));
        }
    }

    out
}

/// Catmull-Rom cubic kernel (a = -0.5).
fn cubic_kernel(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        (1.5 * t - 2.5) * t * t + 1.0
    } else if t < 2.0 {
        ((-0.5 * t + 2.5) * t - 4.0) * t + 2.0
    } else {
        0.0
    }
}

/// Sample `src` at a fractional coordinate with a 4x4 bicubic kernel.
/// Out-of-bounds taps clamp to the nearest edge pixel.
fn bicubic_replicate<P>(src: &ImageBuffer<P, Vec<u8>>, x: f64, y: f64) -> P
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (width, height) = src.dimensions();
    let max_x = (width - 1) as i64;
    let max_y = (height - 1) as i64;

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let channels = P::CHANNEL_COUNT as usize;
    let mut acc = [0.0f64; 4];

    for j in -1..=2i64 {
        let wy = cubic_kernel(fy - j as f64);
        if wy == 0.0 {
            continue;
        }
        let sy = (y0 + j).clamp(0, max_y) as u32;

        for i in -1..=2i64 {
            let wx = cubic_kernel(fx - i as f64);
            if wx == 0.0 {
                continue;
            }
            let sx = (x0 + i).clamp(0, max_x) as u32;

            let weight = wx * wy;
            let pixel = src.get_pixel(sx, sy);
            for (c, value) in pixel.channels().iter().enumerate() {
                acc[c] += *value as f64 * weight;
            }
        }
    }

    let mut result = [0u8; 4];
    for c in 0..channels {
        result[c] = acc[c].round().clamp(0.0, 255.0) as u8;
    }
    *P::from_slice(&result[..channels])
}
