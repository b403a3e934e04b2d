//! Deskew module core types
//!
//! Contains constants, error types, and options for skew estimation and
//! correction.

use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default correction tolerance in degrees. Estimates larger than this are
/// treated as noise (or a genuinely rotated page) and suppressed.
pub const DEFAULT_TOLERANCE_DEG: f64 = 3.0;

/// Minimum number of foreground pixels required for a geometric estimate.
/// Pages with less content than this always yield a zero estimate.
pub const MIN_FOREGROUND_PIXELS: usize = 50;

/// Rotations at or below this magnitude (degrees) are skipped entirely so a
/// near-zero correction does not resample and blur the page.
pub const ROTATION_EPSILON_DEG: f64 = 0.01;

/// Gaussian smoothing strength applied before binarization, matching a
/// 9x9 kernel.
pub const BLUR_SIGMA: f32 = 1.7;

// ============================================================
// Error Types
// ============================================================

/// Deskew error types
///
/// Degenerate content (blank pages, too few foreground pixels) is not an
/// error: the estimator resolves it to a zero estimate. Errors are reserved
/// for precondition violations that have no sensible best-effort answer.
#[derive(Debug, Error)]
pub enum DeskewError {
    #[error("raster has a zero dimension: {width}x{height}")]
    EmptyRaster { width: u32, height: u32 },

    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
}

pub type Result<T> = std::result::Result<T, DeskewError>;

// ============================================================
// Options
// ============================================================

/// Skew estimation options
#[derive(Debug, Clone, Copy)]
pub struct DeskewOptions {
    /// Maximum correction magnitude in degrees; larger estimates are
    /// suppressed to 0.0
    pub tolerance_deg: f64,
}

impl Default for DeskewOptions {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
        }
    }
}

impl DeskewOptions {
    /// Create a new options builder
    pub fn builder() -> DeskewOptionsBuilder {
        DeskewOptionsBuilder::default()
    }
}

/// Builder for DeskewOptions
#[derive(Debug, Default)]
pub struct DeskewOptionsBuilder {
    options: DeskewOptions,
}

impl DeskewOptionsBuilder {
    /// Set the correction tolerance in degrees
    #[must_use]
    pub fn tolerance_deg(mut self, tolerance: f64) -> Self {
        self.options.tolerance_deg = tolerance.abs();
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> DeskewOptions {
        self.options
    }
}

// ============================================================
// Result Types
// ============================================================

/// Per-page skew report produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSkew {
    /// 0-indexed page number
    pub index: usize,
    /// Estimated corrective angle in degrees; 0.0 means no correction
    pub angle_deg: f64,
    /// Whether a rotation was actually applied
    pub corrected: bool,
}
