//! Deskew (skew correction) module
//!
//! Detects and corrects the small-angle skew that scanning introduces.
//!
//! # Features
//!
//! - Otsu-binarized minimum-area-rectangle skew estimation
//! - Tolerance-gated correction (out-of-band estimates are suppressed)
//! - Same-size rotation with bicubic resampling and edge-replicated borders
//!
//! # Example
//!
//! ```rust,no_run
//! use pdffixlab::deskew::{correct_page, estimate_skew, DEFAULT_TOLERANCE_DEG};
//!
//! let page = image::open("scan.png").unwrap();
//! let angle = estimate_skew(&page.to_luma8(), DEFAULT_TOLERANCE_DEG).unwrap();
//! let corrected = correct_page(&page, angle).unwrap();
//! println!("corrected by {:.2} degrees", angle);
//! ```
//!
//! Both operations are pure functions over their inputs, so pages can be
//! processed in parallel without shared state; see [`crate::pipeline`].

mod corrector;
mod estimator;
mod types;

pub use corrector::{correct_page, rotate_replicate};
pub use estimator::estimate_skew;
pub use types::{
    DeskewError, DeskewOptions, DeskewOptionsBuilder, PageSkew, Result, BLUR_SIGMA,
    DEFAULT_TOLERANCE_DEG, MIN_FOREGROUND_PIXELS, ROTATION_EPSILON_DEG,
};
