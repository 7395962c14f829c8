//! Width estimation for jet-energy-resolution extraction
//!
//! This crate turns response distributions into resolution values:
//! - [`truncate`]: symmetric truncation around the mean to a target fraction
//! - [`TruncatedRms`]: standard deviation corrected for the removed tails
//! - [`GaussianWidth`] / [`LogNormalWidth`]: widths from chi-square fits
//! - Batch drivers ([`width_series`] and friends) producing one width per
//!   kinematic bin, and [`truncation_scan`] for the width versus truncation
//!
//! All estimators implement [`WidthEstimator`] and never fail on bad input
//! data: a bin without a usable estimate becomes `(0, 0)` and a diagnostic
//! explains why.
//!
//! # Example
//!
//! ```rust
//! use jer_core::NullHandler;
//! use jer_histogram::BinnedSeries;
//! use jer_spread::{truncate, TruncatedRms, WidthEstimator};
//!
//! let contents: Vec<f64> = (0..20).map(|i| 100.0 * (-((i as f64 - 9.5) / 3.0).powi(2) / 2.0).exp()).collect();
//! let edges: Vec<f64> = (0..=20).map(|i| i as f64 * 0.1).collect();
//! let series = BinnedSeries::from_contents(edges, &contents).unwrap();
//!
//! let truncated = truncate(&series, 98.5, &NullHandler).unwrap();
//! let width = TruncatedRms::default().estimate(&truncated, &NullHandler);
//! assert!(width.value > 0.0);
//! ```

pub mod batch;
pub mod correction;
pub mod gaussian;
pub mod lognormal;
pub mod method;
pub mod rms;
pub mod scan;
pub mod traits;
pub mod truncation;

pub use batch::{
    mean_series, truncated_gaussian_width_series, truncated_log_normal_width_series,
    truncated_rms_series, width_series,
};
pub use correction::{truncation_correction, CorrectionMode};
pub use gaussian::GaussianWidth;
pub use lognormal::LogNormalWidth;
pub use method::ExtractionMethod;
pub use rms::TruncatedRms;
pub use scan::{default_scan_edges, truncation_scan};
pub use traits::{WidthEstimate, WidthEstimator};
pub use truncation::{truncate, TruncationResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        truncate, width_series, CorrectionMode, ExtractionMethod, GaussianWidth, LogNormalWidth,
        TruncatedRms, TruncationResult, WidthEstimate, WidthEstimator,
    };
}
