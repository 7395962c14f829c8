//! Extrapolation of resolution series to zero additional activity
//!
//! A resolution measured in bins of the additional-activity variable alpha
//! grows roughly linearly with alpha. Fitting a straight line per kinematic
//! bin and keeping the intercept removes that contribution:
//!
//! - [`extrapolate_intercept`]: one intercept per kinematic bin
//! - [`extrapolate_intercept_2d`]: the same over a two-dimensional grid
//! - [`confidence_band`]: the fitted line with its Student-t band
//!
//! Series with fewer than three non-zero samples in the fit range are not
//! fitted; their output bins stay `(0, 0)` and a diagnostic is reported.
//!
//! # Example
//!
//! ```rust
//! use jer_core::NullHandler;
//! use jer_extrapolate::extrapolate_intercept;
//! use jer_histogram::{Point, PointSeries, Series};
//!
//! let widths = PointSeries::new(
//!     [0.1, 0.15, 0.2, 0.25]
//!         .iter()
//!         .map(|&a| Point::new(a, 0.08 + 0.3 * a, 0.0, 0.0))
//!         .collect(),
//! );
//! let out = extrapolate_intercept(&[Series::Points(widths)], &[(60.0, 120.0)], 0.0, 0.3, &NullHandler).unwrap();
//! assert!((out.bins()[0].content - 0.08).abs() < 1e-12);
//! ```

pub mod band;
pub mod intercept;
pub mod line;
pub mod settings;

pub use band::confidence_band;
pub use intercept::{extrapolate_intercept, extrapolate_intercept_2d};
pub use line::{fit_line, fit_samples, MIN_NONZERO_SAMPLES};
pub use settings::ExtrapolationSettings;
