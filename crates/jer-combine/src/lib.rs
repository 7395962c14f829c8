//! Bin-wise combinations of resolution series
//!
//! - [`quadratic_subtraction`]: `sqrt(m² - Σ s²)` with error propagation
//! - [`ratio`]: point-wise or bin-wise division, e.g. data over simulation
//! - [`pull`] / [`pull_2d`]: `|a - b| / sqrt(e_a² + e_b²)`
//! - [`error_series`] / [`error_series_2d`]: bin errors as contents
//!
//! Incompatible binning is a hard [`jer_core::Error::BinningMismatch`]. Bins
//! that cannot be computed are reported through the diagnostics handler and
//! listed in [`Combination::failed_bins`].
//!
//! # Example
//!
//! ```rust
//! use jer_combine::quadratic_subtraction;
//! use jer_core::NullHandler;
//! use jer_histogram::BinnedSeries;
//!
//! let balance = BinnedSeries::with_errors(vec![0.0, 1.0], &[0.15], &[0.01]).unwrap();
//! let pli = BinnedSeries::with_errors(vec![0.0, 1.0], &[0.09], &[0.005]).unwrap();
//! let jer = quadratic_subtraction(&balance, &[pli], &NullHandler).unwrap();
//! assert!(jer.is_complete());
//! assert!((jer.output.bins()[0].content - 0.12).abs() < 1e-12);
//! ```

pub mod errors;
pub mod pull;
pub mod quadratic;
pub mod ratio;
pub mod types;

pub use errors::{error_series, error_series_2d};
pub use pull::{pull, pull_2d};
pub use quadratic::quadratic_subtraction;
pub use ratio::ratio;
pub use types::Combination;
