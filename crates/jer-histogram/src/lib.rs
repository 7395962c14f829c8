//! Series types for jet-energy-resolution extraction
//!
//! This crate provides the containers every estimator and combinator works
//! on:
//!
//! - [`BinnedSeries`]: regular bins with content and error, flow bins, and
//!   an optional evaluation range that restricts all statistics
//! - [`BinnedSeries2D`]: the same over two kinematic axes
//! - [`PointSeries`] / [`AsymmetricPointSeries`]: graph-like inputs with
//!   linear-interpolating `eval`
//! - [`Series`]: the tagged union combinators dispatch on
//! - [`SeriesSource`]: lookup of stored series by [`SeriesPath`]
//!
//! # Example
//!
//! ```rust
//! use jer_histogram::{BinnedSeries, SeriesStatistics};
//!
//! let series = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 1.0]).unwrap();
//! assert_eq!(series.mean(), 1.5);
//! assert_eq!(series.integral(), 4.0);
//! ```

pub mod binning;
pub mod convert;
pub mod hist2d;
pub mod points;
pub mod series;
pub mod source;
pub mod stats;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_data;

pub use binning::{edges_from_kinematic_bins, kinematic_center, uniform_edges, KinematicBin};
pub use convert::{points_from_series, stack_rows};
pub use hist2d::BinnedSeries2D;
pub use points::{interpolate, AsymmetricPoint, AsymmetricPointSeries, Point, PointSeries};
pub use series::Series;
pub use source::{MemorySource, SeriesPath, SeriesSource};
pub use stats::SeriesStatistics;
pub use types::{Bin, BinnedSeries};
