//! Jet energy resolution extraction
//!
//! This crate ties the jer-* crates together:
//!
//! - [`histogram`]: binned and point series, series paths and sources
//! - [`spread`]: truncation and the width estimators (truncated RMS,
//!   Gaussian and log-normal fits)
//! - [`combine`]: quadrature subtraction, ratios, pulls and error series
//! - [`extrapolate`]: straight-line extrapolation to zero alpha and
//!   confidence bands
//! - [`fit`]: Levenberg-Marquardt and weighted linear least squares
//! - [`config`] / [`workflow`]: the JSON-configured alpha-extrapolation recipe
//!
//! # Example
//!
//! ```rust
//! use jer_toolkit::prelude::*;
//! use jer_toolkit::histogram::BinnedSeries;
//!
//! let series = BinnedSeries::with_errors(
//!     vec![0.0, 1.0, 2.0, 3.0],
//!     &[1.0, 2.0, 1.0],
//!     &[1.0, 1.4, 1.0],
//! ).unwrap();
//! let window = truncate(&series, 50.0, &NullHandler).unwrap();
//! assert_eq!(window.achieved_fraction, 100.0);
//! ```

pub mod config;
pub mod workflow;

pub use jer_combine as combine;
pub use jer_extrapolate as extrapolate;
pub use jer_fit as fit;
pub use jer_histogram as histogram;
pub use jer_spread as spread;

pub use config::{NamedBin, QuantityNames, SampleNames, WorkflowConfig};
pub use jer_core::{
    diagnostics, CollectingHandler, Diagnostic, DiagnosticHandler, Error, LoggingHandler, NullHandler, ReasonCode,
    Result, Severity,
};
pub use workflow::{Extrapolation, JerWorkflow};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{NamedBin, WorkflowConfig};
    pub use crate::workflow::{Extrapolation, JerWorkflow};
    pub use jer_combine::{error_series, pull, quadratic_subtraction, ratio, Combination};
    pub use jer_core::prelude::*;
    pub use jer_extrapolate::{confidence_band, extrapolate_intercept, extrapolate_intercept_2d};
    pub use jer_histogram::{MemorySource, Series, SeriesPath, SeriesSource, SeriesStatistics};
    pub use jer_spread::prelude::*;
}
