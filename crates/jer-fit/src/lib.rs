//! Curve fitting for jet-energy-resolution extraction
//!
//! Two fitters live here:
//!
//! - [`LevenbergMarquardt`]: bounded chi-square minimisation of a [`Model`]
//!   (Gaussian and log-normal response shapes), reporting parameters,
//!   errors, covariance and a convergence flag in a [`FitResult`]
//! - [`LinearFit`]: closed-form straight-line fit with confidence
//!   intervals, used for the extrapolation to zero alpha
//!
//! # Example
//!
//! ```rust
//! use jer_fit::LinearFit;
//!
//! let fit = LinearFit::fit(&[0.1, 0.2, 0.3], &[0.11, 0.12, 0.13], &[0.0; 3]).unwrap();
//! assert!((fit.intercept - 0.10).abs() < 1e-9);
//! ```

pub mod levenberg_marquardt;
pub mod linear;
pub mod model;
pub mod types;

pub use levenberg_marquardt::LevenbergMarquardt;
pub use linear::LinearFit;
pub use model::{Gaussian, LogNormal, Model};
pub use types::{FitData, FitResult, FitSettings, ParameterBounds, ParameterEstimate};
