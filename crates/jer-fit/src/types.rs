//! Fit inputs, settings and results

use jer_core::{Error, Result};
use jer_histogram::BinnedSeries;
use serde::{Deserialize, Serialize};

/// Samples for a chi-square fit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl FitData {
    pub fn new(x: Vec<f64>, y: Vec<f64>, sigma: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::size_mismatch(x.len(), y.len(), "fit data y"));
        }
        if x.len() != sigma.len() {
            return Err(Error::size_mismatch(x.len(), sigma.len(), "fit data sigma"));
        }
        Ok(Self { x, y, sigma })
    }

    /// Bins of `series` usable in a chi-square fit over `[lo, hi]`
    ///
    /// Only bins inside the evaluation range whose center lies in the domain
    /// and whose error is positive are taken.
    pub fn from_series(series: &BinnedSeries, (lo, hi): (f64, f64)) -> Self {
        let mut data = Self::default();
        for (_, center, bin) in series.active_bins() {
            if center >= lo && center <= hi && bin.error > 0.0 {
                data.x.push(center);
                data.y.push(bin.content);
                data.sigma.push(bin.error);
            }
        }
        data
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Settings for the Levenberg-Marquardt fitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSettings {
    /// Maximum number of accepted or rejected steps
    pub max_iterations: usize,
    /// Relative chi-square improvement below which the fit is converged
    pub tolerance: f64,
    /// Initial damping
    pub initial_lambda: f64,
    /// Damping above which no further improvement is attempted
    pub max_lambda: f64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
            initial_lambda: 1e-3,
            max_lambda: 1e10,
        }
    }
}

impl FitSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_initial_lambda(mut self, lambda: f64) -> Self {
        self.initial_lambda = lambda;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) || !(self.initial_lambda > 0.0) {
            return Err(Error::InvalidParameter(
                "tolerance and initial_lambda must be positive".to_string(),
            ));
        }
        if self.max_lambda <= self.initial_lambda {
            return Err(Error::InvalidParameter(
                "max_lambda must exceed initial_lambda".to_string(),
            ));
        }
        Ok(())
    }
}

/// Closed interval a parameter is kept in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ParameterBounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(lower < upper) {
            return Err(Error::InvalidParameter(format!(
                "parameter bounds [{lower}, {upper}] are empty"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// One fitted parameter with its uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterEstimate {
    pub value: f64,
    pub error: f64,
    pub converged: bool,
}

/// Outcome of a chi-square fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub parameters: Vec<f64>,
    pub errors: Vec<f64>,
    /// Row-major parameter covariance
    pub covariance: Vec<Vec<f64>>,
    pub chi_square: f64,
    pub ndf: usize,
    pub iterations: usize,
    pub converged: bool,
}

impl FitResult {
    /// Parameter `index` as `(value, error, converged)`
    pub fn parameter(&self, index: usize) -> Option<ParameterEstimate> {
        Some(ParameterEstimate {
            value: *self.parameters.get(index)?,
            error: *self.errors.get(index)?,
            converged: self.converged,
        })
    }

    /// Converged with finite parameters and errors
    pub fn is_valid(&self) -> bool {
        self.converged
            && self.parameters.iter().all(|p| p.is_finite())
            && self.errors.iter().all(|e| e.is_finite())
    }

    /// `chi2 / ndf`, or `None` for zero degrees of freedom
    pub fn reduced_chi_square(&self) -> Option<f64> {
        (self.ndf > 0).then(|| self.chi_square / self.ndf as f64)
    }
}
