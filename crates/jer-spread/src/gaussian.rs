//! Width from a Gaussian fit of the response core

use crate::traits::{fit_failure, has_enough_entries, WidthEstimate, WidthEstimator};
use crate::truncation::TruncationResult;
use jer_core::{DiagnosticHandler, Result};
use jer_fit::{FitData, FitSettings, Gaussian, LevenbergMarquardt};
use jer_histogram::SeriesStatistics;
use tracing::debug;

/// Response domain the fit is restricted to
pub const RESPONSE_DOMAIN: (f64, f64) = (0.0, 2.0);

/// `|sigma|` of a chi-square fit of `A exp(-((x - mu) / sigma)² / 2)`
///
/// The fit runs over the evaluation range intersected with `[0, 2]`, starting
/// from the maximum, mean and standard deviation of the series.
#[derive(Debug, Clone, Default)]
pub struct GaussianWidth {
    fitter: LevenbergMarquardt,
}

impl GaussianWidth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: FitSettings) -> Result<Self> {
        Ok(Self {
            fitter: LevenbergMarquardt::new(settings)?,
        })
    }
}

impl WidthEstimator for GaussianWidth {
    fn name(&self) -> &str {
        "gaussian_width"
    }

    fn estimate(&self, input: &TruncationResult, diagnostics: &dyn DiagnosticHandler) -> WidthEstimate {
        if !has_enough_entries(input, self.name(), diagnostics) {
            return WidthEstimate::zero();
        }

        let series = &input.series;
        let data = FitData::from_series(series, RESPONSE_DOMAIN);
        if data.len() < 3 {
            return fit_failure(
                self.name(),
                diagnostics,
                format!("{} usable bins for a 3-parameter fit", data.len()),
            );
        }

        let (first, _) = series.active_range();
        let mut sigma = series.std_dev();
        if sigma <= 0.0 {
            sigma = series.width(first);
        }
        let start = [series.maximum(), series.mean(), sigma];

        match self.fitter.fit(&Gaussian, &data, &start, &[]) {
            Ok(result) if result.is_valid() => {
                debug!(
                    sigma = result.parameters[2].abs(),
                    chi2 = result.chi_square,
                    ndf = result.ndf,
                    "Gaussian width fit"
                );
                WidthEstimate::new(result.parameters[2].abs(), result.errors[2])
            }
            Ok(result) => fit_failure(
                self.name(),
                diagnostics,
                format!("Fit did not converge after {} iterations", result.iterations),
            ),
            Err(e) => fit_failure(self.name(), diagnostics, e.to_string()),
        }
    }
}
