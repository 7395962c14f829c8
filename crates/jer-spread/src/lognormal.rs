//! Width from a log-normal fit of the response

use crate::gaussian::RESPONSE_DOMAIN;
use crate::traits::{fit_failure, has_enough_entries, WidthEstimate, WidthEstimator};
use crate::truncation::TruncationResult;
use jer_core::{DiagnosticHandler, Result};
use jer_fit::{FitData, FitSettings, LevenbergMarquardt, LogNormal, ParameterBounds};
use jer_histogram::SeriesStatistics;
use tracing::debug;

const SIGMA_START: f64 = 0.1;
const SIGMA_LIMITS: (f64, f64) = (1e-4, 1.0);
const SCALE_START: f64 = 1.0;
const SCALE_LIMITS: (f64, f64) = (1e-4, 2.0);

/// Shape parameter `sigma` of a fit of `A · LogNormal(x; sigma, 0, m)`
#[derive(Debug, Clone, Default)]
pub struct LogNormalWidth {
    fitter: LevenbergMarquardt,
}

impl LogNormalWidth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: FitSettings) -> Result<Self> {
        Ok(Self {
            fitter: LevenbergMarquardt::new(settings)?,
        })
    }
}

/// Least-squares amplitude of the start shape
fn seed_amplitude(data: &FitData) -> Option<f64> {
    let (num, den) = data
        .x
        .iter()
        .zip(&data.y)
        .zip(&data.sigma)
        .fold((0.0, 0.0), |(num, den), ((&x, &y), &s)| {
            let f = LogNormal::density(x, SIGMA_START, SCALE_START);
            let w = 1.0 / (s * s);
            (num + w * y * f, den + w * f * f)
        });
    (den > 0.0).then(|| num / den)
}

impl WidthEstimator for LogNormalWidth {
    fn name(&self) -> &str {
        "log_normal_width"
    }

    fn estimate(&self, input: &TruncationResult, diagnostics: &dyn DiagnosticHandler) -> WidthEstimate {
        if !has_enough_entries(input, self.name(), diagnostics) {
            return WidthEstimate::zero();
        }

        let data = FitData::from_series(&input.series, RESPONSE_DOMAIN);
        if data.len() < 3 {
            return fit_failure(
                self.name(),
                diagnostics,
                format!("{} usable bins for a 3-parameter fit", data.len()),
            );
        }

        let amplitude = seed_amplitude(&data).unwrap_or_else(|| input.series.maximum());
        let start = [amplitude, SIGMA_START, SCALE_START];
        let mut bounds = [None; 3];
        for (slot, (lo, hi)) in bounds[1..].iter_mut().zip([SIGMA_LIMITS, SCALE_LIMITS]) {
            match ParameterBounds::new(lo, hi) {
                Ok(b) => *slot = Some(b),
                Err(e) => return fit_failure(self.name(), diagnostics, e.to_string()),
            }
        }

        match self.fitter.fit(&LogNormal, &data, &start, &bounds) {
            Ok(result) if result.is_valid() => {
                debug!(
                    sigma = result.parameters[1],
                    m = result.parameters[2],
                    chi2 = result.chi_square,
                    "Log-normal width fit"
                );
                WidthEstimate::new(result.parameters[1], result.errors[1])
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
