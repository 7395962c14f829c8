//! Truncated RMS width

use crate::correction::{truncation_correction, CorrectionMode};
use crate::traits::{has_enough_entries, WidthEstimate, WidthEstimator};
use crate::truncation::TruncationResult;
use jer_core::{report, Diagnostic, DiagnosticHandler, Error, ReasonCode, Result};
use jer_histogram::SeriesStatistics;

/// Standard deviation over the truncation window, corrected for the tails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TruncatedRms {
    correction: CorrectionMode,
}

impl TruncatedRms {
    /// Create the estimator
    ///
    /// [`CorrectionMode::GaussianRefit`] is rejected with
    /// [`Error::FeatureNotAvailable`].
    pub fn new(correction: CorrectionMode) -> Result<Self> {
        if correction == CorrectionMode::GaussianRefit {
            return Err(Error::FeatureNotAvailable(
                "Gaussian refit correction of the truncated RMS".to_string(),
            ));
        }
        Ok(Self { correction })
    }

    pub fn uncorrected() -> Self {
        Self {
            correction: CorrectionMode::Disabled,
        }
    }

    pub fn correction(&self) -> CorrectionMode {
        self.correction
    }

    fn factor(&self, input: &TruncationResult, diagnostics: &dyn DiagnosticHandler) -> f64 {
        match self.correction {
            CorrectionMode::Disabled | CorrectionMode::GaussianRefit => 1.0,
            CorrectionMode::Formula => truncation_correction(input.achieved_fraction).unwrap_or_else(|| {
                report(
                    diagnostics,
                    Diagnostic::warning(
                        ReasonCode::DegenerateCorrection,
                        self.name(),
                        format!(
                            "Correction undefined at {:.2}% retained, using 1",
                            input.achieved_fraction
                        ),
                    ),
                );
                1.0
            }),
        }
    }
}

impl WidthEstimator for TruncatedRms {
    fn name(&self) -> &str {
        "truncated_rms"
    }

    fn estimate(&self, input: &TruncationResult, diagnostics: &dyn DiagnosticHandler) -> WidthEstimate {
        if !has_enough_entries(input, self.name(), diagnostics) {
            return WidthEstimate::zero();
        }
        let factor = self.factor(input, diagnostics);
        let series = &input.series;
        WidthEstimate::new(series.std_dev() / factor, series.std_dev_error() / factor)
    }
}
