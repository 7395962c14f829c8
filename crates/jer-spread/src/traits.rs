//! Core traits for width estimation

use crate::truncation::TruncationResult;
use jer_core::{report, Diagnostic, DiagnosticHandler, ReasonCode, MIN_EFFECTIVE_ENTRIES};
use jer_histogram::SeriesStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A width with its statistical uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WidthEstimate {
    pub value: f64,
    pub error: f64,
}

impl WidthEstimate {
    pub fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }

    /// The `(0, 0)` placeholder stored for bins without a usable estimate
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0 && self.error == 0.0
    }
}

impl fmt::Display for WidthEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5} ± {:.5}", self.value, self.error)
    }
}

/// Estimator of the width of a (truncated) response distribution
///
/// Implementations never fail: a series they cannot handle yields
/// [`WidthEstimate::zero`] and a diagnostic.
pub trait WidthEstimator: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Estimate the width of `input` over its evaluation range
    fn estimate(&self, input: &TruncationResult, diagnostics: &dyn DiagnosticHandler) -> WidthEstimate;
}

impl<E: WidthEstimator + ?Sized> WidthEstimator for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn estimate(&self, input: &TruncationResult, diagnostics: &dyn DiagnosticHandler) -> WidthEstimate {
        (**self).estimate(input, diagnostics)
    }
}

/// Low-statistics gate shared by all estimators
///
/// Returns `false` and reports [`ReasonCode::LowStatistics`] when the series
/// has fewer than [`MIN_EFFECTIVE_ENTRIES`] effective entries.
pub(crate) fn has_enough_entries(
    input: &TruncationResult,
    operation: &str,
    diagnostics: &dyn DiagnosticHandler,
) -> bool {
    let n_eff = input.series.effective_entries();
    if n_eff < MIN_EFFECTIVE_ENTRIES {
        report(
            diagnostics,
            Diagnostic::warning(
                ReasonCode::LowStatistics,
                operation,
                format!("Too few entries: {n_eff:.1}"),
            ),
        );
        return false;
    }
    true
}

/// Report a failed width fit and return the zero placeholder
pub(crate) fn fit_failure(
    operation: &str,
    diagnostics: &dyn DiagnosticHandler,
    message: impl Into<String>,
) -> WidthEstimate {
    report(
        diagnostics,
        Diagnostic::warning(ReasonCode::FitNonConvergence, operation, message),
    );
    WidthEstimate::zero()
}
