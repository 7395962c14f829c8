//! Symmetric truncation around the mean
//!
//! Tails of a response distribution are cut by restricting the evaluation
//! range of the series to a window of whole bins around the bin containing
//! the mean. The window grows by one bin on each side per step until it
//! retains the requested percentage of the integral or touches an axis edge.
//! The retained fraction is always measured against the integral of the
//! untruncated series.

use jer_core::{report, Diagnostic, DiagnosticHandler, Error, Result};
use jer_histogram::{BinnedSeries, SeriesStatistics};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A series with its evaluation range set to the truncation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncationResult {
    pub series: BinnedSeries,
    /// Percentage of the total integral inside the window
    pub achieved_fraction: f64,
    /// Center of the first window bin
    pub range_min: f64,
    /// Center of the last window bin
    pub range_max: f64,
}

impl TruncationResult {
    /// Wrap a series without truncating it
    ///
    /// The fraction is 100 and the range spans the whole axis.
    pub fn untruncated(series: &BinnedSeries) -> Self {
        let mut series = series.clone();
        series.clear_range();
        let (range_min, range_max) = (series.lower_edge(), series.upper_edge());
        Self {
            series,
            achieved_fraction: 100.0,
            range_min,
            range_max,
        }
    }

    /// Whether the whole integral was kept
    pub fn is_complete(&self) -> bool {
        self.achieved_fraction == 100.0
    }
}

/// Truncate `series` to retain `target_percent` of its integral
///
/// A target of 100 or more returns the series unchanged. A series with zero
/// integral is returned unchanged with fraction 0 and an empty range. Any
/// evaluation range already set on the input is ignored.
pub fn truncate(
    series: &BinnedSeries,
    target_percent: f64,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<TruncationResult> {
    if !(target_percent >= 0.0) {
        return Err(Error::InvalidParameter(format!(
            "truncation target must be a non-negative percentage, got {target_percent}"
        )));
    }
    if target_percent >= 100.0 {
        return Ok(TruncationResult::untruncated(series));
    }

    let mut out = series.clone();
    out.clear_range();

    let total = out.integral();
    if total == 0.0 {
        return Ok(TruncationResult {
            series: out,
            achieved_fraction: 0.0,
            range_min: 0.0,
            range_max: 0.0,
        });
    }

    let contents = out.contents();
    let mean_bin = out.find_bin_clamped(out.mean());
    let last_bin = out.len() - 1;

    let mut distance = 0;
    let mut retained = 0.0;
    while retained < target_percent && distance < mean_bin && mean_bin + distance < last_bin {
        distance += 1;
        let window: f64 = contents[mean_bin - distance..=mean_bin + distance].iter().sum();
        retained = 100.0 - 100.0 * (total - window) / total;
    }

    let (first, last) = (mean_bin - distance, mean_bin + distance);
    out.set_range(first, last)?;
    let (range_min, range_max) = (out.center(first), out.center(last));

    debug!(mean_bin, first, last, retained, "Truncation window");
    report(
        diagnostics,
        Diagnostic::info(
            "truncate",
            format!("Reached truncation to {retained:.2}% of specified {target_percent:.2}%"),
        ),
    );

    Ok(TruncationResult {
        series: out,
        achieved_fraction: retained,
        range_min,
        range_max,
    })
}
