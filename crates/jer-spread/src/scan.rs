//! Width as a function of the truncation percentage

use crate::batch::map_indices;
use crate::traits::WidthEstimator;
use crate::truncation::truncate;
use jer_core::{DiagnosticHandler, Result};
use jer_histogram::{uniform_edges, Bin, BinnedSeries};

/// Scan axis from 70% to 100% in steps of 0.5%
pub fn default_scan_edges() -> Result<Vec<f64>> {
    uniform_edges(60, 70.0, 100.0)
}

/// Evaluate `estimator` at the center of every bin of `scan_edges`
///
/// The returned series lives on the truncation axis: bin `k` holds the width
/// of `series` truncated to `(scan_edges[k] + scan_edges[k + 1]) / 2` percent.
pub fn truncation_scan(
    series: &BinnedSeries,
    estimator: &dyn WidthEstimator,
    scan_edges: &[f64],
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    let mut output = BinnedSeries::zeros(scan_edges.to_vec())?;
    let centers = output.centers();

    let estimates = map_indices(centers.len(), |k| -> Result<Bin> {
        let truncated = truncate(series, centers[k], diagnostics)?;
        let w = estimator.estimate(&truncated, diagnostics);
        Ok(Bin::new(w.value, w.error))
    });

    for (bin, estimate) in output.bins_mut().iter_mut().zip(estimates) {
        *bin = estimate?;
    }
    Ok(output)
}
