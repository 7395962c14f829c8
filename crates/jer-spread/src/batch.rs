//! Batch drivers: one width per kinematic bin
//!
//! Each driver takes one response series per kinematic bin and fills an
//! output series whose edges are built from the kinematic bins. Input `i` is
//! attributed to the output bin containing the center of `kinematic_bins[i]`.

use crate::correction::CorrectionMode;
use crate::gaussian::GaussianWidth;
use crate::lognormal::LogNormalWidth;
use crate::rms::TruncatedRms;
use crate::traits::{WidthEstimate, WidthEstimator};
use crate::truncation::{truncate, TruncationResult};
use jer_core::{report, report_error, Diagnostic, DiagnosticHandler, Error, ReasonCode, Result};
use jer_histogram::{edges_from_kinematic_bins, kinematic_center, Bin, BinnedSeries, KinematicBin, SeriesStatistics};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate `f` for every index, on rayon when the `parallel` feature is on
pub(crate) fn map_indices<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..count).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}

fn check_lengths(
    operation: &str,
    inputs: usize,
    kinematic_bins: &[KinematicBin],
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    if inputs != kinematic_bins.len() {
        return Err(report_error(
            diagnostics,
            ReasonCode::StructuralMismatch,
            operation,
            Error::structural_mismatch(
                operation,
                format!("{inputs} series for {} kinematic bins", kinematic_bins.len()),
            ),
        ));
    }
    BinnedSeries::zeros(edges_from_kinematic_bins(kinematic_bins)?)
}

/// Store `bin` at the output bin containing the center of `kinematic_bin`
fn place(
    output: &mut BinnedSeries,
    index: usize,
    kinematic_bin: &KinematicBin,
    bin: Bin,
    operation: &str,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<()> {
    let center = kinematic_center(kinematic_bin);
    match output.find_bin(center) {
        Some(target) => output.set_bin(target, bin),
        None => {
            report(
                diagnostics,
                Diagnostic::warning(
                    ReasonCode::OutOfRange,
                    operation,
                    format!("Kinematic bin center {center} outside output axis"),
                )
                .at_bin(index),
            );
            Ok(())
        }
    }
}

/// Width of each input, truncated to `truncation` percent first
///
/// Truncation is skipped when `truncation` is `None` or exactly 100.
pub fn width_series(
    estimator: &dyn WidthEstimator,
    inputs: &[BinnedSeries],
    kinematic_bins: &[KinematicBin],
    truncation: Option<f64>,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    let operation = estimator.name();
    let mut output = check_lengths(operation, inputs.len(), kinematic_bins, diagnostics)?;

    let estimates = map_indices(inputs.len(), |i| -> Result<WidthEstimate> {
        let truncated = match truncation {
            Some(target) if target != 100.0 => truncate(&inputs[i], target, diagnostics)?,
            _ => TruncationResult::untruncated(&inputs[i]),
        };
        let estimate = estimator.estimate(&truncated, diagnostics);
        debug!(estimator = operation, bin = i, value = estimate.value, error = estimate.error, "Width estimate");
        Ok(estimate)
    });

    for (i, (estimate, kinematic_bin)) in estimates.into_iter().zip(kinematic_bins).enumerate() {
        let estimate = estimate?;
        place(
            &mut output,
            i,
            kinematic_bin,
            Bin::new(estimate.value, estimate.error),
            operation,
            diagnostics,
        )?;
    }
    Ok(output)
}

/// Corrected truncated RMS per kinematic bin
pub fn truncated_rms_series(
    inputs: &[BinnedSeries],
    kinematic_bins: &[KinematicBin],
    truncation: Option<f64>,
    correction: CorrectionMode,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    let estimator = TruncatedRms::new(correction)?;
    width_series(&estimator, inputs, kinematic_bins, truncation, diagnostics)
}

/// Gaussian-fit width per kinematic bin
pub fn truncated_gaussian_width_series(
    inputs: &[BinnedSeries],
    kinematic_bins: &[KinematicBin],
    truncation: Option<f64>,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    width_series(&GaussianWidth::new(), inputs, kinematic_bins, truncation, diagnostics)
}

/// Log-normal-fit width per kinematic bin
pub fn truncated_log_normal_width_series(
    inputs: &[BinnedSeries],
    kinematic_bins: &[KinematicBin],
    truncation: Option<f64>,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    width_series(&LogNormalWidth::new(), inputs, kinematic_bins, truncation, diagnostics)
}

/// Mean of each input with its standard deviation as error
///
/// All inputs must share the same edges.
pub fn mean_series(
    inputs: &[BinnedSeries],
    kinematic_bins: &[KinematicBin],
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    let operation = "mean_series";
    let mut output = check_lengths(operation, inputs.len(), kinematic_bins, diagnostics)?;

    if let Some(first) = inputs.first() {
        if let Some(i) = inputs.iter().position(|s| !s.is_compatible(first)) {
            return Err(report_error(
                diagnostics,
                ReasonCode::BinningMismatch,
                operation,
                Error::binning_mismatch(operation, format!("input {i} differs in binning from input 0")),
            ));
        }
    }

    for (i, (series, kinematic_bin)) in inputs.iter().zip(kinematic_bins).enumerate() {
        let bin = Bin::new(series.mean(), series.std_dev());
        place(&mut output, i, kinematic_bin, bin, operation, diagnostics)?;
    }
    Ok(output)
}
