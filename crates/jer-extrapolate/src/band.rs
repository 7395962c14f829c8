//! Confidence band of a fitted line

use crate::line::fit_line;
use jer_core::{report, Diagnostic, DiagnosticHandler, Error, ReasonCode, Result};
use jer_histogram::{Point, PointSeries};

/// Sampled confidence band of the line fitted to `input` over `[fit_x_min, fit_x_max]`
///
/// Point `i` sits at `fit_x_min + i * (fit_x_max - fit_x_min) / n_points`
/// with the fitted value as y and the Student-t half-width at `level` as
/// y-error. A skipped or failed fit yields the same x values with zero y and
/// errors.
pub fn confidence_band(
    input: &jer_histogram::Series,
    fit_x_min: f64,
    fit_x_max: f64,
    n_points: usize,
    level: f64,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<PointSeries> {
    if n_points == 0 {
        return Err(Error::InvalidParameter(
            "confidence band needs at least one point".to_string(),
        ));
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "confidence level must be in (0, 1), got {level}"
        )));
    }

    let operation = "confidence_band";
    let step = (fit_x_max - fit_x_min) / n_points as f64;
    let xs: Vec<f64> = (0..n_points).map(|i| fit_x_min + i as f64 * step).collect();
    let zero_band = |xs: &[f64]| PointSeries::new(xs.iter().map(|&x| Point::new(x, 0.0, 0.0, 0.0)).collect());

    let Some(fit) = fit_line(input, (fit_x_min, fit_x_max), operation, None, diagnostics) else {
        return Ok(zero_band(&xs));
    };

    let mut points = Vec::with_capacity(n_points);
    for &x in &xs {
        match fit.confidence_half_width(x, level) {
            Ok(half_width) => points.push(Point::new(x, fit.value_at(x), 0.0, half_width)),
            Err(e) => {
                report(
                    diagnostics,
                    Diagnostic::warning(ReasonCode::FitNonConvergence, operation, e.to_string()),
                );
                return Ok(zero_band(&xs));
            }
        }
    }
    Ok(PointSeries::new(points))
}
