//! Division of series, typically data over simulation
//!
//! Point-like inputs are divided point by point, evaluating the denominator
//! at each numerator x. Anything else is divided bin by bin after converting
//! point inputs to binned series.

use crate::types::Combination;
use jer_core::{report, report_error, Diagnostic, DiagnosticHandler, Error, ReasonCode, Result};
use jer_histogram::{AsymmetricPoint, AsymmetricPointSeries, Bin, BinnedSeries, Point, PointSeries, Series};
use tracing::debug;

const OPERATION: &str = "ratio";

/// Uncertainty of `n / d` from uncorrelated errors on both
fn quotient_error(n: f64, e_n: f64, d: f64, e_d: f64) -> f64 {
    ((e_n / d).powi(2) + (n * e_d / (d * d)).powi(2)).sqrt()
}

/// `(x, y, x_err_low, x_err_high, y_err_low, y_err_high)` of a point-like series
fn point_rows(series: &Series) -> Vec<(f64, f64, f64, f64, f64, f64)> {
    match series {
        Series::Points(s) => s
            .points
            .iter()
            .map(|p| (p.x, p.y, p.x_err, p.x_err, p.y_err, p.y_err))
            .collect(),
        Series::AsymmetricPoints(s) => s
            .points
            .iter()
            .map(|p| (p.x, p.y, p.x_err_low, p.x_err_high, p.y_err_low, p.y_err_high))
            .collect(),
        Series::Binned(_) => Vec::new(),
    }
}

fn divide_points(
    numerator: &Series,
    denominator: &Series,
    diagnostics: &dyn DiagnosticHandler,
) -> Combination<Series> {
    let den_rows = point_rows(denominator);
    let mut failed_bins = Vec::new();
    let mut symmetric = Vec::new();
    let mut asymmetric = Vec::new();

    for (i, &(x, n, x_lo, x_hi, e_n_lo, e_n_hi)) in point_rows(numerator).iter().enumerate() {
        let d = denominator.eval(x);
        if d == 0.0 {
            report(
                diagnostics,
                Diagnostic::warning(ReasonCode::ZeroDenominator, OPERATION, format!("Denominator is zero at x = {x}"))
                    .at_bin(i),
            );
            failed_bins.push(i);
            continue;
        }
        // Denominator error is taken at the same point index
        let (e_d_lo, e_d_hi) = den_rows.get(i).map_or((0.0, 0.0), |r| (r.4, r.5));
        let y = n / d;
        match (numerator, denominator) {
            (Series::Points(_), Series::Points(_)) => {
                symmetric.push(Point::new(x, y, x_lo, quotient_error(n, e_n_lo, d, e_d_lo)));
            }
            (Series::AsymmetricPoints(_), Series::AsymmetricPoints(_)) => {
                asymmetric.push(AsymmetricPoint::new(
                    x,
                    y,
                    x_lo,
                    x_hi,
                    quotient_error(n, e_n_lo, d, e_d_lo),
                    quotient_error(n, e_n_hi, d, e_d_hi),
                ));
            }
            _ => symmetric.push(Point::new(x, y, 0.0, 0.0)),
        }
    }

    let output = match (numerator, denominator) {
        (Series::AsymmetricPoints(_), Series::AsymmetricPoints(_)) => {
            Series::AsymmetricPoints(AsymmetricPointSeries::new(asymmetric))
        }
        _ => Series::Points(PointSeries::new(symmetric)),
    };
    Combination::new(output, failed_bins)
}

fn divide_binned(
    numerator: &BinnedSeries,
    denominator: &BinnedSeries,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<Combination<BinnedSeries>> {
    if !numerator.is_compatible(denominator) {
        return Err(report_error(
            diagnostics,
            ReasonCode::BinningMismatch,
            OPERATION,
            Error::binning_mismatch(
                OPERATION,
                format!(
                    "numerator has {} bins, denominator {} bins with different edges",
                    numerator.len(),
                    denominator.len()
                ),
            ),
        ));
    }

    let mut output = numerator.clone();
    output.clear_range();
    output.clear_flow();
    let mut failed_bins = Vec::new();

    for (i, (a, b)) in numerator.bins().iter().zip(denominator.bins()).enumerate() {
        let bin = if b.content == 0.0 {
            report(
                diagnostics,
                Diagnostic::warning(ReasonCode::ZeroDenominator, OPERATION, "Denominator bin is zero").at_bin(i),
            );
            failed_bins.push(i);
            Bin::zero()
        } else {
            let b2 = b.content * b.content;
            let e2 = (a.error * a.error * b2 + b.error * b.error * a.content * a.content) / (b2 * b2);
            Bin::new(a.content / b.content, e2.sqrt())
        };
        output.set_bin(i, bin)?;
    }
    Ok(Combination::new(output, failed_bins))
}

/// Divide `numerator` by `denominator`
///
/// With two point-like inputs the result is point-like: symmetric when both
/// are symmetric, asymmetric when both are asymmetric, and error-free points
/// for a mixed pair. Points where the denominator evaluates to zero are
/// dropped. Otherwise both inputs are binned (converting point inputs) and
/// must share edges; bins with a zero denominator become `(0, 0)`.
pub fn ratio(
    numerator: &Series,
    denominator: &Series,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<Combination<Series>> {
    let result = if numerator.is_point_like() && denominator.is_point_like() {
        divide_points(numerator, denominator, diagnostics)
    } else {
        let num = numerator.to_binned()?;
        let den = denominator.to_binned()?;
        divide_binned(&num, &den, diagnostics)?.map(Series::Binned)
    };

    debug!(
        numerator = numerator.kind(),
        denominator = denominator.kind(),
        failed = result.failed_bins.len(),
        "Ratio computed"
    );
    if !result.is_complete() {
        report(
            diagnostics,
            Diagnostic::warning(
                ReasonCode::ZeroDenominator,
                OPERATION,
                format!(
                    "Division incomplete: {} of {} bins undefined",
                    result.failed_bins.len(),
                    numerator.len()
                ),
            ),
        );
    }
    Ok(result)
}
