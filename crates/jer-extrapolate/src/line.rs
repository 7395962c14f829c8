//! Straight-line fits of a single series along the alpha axis

use jer_core::{report, Diagnostic, DiagnosticHandler, ReasonCode};
use jer_fit::LinearFit;
use jer_histogram::Series;
use tracing::debug;

/// Minimum number of non-zero samples a line is fitted to
pub const MIN_NONZERO_SAMPLES: usize = 3;

/// Samples of `input` inside `[min, max]` as `(x, y, y_err)`
///
/// Binned inputs contribute bins of their evaluation range whose center lies
/// in the interval, skipping empty bins. Point inputs contribute points whose
/// x lies in the interval; asymmetric y-errors are averaged.
pub fn fit_samples(input: &Series, (min, max): (f64, f64)) -> Vec<(f64, f64, f64)> {
    let inside = |x: f64| x >= min && x <= max;
    match input {
        Series::Binned(s) => s
            .active_bins()
            .filter(|(_, x, bin)| inside(*x) && !bin.is_zero())
            .map(|(_, x, bin)| (x, bin.content, bin.error))
            .collect(),
        Series::Points(s) => s
            .points
            .iter()
            .filter(|p| inside(p.x))
            .map(|p| (p.x, p.y, p.y_err))
            .collect(),
        Series::AsymmetricPoints(s) => s
            .points
            .iter()
            .filter(|p| inside(p.x))
            .map(|p| (p.x, p.y, 0.5 * (p.y_err_low + p.y_err_high)))
            .collect(),
    }
}

/// Fit `y = slope * x + intercept` to `input` over `fit_range`
///
/// Returns `None` after reporting a diagnostic when fewer than
/// [`MIN_NONZERO_SAMPLES`] samples have a non-zero y or when the fit fails.
/// `bin` tags the diagnostics with the kinematic bin being processed.
pub fn fit_line(
    input: &Series,
    fit_range: (f64, f64),
    operation: &str,
    bin: Option<usize>,
    diagnostics: &dyn DiagnosticHandler,
) -> Option<LinearFit> {
    let tag = |d: Diagnostic| match bin {
        Some(i) => d.at_bin(i),
        None => d,
    };

    let samples = fit_samples(input, fit_range);
    let nonzero = samples.iter().filter(|s| s.1 != 0.0).count();
    if nonzero < MIN_NONZERO_SAMPLES {
        report(
            diagnostics,
            tag(Diagnostic::warning(
                ReasonCode::LowStatistics,
                operation,
                format!("Only {nonzero} non-zero points in fit range, skipping fit"),
            )),
        );
        return None;
    }

    let (x, (y, sigma)): (Vec<f64>, (Vec<f64>, Vec<f64>)) =
        samples.into_iter().map(|(x, y, e)| (x, (y, e))).unzip();
    match LinearFit::fit(&x, &y, &sigma) {
        Ok(fit) => {
            debug!(
                operation,
                ?bin,
                intercept = fit.intercept,
                slope = fit.slope,
                chi2 = fit.chi_square,
                ndf = fit.ndf,
                "Linear fit"
            );
            Some(fit)
        }
        Err(e) => {
            report(
                diagnostics,
                tag(Diagnostic::warning(ReasonCode::FitNonConvergence, operation, e.to_string())),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use jer_core::{CollectingHandler, NullHandler};
    use jer_histogram::test_data::SyntheticSeries;
    use jer_histogram::{AsymmetricPoint, AsymmetricPointSeries, Bin, BinnedSeries};

    #[test]
    fn test_binned_sample_selection() {
        let mut s = SyntheticSeries::alpha_scan(&[0.0, 0.1, 0.2, 0.3, 0.4], 0.1, 0.5, 0.01, 0.0, 0);
        s.set_bin(1, Bin::zero()).unwrap();
        let samples = fit_samples(&Series::Binned(s), (0.0, 0.3));
        let xs: Vec<f64> = samples.iter().map(|s| s.0).collect();
        assert_eq!(xs.len(), 2);
        assert_relative_eq!(xs[0], 0.05);
        assert_relative_eq!(xs[1], 0.25);
    }

    #[test]
    fn test_asymmetric_errors_averaged() {
        let s = Series::AsymmetricPoints(AsymmetricPointSeries::new(vec![AsymmetricPoint::new(
            0.1, 1.0, 0.0, 0.0, 0.1, 0.3,
        )]));
        assert_relative_eq!(fit_samples(&s, (0.0, 1.0))[0].2, 0.2);
    }

    #[test]
    fn test_exact_line() {
        let s = SyntheticSeries::line_points(&[0.1, 0.15, 0.2, 0.25], 0.08, 0.3, 0.0);
        let fit = fit_line(&Series::Points(s), (0.0, 0.3), "test", None, &NullHandler).unwrap();
        assert_relative_eq!(fit.intercept, 0.08, epsilon = 1e-12);
        assert!(fit.intercept_error < 1e-9);
    }

    #[test]
    fn test_gate_on_nonzero_points() {
        let s = BinnedSeries::with_errors(vec![0.0, 0.1, 0.2, 0.3], &[0.1, 0.0, 0.12], &[0.01, 0.01, 0.01])
            .unwrap();
        let handler = CollectingHandler::new();
        assert!(fit_line(&Series::Binned(s), (0.0, 0.3), "test", Some(4), &handler).is_none());
        let reported = handler.snapshot();
        assert_eq!(reported[0].reason, ReasonCode::LowStatistics);
        assert_eq!(reported[0].bin, Some(4));
    }
}
