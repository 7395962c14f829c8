//! Pull between two compatible series

use jer_core::{report_error, DiagnosticHandler, Error, ReasonCode, Result};
use jer_histogram::{Bin, BinnedSeries, BinnedSeries2D};

/// `|a - b| / sqrt(|e_a² + e_b²|)`, zero when the denominator vanishes
fn pull_bin(a: &Bin, b: &Bin) -> Bin {
    let denominator = (a.error * a.error + b.error * b.error).abs().sqrt();
    if denominator == 0.0 {
        Bin::zero()
    } else {
        Bin::new((a.content - b.content).abs() / denominator, 0.0)
    }
}

/// Bin-wise pull of two series with identical edges
///
/// Output bins carry zero error. Different edges are a
/// [`Error::BinningMismatch`].
pub fn pull(a: &BinnedSeries, b: &BinnedSeries, diagnostics: &dyn DiagnosticHandler) -> Result<BinnedSeries> {
    if !a.is_compatible(b) {
        return Err(report_error(
            diagnostics,
            ReasonCode::BinningMismatch,
            "pull",
            Error::binning_mismatch("pull", "inputs do not share bin edges"),
        ));
    }
    let bins = a.bins().iter().zip(b.bins()).map(|(x, y)| pull_bin(x, y)).collect();
    BinnedSeries::new(a.edges().to_vec(), bins)
}

/// Bin-wise pull of two 2-D series with the same number of bins per axis
///
/// The output takes the edges of `a`.
pub fn pull_2d(
    a: &BinnedSeries2D,
    b: &BinnedSeries2D,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries2D> {
    if a.shape() != b.shape() {
        return Err(report_error(
            diagnostics,
            ReasonCode::BinningMismatch,
            "pull_2d",
            Error::binning_mismatch(
                "pull_2d",
                format!("shapes {:?} and {:?} differ", a.shape(), b.shape()),
            ),
        ));
    }
    let bins = a.bins().iter().zip(b.bins()).map(|(x, y)| pull_bin(x, y)).collect();
    BinnedSeries2D::new(a.x_edges().to_vec(), a.y_edges().to_vec(), bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use jer_core::{CollectingHandler, NullHandler};

    #[test]
    fn test_pull_values() {
        let a = BinnedSeries::with_errors(vec![0.0, 1.0, 2.0, 3.0], &[5.0, 1.0, 2.0], &[3.0, 0.0, 0.1]).unwrap();
        let b = BinnedSeries::with_errors(vec![0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 2.0], &[4.0, 0.0, 0.1]).unwrap();
        let p = pull(&a, &b, &NullHandler).unwrap();
        assert_relative_eq!(p.bins()[0].content, 0.8);
        assert!(p.bins()[1].is_zero());
        assert_eq!(p.bins()[2].content, 0.0);
        assert!(p.errors().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_self_pull_is_zero() {
        let a = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0], &[9.0, 16.0]).unwrap();
        let p = pull(&a, &a, &NullHandler).unwrap();
        assert!(p.contents().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_mismatch_is_an_error() {
        let handler = CollectingHandler::new();
        let a = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0], &[9.0, 16.0]).unwrap();
        let b = BinnedSeries::from_contents(vec![0.0, 1.0, 3.0], &[9.0, 16.0]).unwrap();
        assert!(pull(&a, &b, &handler).unwrap_err().is_mismatch());
        assert!(handler.contains(ReasonCode::BinningMismatch));
    }

    #[test]
    fn test_pull_2d_checks_shape_only() {
        let mut a = BinnedSeries2D::zeros(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]).unwrap();
        let mut b = BinnedSeries2D::zeros(vec![10.0, 11.0, 12.0], vec![5.0, 6.0]).unwrap();
        a.set_bin(1, 0, Bin::new(3.0, 0.6)).unwrap();
        b.set_bin(1, 0, Bin::new(1.0, 0.8)).unwrap();
        let p = pull_2d(&a, &b, &NullHandler).unwrap();
        assert_eq!(p.x_edges(), a.x_edges());
        assert_relative_eq!(p.bin(1, 0).unwrap().content, 2.0);

        let c = BinnedSeries2D::zeros(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert!(pull_2d(&a, &c, &NullHandler).is_err());
    }
}
