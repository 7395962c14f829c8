//! Range-aware statistics of binned series
//!
//! All moments are computed from bin centers weighted by bin contents, over
//! the evaluation range only. Flow bins never contribute.

use crate::types::BinnedSeries;

/// Weighted statistics of a binned distribution
pub trait SeriesStatistics {
    /// Sum of contents in the evaluation range
    fn integral(&self) -> f64;

    /// Content-weighted mean of bin centers; 0 for zero integral
    fn mean(&self) -> f64;

    /// Content-weighted standard deviation of bin centers
    fn std_dev(&self) -> f64;

    /// Effective number of entries `(Σw)² / Σe²`
    ///
    /// Falls back to `Σw` when every error in range is zero.
    fn effective_entries(&self) -> f64;

    /// Statistical uncertainty of the mean, `σ / sqrt(n_eff)`
    fn mean_error(&self) -> f64 {
        let n_eff = self.effective_entries();
        if n_eff > 0.0 {
            self.std_dev() / n_eff.sqrt()
        } else {
            0.0
        }
    }

    /// Statistical uncertainty of the standard deviation, `σ / sqrt(2 n_eff)`
    fn std_dev_error(&self) -> f64 {
        let n_eff = self.effective_entries();
        if n_eff > 0.0 {
            self.std_dev() / (2.0 * n_eff).sqrt()
        } else {
            0.0
        }
    }

    /// Largest content in the evaluation range
    fn maximum(&self) -> f64;
}

impl SeriesStatistics for BinnedSeries {
    fn integral(&self) -> f64 {
        self.active_bins().map(|(_, _, b)| b.content).sum()
    }

    fn mean(&self) -> f64 {
        let (sum_w, sum_wx) = self
            .active_bins()
            .fold((0.0, 0.0), |(w, wx), (_, x, b)| (w + b.content, wx + b.content * x));
        if sum_w == 0.0 {
            0.0
        } else {
            sum_wx / sum_w
        }
    }

    fn std_dev(&self) -> f64 {
        let (sum_w, sum_wx, sum_wx2) = self.active_bins().fold(
            (0.0, 0.0, 0.0),
            |(w, wx, wx2), (_, x, b)| (w + b.content, wx + b.content * x, wx2 + b.content * x * x),
        );
        if sum_w == 0.0 {
            return 0.0;
        }
        let mean = sum_wx / sum_w;
        let variance = sum_wx2 / sum_w - mean * mean;
        // Rounding can push a single-bin variance slightly below zero
        variance.max(0.0).sqrt()
    }

    fn effective_entries(&self) -> f64 {
        let (sum_w, sum_e2) = self
            .active_bins()
            .fold((0.0, 0.0), |(w, e2), (_, _, b)| (w + b.content, e2 + b.error * b.error));
        if sum_e2 > 0.0 {
            sum_w * sum_w / sum_e2
        } else {
            sum_w
        }
    }

    fn maximum(&self) -> f64 {
        self.active_bins()
            .map(|(_, _, b)| b.content)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bin;
    use approx::assert_relative_eq;

    #[test]
    fn test_moments() {
        let s = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 1.0]).unwrap();
        assert_relative_eq!(s.integral(), 4.0);
        assert_relative_eq!(s.mean(), 1.5);
        // Var = (1*1 + 2*0 + 1*1)/4
        assert_relative_eq!(s.std_dev(), 0.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.maximum(), 2.0);
    }

    #[test]
    fn test_effective_entries() {
        // Poisson errors: n_eff equals the integral
        let s = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0], &[16.0, 9.0]).unwrap();
        assert_relative_eq!(s.effective_entries(), 25.0, epsilon = 1e-12);

        // Weighted: (Σw)²/Σe²
        let w = BinnedSeries::with_errors(vec![0.0, 1.0, 2.0], &[4.0, 4.0], &[2.0, 2.0]).unwrap();
        assert_relative_eq!(w.effective_entries(), 8.0, epsilon = 1e-12);

        // All errors zero falls back to the sum of contents
        let z = BinnedSeries::with_errors(vec![0.0, 1.0, 2.0], &[3.0, 4.0], &[0.0, 0.0]).unwrap();
        assert_relative_eq!(z.effective_entries(), 7.0);
    }

    #[test]
    fn test_range_restricts_statistics() {
        let mut s =
            BinnedSeries::from_contents(vec![0.0, 1.0, 2.0, 3.0, 4.0], &[100.0, 1.0, 1.0, 100.0])
                .unwrap();
        s.set_range(1, 2).unwrap();
        assert_relative_eq!(s.integral(), 2.0);
        assert_relative_eq!(s.mean(), 2.0);
        assert_relative_eq!(s.std_dev(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_flow_bins_ignored() {
        let mut s = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0], &[1.0, 1.0]).unwrap();
        s.set_underflow(Bin::new(50.0, 7.0));
        s.set_overflow(Bin::new(50.0, 7.0));
        assert_relative_eq!(s.integral(), 2.0);
        assert_relative_eq!(s.mean(), 1.0);
    }

    #[test]
    fn test_empty_series() {
        let s = BinnedSeries::zeros(vec![0.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.integral(), 0.0);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.std_dev(), 0.0);
        assert_eq!(s.std_dev_error(), 0.0);
        assert_eq!(s.mean_error(), 0.0);
    }

    #[test]
    fn test_std_dev_error() {
        let s = BinnedSeries::from_contents(vec![0.0, 1.0, 2.0, 3.0], &[50.0, 100.0, 50.0]).unwrap();
        let expected = s.std_dev() / (2.0 * 200.0f64).sqrt();
        assert_relative_eq!(s.std_dev_error(), expected, epsilon = 1e-12);
        assert_relative_eq!(s.mean_error(), s.std_dev() / 200.0f64.sqrt(), epsilon = 1e-12);
    }
}
