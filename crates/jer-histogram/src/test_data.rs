//! Seeded synthetic series for tests and benchmarks
//!
//! Every generator is deterministic for a given seed so tests can assert on
//! fitted widths without flakiness.

use crate::points::{Point, PointSeries};
use crate::types::{Bin, BinnedSeries};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Normal};

/// Standard synthetic inputs for the JER estimators
pub struct SyntheticSeries;

impl SyntheticSeries {
    /// Fill `n_events` samples into `n_bins` equal bins over `[low, high]`
    ///
    /// Samples outside the axis go to the flow bins. Errors are Poisson.
    pub fn fill<D: Distribution<f64>>(
        distribution: D,
        n_events: usize,
        n_bins: usize,
        low: f64,
        high: f64,
        seed: u64,
    ) -> BinnedSeries {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut series = BinnedSeries::uniform(n_bins, low, high).unwrap();
        let mut counts = vec![0.0; n_bins];
        let (mut under, mut over) = (0.0, 0.0);
        for _ in 0..n_events {
            let x = distribution.sample(&mut rng);
            if x < low {
                under += 1.0;
            } else if x > high {
                over += 1.0;
            } else if let Some(i) = series.find_bin(x) {
                counts[i] += 1.0;
            }
        }
        for (bin, c) in series.bins_mut().iter_mut().zip(counts) {
            *bin = Bin::new(c, f64::sqrt(c));
        }
        series.set_underflow(Bin::new(under, under.sqrt()));
        series.set_overflow(Bin::new(over, over.sqrt()));
        series
    }

    /// Balance-like response: Gaussian around `mean` with width `sigma`,
    /// 100 bins over `[0, 2]`
    pub fn gaussian(n_events: usize, mean: f64, sigma: f64, seed: u64) -> BinnedSeries {
        Self::fill(Normal::new(mean, sigma).unwrap(), n_events, 100, 0.0, 2.0, seed)
    }

    /// Log-normal response with shape `sigma` and scale `m`, 100 bins over `[0, 2]`
    pub fn log_normal(n_events: usize, sigma: f64, m: f64, seed: u64) -> BinnedSeries {
        Self::fill(LogNormal::new(m.ln(), sigma).unwrap(), n_events, 100, 0.0, 2.0, seed)
    }

    /// Gaussian core with a 10% component three times as wide
    pub fn gaussian_with_tails(n_events: usize, mean: f64, sigma: f64, seed: u64) -> BinnedSeries {
        let core = Self::gaussian(n_events * 9 / 10, mean, sigma, seed);
        let tails = Self::gaussian(n_events / 10, mean, 3.0 * sigma, seed.wrapping_add(1));
        let mut out = core.clone();
        for (bin, (c, t)) in out
            .bins_mut()
            .iter_mut()
            .zip(core.bins().iter().zip(tails.bins()))
        {
            let n = c.content + t.content;
            *bin = Bin::new(n, n.sqrt());
        }
        out
    }

    /// Width measured at several alpha values along `width = intercept + slope * alpha`
    ///
    /// Each bin of the returned series is one alpha bin `[a_lo, a_hi]`; content
    /// is the line at the bin center smeared by `noise` (0 for an exact line),
    /// error is `error`.
    pub fn alpha_scan(
        alpha_edges: &[f64],
        intercept: f64,
        slope: f64,
        error: f64,
        noise: f64,
        seed: u64,
    ) -> BinnedSeries {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut series = BinnedSeries::zeros(alpha_edges.to_vec()).unwrap();
        let centers = series.centers();
        for (bin, x) in series.bins_mut().iter_mut().zip(centers) {
            let smear = if noise > 0.0 {
                Normal::new(0.0, noise).unwrap().sample(&mut rng)
            } else {
                0.0
            };
            *bin = Bin::new(intercept + slope * x + smear, error);
        }
        series
    }

    /// Points on `y = intercept + slope * x` with constant y-error
    pub fn line_points(xs: &[f64], intercept: f64, slope: f64, y_err: f64) -> PointSeries {
        PointSeries::new(
            xs.iter()
                .map(|&x| Point::new(x, intercept + slope * x, 0.0, y_err))
                .collect(),
        )
    }
}
