//! Straight-line least-squares fits
//!
//! `y = intercept + slope * x`, solved in closed form from the normal
//! equations. When any sample carries a positive uncertainty, only those
//! samples are used, weighted by `1/σ²`, and the covariance is `(XᵀWX)⁻¹`.
//! Without uncertainties every sample gets unit weight and the covariance is
//! scaled by `χ²/ndf`, so an exact line has zero parameter errors.

use jer_core::{Error, Result};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of a straight-line fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub intercept_error: f64,
    pub slope_error: f64,
    /// Reported covariance of `(intercept, slope)`
    pub covariance: [[f64; 2]; 2],
    /// `(XᵀWX)⁻¹` before any `χ²/ndf` scaling
    pub unscaled_covariance: [[f64; 2]; 2],
    pub chi_square: f64,
    pub ndf: usize,
    /// Whether the samples were weighted by their uncertainties
    pub weighted: bool,
}

impl LinearFit {
    /// Fit a line through `(x, y)` with uncertainties `sigma`
    pub fn fit(x: &[f64], y: &[f64], sigma: &[f64]) -> Result<Self> {
        if x.len() != y.len() || x.len() != sigma.len() {
            return Err(Error::InvalidInput(
                "x, y and sigma must have the same length".to_string(),
            ));
        }
        if x.iter().chain(y).chain(sigma).any(|v| !v.is_finite()) {
            return Err(Error::non_finite("linear fit input"));
        }

        let weighted = sigma.iter().any(|&s| s > 0.0);
        let samples: Vec<(f64, f64, f64)> = x
            .iter()
            .zip(y)
            .zip(sigma)
            .filter(|(_, s)| !weighted || **s > 0.0)
            .map(|((&x, &y), &s)| (x, y, if weighted { 1.0 / (s * s) } else { 1.0 }))
            .collect();
        if samples.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: samples.len(),
            });
        }

        let mut xtwx = Matrix2::zeros();
        let mut xtwy = Vector2::zeros();
        for &(x, y, w) in &samples {
            xtwx[(0, 0)] += w;
            xtwx[(0, 1)] += w * x;
            xtwx[(1, 1)] += w * x * x;
            xtwy[0] += w * y;
            xtwy[1] += w * x * y;
        }
        xtwx[(1, 0)] = xtwx[(0, 1)];

        let coeffs = match xtwx.cholesky() {
            Some(chol) => chol.solve(&xtwy),
            None => {
                // Fallback to SVD for rank-deficient cases
                let svd = xtwx.svd(true, true);
                svd.solve(&xtwy, 1e-12)
                    .map_err(|e| Error::Computation(format!("linear fit failed: {e}")))?
            }
        };
        let unscaled = xtwx.try_inverse().ok_or_else(|| {
            Error::Computation("linear fit normal matrix is singular".to_string())
        })?;

        let (intercept, slope) = (coeffs[0], coeffs[1]);
        let chi_square: f64 = samples
            .iter()
            .map(|&(x, y, w)| {
                let r = y - intercept - slope * x;
                w * r * r
            })
            .sum();
        let ndf = samples.len() - 2;

        let scale = if weighted {
            1.0
        } else if ndf > 0 {
            chi_square / ndf as f64
        } else {
            0.0
        };
        let covariance = unscaled * scale;

        Ok(Self {
            intercept,
            slope,
            intercept_error: covariance[(0, 0)].max(0.0).sqrt(),
            slope_error: covariance[(1, 1)].max(0.0).sqrt(),
            covariance: to_array(&covariance),
            unscaled_covariance: to_array(&unscaled),
            chi_square,
            ndf,
            weighted,
        })
    }

    /// Fitted line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Half-width of the confidence interval of the fitted line at `x`
    ///
    /// `sqrt(gᵀ C g) · t · sqrt(χ²/ndf)` with `g = (1, x)`, `C` the unscaled
    /// covariance and `t` the Student-t quantile at `(1 + level)/2` for `ndf`
    /// degrees of freedom.
    pub fn confidence_half_width(&self, x: f64, level: f64) -> Result<f64> {
        if !(level > 0.0 && level < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {level}"
            )));
        }
        if self.ndf == 0 {
            return Err(Error::InsufficientData {
                expected: 3,
                actual: 2,
            });
        }
        let c = &self.unscaled_covariance;
        let variance = c[0][0] + 2.0 * x * c[0][1] + x * x * c[1][1];

        let t_dist = StudentsT::new(0.0, 1.0, self.ndf as f64)
            .map_err(|e| Error::Computation(format!("Failed to create t-distribution: {}", e)))?;
        let t = t_dist.inverse_cdf(0.5 * (1.0 + level));
        let chi_per_dof = (self.chi_square / self.ndf as f64).sqrt();

        Ok(variance.max(0.0).sqrt() * t * chi_per_dof)
    }
}

fn to_array(m: &Matrix2<f64>) -> [[f64; 2]; 2] {
    [[m[(0, 0)], m[(0, 1)]], [m[(1, 0)], m[(1, 1)]]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_exact_line_unweighted() {
        let x = [0.1, 0.15, 0.2, 0.25, 0.3];
        let y: Vec<f64> = x.iter().map(|x| 0.08 + 0.3 * x).collect();
        let fit = LinearFit::fit(&x, &y, &[0.0; 5]).unwrap();
        assert!(!fit.weighted);
        assert_relative_eq!(fit.intercept, 0.08, max_relative = 1e-9);
        assert_relative_eq!(fit.slope, 0.3, max_relative = 1e-9);
        assert!(fit.intercept_error < 1e-9);
        assert_eq!(fit.ndf, 3);
    }

    #[test]
    fn test_weighted_errors() {
        // Two points with unit errors: intercept error from the geometry only
        let fit = LinearFit::fit(&[0.0, 1.0], &[1.0, 2.0], &[1.0, 1.0]).unwrap();
        assert!(fit.weighted);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept_error, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.slope_error, 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_skips_zero_error_samples() {
        let fit = LinearFit::fit(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 100.0], &[0.1, 0.1, 0.1, 0.0])
            .unwrap();
        assert_relative_eq!(fit.slope, 1.0, epsilon = 1e-10);
        assert_eq!(fit.ndf, 1);
    }

    #[test]
    fn test_insufficient_samples() {
        assert!(LinearFit::fit(&[1.0], &[1.0], &[0.1]).is_err());
        assert!(LinearFit::fit(&[1.0, 2.0], &[1.0], &[0.1, 0.1]).is_err());
    }

    #[test]
    fn test_confidence_half_width() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.1, 1.9, 3.2, 3.8];
        let fit = LinearFit::fit(&x, &y, &[0.2; 4]).unwrap();
        let at_center = fit.confidence_half_width(1.5, 0.683).unwrap();
        let at_edge = fit.confidence_half_width(3.0, 0.683).unwrap();
        assert!(at_center > 0.0);
        assert!(at_edge > at_center);
        assert!(fit.confidence_half_width(1.5, 1.5).is_err());

        let exact = LinearFit::fit(&[0.0, 1.0], &[0.0, 1.0], &[0.1, 0.1]).unwrap();
        assert!(exact.confidence_half_width(0.5, 0.683).is_err());
    }

    proptest! {
        #[test]
        fn recovers_any_exact_line(c in -5.0f64..5.0, m in -5.0f64..5.0) {
            let x = [0.05, 0.1, 0.2, 0.3];
            let y: Vec<f64> = x.iter().map(|x| c + m * x).collect();
            let fit = LinearFit::fit(&x, &y, &[0.01; 4]).unwrap();
            prop_assert!((fit.intercept - c).abs() < 1e-8);
            prop_assert!((fit.slope - m).abs() < 1e-8);
        }
    }
}
