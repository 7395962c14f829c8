//! Levenberg-Marquardt chi-square minimisation
//!
//! Minimises `Σ ((y - f(x; p)) / σ)²` over bounded parameters. Each step solves
//! the damped normal equations `(JᵀJ + λ diag(JᵀJ)) δ = Jᵀr` with a Cholesky
//! factorisation. Parameter errors come from the inverse of `JᵀJ` at the
//! minimum; a singular matrix there marks the fit as not converged.

use crate::model::Model;
use crate::types::{FitData, FitResult, FitSettings, ParameterBounds};
use jer_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Bounded Levenberg-Marquardt fitter
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    settings: FitSettings,
}

impl LevenbergMarquardt {
    pub fn new(settings: FitSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &FitSettings {
        &self.settings
    }

    /// Fit `model` to `data` starting from `start`
    ///
    /// `bounds` is either empty or holds one entry per parameter. Returns an
    /// error only for malformed input; numerical failure is reported through
    /// [`FitResult::converged`].
    pub fn fit(
        &self,
        model: &dyn Model,
        data: &FitData,
        start: &[f64],
        bounds: &[Option<ParameterBounds>],
    ) -> Result<FitResult> {
        let n_params = model.n_params();
        if start.len() != n_params {
            return Err(Error::size_mismatch(n_params, start.len(), "start parameters"));
        }
        if !bounds.is_empty() && bounds.len() != n_params {
            return Err(Error::size_mismatch(n_params, bounds.len(), "parameter bounds"));
        }
        if data.len() < n_params {
            return Err(Error::InsufficientData {
                expected: n_params,
                actual: data.len(),
            });
        }
        if data.sigma.iter().any(|&s| !(s > 0.0)) {
            return Err(Error::InvalidInput(
                "fit uncertainties must be positive".to_string(),
            ));
        }

        let clamp = |p: &mut [f64]| {
            for (value, bound) in p.iter_mut().zip(bounds) {
                if let Some(b) = bound {
                    *value = b.clamp(*value);
                }
            }
        };

        let mut params = start.to_vec();
        clamp(params.as_mut_slice());
        let mut chi2 = chi_square(model, data, &params);
        if !chi2.is_finite() {
            return Err(Error::non_finite("chi-square at start parameters"));
        }

        let mut lambda = self.settings.initial_lambda;
        let mut converged = false;
        let mut iterations = 0;

        'outer: while iterations < self.settings.max_iterations {
            let (jtj, jtr) = normal_equations(model, data, &params);

            loop {
                iterations += 1;
                let mut damped = jtj.clone();
                for j in 0..n_params {
                    damped[(j, j)] += lambda * jtj[(j, j)].max(1e-12);
                }

                let step = match damped.cholesky() {
                    Some(chol) => chol.solve(&jtr),
                    None => {
                        lambda *= 10.0;
                        if lambda > self.settings.max_lambda {
                            break 'outer;
                        }
                        continue;
                    }
                };

                let mut trial: Vec<f64> = params.iter().zip(step.iter()).map(|(p, d)| p + d).collect();
                clamp(trial.as_mut_slice());
                let trial_chi2 = chi_square(model, data, &trial);

                if trial_chi2.is_finite() && trial_chi2 <= chi2 {
                    let improvement = chi2 - trial_chi2;
                    params = trial;
                    chi2 = trial_chi2;
                    lambda = (lambda / 10.0).max(1e-15);
                    if improvement <= self.settings.tolerance * (chi2 + self.settings.tolerance) {
                        converged = true;
                        break 'outer;
                    }
                    break;
                }

                lambda *= 10.0;
                if lambda > self.settings.max_lambda {
                    // No downhill step left at any damping: this is the minimum
                    converged = true;
                    break 'outer;
                }
                if iterations >= self.settings.max_iterations {
                    break 'outer;
                }
            }
        }

        let (jtj, _) = normal_equations(model, data, &params);
        let (covariance, errors) = match jtj.try_inverse() {
            Some(cov) => {
                let errors: Vec<f64> = (0..n_params).map(|j| cov[(j, j)].max(0.0).sqrt()).collect();
                let rows = (0..n_params)
                    .map(|i| (0..n_params).map(|j| cov[(i, j)]).collect())
                    .collect();
                (rows, errors)
            }
            None => {
                converged = false;
                (vec![vec![0.0; n_params]; n_params], vec![0.0; n_params])
            }
        };

        debug!(
            model = model.name(),
            iterations,
            chi2,
            converged,
            "Levenberg-Marquardt fit finished"
        );

        Ok(FitResult {
            parameters: params,
            errors,
            covariance,
            chi_square: chi2,
            ndf: data.len() - n_params,
            iterations,
            converged,
        })
    }
}

fn chi_square(model: &dyn Model, data: &FitData, params: &[f64]) -> f64 {
    data.x
        .iter()
        .zip(&data.y)
        .zip(&data.sigma)
        .map(|((&x, &y), &s)| {
            let r = (y - model.value(x, params)) / s;
            r * r
        })
        .sum()
}

/// `JᵀJ` and `Jᵀr` for residuals `r = (y - f) / σ`
fn normal_equations(model: &dyn Model, data: &FitData, params: &[f64]) -> (DMatrix<f64>, DVector<f64>) {
    let n_params = params.len();
    let mut jtj = DMatrix::zeros(n_params, n_params);
    let mut jtr = DVector::zeros(n_params);
    let mut grad = vec![0.0; n_params];

    for ((&x, &y), &s) in data.x.iter().zip(&data.y).zip(&data.sigma) {
        model.gradient(x, params, &mut grad);
        let r = (y - model.value(x, params)) / s;
        for i in 0..n_params {
            let gi = grad[i] / s;
            jtr[i] += gi * r;
            for j in 0..=i {
                jtj[(i, j)] += gi * grad[j] / s;
            }
        }
    }
    for i in 0..n_params {
        for j in 0..i {
            jtj[(j, i)] = jtj[(i, j)];
        }
    }
    (jtj, jtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gaussian, LogNormal};
    use approx::assert_relative_eq;

    fn gaussian_data(a: f64, mu: f64, sigma: f64) -> FitData {
        let x: Vec<f64> = (0..60).map(|i| 0.5 + i as f64 * 0.02).collect();
        let y: Vec<f64> = x.iter().map(|&x| Gaussian.value(x, &[a, mu, sigma])).collect();
        let s = vec![1.0; x.len()];
        FitData::new(x, y, s).unwrap()
    }

    #[test]
    fn test_recovers_exact_gaussian() {
        let data = gaussian_data(100.0, 1.0, 0.12);
        let fitter = LevenbergMarquardt::default();
        let result = fitter.fit(&Gaussian, &data, &[80.0, 0.95, 0.2], &[]).unwrap();
        assert!(result.is_valid());
        assert_relative_eq!(result.parameters[0], 100.0, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-8);
        assert_relative_eq!(result.parameters[2].abs(), 0.12, epsilon = 1e-8);
        assert!(result.chi_square < 1e-12);
        assert_eq!(result.ndf, 57);
    }

    #[test]
    fn test_bounds_are_respected() {
        let data = gaussian_data(100.0, 1.0, 0.12);
        let bounds = [None, None, Some(ParameterBounds::new(0.2, 0.5).unwrap())];
        let result = LevenbergMarquardt::default()
            .fit(&Gaussian, &data, &[100.0, 1.0, 0.3], &bounds)
            .unwrap();
        assert!(result.parameters[2] >= 0.2 && result.parameters[2] <= 0.5);
    }

    #[test]
    fn test_recovers_log_normal() {
        let truth = [50.0, 0.15, 0.95];
        let x: Vec<f64> = (1..100).map(|i| i as f64 * 0.02).collect();
        let y: Vec<f64> = x.iter().map(|&x| LogNormal.value(x, &truth)).collect();
        let data = FitData::new(x.clone(), y, vec![1.0; x.len()]).unwrap();
        let bounds = [
            None,
            Some(ParameterBounds::new(1e-4, 1.0).unwrap()),
            Some(ParameterBounds::new(1e-4, 2.0).unwrap()),
        ];
        let result = LevenbergMarquardt::default()
            .fit(&LogNormal, &data, &[40.0, 0.1, 1.0], &bounds)
            .unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.parameters[1], 0.15, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[2], 0.95, epsilon = 1e-6);
    }

    #[test]
    fn test_malformed_input() {
        let data = gaussian_data(1.0, 1.0, 0.1);
        let fitter = LevenbergMarquardt::default();
        assert!(fitter.fit(&Gaussian, &data, &[1.0, 1.0], &[]).is_err());
        assert!(fitter.fit(&Gaussian, &data, &[1.0, 1.0, 0.1], &[None]).is_err());

        let tiny = FitData::new(vec![1.0, 2.0], vec![1.0, 1.0], vec![1.0, 1.0]).unwrap();
        assert!(matches!(
            fitter.fit(&Gaussian, &tiny, &[1.0, 1.0, 0.1], &[]),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_degenerate_problem_is_not_converged() {
        // All samples at one x: width and mean are not identifiable
        let data = FitData::new(vec![1.0; 5], vec![2.0; 5], vec![1.0; 5]).unwrap();
        let result = LevenbergMarquardt::default()
            .fit(&Gaussian, &data, &[2.0, 1.0, 0.1], &[])
            .unwrap();
        assert!(!result.converged);
    }
}
