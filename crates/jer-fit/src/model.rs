//! Model functions for chi-square fits

use std::f64::consts::PI;

/// A parametric model `f(x; p)`
pub trait Model: Send + Sync {
    /// Model name for diagnostics
    fn name(&self) -> &'static str;

    /// Number of parameters
    fn n_params(&self) -> usize;

    /// Evaluate the model at `x`
    fn value(&self, x: f64, params: &[f64]) -> f64;

    /// Partial derivatives with respect to each parameter, written to `out`
    ///
    /// The default uses central differences.
    fn gradient(&self, x: f64, params: &[f64], out: &mut [f64]) {
        let mut p = params.to_vec();
        for (j, slot) in out.iter_mut().enumerate().take(params.len()) {
            let h = 1e-7 * params[j].abs().max(1e-7);
            p[j] = params[j] + h;
            let up = self.value(x, &p);
            p[j] = params[j] - h;
            let down = self.value(x, &p);
            p[j] = params[j];
            *slot = (up - down) / (2.0 * h);
        }
    }
}

/// `A * exp(-0.5 * ((x - mu) / sigma)²)`, parameters `[A, mu, sigma]`
#[derive(Debug, Clone, Copy, Default)]
pub struct Gaussian;

impl Model for Gaussian {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn n_params(&self) -> usize {
        3
    }

    fn value(&self, x: f64, p: &[f64]) -> f64 {
        if p[2] == 0.0 {
            return 0.0;
        }
        let z = (x - p[1]) / p[2];
        p[0] * (-0.5 * z * z).exp()
    }

    fn gradient(&self, x: f64, p: &[f64], out: &mut [f64]) {
        if p[2] == 0.0 {
            out[..3].fill(0.0);
            return;
        }
        let d = x - p[1];
        let s2 = p[2] * p[2];
        let e = (-0.5 * d * d / s2).exp();
        out[0] = e;
        out[1] = p[0] * e * d / s2;
        out[2] = p[0] * e * d * d / (s2 * p[2]);
    }
}

/// `A * LogNormal(x; sigma, theta = 0, m)`, parameters `[A, sigma, m]`
///
/// The log-normal density is
/// `exp(-ln(x/m)² / (2 sigma²)) / (x sigma sqrt(2 pi))` for `x > 0`
/// and zero elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNormal;

impl LogNormal {
    /// The unit-amplitude density
    pub fn density(x: f64, sigma: f64, m: f64) -> f64 {
        if x <= 0.0 || sigma <= 0.0 || m <= 0.0 {
            return 0.0;
        }
        let l = (x / m).ln();
        (-l * l / (2.0 * sigma * sigma)).exp() / (x * sigma * (2.0 * PI).sqrt())
    }
}

impl Model for LogNormal {
    fn name(&self) -> &'static str {
        "log_normal"
    }

    fn n_params(&self) -> usize {
        3
    }

    fn value(&self, x: f64, p: &[f64]) -> f64 {
        p[0] * Self::density(x, p[1], p[2])
    }

    fn gradient(&self, x: f64, p: &[f64], out: &mut [f64]) {
        let f = Self::density(x, p[1], p[2]);
        if f == 0.0 {
            out[..3].fill(0.0);
            return;
        }
        let (sigma, m) = (p[1], p[2]);
        let l = (x / m).ln();
        out[0] = f;
        out[1] = p[0] * f * (l * l / (sigma * sigma * sigma) - 1.0 / sigma);
        out[2] = p[0] * f * l / (sigma * sigma * m);
    }
}
