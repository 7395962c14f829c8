//! Mathematical utilities for JER extraction
//!
//! Standard-normal density, distribution function and the inverse error
//! function needed by the truncation correction. The special functions are
//! taken from `statrs`; this module only fixes the conventions used across the
//! workspace.

/// Distribution-related mathematical functions
pub mod distributions {
    /// Standard normal distribution utilities
    pub mod normal {
        use std::f64::consts::{PI, SQRT_2};

        /// Standard normal probability density φ(x)
        pub fn pdf(x: f64) -> f64 {
            (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
        }

        /// Standard normal cumulative distribution Φ(x)
        pub fn cdf(x: f64) -> f64 {
            0.5 * (1.0 + statrs::function::erf::erf(x / SQRT_2))
        }

    }
}

/// Error function
pub fn erf(x: f64) -> f64 {
    statrs::function::erf::erf(x)
}

/// Inverse error function on (-1, 1); ±1 map to ±∞
pub fn erf_inv(x: f64) -> f64 {
    if x >= 1.0 {
        return f64::INFINITY;
    }
    if x <= -1.0 {
        return f64::NEG_INFINITY;
    }
    statrs::function::erf::erf_inv(x)
}
