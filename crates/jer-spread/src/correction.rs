//! Correction of truncated RMS values back to the full Gaussian width
//!
//! The RMS of a Gaussian truncated symmetrically at `±k σ` underestimates
//! `σ`. For a retained fraction `f` the truncation points follow from
//! `k = sqrt(2) · erf⁻¹(f)` and the ratio of truncated to full width is the
//! standard deviation of the truncated standard normal.

use jer_core::math::{distributions::normal, erf_inv};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a truncated RMS is corrected for the removed tails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// Analytic truncated-Gaussian factor
    #[default]
    Formula,
    /// No correction
    Disabled,
    /// Gaussian refit of the core, not available
    GaussianRefit,
}

impl fmt::Display for CorrectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorrectionMode::Formula => "formula",
            CorrectionMode::Disabled => "disabled",
            CorrectionMode::GaussianRefit => "gaussian_refit",
        };
        f.write_str(name)
    }
}

/// Ratio of truncated to full Gaussian width for a retained percentage
///
/// Exactly 100 gives 1. Returns `None` when the factor is undefined
/// (zero normalisation or a non-finite result).
///
/// # Example
///
/// ```rust
/// use jer_spread::truncation_correction;
///
/// let c = truncation_correction(98.5).unwrap();
/// assert!((c - 0.9477).abs() < 1e-3);
/// assert_eq!(truncation_correction(100.0), Some(1.0));
/// ```
pub fn truncation_correction(fraction_percent: f64) -> Option<f64> {
    if fraction_percent == 100.0 {
        return Some(1.0);
    }
    if !fraction_percent.is_finite() {
        return None;
    }

    let alpha = -std::f64::consts::SQRT_2 * erf_inv(fraction_percent / 100.0);
    let beta = -alpha;
    let z = normal::cdf(beta) - normal::cdf(alpha);
    if z == 0.0 || !z.is_finite() {
        return None;
    }

    let (phi_a, phi_b) = (normal::pdf(alpha), normal::pdf(beta));
    let variance = 1.0 + (alpha * phi_a - beta * phi_b) / z - ((phi_a - phi_b) / z).powi(2);
    let c = variance.sqrt();
    (c.is_finite() && c > 0.0).then_some(c)
}
