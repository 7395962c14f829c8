//! Bin-edge construction helpers

use jer_core::{Error, Result};

/// A kinematic bin `(lower, upper)`
pub type KinematicBin = (f64, f64);

/// `n` equal-width bins over `[low, high]`
pub fn uniform_edges(n: usize, low: f64, high: f64) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(Error::InvalidParameter(
            "number of bins must be positive".to_string(),
        ));
    }
    if !(low < high) || !low.is_finite() || !high.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "invalid axis limits [{low}, {high}]"
        )));
    }
    let step = (high - low) / n as f64;
    let mut edges: Vec<f64> = (0..n).map(|i| low + i as f64 * step).collect();
    edges.push(high);
    Ok(edges)
}

/// Output edges for a set of kinematic bins: the smallest lower edge followed
/// by the sorted upper edges
pub fn edges_from_kinematic_bins(bins: &[KinematicBin]) -> Result<Vec<f64>> {
    if bins.is_empty() {
        return Err(Error::empty_input("kinematic bins"));
    }
    let lowest = bins.iter().map(|b| b.0).fold(f64::INFINITY, f64::min);
    let mut uppers: Vec<f64> = bins.iter().map(|b| b.1).collect();
    uppers.sort_by(f64::total_cmp);

    let mut edges = Vec::with_capacity(bins.len() + 1);
    edges.push(lowest);
    edges.extend(uppers);
    crate::types::validate_edges(&edges, "kinematic")?;
    Ok(edges)
}

/// Center of a kinematic bin
pub fn kinematic_center(bin: &KinematicBin) -> f64 {
    0.5 * (bin.0 + bin.1)
}
