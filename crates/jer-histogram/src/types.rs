//! Core types for binned series representation

use jer_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content and uncertainty of a single bin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bin {
    pub content: f64,
    pub error: f64,
}

impl Bin {
    pub fn new(content: f64, error: f64) -> Self {
        Self { content, error }
    }

    /// Empty bin `(0, 0)`
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether both content and error are exactly zero
    pub fn is_zero(&self) -> bool {
        self.content == 0.0 && self.error == 0.0
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} +/- {:.4}", self.content, self.error)
    }
}

/// Validate a bin-edge sequence: at least two finite, strictly increasing values
pub(crate) fn validate_edges(edges: &[f64], axis: &str) -> Result<()> {
    if edges.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "{axis} needs at least 2 edges, got {}",
            edges.len()
        )));
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(Error::non_finite(&format!("{axis} edges")));
    }
    if edges.windows(2).any(|w| w[1] <= w[0]) {
        return Err(Error::InvalidInput(format!(
            "{axis} edges must be strictly increasing"
        )));
    }
    Ok(())
}

/// Locate `value` on an edge axis; the last bin includes its upper edge
pub(crate) fn locate(edges: &[f64], value: f64) -> Option<usize> {
    let n = edges.len().checked_sub(1)?;
    if n == 0 || !(value >= edges[0] && value <= edges[n]) {
        return None;
    }
    if value == edges[n] {
        return Some(n - 1);
    }
    // First edge strictly greater than value, minus one
    let upper = edges.partition_point(|&e| e <= value);
    Some(upper - 1)
}

/// A one-dimensional binned series
///
/// Holds `N` regular bins over `N + 1` strictly increasing edges, an underflow
/// and an overflow bin, and an optional evaluation range. The evaluation range
/// is an inclusive pair of regular-bin indices; statistics only look at bins
/// inside it. Bins outside the range keep their values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedSeries {
    edges: Vec<f64>,
    bins: Vec<Bin>,
    underflow: Bin,
    overflow: Bin,
    range: Option<(usize, usize)>,
}

impl BinnedSeries {
    /// Create a series from edges and bins
    ///
    /// Fails unless `edges.len() == bins.len() + 1` and the edges are
    /// strictly increasing.
    pub fn new(edges: Vec<f64>, bins: Vec<Bin>) -> Result<Self> {
        validate_edges(&edges, "x-axis")?;
        if edges.len() != bins.len() + 1 {
            return Err(Error::size_mismatch(
                bins.len() + 1,
                edges.len(),
                "binned series edges",
            ));
        }
        Ok(Self {
            edges,
            bins,
            underflow: Bin::zero(),
            overflow: Bin::zero(),
            range: None,
        })
    }

    /// Create an all-zero series over the given edges
    pub fn zeros(edges: Vec<f64>) -> Result<Self> {
        validate_edges(&edges, "x-axis")?;
        let bins = vec![Bin::zero(); edges.len() - 1];
        Self::new(edges, bins)
    }

    /// Create a series from counts, using Poisson errors `sqrt(|c|)`
    pub fn from_contents(edges: Vec<f64>, contents: &[f64]) -> Result<Self> {
        let bins = contents
            .iter()
            .map(|&c| Bin::new(c, c.abs().sqrt()))
            .collect();
        Self::new(edges, bins)
    }

    /// Create a series from separate content and error slices
    pub fn with_errors(edges: Vec<f64>, contents: &[f64], errors: &[f64]) -> Result<Self> {
        if contents.len() != errors.len() {
            return Err(Error::size_mismatch(
                contents.len(),
                errors.len(),
                "binned series errors",
            ));
        }
        let bins = contents
            .iter()
            .zip(errors)
            .map(|(&c, &e)| Bin::new(c, e))
            .collect();
        Self::new(edges, bins)
    }

    /// Create a series with `n` equal-width bins over `[low, high]`
    pub fn uniform(n: usize, low: f64, high: f64) -> Result<Self> {
        Self::zeros(crate::binning::uniform_edges(n, low, high)?)
    }

    /// Number of regular bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Mutable access to the regular bins
    pub fn bins_mut(&mut self) -> &mut [Bin] {
        &mut self.bins
    }

    pub fn bin(&self, index: usize) -> Option<&Bin> {
        self.bins.get(index)
    }

    /// Overwrite one regular bin
    pub fn set_bin(&mut self, index: usize, bin: Bin) -> Result<()> {
        let len = self.bins.len();
        let slot = self.bins.get_mut(index).ok_or_else(|| {
            Error::InvalidParameter(format!("bin index {index} out of range for {len} bins"))
        })?;
        *slot = bin;
        Ok(())
    }

    pub fn underflow(&self) -> Bin {
        self.underflow
    }

    pub fn overflow(&self) -> Bin {
        self.overflow
    }

    pub fn set_underflow(&mut self, bin: Bin) {
        self.underflow = bin;
    }

    pub fn set_overflow(&mut self, bin: Bin) {
        self.overflow = bin;
    }

    /// Zero both flow bins
    pub fn clear_flow(&mut self) {
        self.underflow = Bin::zero();
        self.overflow = Bin::zero();
    }

    /// Lower edge of the first bin
    pub fn lower_edge(&self) -> f64 {
        self.edges[0]
    }

    /// Upper edge of the last bin
    pub fn upper_edge(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Center of bin `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn center(&self, index: usize) -> f64 {
        0.5 * (self.edges[index] + self.edges[index + 1])
    }

    /// Width of bin `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn width(&self, index: usize) -> f64 {
        self.edges[index + 1] - self.edges[index]
    }

    pub fn centers(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.center(i)).collect()
    }

    pub fn contents(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.content).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.error).collect()
    }

    /// Find which regular bin contains `value`
    ///
    /// Bins are half-open `[lo, hi)` except the last, which includes its
    /// upper edge. Values outside the axis yield `None`.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        locate(&self.edges, value)
    }

    /// Like [`find_bin`](Self::find_bin) but clamps values outside the axis
    /// to the first or last bin
    pub fn find_bin_clamped(&self, value: f64) -> usize {
        if value < self.lower_edge() || value.is_nan() {
            return 0;
        }
        self.find_bin(value).unwrap_or(self.len() - 1)
    }

    /// Whether two series share identical edges
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.edges == other.edges
    }

    /// Current evaluation range, if any
    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    /// Restrict statistics to bins `first..=last`
    pub fn set_range(&mut self, first: usize, last: usize) -> Result<()> {
        if first > last || last >= self.len() {
            return Err(Error::InvalidParameter(format!(
                "evaluation range {first}..={last} invalid for {} bins",
                self.len()
            )));
        }
        self.range = Some((first, last));
        Ok(())
    }

    pub fn clear_range(&mut self) {
        self.range = None;
    }

    /// Inclusive bin indices that statistics operate on
    pub fn active_range(&self) -> (usize, usize) {
        self.range.unwrap_or((0, self.len() - 1))
    }

    /// Iterate `(index, center, bin)` over the evaluation range
    pub fn active_bins(&self) -> impl Iterator<Item = (usize, f64, &Bin)> + '_ {
        let (first, last) = self.active_range();
        (first..=last).map(move |i| (i, self.center(i), &self.bins[i]))
    }

    /// Lower and upper x-limits of the evaluation range
    pub fn active_limits(&self) -> (f64, f64) {
        let (first, last) = self.active_range();
        (self.edges[first], self.edges[last + 1])
    }
}

impl fmt::Display for BinnedSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BinnedSeries({} bins, range=[{:.3}, {:.3}]",
            self.len(),
            self.lower_edge(),
            self.upper_edge()
        )?;
        if let Some((first, last)) = self.range {
            write!(f, ", evaluating bins {first}..={last}")?;
        }
        write!(f, ")")
    }
}
