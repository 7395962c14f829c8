//! Two-dimensional binned series

use crate::types::{locate, validate_edges, Bin};
use jer_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A binned series over two axes
///
/// Bins are stored row-major: `bins[iy * nx + ix]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedSeries2D {
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    bins: Vec<Bin>,
}

impl BinnedSeries2D {
    /// Create an all-zero series over the given edges
    pub fn zeros(x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        validate_edges(&x_edges, "x-axis")?;
        validate_edges(&y_edges, "y-axis")?;
        let n = (x_edges.len() - 1) * (y_edges.len() - 1);
        Ok(Self {
            x_edges,
            y_edges,
            bins: vec![Bin::zero(); n],
        })
    }

    /// Create a series from row-major bins
    pub fn new(x_edges: Vec<f64>, y_edges: Vec<f64>, bins: Vec<Bin>) -> Result<Self> {
        let mut series = Self::zeros(x_edges, y_edges)?;
        if bins.len() != series.bins.len() {
            return Err(Error::size_mismatch(
                series.bins.len(),
                bins.len(),
                "2-D series bins",
            ));
        }
        series.bins = bins;
        Ok(series)
    }

    pub fn nx(&self) -> usize {
        self.x_edges.len() - 1
    }

    pub fn ny(&self) -> usize {
        self.y_edges.len() - 1
    }

    /// `(nx, ny)`
    pub fn shape(&self) -> (usize, usize) {
        (self.nx(), self.ny())
    }

    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    /// Row-major bins
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut [Bin] {
        &mut self.bins
    }

    pub fn bin(&self, ix: usize, iy: usize) -> Option<&Bin> {
        if ix >= self.nx() || iy >= self.ny() {
            return None;
        }
        self.bins.get(iy * self.nx() + ix)
    }

    pub fn set_bin(&mut self, ix: usize, iy: usize, bin: Bin) -> Result<()> {
        if ix >= self.nx() || iy >= self.ny() {
            return Err(Error::InvalidParameter(format!(
                "bin ({ix}, {iy}) out of range for {}x{} bins",
                self.nx(),
                self.ny()
            )));
        }
        let nx = self.nx();
        self.bins[iy * nx + ix] = bin;
        Ok(())
    }

    pub fn x_center(&self, ix: usize) -> f64 {
        0.5 * (self.x_edges[ix] + self.x_edges[ix + 1])
    }

    pub fn y_center(&self, iy: usize) -> f64 {
        0.5 * (self.y_edges[iy] + self.y_edges[iy + 1])
    }

    /// Find the `(ix, iy)` bin containing a point
    pub fn find_bin(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        Some((locate(&self.x_edges, x)?, locate(&self.y_edges, y)?))
    }

    /// Whether both edge sequences are identical
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.x_edges == other.x_edges && self.y_edges == other.y_edges
    }
}

impl fmt::Display for BinnedSeries2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinnedSeries2D({}x{} bins)", self.nx(), self.ny())
    }
}
