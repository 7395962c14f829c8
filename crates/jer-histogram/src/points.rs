//! Point series with symmetric or asymmetric errors

use serde::{Deserialize, Serialize};

/// A point with symmetric errors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub x_err: f64,
    pub y_err: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, x_err: f64, y_err: f64) -> Self {
        Self { x, y, x_err, y_err }
    }
}

/// A point with separate low/high errors on both axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AsymmetricPoint {
    pub x: f64,
    pub y: f64,
    pub x_err_low: f64,
    pub x_err_high: f64,
    pub y_err_low: f64,
    pub y_err_high: f64,
}

impl AsymmetricPoint {
    pub fn new(
        x: f64,
        y: f64,
        x_err_low: f64,
        x_err_high: f64,
        y_err_low: f64,
        y_err_high: f64,
    ) -> Self {
        Self {
            x,
            y,
            x_err_low,
            x_err_high,
            y_err_low,
            y_err_high,
        }
    }
}

/// Ordered points `(x, y, x_err, y_err)`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSeries {
    pub points: Vec<Point>,
}

impl PointSeries {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Piecewise-linear value at `x`, see [`interpolate`]
    pub fn eval(&self, x: f64) -> f64 {
        interpolate(self.points.iter().map(|p| (p.x, p.y)).collect(), x)
    }
}

/// Ordered points with asymmetric errors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AsymmetricPointSeries {
    pub points: Vec<AsymmetricPoint>,
}

impl AsymmetricPointSeries {
    pub fn new(points: Vec<AsymmetricPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: AsymmetricPoint) {
        self.points.push(point);
    }

    pub fn get(&self, index: usize) -> Option<&AsymmetricPoint> {
        self.points.get(index)
    }

    /// Piecewise-linear value at `x`, see [`interpolate`]
    pub fn eval(&self, x: f64) -> f64 {
        interpolate(self.points.iter().map(|p| (p.x, p.y)).collect(), x)
    }
}

/// Linear interpolation through `(x, y)` pairs
///
/// The pairs are sorted by x first. Between two neighbours the value is
/// interpolated, beyond either end it is extrapolated from the two outermost
/// points. A single point yields its y; no points yield 0.
pub fn interpolate(mut xy: Vec<(f64, f64)>, x: f64) -> f64 {
    match xy.len() {
        0 => return 0.0,
        1 => return xy[0].1,
        _ => {}
    }
    xy.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = xy.len();
    // Index of the left point of the segment used
    let left = match xy.iter().position(|&(xi, _)| xi > x) {
        None => n - 2,
        Some(0) => 0,
        Some(i) => (i - 1).min(n - 2),
    };
    let (x0, y0) = xy[left];
    let (x1, y1) = xy[left + 1];
    if x1 == x0 {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}
