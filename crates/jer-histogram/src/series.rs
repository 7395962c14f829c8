//! Tagged union over the series kinds the combinators accept

use crate::points::{AsymmetricPointSeries, PointSeries};
use crate::types::{Bin, BinnedSeries};
use jer_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Any one-dimensional series a storage collaborator can hand over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Series {
    Binned(BinnedSeries),
    Points(PointSeries),
    AsymmetricPoints(AsymmetricPointSeries),
}

impl Series {
    /// Short name of the variant, used in messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Binned(_) => "binned",
            Self::Points(_) => "points",
            Self::AsymmetricPoints(_) => "asymmetric points",
        }
    }

    /// Whether this is one of the point variants
    pub fn is_point_like(&self) -> bool {
        !matches!(self, Self::Binned(_))
    }

    /// Number of bins or points
    pub fn len(&self) -> usize {
        match self {
            Self::Binned(s) => s.len(),
            Self::Points(s) => s.len(),
            Self::AsymmetricPoints(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_binned(&self) -> Option<&BinnedSeries> {
        match self {
            Self::Binned(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow a binned series or fail naming the operation that needed it
    pub fn expect_binned(&self, operation: &str) -> Result<&BinnedSeries> {
        self.as_binned().ok_or_else(|| {
            Error::InvalidInput(format!(
                "{operation} needs a binned series, got {}",
                self.kind()
            ))
        })
    }

    /// Evaluate the series at `x`
    ///
    /// Point series interpolate linearly; binned series return the content of
    /// the bin containing `x` (0 outside the axis).
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Binned(s) => s
                .find_bin(x)
                .and_then(|i| s.bin(i))
                .map_or(0.0, |b| b.content),
            Self::Points(s) => s.eval(x),
            Self::AsymmetricPoints(s) => s.eval(x),
        }
    }

    /// Convert to a binned series
    ///
    /// Points are sorted by x. When every point carries a positive x-error the
    /// edges are `x - x_err_low` of the first point followed by `x + x_err_high`
    /// of each point. Otherwise edges sit halfway between neighbouring points,
    /// and the outer edges lie half the neighbouring half-gap beyond the first
    /// and last point.
    /// Asymmetric y-errors are averaged.
    pub fn to_binned(&self) -> Result<BinnedSeries> {
        // (x, y, x_err_low, x_err_high, y_err)
        let mut rows: Vec<(f64, f64, f64, f64, f64)> = match self {
            Self::Binned(s) => return Ok(s.clone()),
            Self::Points(s) => s
                .points
                .iter()
                .map(|p| (p.x, p.y, p.x_err, p.x_err, p.y_err))
                .collect(),
            Self::AsymmetricPoints(s) => s
                .points
                .iter()
                .map(|p| {
                    (
                        p.x,
                        p.y,
                        p.x_err_low,
                        p.x_err_high,
                        0.5 * (p.y_err_low + p.y_err_high),
                    )
                })
                .collect(),
        };
        if rows.is_empty() {
            return Err(Error::empty_input("series conversion"));
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let edges = if rows.iter().all(|r| r.2 > 0.0 && r.3 > 0.0) {
            std::iter::once(rows[0].0 - rows[0].2)
                .chain(rows.iter().map(|r| r.0 + r.3))
                .collect()
        } else if rows.len() >= 2 {
            let mids: Vec<f64> = rows.windows(2).map(|w| 0.5 * (w[0].0 + w[1].0)).collect();
            let first = rows[0].0 - 0.5 * (mids[0] - rows[0].0);
            let last_x = rows[rows.len() - 1].0;
            let last = last_x + 0.5 * (last_x - mids[mids.len() - 1]);
            std::iter::once(first)
                .chain(mids)
                .chain(std::iter::once(last))
                .collect()
        } else {
            return Err(Error::InvalidInput(
                "cannot derive bin edges from a single point without x-errors".to_string(),
            ));
        };

        let bins = rows.iter().map(|r| Bin::new(r.1, r.4)).collect();
        BinnedSeries::new(edges, bins)
    }
}

impl From<BinnedSeries> for Series {
    fn from(s: BinnedSeries) -> Self {
        Self::Binned(s)
    }
}

impl From<PointSeries> for Series {
    fn from(s: PointSeries) -> Self {
        Self::Points(s)
    }
}

impl From<AsymmetricPointSeries> for Series {
    fn from(s: AsymmetricPointSeries) -> Self {
        Self::AsymmetricPoints(s)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binned(s) => write!(f, "{s}"),
            Self::Points(s) => write!(f, "PointSeries({} points)", s.len()),
            Self::AsymmetricPoints(s) => write!(f, "AsymmetricPointSeries({} points)", s.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::{AsymmetricPoint, Point};
    use approx::assert_relative_eq;

    #[test]
    fn test_points_with_x_errors_to_binned() {
        let s = Series::from(PointSeries::new(vec![
            Point::new(1.5, 2.0, 0.5, 0.2),
            Point::new(0.5, 1.0, 0.5, 0.1),
        ]));
        let b = s.to_binned().unwrap();
        assert_eq!(b.edges(), &[0.0, 1.0, 2.0]);
        assert_eq!(b.contents(), vec![1.0, 2.0]);
        assert_eq!(b.errors(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_points_without_x_errors_use_midpoints() {
        let s = Series::from(PointSeries::new(vec![
            Point::new(0.0, 1.0, 0.0, 0.0),
            Point::new(2.0, 2.0, 0.0, 0.0),
            Point::new(6.0, 3.0, 0.0, 0.0),
        ]));
        let b = s.to_binned().unwrap();
        assert_eq!(b.edges(), &[-0.5, 1.0, 4.0, 7.0]);
    }

    #[test]
    fn test_empty_points_name_the_conversion() {
        let err = Series::from(PointSeries::new(vec![])).to_binned().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("series conversion"));
    }

    #[test]
    fn test_asymmetric_errors_are_averaged() {
        let s = Series::from(AsymmetricPointSeries::new(vec![AsymmetricPoint::new(
            1.0, 5.0, 0.5, 1.0, 0.2, 0.4,
        )]));
        let b = s.to_binned().unwrap();
        assert_eq!(b.edges(), &[0.5, 2.0]);
        assert_relative_eq!(b.errors()[0], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_conversion_failures() {
        assert!(Series::from(PointSeries::default()).to_binned().is_err());
        let single = Series::from(PointSeries::new(vec![Point::new(1.0, 1.0, 0.0, 0.0)]));
        assert!(single.to_binned().is_err());
    }

    #[test]
    fn test_eval_and_kind() {
        let b = Series::from(
            BinnedSeries::from_contents(vec![0.0, 1.0, 2.0], &[3.0, 4.0]).unwrap(),
        );
        assert_eq!(b.eval(1.5), 4.0);
        assert_eq!(b.eval(5.0), 0.0);
        assert!(!b.is_point_like());
        assert_eq!(b.kind(), "binned");
        assert!(b.expect_binned("pull").is_ok());

        let p = Series::from(PointSeries::new(vec![Point::new(0.0, 0.0, 0.0, 0.0)]));
        assert!(p.is_point_like());
        assert!(p.expect_binned("pull").is_err());
    }
}
