//! Conversions between series shapes

use crate::binning::{edges_from_kinematic_bins, kinematic_center, KinematicBin};
use crate::hist2d::BinnedSeries2D;
use crate::points::{Point, PointSeries};
use crate::types::BinnedSeries;
use jer_core::{Error, Result};
use tracing::debug;

/// Pair two binning-compatible series into points `(x, y)`
///
/// Bin `i` becomes a point with `x`/`x_err` from `x_series` and `y`/`y_err`
/// from `y_series`. Bins where either error is zero are dropped.
pub fn points_from_series(y_series: &BinnedSeries, x_series: &BinnedSeries) -> Result<PointSeries> {
    if !y_series.is_compatible(x_series) {
        return Err(Error::binning_mismatch(
            "points_from_series",
            "x and y series have different edges",
        ));
    }
    let points = x_series
        .bins()
        .iter()
        .zip(y_series.bins())
        .filter(|(x, y)| x.error != 0.0 && y.error != 0.0)
        .map(|(x, y)| Point::new(x.content, y.content, x.error, y.error))
        .collect();
    Ok(PointSeries::new(points))
}

/// Stack one 1-D series per y-bin into a 2-D series
///
/// The x-axis is taken from the rows, which must all share edges. Row `i` is
/// placed at the y-bin containing the center of `y_bins[i]`.
pub fn stack_rows(rows: &[BinnedSeries], y_bins: &[KinematicBin]) -> Result<BinnedSeries2D> {
    if rows.len() != y_bins.len() {
        return Err(Error::structural_mismatch(
            "stack_rows",
            format!("{} rows for {} y-bins", rows.len(), y_bins.len()),
        ));
    }
    let first = rows
        .first()
        .ok_or_else(|| Error::empty_input("stack_rows"))?;
    if let Some(i) = rows.iter().position(|r| !r.is_compatible(first)) {
        return Err(Error::binning_mismatch(
            "stack_rows",
            format!("row {i} has different x-edges from row 0"),
        ));
    }

    let y_edges = edges_from_kinematic_bins(y_bins)?;
    let mut out = BinnedSeries2D::zeros(first.edges().to_vec(), y_edges)?;
    for (row, y_bin) in rows.iter().zip(y_bins) {
        let yc = kinematic_center(y_bin);
        let iy = out.find_bin(first.lower_edge(), yc).map(|(_, iy)| iy).ok_or_else(|| {
            Error::structural_mismatch("stack_rows", format!("y-bin center {yc} outside output axis"))
        })?;
        for (ix, bin) in row.bins().iter().enumerate() {
            debug!(ix, iy, content = bin.content, error = bin.error, "Stacking bin");
            out.set_bin(ix, iy, *bin)?;
        }
    }
    Ok(out)
}
