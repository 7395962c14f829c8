//! Intercepts of per-bin line fits, collected into binned series
//!
//! Each input series samples one kinematic bin along the alpha axis. Its
//! fitted intercept at alpha = 0 is stored in the output bin containing the
//! center of that kinematic bin; the slope is discarded.

use crate::line::fit_line;
use jer_core::{report, report_error, Diagnostic, DiagnosticHandler, Error, ReasonCode, Result};
use jer_fit::LinearFit;
use jer_histogram::{
    edges_from_kinematic_bins, kinematic_center, Bin, BinnedSeries, BinnedSeries2D, KinematicBin, Series,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn map_indices<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..count).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}

fn intercept_bin(fit: Option<LinearFit>) -> Bin {
    fit.map_or_else(Bin::zero, |f| Bin::new(f.intercept, f.intercept_error))
}

fn structural_error(
    operation: &str,
    detail: String,
    diagnostics: &dyn DiagnosticHandler,
) -> Error {
    report_error(
        diagnostics,
        ReasonCode::StructuralMismatch,
        operation,
        Error::structural_mismatch(operation, detail),
    )
}

fn out_of_range(operation: &str, index: usize, center: f64, diagnostics: &dyn DiagnosticHandler) {
    report(
        diagnostics,
        Diagnostic::warning(
            ReasonCode::OutOfRange,
            operation,
            format!("Kinematic bin center {center} outside output axis"),
        )
        .at_bin(index),
    );
}

/// Intercept at zero alpha for every kinematic bin
///
/// `inputs[i]` belongs to `x_bins[i]`; differing lengths are a
/// [`Error::StructuralMismatch`]. Skipped or failed fits leave `(0, 0)`.
pub fn extrapolate_intercept(
    inputs: &[Series],
    x_bins: &[KinematicBin],
    fit_x_min: f64,
    fit_x_max: f64,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries> {
    let operation = "extrapolate_intercept";
    if inputs.len() != x_bins.len() {
        return Err(structural_error(
            operation,
            format!("{} series for {} kinematic bins", inputs.len(), x_bins.len()),
            diagnostics,
        ));
    }
    let mut output = BinnedSeries::zeros(edges_from_kinematic_bins(x_bins)?)?;

    let fits = map_indices(inputs.len(), |i| {
        fit_line(&inputs[i], (fit_x_min, fit_x_max), operation, Some(i), diagnostics)
    });

    for (i, (fit, kinematic_bin)) in fits.into_iter().zip(x_bins).enumerate() {
        let center = kinematic_center(kinematic_bin);
        match output.find_bin(center) {
            Some(target) => output.set_bin(target, intercept_bin(fit))?,
            None => out_of_range(operation, i, center, diagnostics),
        }
    }
    Ok(output)
}

/// Intercept at zero alpha for every cell of a two-dimensional kinematic grid
///
/// `grid[iy][ix]` belongs to `(x_bins[ix], y_bins[iy])`. The grid shape is
/// checked before any fit runs; a mismatch is a
/// [`Error::StructuralMismatch`] with no partial output.
pub fn extrapolate_intercept_2d(
    grid: &[Vec<Series>],
    x_bins: &[KinematicBin],
    y_bins: &[KinematicBin],
    fit_x_min: f64,
    fit_x_max: f64,
    diagnostics: &dyn DiagnosticHandler,
) -> Result<BinnedSeries2D> {
    let operation = "extrapolate_intercept_2d";
    if grid.len() != y_bins.len() {
        return Err(structural_error(
            operation,
            format!("{} grid rows for {} y bins", grid.len(), y_bins.len()),
            diagnostics,
        ));
    }
    if let Some((iy, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != x_bins.len()) {
        return Err(structural_error(
            operation,
            format!("grid row {iy} has {} series for {} x bins", row.len(), x_bins.len()),
            diagnostics,
        ));
    }

    let mut output = BinnedSeries2D::zeros(
        edges_from_kinematic_bins(x_bins)?,
        edges_from_kinematic_bins(y_bins)?,
    )?;

    let nx = x_bins.len();
    let fits = map_indices(grid.len() * nx, |k| {
        let (iy, ix) = (k / nx, k % nx);
        fit_line(&grid[iy][ix], (fit_x_min, fit_x_max), operation, Some(k), diagnostics)
    });

    for (k, fit) in fits.into_iter().enumerate() {
        let (iy, ix) = (k / nx, k % nx);
        let (cx, cy) = (kinematic_center(&x_bins[ix]), kinematic_center(&y_bins[iy]));
        match output.find_bin(cx, cy) {
            Some((tx, ty)) => output.set_bin(tx, ty, intercept_bin(fit))?,
            None => out_of_range(operation, k, cx, diagnostics),
        }
    }
    Ok(output)
}
