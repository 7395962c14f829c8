//! Extraction of bin errors as values

use jer_histogram::{Bin, BinnedSeries, BinnedSeries2D};

/// Series whose contents are the errors of `series`, with zero errors
pub fn error_series(series: &BinnedSeries) -> BinnedSeries {
    let mut output = series.clone();
    output.clear_range();
    output.clear_flow();
    for bin in output.bins_mut() {
        *bin = Bin::new(bin.error, 0.0);
    }
    output
}

/// Two-dimensional counterpart of [`error_series`]
pub fn error_series_2d(series: &BinnedSeries2D) -> BinnedSeries2D {
    let mut output = series.clone();
    for bin in output.bins_mut() {
        *bin = Bin::new(bin.error, 0.0);
    }
    output
}
