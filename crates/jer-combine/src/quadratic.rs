//! Subtraction in quadrature
//!
//! `sqrt(m² - Σ sᵢ²)` per bin, used to remove known contributions (particle
//! level imbalance, reference-object resolution) from a measured width.

use crate::types::Combination;
use jer_core::{report, report_error, Diagnostic, DiagnosticHandler, Error, ReasonCode, Result};
use jer_histogram::{Bin, BinnedSeries};
use tracing::debug;

const OPERATION: &str = "quadratic_subtraction";

/// One bin of `minuend ⊖ subtrahends`, or the reason it is undefined
fn subtract_bin(minuend: &Bin, subtrahends: &[&Bin]) -> std::result::Result<Bin, &'static str> {
    if subtrahends.iter().any(|s| s.content == 0.0) {
        return Err("subtrahend content is zero");
    }
    let radicand = minuend.content * minuend.content
        - subtrahends.iter().map(|s| s.content * s.content).sum::<f64>();
    if !(radicand >= 0.0) {
        return Err("subtrahends exceed the minuend");
    }
    let result = radicand.sqrt();
    if result == 0.0 {
        return Err("result is zero");
    }

    let term = |b: &Bin| (b.content * b.error / result).powi(2);
    let error2 = term(minuend) + subtrahends.iter().map(|s| term(s)).sum::<f64>();
    if !(error2 >= 0.0) {
        return Err("error is undefined");
    }
    Ok(Bin::new(result, error2.sqrt()))
}

/// Subtract `subtrahends` from `minuend` in quadrature
///
/// Every subtrahend must share the minuend's edges. Bins where the result is
/// undefined are set to `(0, 0)` and listed in
/// [`Combination::failed_bins`]. Flow bins of the result are always zero.
/// The result does not depend on the order of the subtrahends.
pub fn quadratic_subtraction(
    minuend: &BinnedSeries,
    subtrahends: &[BinnedSeries],
    diagnostics: &dyn DiagnosticHandler,
) -> Result<Combination<BinnedSeries>> {
    if let Some(i) = subtrahends.iter().position(|s| !s.is_compatible(minuend)) {
        return Err(report_error(
            diagnostics,
            ReasonCode::BinningMismatch,
            OPERATION,
            Error::binning_mismatch(OPERATION, format!("subtrahend {i} differs in binning from the minuend")),
        ));
    }

    let mut output = minuend.clone();
    output.clear_range();
    output.clear_flow();
    let mut failed_bins = Vec::new();

    for i in 0..minuend.len() {
        let m = &minuend.bins()[i];
        let subs: Vec<&Bin> = subtrahends.iter().map(|s| &s.bins()[i]).collect();
        let bin = match subtract_bin(m, &subs) {
            Ok(bin) => bin,
            Err(reason) => {
                report(
                    diagnostics,
                    Diagnostic::warning(ReasonCode::UndefinedSubtraction, OPERATION, reason).at_bin(i),
                );
                failed_bins.push(i);
                Bin::zero()
            }
        };
        debug!(bin = i, content = bin.content, error = bin.error, "Quadratic subtraction");
        output.set_bin(i, bin)?;
    }

    Ok(Combination::new(output, failed_bins))
}
