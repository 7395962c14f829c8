//! Structured diagnostics for recoverable conditions
//!
//! Estimators and combinators degrade individual bins to zero instead of
//! failing the whole computation. Every such degradation is reported as a
//! [`Diagnostic`] carrying a [`Severity`] and a machine-readable
//! [`ReasonCode`], and handed to a [`DiagnosticHandler`]. Handlers decide what
//! to do with it: log it, collect it, or drop it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// How serious a reported condition is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Progress information (reached truncation, fitted values)
    Info,
    /// Recovered locally, output degraded to zero for the affected bin
    Warning,
    /// The operation returned an error
    Error,
}

/// Machine-readable cause of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Too few effective entries or non-zero fit samples
    LowStatistics,
    /// Series that must share bin edges do not
    BinningMismatch,
    /// Truncation-correction normalisation vanished
    DegenerateCorrection,
    /// The fitter reported an invalid or non-converged result
    FitNonConvergence,
    /// Grid dimensions do not match the bin definitions
    StructuralMismatch,
    /// Division by a zero-valued bin or point
    ZeroDenominator,
    /// Quadrature subtraction undefined for a bin
    UndefinedSubtraction,
    /// A value could not be placed on the output axis
    OutOfRange,
    /// Informational progress record
    Progress,
}

impl ReasonCode {
    /// Stable snake_case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowStatistics => "low_statistics",
            Self::BinningMismatch => "binning_mismatch",
            Self::DegenerateCorrection => "degenerate_correction",
            Self::FitNonConvergence => "fit_non_convergence",
            Self::StructuralMismatch => "structural_mismatch",
            Self::ZeroDenominator => "zero_denominator",
            Self::UndefinedSubtraction => "undefined_subtraction",
            Self::OutOfRange => "out_of_range",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub reason: ReasonCode,
    /// Name of the operation that emitted it
    pub operation: String,
    /// Affected bin (or point) index, if the condition is bin-local
    pub bin: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with an explicit severity
    pub fn new(
        severity: Severity,
        reason: ReasonCode,
        operation: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            reason,
            operation: operation.to_string(),
            bin: None,
            message: message.into(),
        }
    }

    pub fn info(operation: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, ReasonCode::Progress, operation, message)
    }

    pub fn warning(reason: ReasonCode, operation: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, reason, operation, message)
    }

    pub fn error(reason: ReasonCode, operation: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, reason, operation, message)
    }

    /// Attach the affected bin index
    pub fn at_bin(mut self, bin: usize) -> Self {
        self.bin = Some(bin);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bin {
            Some(bin) => write!(
                f,
                "[{:?}] {} ({}, bin {}): {}",
                self.severity, self.reason, self.operation, bin, self.message
            ),
            None => write!(
                f,
                "[{:?}] {} ({}): {}",
                self.severity, self.reason, self.operation, self.message
            ),
        }
    }
}

/// Consumer of diagnostics
///
/// Handlers must be shareable across threads so per-bin loops can run in
/// parallel.
pub trait DiagnosticHandler: Send + Sync {
    /// Handle a single diagnostic
    fn handle(&self, diagnostic: Diagnostic);

    /// Check if the handler wants diagnostics of this severity at all
    fn is_interested(&self, _severity: Severity) -> bool {
        true
    }
}

/// Report a diagnostic if the handler is interested in its severity
pub fn report(handler: &dyn DiagnosticHandler, diagnostic: Diagnostic) {
    if handler.is_interested(diagnostic.severity) {
        handler.handle(diagnostic);
    }
}

/// Report a hard failure with [`Severity::Error`] and hand the error back
///
/// ```rust
/// use jer_core::{report_error, CollectingHandler, Error, ReasonCode};
///
/// let handler = CollectingHandler::new();
/// let err = report_error(
///     &handler,
///     ReasonCode::BinningMismatch,
///     "ratio",
///     Error::binning_mismatch("ratio", "3 vs 4 edges"),
/// );
/// assert!(err.is_mismatch());
/// assert_eq!(handler.count(ReasonCode::BinningMismatch), 1);
/// ```
pub fn report_error(
    handler: &dyn DiagnosticHandler,
    reason: ReasonCode,
    operation: &str,
    error: crate::Error,
) -> crate::Error {
    report(handler, Diagnostic::error(reason, operation, error.to_string()));
    error
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl LoggingHandler {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticHandler for LoggingHandler {
    fn handle(&self, d: Diagnostic) {
        match d.severity {
            Severity::Info => tracing::debug!(
                reason = %d.reason,
                operation = %d.operation,
                bin = ?d.bin,
                "{}", d.message
            ),
            Severity::Warning => tracing::warn!(
                reason = %d.reason,
                operation = %d.operation,
                bin = ?d.bin,
                "{}", d.message
            ),
            Severity::Error => tracing::error!(
                reason = %d.reason,
                operation = %d.operation,
                bin = ?d.bin,
                "{}", d.message
            ),
        }
    }
}

/// Records every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingHandler {
    records: Mutex<Vec<Diagnostic>>,
}

impl CollectingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded diagnostics with the given reason
    pub fn count(&self, reason: ReasonCode) -> usize {
        self.snapshot().iter().filter(|d| d.reason == reason).count()
    }

    /// Whether any diagnostic with this reason was recorded
    pub fn contains(&self, reason: ReasonCode) -> bool {
        self.count(reason) > 0
    }

    /// Recorded diagnostics at or above a severity
    pub fn at_least(&self, severity: Severity) -> Vec<Diagnostic> {
        self.snapshot()
            .into_iter()
            .filter(|d| d.severity >= severity)
            .collect()
    }
}

impl DiagnosticHandler for CollectingHandler {
    fn handle(&self, diagnostic: Diagnostic) {
        match self.records.lock() {
            Ok(mut records) => records.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

/// Null handler that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl DiagnosticHandler for NullHandler {
    fn handle(&self, _diagnostic: Diagnostic) {}

    fn is_interested(&self, _severity: Severity) -> bool {
        false
    }
}
