//! Core types for jet-energy-resolution extraction
//!
//! This crate provides the pieces every other jer-* crate builds on:
//!
//! - [`Error`] / [`Result`]: hard failures (binning or structural mismatch,
//!   invalid parameters, configuration problems)
//! - [`diagnostics`]: the structured channel for recoverable, bin-local
//!   conditions (low statistics, failed fits, zero denominators)
//! - [`math`]: standard-normal density/distribution and the inverse error
//!   function
//!
//! # Example
//!
//! ```rust
//! use jer_core::{report, CollectingHandler, Diagnostic, ReasonCode};
//!
//! let handler = CollectingHandler::new();
//! report(&handler, Diagnostic::warning(ReasonCode::LowStatistics, "truncated_rms", "4 entries").at_bin(2));
//! assert_eq!(handler.count(ReasonCode::LowStatistics), 1);
//! ```

pub mod diagnostics;
pub mod error;
pub mod math;

// Re-export core types
pub use diagnostics::{
    report, report_error, CollectingHandler, Diagnostic, DiagnosticHandler, LoggingHandler, NullHandler,
    ReasonCode, Severity,
};
pub use error::{Error, Result};

/// Minimum effective entry count a series needs before any width is extracted
pub const MIN_EFFECTIVE_ENTRIES: f64 = 10.0;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::diagnostics::{
        report, report_error, CollectingHandler, Diagnostic, DiagnosticHandler, LoggingHandler, NullHandler,
        ReasonCode, Severity,
    };
    pub use crate::error::Error;
    pub use crate::Result;
}
