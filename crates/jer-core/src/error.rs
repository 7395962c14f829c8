//! Error types for JER extraction
//!
//! Provides a unified error type for all jer-* crates. Only conditions that
//! abort a whole operation become an [`Error`]; per-bin degradations are
//! reported through [`crate::diagnostics`] instead.

use thiserror::Error;

/// Core error type for JER operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Series that must share bin edges do not
    #[error("Binning mismatch in {operation}: {detail}")]
    BinningMismatch { operation: String, detail: String },

    /// Input collection shape does not match the bin definitions it is attributed to
    #[error("Structural mismatch in {operation}: {detail}")]
    StructuralMismatch { operation: String, detail: String },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Feature not available
    #[error("Feature not available: {0}")]
    FeatureNotAvailable(String),

    /// A series could not be resolved from its source
    #[error("Series not found: {0}")]
    NotFound(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input, naming what was empty
    pub fn empty_input(context: &str) -> Self {
        Self::InvalidInput(format!("{context}: empty input"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for series with different bin edges
    pub fn binning_mismatch(operation: &str, detail: impl Into<String>) -> Self {
        Self::BinningMismatch {
            operation: operation.to_string(),
            detail: detail.into(),
        }
    }

    /// Create an error for a collection whose dimensions do not match its bins
    pub fn structural_mismatch(operation: &str, detail: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            operation: operation.to_string(),
            detail: detail.into(),
        }
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Whether this error belongs to the two hard-failure classes of the combinators
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            Self::BinningMismatch { .. } | Self::StructuralMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("truncation must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: truncation must be positive");

        let err = Error::InsufficientData { expected: 10, actual: 5 };
        assert_eq!(err.to_string(), "Insufficient data: expected at least 10 samples, got 5");

        let err = Error::binning_mismatch("quadratic subtraction", "3 vs 4 edges");
        assert_eq!(
            err.to_string(),
            "Binning mismatch in quadratic subtraction: 3 vs 4 edges"
        );

        let err = Error::structural_mismatch("extrapolate_intercept_2d", "3 rows for 2 y-bins");
        assert_eq!(
            err.to_string(),
            "Structural mismatch in extrapolate_intercept_2d: 3 rows for 2 y-bins"
        );

        let err = Error::NotFound("data:zpt_30_50/h_balance".to_string());
        assert_eq!(err.to_string(), "Series not found: data:zpt_30_50/h_balance");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::empty_input("stack_rows");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid input: stack_rows: empty input");

        let err = Error::size_mismatch(3, 2, "kinematic bins");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in kinematic bins: expected 3, got 2"
        );

        let err = Error::non_finite("bin contents");
        assert_eq!(
            err.to_string(),
            "Computation error: bin contents contains NaN or infinite values"
        );
    }

    #[test]
    fn test_mismatch_classification() {
        assert!(Error::binning_mismatch("ratio", "edges differ").is_mismatch());
        assert!(Error::structural_mismatch("grid", "shape").is_mismatch());
        assert!(!Error::Computation("x".into()).is_mismatch());
    }

    #[test]
    fn test_error_from_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
