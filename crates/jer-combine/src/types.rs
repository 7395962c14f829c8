//! Result type shared by the combinators

use serde::{Deserialize, Serialize};

/// Output of a bin-wise combination with the bins that could not be computed
///
/// Failed bins hold `(0, 0)` in binned outputs and are omitted from point
/// outputs; their indices refer to the input bins or points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination<T> {
    pub output: T,
    pub failed_bins: Vec<usize>,
}

impl<T> Combination<T> {
    pub fn new(output: T, failed_bins: Vec<usize>) -> Self {
        Self { output, failed_bins }
    }

    /// Whether every bin was computed
    pub fn is_complete(&self) -> bool {
        self.failed_bins.is_empty()
    }

    pub fn into_output(self) -> T {
        self.output
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Combination<U> {
        Combination {
            output: f(self.output),
            failed_bins: self.failed_bins,
        }
    }
}
