//! Selection of the width extraction method

use crate::correction::CorrectionMode;
use crate::gaussian::GaussianWidth;
use crate::lognormal::LogNormalWidth;
use crate::rms::TruncatedRms;
use crate::traits::WidthEstimator;
use jer_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width estimator chosen for an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Truncated RMS
    #[default]
    #[serde(rename = "R", alias = "rms")]
    Rms,
    /// Width of a Gaussian fit
    #[serde(rename = "G", alias = "gaussian_fit")]
    GaussianFit,
    /// Shape of a log-normal fit
    #[serde(rename = "L", alias = "log_normal_fit")]
    LogNormalFit,
}

impl ExtractionMethod {
    /// Single-letter code
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionMethod::Rms => "R",
            ExtractionMethod::GaussianFit => "G",
            ExtractionMethod::LogNormalFit => "L",
        }
    }

    /// Build the estimator; `correction` only affects [`ExtractionMethod::Rms`]
    pub fn build(&self, correction: CorrectionMode) -> Result<Box<dyn WidthEstimator>> {
        Ok(match self {
            ExtractionMethod::Rms => Box::new(TruncatedRms::new(correction)?),
            ExtractionMethod::GaussianFit => Box::new(GaussianWidth::new()),
            ExtractionMethod::LogNormalFit => Box::new(LogNormalWidth::new()),
        })
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ExtractionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "R" | "rms" => Ok(ExtractionMethod::Rms),
            "G" | "gaussian_fit" => Ok(ExtractionMethod::GaussianFit),
            "L" | "log_normal_fit" => Ok(ExtractionMethod::LogNormalFit),
            other => Err(Error::InvalidParameter(format!(
                "unknown extraction method '{other}', expected R, G or L"
            ))),
        }
    }
}
