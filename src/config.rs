//! Workflow configuration
//!
//! A [`WorkflowConfig`] is read from JSON and validated before any series is
//! touched. Every field has a default, so a minimal configuration only names
//! what differs from the standard Z+jet alpha extrapolation.
//!
//! ```rust
//! use jer_toolkit::config::WorkflowConfig;
//! use jer_toolkit::spread::ExtractionMethod;
//!
//! let config = WorkflowConfig::from_json_str(r#"{ "method": "G", "truncation": 95.0 }"#).unwrap();
//! assert_eq!(config.method, ExtractionMethod::GaussianFit);
//! assert_eq!(config.alpha_bins.len(), 6);
//! ```

use jer_core::{Error, Result};
use jer_extrapolate::ExtrapolationSettings;
use jer_histogram::KinematicBin;
use jer_spread::{CorrectionMode, ExtractionMethod};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// A bin with the path segment its series are stored under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedBin {
    pub name: String,
    pub lo: f64,
    pub hi: f64,
}

impl NamedBin {
    pub fn new(name: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            name: name.into(),
            lo,
            hi,
        }
    }

    pub fn kinematic(&self) -> KinematicBin {
        (self.lo, self.hi)
    }
}

/// Limits of a list of named bins as kinematic bins
pub fn kinematic_bins(bins: &[NamedBin]) -> Vec<KinematicBin> {
    bins.iter().map(NamedBin::kinematic).collect()
}

/// Names of the stored quantities, the last path component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityNames {
    /// Transverse-momentum balance, measured in data and simulation
    pub balance: String,
    /// Particle-level imbalance, simulation only
    pub pli: String,
    /// Reference-object (Z boson) resolution, simulation only
    pub zres: String,
    /// Generator-level jet resolution, simulation only
    pub gen_jer: String,
    /// Alpha distribution per alpha bin; `None` fits against alpha bin centers
    pub alpha: Option<String>,
}

impl Default for QuantityNames {
    fn default() -> Self {
        Self {
            balance: "h_ptbalance_weight".to_string(),
            pli: "h_pli_weight".to_string(),
            zres: "h_zres_weight".to_string(),
            gen_jer: "h_genjer_weight".to_string(),
            alpha: Some("h_alpha_weight".to_string()),
        }
    }
}

/// Sample prefixes of data and simulation paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleNames {
    pub data: String,
    pub mc: String,
}

impl Default for SampleNames {
    fn default() -> Self {
        Self {
            data: "data".to_string(),
            mc: "mc".to_string(),
        }
    }
}

/// Everything the alpha-extrapolation workflow needs besides the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub method: ExtractionMethod,
    /// Target truncation in percent; `None` disables truncation
    pub truncation: Option<f64>,
    pub correction: CorrectionMode,
    /// Exclusive alpha bins, innermost path segment
    pub alpha_bins: Vec<NamedBin>,
    /// First kinematic axis, outermost path segment (reference-object pT)
    pub x_bins: Vec<NamedBin>,
    /// Second kinematic axis, following the first (jet pseudorapidity)
    pub y_bins: Vec<NamedBin>,
    #[serde(flatten)]
    pub extrapolation: ExtrapolationSettings,
    pub quantities: QuantityNames,
    pub samples: SampleNames,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let alpha_bins = [0.0_f64, 0.05, 0.1, 0.15, 0.2, 0.25, 0.3]
            .windows(2)
            .map(|w| {
                NamedBin::new(
                    format!("alpha_{:03}_{:03}", (w[0] * 100.0).round() as u32, (w[1] * 100.0).round() as u32),
                    w[0],
                    w[1],
                )
            })
            .collect();
        let x_bins = [30.0, 50.0, 75.0, 125.0, 175.0, 225.0, 300.0, 400.0, 1000.0]
            .windows(2)
            .map(|w| NamedBin::new(format!("zpt_{}_{}", w[0], w[1]), w[0], w[1]))
            .collect();
        let y_bins = [0.0_f64, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 5.2]
            .windows(2)
            .map(|w| {
                NamedBin::new(
                    format!("eta_{:02}_{:02}", (w[0] * 10.0).round() as u32, (w[1] * 10.0).round() as u32),
                    w[0],
                    w[1],
                )
            })
            .collect();

        Self {
            method: ExtractionMethod::default(),
            truncation: Some(98.5),
            correction: CorrectionMode::default(),
            alpha_bins,
            x_bins,
            y_bins,
            extrapolation: ExtrapolationSettings::default(),
            quantities: QuantityNames::default(),
            samples: SampleNames::default(),
        }
    }
}

fn config_error(e: Error) -> Error {
    match e {
        Error::Config(_) => e,
        other => Error::Config(other.to_string()),
    }
}

fn validate_bins(axis: &str, bins: &[NamedBin]) -> Result<()> {
    if bins.is_empty() {
        return Err(Error::Config(format!("{axis} must contain at least one bin")));
    }
    let mut names = HashSet::new();
    for bin in bins {
        if bin.name.is_empty() || bin.name.contains('/') || bin.name.contains(':') {
            return Err(Error::Config(format!(
                "{axis} bin name '{}' is not a valid path segment",
                bin.name
            )));
        }
        if !(bin.lo.is_finite() && bin.hi.is_finite() && bin.lo < bin.hi) {
            return Err(Error::Config(format!(
                "{axis} bin '{}' has empty interval [{}, {}]",
                bin.name, bin.lo, bin.hi
            )));
        }
        if !names.insert(bin.name.as_str()) {
            return Err(Error::Config(format!("{axis} bin name '{}' is repeated", bin.name)));
        }
    }
    Ok(())
}

impl WorkflowConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), method = %config.method, "Loaded workflow configuration");
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_method(mut self, method: ExtractionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_truncation(mut self, truncation: Option<f64>) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn with_correction(mut self, correction: CorrectionMode) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_alpha_bins(mut self, bins: Vec<NamedBin>) -> Self {
        self.alpha_bins = bins;
        self
    }

    pub fn with_x_bins(mut self, bins: Vec<NamedBin>) -> Self {
        self.x_bins = bins;
        self
    }

    pub fn with_y_bins(mut self, bins: Vec<NamedBin>) -> Self {
        self.y_bins = bins;
        self
    }

    pub fn with_extrapolation(mut self, settings: ExtrapolationSettings) -> Self {
        self.extrapolation = settings;
        self
    }

    /// Check every field, failing with [`Error::Config`]
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.truncation {
            if !(t > 0.0 && t <= 100.0) {
                return Err(Error::Config(format!("truncation must be in (0, 100], got {t}")));
            }
        }
        // Rejects method/correction pairs no estimator supports
        self.method.build(self.correction).map_err(config_error)?;

        validate_bins("alpha_bins", &self.alpha_bins)?;
        validate_bins("x_bins", &self.x_bins)?;
        validate_bins("y_bins", &self.y_bins)?;
        self.extrapolation.validate().map_err(config_error)?;

        let q = &self.quantities;
        let alpha = q.alpha.as_deref().unwrap_or("h_alpha");
        for (field, name) in [
            ("balance", q.balance.as_str()),
            ("pli", q.pli.as_str()),
            ("zres", q.zres.as_str()),
            ("gen_jer", q.gen_jer.as_str()),
            ("alpha", alpha),
        ] {
            if name.is_empty() || name.contains('/') {
                return Err(Error::Config(format!("quantity {field} has invalid name '{name}'")));
            }
        }
        for (field, name) in [("data", &self.samples.data), ("mc", &self.samples.mc)] {
            if name.is_empty() || name.contains(':') {
                return Err(Error::Config(format!("sample {field} has invalid name '{name}'")));
            }
        }
        Ok(())
    }
}
