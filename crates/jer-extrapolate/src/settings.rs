//! Extrapolation parameters

use jer_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the straight-line extrapolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrapolationSettings {
    /// Inclusive x-interval the line is fitted over
    pub fit_range: (f64, f64),
    /// Number of points in a confidence band
    pub band_points: usize,
    /// Confidence level of the band
    pub confidence_level: f64,
}

impl Default for ExtrapolationSettings {
    fn default() -> Self {
        Self {
            fit_range: (0.0, 0.3),
            band_points: 100,
            confidence_level: 0.683,
        }
    }
}

impl ExtrapolationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fit_range(mut self, min: f64, max: f64) -> Self {
        self.fit_range = (min, max);
        self
    }

    pub fn with_band_points(mut self, n: usize) -> Self {
        self.band_points = n;
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.fit_range;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(Error::InvalidParameter(format!(
                "fit range [{min}, {max}] is empty"
            )));
        }
        if self.band_points == 0 {
            return Err(Error::InvalidParameter(
                "band_points must be positive".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_validation() {
        let s = ExtrapolationSettings::default();
        assert_eq!(s.band_points, 100);
        assert_eq!(s.confidence_level, 0.683);
        assert!(s.validate().is_ok());
        assert!(s.with_fit_range(0.3, 0.1).validate().is_err());
        assert!(s.with_band_points(0).validate().is_err());
        assert!(s.with_confidence_level(1.0).validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let s: ExtrapolationSettings = serde_json::from_str(r#"{"fit_range": [0.05, 0.25]}"#).unwrap();
        assert_eq!(s.fit_range, (0.05, 0.25));
        assert_eq!(s.band_points, 100);
    }
}
