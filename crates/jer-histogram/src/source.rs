//! Access to series owned by a storage collaborator

use crate::series::Series;
use jer_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Address of a stored series: `sample:segment/.../quantity`
///
/// The sample identifies the input (data, simulation, correction level),
/// segments name kinematic bins, and the last component is the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesPath {
    pub sample: String,
    pub segments: Vec<String>,
    pub quantity: String,
}

impl SeriesPath {
    pub fn new(sample: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            segments: Vec::new(),
            quantity: quantity.into(),
        }
    }

    /// Append a kinematic-bin segment
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Same path with every segment from `segments` appended
    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for SeriesPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.sample)?;
        for segment in &self.segments {
            write!(f, "{segment}/")?;
        }
        write!(f, "{}", self.quantity)
    }
}

impl FromStr for SeriesPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (sample, rest) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidInput(format!("series path '{s}' has no sample prefix")))?;
        let mut parts: Vec<&str> = rest.split('/').collect();
        let quantity = parts.pop().unwrap_or_default();
        if sample.is_empty() || quantity.is_empty() || parts.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidInput(format!(
                "series path '{s}' has an empty component"
            )));
        }
        Ok(Self {
            sample: sample.to_string(),
            segments: parts.into_iter().map(String::from).collect(),
            quantity: quantity.to_string(),
        })
    }
}

/// Resolves paths to series
pub trait SeriesSource {
    /// Look up a series, failing with [`Error::NotFound`] when absent
    fn resolve(&self, path: &SeriesPath) -> Result<Series>;
}

/// In-memory series store
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<SeriesPath, Series>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series, replacing any previous one at the same path
    pub fn insert(&mut self, path: SeriesPath, series: impl Into<Series>) {
        self.entries.insert(path, series.into());
    }

    /// Store a series under a textual path
    pub fn insert_str(&mut self, path: &str, series: impl Into<Series>) -> Result<()> {
        self.insert(path.parse()?, series);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SeriesSource for MemorySource {
    fn resolve(&self, path: &SeriesPath) -> Result<Series> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinnedSeries;

    #[test]
    fn test_path_round_trip() {
        let path: SeriesPath = "data_L1L2Res:zpt_30_50/eta_00_13/alpha_010/h_ptbalance".parse().unwrap();
        assert_eq!(path.sample, "data_L1L2Res");
        assert_eq!(path.segments, vec!["zpt_30_50", "eta_00_13", "alpha_010"]);
        assert_eq!(path.quantity, "h_ptbalance");
        assert_eq!(
            path.to_string(),
            "data_L1L2Res:zpt_30_50/eta_00_13/alpha_010/h_ptbalance"
        );
    }

    #[test]
    fn test_path_builder() {
        let path = SeriesPath::new("mc", "h_zres")
            .segment("zpt_30_50")
            .with_segments(["eta_00_13"]);
        assert_eq!(path.to_string(), "mc:zpt_30_50/eta_00_13/h_zres");
        let bare: SeriesPath = "mc:h_zres".parse().unwrap();
        assert!(bare.segments.is_empty());
    }

    #[test]
    fn test_invalid_paths() {
        assert!("no_sample/h".parse::<SeriesPath>().is_err());
        assert!(":a/h".parse::<SeriesPath>().is_err());
        assert!("mc:a//h".parse::<SeriesPath>().is_err());
        assert!("mc:a/".parse::<SeriesPath>().is_err());
    }

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new();
        let s = BinnedSeries::from_contents(vec![0.0, 1.0], &[4.0]).unwrap();
        source.insert_str("mc:bin/h", s.clone()).unwrap();
        assert_eq!(source.len(), 1);

        let found = source.resolve(&"mc:bin/h".parse().unwrap()).unwrap();
        assert_eq!(found, Series::Binned(s));

        let missing = source.resolve(&"mc:bin/x".parse().unwrap()).unwrap_err();
        assert!(matches!(missing, Error::NotFound(_)));
    }
}
