//! Alpha-extrapolation workflow
//!
//! Stored distributions live at `"{sample}:{segments...}/{alpha}/{quantity}"`,
//! where the segments name kinematic bins (reference-object pT first, then
//! jet pseudorapidity) and `{alpha}` is one of the configured alpha bins.
//! [`JerWorkflow`] turns them into widths versus alpha, removes the known
//! contributions in quadrature and extrapolates the remainder to zero
//! additional activity.

use crate::config::{kinematic_bins, NamedBin, WorkflowConfig};
use jer_combine::{quadratic_subtraction, ratio, Combination};
use jer_core::{DiagnosticHandler, LoggingHandler, NullHandler, Result};
use jer_extrapolate::{confidence_band, extrapolate_intercept, extrapolate_intercept_2d, fit_line};
use jer_fit::LinearFit;
use jer_histogram::{
    points_from_series, BinnedSeries, BinnedSeries2D, PointSeries, Series, SeriesPath, SeriesSource,
};
use jer_spread::{mean_series, width_series, WidthEstimator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Line fit of one extracted resolution versus alpha
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrapolation {
    /// Series the line was fitted to
    pub input: Series,
    /// `None` when the fit was skipped or failed
    pub fit: Option<LinearFit>,
    /// Confidence band over the fit range, all zero without a fit
    pub band: PointSeries,
}

impl Extrapolation {
    /// Resolution at zero alpha and its error, `(0, 0)` without a fit
    pub fn intercept(&self) -> (f64, f64) {
        self.fit.map_or((0.0, 0.0), |f| (f.intercept, f.intercept_error))
    }
}

/// Drives width extraction, subtraction and extrapolation against a source
pub struct JerWorkflow {
    config: WorkflowConfig,
    estimator: Box<dyn WidthEstimator>,
    diagnostics: Arc<dyn DiagnosticHandler>,
}

impl std::fmt::Debug for JerWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JerWorkflow")
            .field("config", &self.config)
            .field("estimator", &self.estimator.name())
            .finish()
    }
}

impl JerWorkflow {
    /// Validate `config` and build its width estimator
    ///
    /// Diagnostics go to a [`LoggingHandler`] until replaced with
    /// [`JerWorkflow::with_diagnostics`].
    pub fn new(config: WorkflowConfig) -> Result<Self> {
        config.validate()?;
        let estimator = config.method.build(config.correction)?;
        Ok(Self {
            config,
            estimator,
            diagnostics: Arc::new(LoggingHandler::new()),
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticHandler>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn estimator(&self) -> &dyn WidthEstimator {
        self.estimator.as_ref()
    }

    fn diagnostics(&self) -> &dyn DiagnosticHandler {
        self.diagnostics.as_ref()
    }

    /// One path per alpha bin below `segments`
    pub fn alpha_paths(&self, sample: &str, segments: &[&str], quantity: &str) -> Vec<SeriesPath> {
        self.config
            .alpha_bins
            .iter()
            .map(|alpha| {
                SeriesPath::new(sample, quantity)
                    .with_segments(segments.iter().copied())
                    .segment(alpha.name.as_str())
            })
            .collect()
    }

    fn resolve_alpha_inputs(
        &self,
        source: &dyn SeriesSource,
        sample: &str,
        segments: &[&str],
        quantity: &str,
    ) -> Result<Vec<BinnedSeries>> {
        self.alpha_paths(sample, segments, quantity)
            .iter()
            .map(|path| -> Result<BinnedSeries> {
                let series = source.resolve(path)?;
                Ok(series.expect_binned("alpha_dependence")?.clone())
            })
            .collect()
    }

    /// Width of `quantity` in every alpha bin
    pub fn alpha_dependence(
        &self,
        source: &dyn SeriesSource,
        sample: &str,
        segments: &[&str],
        quantity: &str,
    ) -> Result<BinnedSeries> {
        let inputs = self.resolve_alpha_inputs(source, sample, segments, quantity)?;
        let widths = width_series(
            self.estimator(),
            &inputs,
            &kinematic_bins(&self.config.alpha_bins),
            self.config.truncation,
            self.diagnostics(),
        )?;
        debug!(sample, ?segments, quantity, estimator = self.estimator.name(), "Alpha dependence extracted");
        Ok(widths)
    }

    /// Mean alpha per alpha bin with the spread as error
    ///
    /// `None` when no alpha quantity is configured.
    pub fn alpha_positions(
        &self,
        source: &dyn SeriesSource,
        sample: &str,
        segments: &[&str],
    ) -> Result<Option<BinnedSeries>> {
        let Some(quantity) = self.config.quantities.alpha.as_deref() else {
            return Ok(None);
        };
        let inputs = self.resolve_alpha_inputs(source, sample, segments, quantity)?;
        let means = mean_series(&inputs, &kinematic_bins(&self.config.alpha_bins), self.diagnostics())?;
        Ok(Some(means))
    }

    /// Balance width of `sample` with particle-level imbalance and
    /// reference-object resolution from simulation removed in quadrature
    pub fn extracted_resolution(
        &self,
        source: &dyn SeriesSource,
        sample: &str,
        segments: &[&str],
    ) -> Result<Combination<BinnedSeries>> {
        let q = &self.config.quantities;
        let mc = self.config.samples.mc.as_str();
        let balance = self.alpha_dependence(source, sample, segments, &q.balance)?;
        let pli = self.alpha_dependence(source, mc, segments, &q.pli)?;
        let zres = self.alpha_dependence(source, mc, segments, &q.zres)?;
        quadratic_subtraction(&balance, &[pli, zres], self.diagnostics())
    }

    /// Generator-level jet resolution versus alpha
    pub fn generator_resolution(&self, source: &dyn SeriesSource, segments: &[&str]) -> Result<BinnedSeries> {
        let mc = self.config.samples.mc.as_str();
        self.alpha_dependence(source, mc, segments, &self.config.quantities.gen_jer)
    }

    /// Extracted resolution of simulation over the generator-level resolution
    pub fn closure(&self, source: &dyn SeriesSource, segments: &[&str]) -> Result<Combination<Series>> {
        let extracted = self
            .extracted_resolution(source, &self.config.samples.mc, segments)?
            .into_output();
        let generated = self.generator_resolution(source, segments)?;
        ratio(&extracted.into(), &generated.into(), self.diagnostics())
    }

    /// Extracted resolution placed at the mean alpha of each alpha bin
    ///
    /// Without an alpha quantity the binned series is returned and fits use
    /// alpha bin centers.
    pub fn extrapolation_input(
        &self,
        source: &dyn SeriesSource,
        sample: &str,
        segments: &[&str],
    ) -> Result<Series> {
        let extracted = self.extracted_resolution(source, sample, segments)?.into_output();
        match self.alpha_positions(source, sample, segments)? {
            Some(alpha) => Ok(Series::Points(points_from_series(&extracted, &alpha)?)),
            None => Ok(Series::Binned(extracted)),
        }
    }

    /// Line fit of the extracted resolution versus alpha, with its band
    pub fn extrapolate(&self, source: &dyn SeriesSource, sample: &str, segments: &[&str]) -> Result<Extrapolation> {
        let settings = &self.config.extrapolation;
        let (min, max) = settings.fit_range;
        let input = self.extrapolation_input(source, sample, segments)?;
        let fit = fit_line(&input, settings.fit_range, "extrapolate", None, self.diagnostics());

        // A skipped fit has been reported once already
        let band_diagnostics: &dyn DiagnosticHandler = if fit.is_some() { self.diagnostics() } else { &NullHandler };
        let band = confidence_band(
            &input,
            min,
            max,
            settings.band_points,
            settings.confidence_level,
            band_diagnostics,
        )?;
        Ok(Extrapolation { input, fit, band })
    }

    fn segments_for<'a>(bins: &'a [&'a NamedBin], fixed: &'a [&'a str]) -> Vec<&'a str> {
        bins.iter().map(|b| b.name.as_str()).chain(fixed.iter().copied()).collect()
    }

    /// Resolution at zero alpha versus the first kinematic axis
    ///
    /// `fixed` are the segments following the first-axis bin, typically one
    /// pseudorapidity bin.
    pub fn extrapolated_resolution(
        &self,
        source: &dyn SeriesSource,
        sample: &str,
        fixed: &[&str],
    ) -> Result<BinnedSeries> {
        let inputs = self
            .config
            .x_bins
            .iter()
            .map(|x| self.extrapolation_input(source, sample, &Self::segments_for(&[x], fixed)))
            .collect::<Result<Vec<_>>>()?;
        let (min, max) = self.config.extrapolation.fit_range;
        extrapolate_intercept(&inputs, &kinematic_bins(&self.config.x_bins), min, max, self.diagnostics())
    }

    /// Resolution at zero alpha over both kinematic axes
    pub fn extrapolated_resolution_2d(&self, source: &dyn SeriesSource, sample: &str) -> Result<BinnedSeries2D> {
        let grid = self
            .config
            .y_bins
            .iter()
            .map(|y| {
                self.config
                    .x_bins
                    .iter()
                    .map(|x| self.extrapolation_input(source, sample, &Self::segments_for(&[x, y], &[])))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let (min, max) = self.config.extrapolation.fit_range;
        let output = extrapolate_intercept_2d(
            &grid,
            &kinematic_bins(&self.config.x_bins),
            &kinematic_bins(&self.config.y_bins),
            min,
            max,
            self.diagnostics(),
        )?;
        info!(sample, shape = ?output.shape(), "Extrapolated resolution map");
        Ok(output)
    }

    /// Ratio of a data resolution to the simulated one
    pub fn scale_factor(&self, data: &Series, mc: &Series) -> Result<Combination<Series>> {
        ratio(data, mc, self.diagnostics())
    }

    /// Data/simulation ratio of the extrapolated resolutions along the first axis
    pub fn data_mc_scale_factor(&self, source: &dyn SeriesSource, fixed: &[&str]) -> Result<Combination<Series>> {
        let samples = &self.config.samples;
        let data = self.extrapolated_resolution(source, &samples.data, fixed)?;
        let mc = self.extrapolated_resolution(source, &samples.mc, fixed)?;
        self.scale_factor(&data.into(), &mc.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jer_core::Error;
    use jer_histogram::MemorySource;
    use jer_spread::{CorrectionMode, ExtractionMethod};

    #[test]
    fn test_alpha_paths() {
        let workflow = JerWorkflow::new(WorkflowConfig::default()).unwrap();
        let paths = workflow.alpha_paths("data", &["zpt_30_50", "eta_00_05"], "h_ptbalance_weight");
        assert_eq!(paths.len(), 6);
        assert_eq!(
            paths[0].to_string(),
            "data:zpt_30_50/eta_00_05/alpha_000_005/h_ptbalance_weight"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WorkflowConfig::default()
            .with_method(ExtractionMethod::Rms)
            .with_correction(CorrectionMode::GaussianRefit);
        assert!(matches!(JerWorkflow::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_series_propagates() {
        let workflow = JerWorkflow::new(WorkflowConfig::default()).unwrap();
        let err = workflow
            .alpha_dependence(&MemorySource::new(), "data", &["zpt_30_50"], "h_ptbalance_weight")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_point_series_rejected_as_distribution() {
        let config = WorkflowConfig::default().with_alpha_bins(vec![NamedBin::new("a", 0.0, 0.1)]);
        let workflow = JerWorkflow::new(config).unwrap();
        let mut source = MemorySource::new();
        source
            .insert_str(
                "data:a/h_ptbalance_weight",
                jer_histogram::PointSeries::new(vec![jer_histogram::Point::new(1.0, 1.0, 0.0, 0.0)]),
            )
            .unwrap();
        let err = workflow
            .alpha_dependence(&source, "data", &[], "h_ptbalance_weight")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
