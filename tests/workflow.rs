//! End-to-end alpha extrapolation on synthetic Z+jet-like inputs
//!
//! Every cell `(x, y)` holds, per alpha bin, Gaussian balance, particle-level
//! imbalance, reference resolution and generator-level resolution
//! distributions whose widths follow known functions of alpha.

use approx::assert_relative_eq;
use jer_histogram::test_data::SyntheticSeries;
use jer_histogram::{Bin, BinnedSeries, MemorySource, SeriesPath};
use jer_toolkit::prelude::*;
use jer_toolkit::spread::ExtractionMethod;
use std::sync::Arc;

const JER_INTERCEPT: f64 = 0.10;
const JER_SLOPE: f64 = 0.2;
const PLI_SLOPE: f64 = 0.3;
const ZRES: f64 = 0.02;
const DATA_SCALE: f64 = 1.1;
const EVENTS: usize = 20_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config() -> WorkflowConfig {
    WorkflowConfig::default()
        .with_truncation(None)
        .with_x_bins(vec![NamedBin::new("zpt_30_60", 30.0, 60.0), NamedBin::new("zpt_60_120", 60.0, 120.0)])
        .with_y_bins(vec![NamedBin::new("eta_00_13", 0.0, 1.3), NamedBin::new("eta_13_25", 1.3, 2.5)])
}

fn jer(alpha: f64) -> f64 {
    JER_INTERCEPT + JER_SLOPE * alpha
}

/// Alpha distribution flat inside `[lo, hi]`
fn alpha_histogram(lo: f64, hi: f64) -> BinnedSeries {
    let mut series = BinnedSeries::uniform(60, 0.0, 0.3).unwrap();
    let centers = series.centers();
    for (bin, x) in series.bins_mut().iter_mut().zip(centers) {
        if x > lo && x < hi {
            *bin = Bin::new(100.0, 10.0);
        }
    }
    series
}

fn insert(source: &mut MemorySource, path: String, series: BinnedSeries) {
    let path: SeriesPath = path.parse().unwrap();
    source.insert(path, series);
}

fn build_source(config: &WorkflowConfig) -> MemorySource {
    let mut source = MemorySource::new();
    let q = &config.quantities;
    let alpha_quantity = q.alpha.clone().unwrap();
    let mut seed = 0u64;
    let mut next_seed = || {
        seed += 1;
        seed
    };

    for x in &config.x_bins {
        for y in &config.y_bins {
            for alpha in &config.alpha_bins {
                let center = 0.5 * (alpha.lo + alpha.hi);
                let prefix = |sample: &str| format!("{sample}:{}/{}/{}", x.name, y.name, alpha.name);
                let pli = PLI_SLOPE * center;
                let mc_balance = (jer(center).powi(2) + pli.powi(2) + ZRES.powi(2)).sqrt();
                let data_balance = ((DATA_SCALE * jer(center)).powi(2) + pli.powi(2) + ZRES.powi(2)).sqrt();

                let mc = prefix("mc");
                let data = prefix("data");
                insert(&mut source, format!("{mc}/{}", q.balance), SyntheticSeries::gaussian(EVENTS, 1.0, mc_balance, next_seed()));
                insert(&mut source, format!("{mc}/{}", q.pli), SyntheticSeries::gaussian(EVENTS, 1.0, pli, next_seed()));
                insert(&mut source, format!("{mc}/{}", q.zres), SyntheticSeries::gaussian(EVENTS, 1.0, ZRES, next_seed()));
                insert(&mut source, format!("{mc}/{}", q.gen_jer), SyntheticSeries::gaussian(EVENTS, 1.0, jer(center), next_seed()));
                insert(&mut source, format!("{data}/{}", q.balance), SyntheticSeries::gaussian(EVENTS, 1.0, data_balance, next_seed()));
                insert(&mut source, format!("{mc}/{alpha_quantity}"), alpha_histogram(alpha.lo, alpha.hi));
                insert(&mut source, format!("{data}/{alpha_quantity}"), alpha_histogram(alpha.lo, alpha.hi));
            }
        }
    }
    source
}

#[test]
fn test_alpha_dependence_follows_generated_widths() {
    init_tracing();
    let config = config();
    let source = build_source(&config);
    let workflow = JerWorkflow::new(config.clone()).unwrap();

    let widths = workflow.generator_resolution(&source, &["zpt_30_60", "eta_00_13"]).unwrap();
    assert_eq!(widths.len(), config.alpha_bins.len());
    for (i, alpha) in config.alpha_bins.iter().enumerate() {
        let expected = jer(0.5 * (alpha.lo + alpha.hi));
        assert_relative_eq!(widths.bins()[i].content, expected, epsilon = 0.004);
        assert!(widths.bins()[i].error > 0.0);
    }
}

#[test]
fn test_alpha_positions_are_bin_means() {
    let config = config();
    let source = build_source(&config);
    let workflow = JerWorkflow::new(config.clone()).unwrap();

    let positions = workflow
        .alpha_positions(&source, "mc", &["zpt_30_60", "eta_00_13"])
        .unwrap()
        .unwrap();
    for (i, alpha) in config.alpha_bins.iter().enumerate() {
        assert_relative_eq!(positions.bins()[i].content, 0.5 * (alpha.lo + alpha.hi), epsilon = 1e-9);
        assert!(positions.bins()[i].error > 0.0);
    }
}

#[test]
fn test_extracted_resolution_recovers_jer() {
    let config = config();
    let source = build_source(&config);
    let workflow = JerWorkflow::new(config.clone()).unwrap();

    let extracted = workflow
        .extracted_resolution(&source, "mc", &["zpt_60_120", "eta_13_25"])
        .unwrap();
    assert!(extracted.is_complete());
    for (i, alpha) in config.alpha_bins.iter().enumerate() {
        let expected = jer(0.5 * (alpha.lo + alpha.hi));
        assert_relative_eq!(extracted.output.bins()[i].content, expected, epsilon = 0.006);
    }

    let closure = workflow.closure(&source, &["zpt_60_120", "eta_13_25"]).unwrap();
    let ratios = closure.output.as_binned().unwrap();
    assert!(ratios.bins().iter().all(|b| (b.content - 1.0).abs() < 0.06));
}

#[test]
fn test_extrapolation_with_band() {
    let config = config();
    let source = build_source(&config);
    let workflow = JerWorkflow::new(config.clone()).unwrap();

    let result = workflow.extrapolate(&source, "mc", &["zpt_30_60", "eta_00_13"]).unwrap();
    assert!(matches!(result.input, Series::Points(_)));
    let (intercept, error) = result.intercept();
    assert_relative_eq!(intercept, JER_INTERCEPT, epsilon = 0.01);
    assert!(error > 0.0);
    assert_eq!(result.band.len(), config.extrapolation.band_points);
    assert_relative_eq!(result.band.points[0].y, intercept, epsilon = 1e-12);
}

#[test]
fn test_extrapolated_resolution_one_and_two_dimensional() {
    init_tracing();
    let config = config();
    let source = build_source(&config);
    let handler = Arc::new(CollectingHandler::new());
    let workflow = JerWorkflow::new(config).unwrap().with_diagnostics(handler.clone());

    let along_pt = workflow.extrapolated_resolution(&source, "mc", &["eta_00_13"]).unwrap();
    assert_eq!(along_pt.edges(), &[30.0, 60.0, 120.0]);
    for bin in along_pt.bins() {
        assert_relative_eq!(bin.content, JER_INTERCEPT, epsilon = 0.01);
    }

    let map = workflow.extrapolated_resolution_2d(&source, "mc").unwrap();
    assert_eq!(map.shape(), (2, 2));
    assert_relative_eq!(map.bin(0, 0).unwrap().content, along_pt.bins()[0].content, epsilon = 1e-12);
    assert_relative_eq!(map.bin(1, 1).unwrap().content, JER_INTERCEPT, epsilon = 0.01);

    assert!(handler.at_least(Severity::Warning).is_empty());
}

#[test]
fn test_data_mc_scale_factor() {
    let config = config();
    let source = build_source(&config);
    let workflow = JerWorkflow::new(config).unwrap();

    let sf = workflow.data_mc_scale_factor(&source, &["eta_13_25"]).unwrap();
    assert!(sf.is_complete());
    let binned = sf.output.as_binned().unwrap();
    for bin in binned.bins() {
        assert_relative_eq!(bin.content, DATA_SCALE, epsilon = 0.06);
    }
}

#[test]
fn test_gaussian_method_with_truncation() {
    let config = config()
        .with_method(ExtractionMethod::GaussianFit)
        .with_truncation(Some(98.5));
    let source = build_source(&config);
    let workflow = JerWorkflow::new(config).unwrap();

    let result = workflow.extrapolate(&source, "mc", &["zpt_60_120", "eta_00_13"]).unwrap();
    assert!(result.fit.is_some());
    assert_relative_eq!(result.intercept().0, JER_INTERCEPT, epsilon = 0.015);
}

#[test]
fn test_without_alpha_quantity_fits_bin_centers() {
    let mut config = config();
    config.quantities.alpha = None;
    let source = build_source(&WorkflowConfig::default().with_x_bins(config.x_bins.clone()).with_y_bins(config.y_bins.clone()));
    let workflow = JerWorkflow::new(config).unwrap();

    let result = workflow.extrapolate(&source, "mc", &["zpt_30_60", "eta_13_25"]).unwrap();
    assert!(matches!(result.input, Series::Binned(_)));
    assert_relative_eq!(result.intercept().0, JER_INTERCEPT, epsilon = 0.01);
}

#[test]
fn test_missing_subtrahend_aborts() {
    let config = config();
    let mut source = MemorySource::new();
    let alpha = &config.alpha_bins[0];
    source
        .insert_str(
            &format!("mc:zpt_30_60/eta_00_13/{}/h_ptbalance_weight", alpha.name),
            SyntheticSeries::gaussian(1000, 1.0, 0.1, 1),
        )
        .unwrap();
    let workflow = JerWorkflow::new(config).unwrap();
    let err = workflow
        .extracted_resolution(&source, "mc", &["zpt_30_60", "eta_00_13"])
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_config_from_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("jer_workflow_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "method": "R", "truncation": 95.0, "band_points": 20 }"#)?;
    let config = WorkflowConfig::from_path(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(config.truncation, Some(95.0));
    assert_eq!(config.extrapolation.band_points, 20);
    let workflow = JerWorkflow::new(config)?;
    assert_eq!(workflow.estimator().name(), "truncated_rms");
    Ok(())
}
