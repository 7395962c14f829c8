use approx::assert_relative_eq;
use jer_core::{CollectingHandler, NullHandler, ReasonCode};
use jer_histogram::test_data::SyntheticSeries;
use jer_histogram::{BinnedSeries, SeriesStatistics};
use jer_spread::{
    truncate, width_series, CorrectionMode, ExtractionMethod, TruncationResult, WidthEstimator,
};
use proptest::prelude::*;

#[test]
fn all_methods_agree_on_a_clean_gaussian() {
    let series = SyntheticSeries::gaussian(80_000, 1.0, 0.1, 99);
    let truncated = truncate(&series, 98.5, &NullHandler).unwrap();
    for method in [
        ExtractionMethod::Rms,
        ExtractionMethod::GaussianFit,
        ExtractionMethod::LogNormalFit,
    ] {
        let estimator = method.build(CorrectionMode::Formula).unwrap();
        let w = estimator.estimate(&truncated, &NullHandler);
        assert_relative_eq!(w.value, 0.1, epsilon = 0.015);
        assert!(w.error > 0.0, "{method}: {w}");
    }
}

#[test]
fn batch_driver_matches_single_estimates() {
    let inputs: Vec<BinnedSeries> = (0..4)
        .map(|i| SyntheticSeries::gaussian(10_000, 1.0, 0.08 + 0.02 * i as f64, i))
        .collect();
    let bins = [(20.0, 30.0), (30.0, 50.0), (50.0, 80.0), (80.0, 120.0)];
    let estimator = ExtractionMethod::Rms.build(CorrectionMode::Formula).unwrap();
    let out = width_series(estimator.as_ref(), &inputs, &bins, Some(98.5), &NullHandler).unwrap();

    for (i, input) in inputs.iter().enumerate() {
        let single = estimator.estimate(&truncate(input, 98.5, &NullHandler).unwrap(), &NullHandler);
        assert_eq!(out.bins()[i].content, single.value);
        assert_eq!(out.bins()[i].error, single.error);
    }
}

#[test]
fn unsorted_kinematic_bins_land_in_their_own_bin() {
    let inputs = vec![
        SyntheticSeries::gaussian(10_000, 1.0, 0.2, 1),
        SyntheticSeries::gaussian(10_000, 1.0, 0.1, 2),
    ];
    let bins = [(100.0, 200.0), (50.0, 100.0)];
    let out = width_series(
        &*ExtractionMethod::Rms.build(CorrectionMode::Disabled).unwrap(),
        &inputs,
        &bins,
        None,
        &NullHandler,
    )
    .unwrap();
    assert_eq!(out.edges(), &[50.0, 100.0, 200.0]);
    assert!(out.bins()[0].content < out.bins()[1].content);
}

#[test]
fn empty_input_yields_zero_and_diagnostic() {
    let handler = CollectingHandler::new();
    let empty = BinnedSeries::uniform(100, 0.0, 2.0).unwrap();
    let out = width_series(
        &*ExtractionMethod::GaussianFit.build(CorrectionMode::Formula).unwrap(),
        &[empty],
        &[(0.0, 1.0)],
        Some(98.5),
        &handler,
    )
    .unwrap();
    assert!(out.bins()[0].is_zero());
    assert!(handler.contains(ReasonCode::LowStatistics));
}

proptest! {
    #[test]
    fn truncation_window_is_symmetric_and_ordered(
        contents in prop::collection::vec(0.0f64..100.0, 3..40),
        target in 0.0f64..100.0,
    ) {
        let edges: Vec<f64> = (0..=contents.len()).map(|i| i as f64).collect();
        let series = BinnedSeries::from_contents(edges, &contents).unwrap();
        let t = truncate(&series, target, &NullHandler).unwrap();
        if series.integral() > 0.0 {
            let (first, last) = t.series.range().unwrap();
            let mean_bin = series.find_bin_clamped(series.mean());
            prop_assert_eq!(mean_bin - first, last - mean_bin);
            prop_assert!(t.range_min <= t.range_max);
            prop_assert!(t.achieved_fraction <= 100.0 + 1e-9);
            // Contents are untouched
            prop_assert_eq!(t.series.contents(), series.contents());
        } else {
            prop_assert_eq!(t.achieved_fraction, 0.0);
        }
    }

    #[test]
    fn untruncated_rms_is_std_dev(seed in 0u64..50) {
        let series = SyntheticSeries::gaussian(2_000, 1.0, 0.1, seed);
        let w = jer_spread::TruncatedRms::default()
            .estimate(&TruncationResult::untruncated(&series), &NullHandler);
        prop_assert!((w.value - series.std_dev()).abs() < 1e-12);
    }
}
