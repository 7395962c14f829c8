use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jer_core::NullHandler;
use jer_histogram::test_data::SyntheticSeries;
use jer_spread::{
    default_scan_edges, truncate, truncation_scan, GaussianWidth, LogNormalWidth, TruncatedRms,
    WidthEstimator,
};

fn bench_truncation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Truncation");
    for &target in &[70.0, 90.0, 98.5] {
        let series = SyntheticSeries::gaussian_with_tails(100_000, 1.0, 0.1, 42);
        group.bench_with_input(BenchmarkId::new("truncate", target), &series, |b, s| {
            b.iter(|| truncate(black_box(s), target, &NullHandler))
        });
    }
    group.finish();
}

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("WidthEstimators");
    let series = SyntheticSeries::gaussian(100_000, 1.0, 0.1, 42);
    let truncated = truncate(&series, 98.5, &NullHandler).unwrap();

    let estimators: Vec<Box<dyn WidthEstimator>> = vec![
        Box::new(TruncatedRms::default()),
        Box::new(GaussianWidth::new()),
        Box::new(LogNormalWidth::new()),
    ];
    for estimator in &estimators {
        group.bench_function(estimator.name(), |b| {
            b.iter(|| estimator.estimate(black_box(&truncated), &NullHandler))
        });
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let series = SyntheticSeries::gaussian(100_000, 1.0, 0.1, 42);
    let edges = default_scan_edges().unwrap();
    let rms = TruncatedRms::default();
    c.bench_function("truncation_scan/rms", |b| {
        b.iter(|| truncation_scan(black_box(&series), &rms, &edges, &NullHandler))
    });
}

criterion_group!(benches, bench_truncation, bench_estimators, bench_scan);
criterion_main!(benches);
