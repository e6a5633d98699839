//! Truncation benchmarks

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sparsekit_core::{
    Comparison, Key, SparseVector, ThresholdTruncator, TopNTruncator, VectorTruncator, VectorView,
};

fn scored_vector(size: usize, seed: u64) -> SparseVector {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size as Key)
        .map(|k| (k * 3, rng.random_range(0.0..5.0)))
        .collect()
}

fn bench_top_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_n");
    let v = scored_vector(100_000, 42);

    group.throughput(Throughput::Elements(v.size() as u64));
    for &n in &[10usize, 100, 1_000] {
        let truncator = TopNTruncator::new(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &truncator, |b, t| {
            b.iter(|| black_box(t.truncate(&v).size()))
        });
    }

    group.finish();
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold");
    let v = scored_vector(100_000, 7);

    group.throughput(Throughput::Elements(v.size() as u64));
    for &cutoff in &[1.0f64, 4.5] {
        let truncator = ThresholdTruncator::with_comparison(cutoff, Comparison::AtLeast);
        group.bench_with_input(BenchmarkId::new("vector", cutoff), &truncator, |b, t| {
            b.iter(|| black_box(t.truncate(&v).size()))
        });
        let map = v.to_map();
        group.bench_with_input(BenchmarkId::new("map", cutoff), &truncator, |b, t| {
            b.iter(|| black_box(t.truncate_map(&map).len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_top_n, bench_threshold);
criterion_main!(benches);
