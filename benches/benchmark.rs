//! Criterion benchmarks for local regression and k-NN estimation.
//!
//! Benchmarks cover:
//! - Scalability of plain and robust local regression
//! - Span and robustness iteration count
//! - Polynomial degree and feature dimensionality
//! - Distance metrics and neighbor search strategies
//! - k-NN classification and k selection by cross-validation
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use loess_knn::prelude::*;
use rand::prelude::*;
use rand_distr::{Normal, Uniform};
use std::f64::consts::PI;
use std::hint::black_box;

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Smooth sinusoidal data with Gaussian noise.
fn generate_sine_data(size: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise_dist = Normal::new(0.0, 0.2).unwrap();

    let x: Vec<f64> = (0..size).map(|i| i as f64 * 10.0 / size as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| xi.sin() + noise_dist.sample(&mut rng))
        .collect();
    (x, y)
}

/// Sine data where 5% of points are shifted by a uniform outlier.
fn generate_outlier_data(size: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let outlier_dist = Uniform::new(-5.0, 5.0).unwrap();
    let (x, mut y) = generate_sine_data(size, seed);

    for _ in 0..size / 20 {
        let idx = rng.random_range(0..size);
        y[idx] += outlier_dist.sample(&mut rng);
    }
    (x, y)
}

/// Noisy sombrero surface on a square grid.
fn generate_2d_data(size: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise_dist = Normal::new(0.0, 0.1).unwrap();
    let side = (size as f64).sqrt() as usize;

    let mut x_flat = Vec::with_capacity(side * side * 2);
    let mut y = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            let u = (i as f64 / side as f64) * 4.0 - 2.0;
            let v = (j as f64 / side as f64) * 4.0 - 2.0;
            x_flat.push(u);
            x_flat.push(v);
            let r = (u * u + v * v).sqrt();
            let z = if r == 0.0 { 1.0 } else { (r * PI).sin() / (r * PI) };
            y.push(z + noise_dist.sample(&mut rng));
        }
    }
    (x_flat, y)
}

/// Radial response on a unit cube grid.
fn generate_3d_data(size: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise_dist = Normal::new(0.0, 0.1).unwrap();
    let side = (size as f64).cbrt() as usize;

    let mut x_flat = Vec::with_capacity(side * side * side * 3);
    let mut y = Vec::with_capacity(side * side * side);
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                let p = [i, j, k].map(|c| c as f64 / side as f64);
                x_flat.extend_from_slice(&p);
                let val = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
                y.push(val + noise_dist.sample(&mut rng));
            }
        }
    }
    (x_flat, y)
}

/// Gaussian blobs in 2D, one class label per blob.
fn generate_blobs(size: usize, classes: usize, seed: u64) -> (Vec<f64>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = Normal::new(0.0, 1.0).unwrap();

    let mut features = Vec::with_capacity(size * 2);
    let mut labels = Vec::with_capacity(size);
    for i in 0..size {
        let class = i % classes;
        let angle = 2.0 * PI * class as f64 / classes as f64;
        features.push(4.0 * angle.cos() + spread.sample(&mut rng));
        features.push(4.0 * angle.sin() + spread.sample(&mut rng));
        labels.push(class);
    }
    (features, labels)
}

// ============================================================================
// Local Regression Benchmarks
// ============================================================================

fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");
    group.sample_size(20);

    for size in [500, 1_000, 5_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        let (x, y) = generate_sine_data(size, 42);

        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| {
                Loess::new()
                    .fraction(0.05)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("robust", size), &size, |b, _| {
            b.iter(|| {
                Loess::new()
                    .fraction(0.05)
                    .robust(true)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_fraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("fraction");
    group.sample_size(20);
    let (x, y) = generate_sine_data(2_000, 42);

    for frac in [0.05, 0.1, 0.2, 0.5] {
        group.bench_with_input(BenchmarkId::from_parameter(frac), &frac, |b, &frac| {
            b.iter(|| {
                Loess::new()
                    .fraction(frac)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterations");
    group.sample_size(20);
    let (x, y) = generate_outlier_data(2_000, 42);

    for iter in [0, 1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(iter), &iter, |b, &iter| {
            b.iter(|| {
                Loess::new()
                    .fraction(0.1)
                    .iterations(iter)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.bench_function("auto_converge", |b| {
        b.iter(|| {
            Loess::new()
                .fraction(0.1)
                .iterations(8)
                .auto_converge(1e-4)
                .build()
                .unwrap()
                .fit(black_box(&x), black_box(&y))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_degrees(c: &mut Criterion) {
    let mut group = c.benchmark_group("degree");
    group.sample_size(20);
    let (x, y) = generate_sine_data(2_000, 42);

    for (name, degree) in [("constant", Constant), ("linear", Linear), ("quadratic", Quadratic)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                Loess::new()
                    .fraction(0.1)
                    .degree(degree)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_dimensions(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimensions");
    group.sample_size(10);

    let (x2, y2) = generate_2d_data(2_500, 42);
    group.bench_function("2d", |b| {
        b.iter(|| {
            Loess::new()
                .dimensions(2)
                .fraction(0.05)
                .build()
                .unwrap()
                .fit(black_box(&x2), black_box(&y2))
                .unwrap()
        })
    });

    let (x3, y3) = generate_3d_data(2_744, 42);
    group.bench_function("3d", |b| {
        b.iter(|| {
            Loess::new()
                .dimensions(3)
                .fraction(0.05)
                .build()
                .unwrap()
                .fit(black_box(&x3), black_box(&y3))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_metric");
    group.sample_size(10);
    let (x, y) = generate_2d_data(1_600, 42);

    let metrics = [
        ("euclidean", Euclidean),
        ("manhattan", Manhattan),
        ("chebyshev", Chebyshev),
        ("minkowski_3", Minkowski(3.0)),
        ("normalized", Normalized),
    ];
    for (name, metric) in metrics {
        group.bench_function(name, |b| {
            b.iter(|| {
                Loess::new()
                    .dimensions(2)
                    .fraction(0.05)
                    .distance_metric(metric.clone())
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

// ============================================================================
// k-NN Benchmarks
// ============================================================================

fn bench_knn_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_search");
    group.sample_size(20);

    for size in [1_000, 10_000, 50_000] {
        let (features, labels) = generate_blobs(size, 3, 7);
        let (queries, _) = generate_blobs(1_000, 3, 8);
        group.throughput(Throughput::Elements(1_000));

        for (name, strategy) in [("brute_force", SearchStrategy::BruteForce), ("kd_tree", SearchStrategy::KdTree)] {
            let classifier = Knn::new()
                .k(15)
                .dimensions(2)
                .search_strategy(strategy)
                .build()
                .unwrap()
                .fit(&features, &labels)
                .unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| classifier.classify_batch(black_box(&queries)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_cross_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_validation");
    group.sample_size(10);

    let (features, labels) = generate_blobs(2_000, 3, 7);
    let ks = [1, 5, 15, 31];
    group.bench_function("knn_kfold", |b| {
        b.iter(|| {
            Knn::new()
                .dimensions(2)
                .build()
                .unwrap()
                .cross_validate(black_box(&features), black_box(&labels), KFold(5, &ks).seed(1))
                .unwrap()
        })
    });

    let (x, y) = generate_sine_data(500, 42);
    let spans = [0.1, 0.2, 0.4];
    group.bench_function("loess_kfold", |b| {
        b.iter(|| {
            Loess::new()
                .build()
                .unwrap()
                .cross_validate(black_box(&x), black_box(&y), KFold(5, &spans).seed(1))
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scalability,
    bench_fraction,
    bench_iterations,
    bench_degrees,
    bench_dimensions,
    bench_metrics,
    bench_knn_search,
    bench_cross_validation,
);
criterion_main!(benches);
