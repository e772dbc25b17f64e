#![cfg(feature = "dev")]
//! Tests for the local regression executor.
//!
//! ## Test Organization
//!
//! 1. **Neighborhood Size** - Span to point count conversion
//! 2. **Execution** - Plain and robust runs
//! 3. **Failure Modes** - Insufficient data and rejected neighborhoods

use approx::assert_relative_eq;

use loess_knn::internals::algorithms::regression::{PolynomialDegree, ZeroWeightFallback};
use loess_knn::internals::algorithms::robustness::RobustnessMethod;
use loess_knn::internals::engine::executor::{LoessConfig, LoessExecutor};
use loess_knn::internals::math::kernel::WeightFunction;
use loess_knn::internals::math::neighborhood::SearchStrategy;
use loess_knn::internals::primitives::errors::{ErrorKind, SmoothError};

fn config(fraction: f64, degree: PolynomialDegree) -> LoessConfig<f64> {
    LoessConfig {
        fraction,
        polynomial_degree: degree,
        parallel: false,
        ..LoessConfig::default()
    }
}

// ============================================================================
// Neighborhood Size
// ============================================================================

#[test]
fn test_neighborhood_size() {
    assert_eq!(LoessExecutor::<f64>::neighborhood_size(10, 0.3), 3);
    assert_eq!(LoessExecutor::<f64>::neighborhood_size(10, 0.25), 3);
    assert_eq!(LoessExecutor::<f64>::neighborhood_size(10, 1.0), 10);
    assert_eq!(LoessExecutor::<f64>::neighborhood_size(10, 0.01), 1);
    assert_eq!(LoessExecutor::<f64>::neighborhood_size(5, 0.75), 4);
    assert_eq!(LoessExecutor::<f64>::neighborhood_size(1_000_000, 0.3), 300_000);
}

#[test]
fn test_neighborhood_size_single_precision() {
    // 0.3f32 * 100 rounds up to 30.000002
    assert_eq!(LoessExecutor::<f32>::neighborhood_size(100, 0.3), 30);
    assert_eq!(LoessExecutor::<f32>::neighborhood_size(10, 0.3), 3);
    assert_eq!(LoessExecutor::<f32>::neighborhood_size(10, 0.35), 4);
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_run_symmetric_spike() {
    let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
    let y = [0.0, 0.0, 10.0, 0.0, 0.0];
    let out = LoessExecutor::new(config(1.0, PolynomialDegree::Constant))
        .run(&x, &y, None)
        .unwrap();

    assert_eq!(out.neighborhood_size, 5);
    assert_eq!(out.iterations_used, 0);
    assert!(out.robustness_weights.is_none());
    assert!(out.query_fitted.is_none());

    let fitted = out.fitted[2];
    assert!(fitted > 0.0 && fitted < 10.0);
    assert_relative_eq!(fitted, 10.0 / (1.0 + 2.0 * 0.669921875), epsilon = 1e-12);
    assert_relative_eq!(out.residuals[2], 10.0 - fitted, epsilon = 1e-12);
}

#[test]
fn test_run_with_queries() {
    let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| 0.5 * xi - 1.0).collect();
    let out = LoessExecutor::new(config(0.4, PolynomialDegree::Linear))
        .run(&x, &y, Some(&[2.5, 10.25, 18.0][..]))
        .unwrap();

    let q = out.query_fitted.unwrap();
    assert_eq!(q.len(), 3);
    assert_relative_eq!(q[0], 0.25, epsilon = 1e-9);
    assert_relative_eq!(q[1], 4.125, epsilon = 1e-9);
    assert_relative_eq!(q[2], 8.0, epsilon = 1e-9);
    assert_eq!(out.fitted.len(), 20);
}

#[test]
fn test_query_at_observation_matches_fit() {
    let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| (xi * 0.3).sin()).collect();
    let out = LoessExecutor::new(config(0.3, PolynomialDegree::Linear))
        .run(&x, &y, Some(x.as_slice()))
        .unwrap();
    assert_eq!(out.query_fitted.unwrap(), out.fitted);
}

#[test]
fn test_robust_run_downweights_outlier() {
    let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
    let mut y: Vec<f64> = x.iter().map(|&xi| 2.0 * xi).collect();
    y[15] = 200.0;

    let plain = LoessExecutor::new(config(0.3, PolynomialDegree::Linear))
        .run(&x, &y, None)
        .unwrap();

    let robust_cfg = LoessConfig {
        iterations: 4,
        ..config(0.3, PolynomialDegree::Linear)
    };
    let robust = LoessExecutor::new(robust_cfg).run(&x, &y, None).unwrap();

    // The neighbor of the outlier is pulled less by the robust fit
    let plain_err = (plain.fitted[14] - 28.0).abs();
    let robust_err = (robust.fitted[14] - 28.0).abs();
    assert!(robust_err < plain_err);
    assert!(robust_err < 1e-6);

    let weights = robust.robustness_weights.unwrap();
    assert_eq!(weights.len(), 30);
    assert_eq!(weights[15], 0.0);
    assert!(weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
    assert_eq!(robust.iterations_used, 4);
}

#[test]
fn test_auto_convergence_stops_early() {
    // A perfect line converges immediately
    let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| 3.0 * xi + 1.0).collect();
    let cfg = LoessConfig {
        iterations: 10,
        auto_convergence: Some(1e-8),
        ..config(0.5, PolynomialDegree::Linear)
    };
    let out = LoessExecutor::new(cfg).run(&x, &y, None).unwrap();
    assert_eq!(out.iterations_used, 1);
}

#[test]
fn test_strategies_agree() {
    let x: Vec<f64> = (0..300).map(|i| (i % 37) as f64 + (i / 37) as f64 * 0.01).collect();
    let y: Vec<f64> = x.iter().map(|&xi| (xi * 0.2).cos()).collect();

    let brute = LoessExecutor::new(LoessConfig {
        search_strategy: SearchStrategy::BruteForce,
        ..config(0.1, PolynomialDegree::Linear)
    })
    .run(&x, &y, None)
    .unwrap();
    let tree = LoessExecutor::new(LoessConfig {
        search_strategy: SearchStrategy::KdTree,
        ..config(0.1, PolynomialDegree::Linear)
    })
    .run(&x, &y, None)
    .unwrap();

    assert_eq!(brute.fitted, tree.fitted);
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn test_quadratic_with_two_point_neighborhood() {
    let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let y = x.clone();
    // ceil(0.2 * 10) = 2 < 3 coefficients
    let err = LoessExecutor::new(config(0.2, PolynomialDegree::Quadratic))
        .run(&x, &y, None)
        .unwrap_err();
    assert_eq!(err, SmoothError::TooFewPoints { got: 2, min: 3 });
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn test_neighborhood_of_coefficient_count_fails() {
    // ceil(0.2 * 10) = 2 passes the static check, but the farther neighbor of
    // every point gets zero kernel weight, leaving a single weighted point.
    let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let y = vec![5.0; 10];
    let err = LoessExecutor::new(config(0.2, PolynomialDegree::Linear))
        .run(&x, &y, Some(&[0.3, 4.3][..]))
        .unwrap_err();
    assert_eq!(err, SmoothError::TooFewPoints { got: 1, min: 2 });
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let y: Vec<f64> = x.iter().map(|&xi| xi * xi).collect();
    let err = LoessExecutor::new(config(0.3, PolynomialDegree::Quadratic))
        .run(&x, &y, Some(&[4.3][..]))
        .unwrap_err();
    assert!(matches!(err, SmoothError::TooFewPoints { min: 3, .. }));
}

#[test]
fn test_collinear_plane_fit_fails() {
    let x: Vec<f64> = (0..12).flat_map(|i| [i as f64, 2.0 * i as f64]).collect();
    let y: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let cfg = LoessConfig {
        dimensions: 2,
        ..config(0.5, PolynomialDegree::Linear)
    };
    let err = LoessExecutor::new(cfg).run(&x, &y, None).unwrap_err();
    assert_eq!(err, SmoothError::DegenerateNeighborhood { query: 0 });
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn test_reject_zero_weights() {
    // Paired abscissae: the spike and its partner share a neighborhood and
    // both get rejected by the Talwar weights, leaving nothing to fit with.
    let x = [0.0, 1.0, 3.0, 4.0, 6.0, 7.0, 9.0, 10.0];
    let y = [0.0, 0.0, 1000.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let cfg = LoessConfig {
        iterations: 1,
        weight_function: WeightFunction::Uniform,
        robustness_method: RobustnessMethod::Talwar,
        zero_weight_fallback: ZeroWeightFallback::Reject,
        ..config(0.375, PolynomialDegree::Constant)
    };
    let err = LoessExecutor::new(cfg.clone()).run(&x, &y, None).unwrap_err();
    assert_eq!(err, SmoothError::ZeroWeights { query: 2 });
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    // The local mean fallback keeps going
    let cfg = LoessConfig {
        zero_weight_fallback: ZeroWeightFallback::UseLocalMean,
        ..cfg
    };
    let out = LoessExecutor::new(cfg).run(&x, &y, None).unwrap();
    let weights = out.robustness_weights.unwrap();
    assert_eq!(weights[2], 0.0);
    assert_eq!(weights[3], 0.0);
    assert_relative_eq!(out.fitted[2], 1000.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_invalid_fraction() {
    let err = LoessExecutor::new(config(0.0, PolynomialDegree::Linear))
        .run(&[1.0, 2.0], &[1.0, 2.0], None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
