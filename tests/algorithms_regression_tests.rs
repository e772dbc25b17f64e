#![cfg(feature = "dev")]
//! Tests for local regression algorithms.
//!
//! These tests verify the per-query weighted least squares fit:
//! - Polynomial degree bookkeeping and design terms
//! - Degree 0 as a weighted mean (bin smoother)
//! - Exact reproduction of lines, planes and parabolas
//! - Zero-weight fallback strategies
//! - Neighborhoods too small or degenerate for the polynomial
//!
//! ## Test Organization
//!
//! 1. **Polynomial Degree** - Coefficient counts and term construction
//! 2. **Local WLS** - Weighted least squares fitting
//! 3. **Zero Weight Fallbacks** - Handling degenerate cases
//! 4. **Insufficient Support** - Too few weighted points or a singular system

use approx::assert_relative_eq;

use loess_knn::internals::algorithms::regression::{
    PolynomialDegree, RegressionContext, ZeroWeightFallback,
};
use loess_knn::internals::math::distance::{DistanceCalculator, DistanceMetric};
use loess_knn::internals::math::kernel::WeightFunction;
use loess_knn::internals::math::neighborhood::{Neighborhood, brute_force_k_nearest};
use loess_knn::internals::primitives::buffer::{FittingBuffer, NeighborhoodSearchBuffer};
use loess_knn::internals::primitives::errors::SmoothError;

// ============================================================================
// Helper Functions
// ============================================================================

fn neighborhood(x: &[f64], dims: usize, query: &[f64], k: usize) -> Neighborhood<f64> {
    let metric = DistanceMetric::Euclidean;
    let scales = vec![1.0; dims];
    let calc = DistanceCalculator::new(&metric, &scales);
    let mut buffer = NeighborhoodSearchBuffer::new(k);
    let mut nbh = Neighborhood::new();
    brute_force_k_nearest(x, dims, query, k, &calc, None, &mut buffer, &mut nbh);
    nbh
}

#[allow(clippy::too_many_arguments)]
fn fit_at(
    x: &[f64],
    y: &[f64],
    dims: usize,
    query: &[f64],
    k: usize,
    degree: PolynomialDegree,
    robustness_weights: Option<&[f64]>,
    fallback: ZeroWeightFallback,
) -> Result<f64, SmoothError> {
    let nbh = neighborhood(x, dims, query, k);
    let ctx = RegressionContext {
        x,
        y,
        dimensions: dims,
        query,
        query_index: 0,
        neighborhood: &nbh,
        robustness_weights,
        weight_function: WeightFunction::Tricube,
        polynomial_degree: degree,
        zero_weight_fallback: fallback,
    };
    let mut buffer = FittingBuffer::new(k, degree.num_coefficients(dims));
    ctx.fit(&mut buffer)
}

// ============================================================================
// Polynomial Degree Tests
// ============================================================================

#[test]
fn test_polynomial_degree_values() {
    assert_eq!(PolynomialDegree::Constant.value(), 0);
    assert_eq!(PolynomialDegree::Linear.value(), 1);
    assert_eq!(PolynomialDegree::Quadratic.value(), 2);
    assert_eq!(PolynomialDegree::default(), PolynomialDegree::Linear);
}

#[test]
fn test_polynomial_degree_from_value() {
    assert_eq!(PolynomialDegree::from_value(0), Ok(PolynomialDegree::Constant));
    assert_eq!(PolynomialDegree::from_value(2), Ok(PolynomialDegree::Quadratic));
    assert_eq!(PolynomialDegree::from_value(3), Err(SmoothError::InvalidDegree(3)));
}

#[test]
fn test_polynomial_degree_coefficients() {
    // 1D: degree + 1
    assert_eq!(PolynomialDegree::Constant.num_coefficients(1), 1);
    assert_eq!(PolynomialDegree::Linear.num_coefficients(1), 2);
    assert_eq!(PolynomialDegree::Quadratic.num_coefficients(1), 3);

    // 2D: 1, 1 + 2, 1 + 2 + 3
    assert_eq!(PolynomialDegree::Linear.num_coefficients(2), 3);
    assert_eq!(PolynomialDegree::Quadratic.num_coefficients(2), 6);
}

#[test]
fn test_build_terms_quadratic_2d() {
    let mut terms = [0.0; 6];
    let count = PolynomialDegree::Quadratic.build_terms(&[3.0, 5.0], &[1.0, 2.0], &mut terms);
    assert_eq!(count, 6);
    // 1, dx, dy, dx², dx·dy, dy²
    assert_eq!(terms, [1.0, 2.0, 3.0, 4.0, 6.0, 9.0]);
}

// ============================================================================
// Local WLS Tests
// ============================================================================

/// Degree 0 is the tricube-weighted mean of the neighborhood.
#[test]
fn test_constant_is_weighted_mean() {
    let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
    let y = [0.0, 0.0, 10.0, 0.0, 0.0];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[0.0],
        5,
        PolynomialDegree::Constant,
        None,
        ZeroWeightFallback::UseLocalMean,
    )
    .unwrap();

    // Weights: 1 at x0, (1 - 0.5^3)^3 at distance 1, 0 at distance 2
    let w1 = 0.669921875;
    assert_relative_eq!(fitted, 10.0 / (1.0 + 2.0 * w1), epsilon = 1e-12);
    assert!(fitted > 0.0 && fitted < 10.0);
}

#[test]
fn test_linear_reproduces_line() {
    let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| 3.0 * xi + 2.0).collect();

    for &q in &[0.0, 4.3, 9.0] {
        let fitted = fit_at(
            &x,
            &y,
            1,
            &[q],
            5,
            PolynomialDegree::Linear,
            None,
            ZeroWeightFallback::UseLocalMean,
        )
        .unwrap();
        assert_relative_eq!(fitted, 3.0 * q + 2.0, epsilon = 1e-9);
    }
}

#[test]
fn test_quadratic_reproduces_parabola() {
    let x: Vec<f64> = (0..15).map(|i| i as f64 * 0.5).collect();
    let y: Vec<f64> = x.iter().map(|&xi| xi * xi - xi + 1.0).collect();

    for &q in &[0.0, 2.25, 7.0] {
        let fitted = fit_at(
            &x,
            &y,
            1,
            &[q],
            7,
            PolynomialDegree::Quadratic,
            None,
            ZeroWeightFallback::UseLocalMean,
        )
        .unwrap();
        assert_relative_eq!(fitted, q * q - q + 1.0, epsilon = 1e-8);
    }
}

#[test]
fn test_linear_reproduces_plane_2d() {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for i in 0..6 {
        for j in 0..6 {
            let (a, b) = (i as f64, j as f64);
            x.push(a);
            x.push(b);
            y.push(1.0 + 2.0 * a - b);
        }
    }

    let fitted = fit_at(
        &x,
        &y,
        2,
        &[1.5, 2.5],
        12,
        PolynomialDegree::Linear,
        None,
        ZeroWeightFallback::UseLocalMean,
    )
    .unwrap();
    assert_relative_eq!(fitted, 1.0 + 3.0 - 2.5, epsilon = 1e-9);
}

#[test]
fn test_robustness_weights_remove_point() {
    // Zeroing the robustness weight of the spike removes it entirely
    let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
    let y = [0.0, 0.0, 10.0, 0.0, 0.0];
    let rw = [1.0, 1.0, 0.0, 1.0, 1.0];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[0.0],
        5,
        PolynomialDegree::Constant,
        Some(&rw),
        ZeroWeightFallback::UseLocalMean,
    )
    .unwrap();
    assert_relative_eq!(fitted, 0.0);
}

// ============================================================================
// Zero Weight Fallback Tests
// ============================================================================

#[test]
fn test_zero_weights_use_local_mean() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let y = [1.0, 2.0, 3.0, 6.0];
    let rw = [0.0; 4];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[1.0],
        4,
        PolynomialDegree::Linear,
        Some(&rw),
        ZeroWeightFallback::UseLocalMean,
    );
    assert_relative_eq!(fitted.unwrap(), 3.0);
}

#[test]
fn test_zero_weights_reject() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let y = [1.0, 2.0, 3.0, 6.0];
    let rw = [0.0; 4];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[1.0],
        4,
        PolynomialDegree::Linear,
        Some(&rw),
        ZeroWeightFallback::Reject,
    );
    assert_eq!(fitted, Err(SmoothError::ZeroWeights { query: 0 }));
}

#[test]
fn test_coincident_neighbors_get_unit_weight() {
    // Every neighbor sits at the query: weights all 1, fit is the plain mean
    let x = [1.0, 1.0, 1.0, 5.0];
    let y = [2.0, 4.0, 6.0, 100.0];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[1.0],
        3,
        PolynomialDegree::Constant,
        None,
        ZeroWeightFallback::Reject,
    );
    assert_relative_eq!(fitted.unwrap(), 4.0);
}

// ============================================================================
// Insufficient Support Tests
// ============================================================================

#[test]
fn test_linear_with_one_weighted_neighbor_fails() {
    // Two neighbors of 4.3: the farther one sits at the kernel boundary
    let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let y = vec![5.0; 10];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[4.3],
        2,
        PolynomialDegree::Linear,
        None,
        ZeroWeightFallback::UseLocalMean,
    );
    assert_eq!(fitted, Err(SmoothError::TooFewPoints { got: 1, min: 2 }));
}

#[test]
fn test_equidistant_pair_fits_line() {
    // Both neighbors at the same distance keep unit weight
    let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| 3.0 * xi + 2.0).collect();

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[4.5],
        2,
        PolynomialDegree::Linear,
        None,
        ZeroWeightFallback::Reject,
    )
    .unwrap();
    assert_relative_eq!(fitted, 15.5, epsilon = 1e-9);
}

#[test]
fn test_robustness_weights_leave_too_few_points() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0];
    let y = [0.0, 1.0, 2.0, 3.0, 4.0];
    // Kernel keeps 1, 2, 3; robustness removes 1 and 2
    let rw = [1.0, 0.0, 0.0, 1.0, 1.0];

    let fitted = fit_at(
        &x,
        &y,
        1,
        &[2.0],
        5,
        PolynomialDegree::Linear,
        Some(&rw),
        ZeroWeightFallback::UseLocalMean,
    );
    assert_eq!(fitted, Err(SmoothError::TooFewPoints { got: 1, min: 2 }));
}

#[test]
fn test_collinear_points_are_degenerate_for_plane() {
    // Every point lies on the diagonal, so a plane is not determined
    let x: Vec<f64> = (0..8).flat_map(|i| [i as f64, i as f64]).collect();
    let y: Vec<f64> = (0..8).map(|i| i as f64).collect();

    let fitted = fit_at(
        &x,
        &y,
        2,
        &[3.0, 3.0],
        6,
        PolynomialDegree::Linear,
        None,
        ZeroWeightFallback::UseLocalMean,
    );
    assert_eq!(fitted, Err(SmoothError::DegenerateNeighborhood { query: 0 }));
}
