#![cfg(feature = "dev")]
//! Tests for the distance kernels.
//!
//! Every kernel is bounded on [0, 1): weight 1 at the query, non-increasing
//! with distance, and exactly 0 at the neighborhood radius.

use approx::assert_relative_eq;

use loess_knn::internals::math::kernel::WeightFunction;
use loess_knn::internals::math::neighborhood::Neighborhood;

const ALL: [WeightFunction; 6] = [
    WeightFunction::Tricube,
    WeightFunction::Biweight,
    WeightFunction::Epanechnikov,
    WeightFunction::Triangle,
    WeightFunction::Cosine,
    WeightFunction::Uniform,
];

fn neighborhood(distances: &[f64]) -> Neighborhood<f64> {
    let mut nbh = Neighborhood::new();
    nbh.indices = (0..distances.len()).collect();
    nbh.distances = distances.to_vec();
    nbh.max_distance = distances.last().copied().unwrap_or(0.0);
    nbh
}

#[test]
fn test_tricube_values() {
    let wf = WeightFunction::Tricube;
    assert_relative_eq!(wf.compute_weight(0.0), 1.0);
    // (1 - 0.125)^3
    assert_relative_eq!(wf.compute_weight(0.5), 0.669921875);
    assert_eq!(wf.compute_weight(1.0), 0.0);
    assert_eq!(wf.compute_weight(1.5), 0.0);
}

#[test]
fn test_kernels_bounded_and_monotone() {
    for wf in ALL {
        assert_relative_eq!(wf.compute_weight(0.0), 1.0);
        assert_eq!(wf.compute_weight(1.0), 0.0, "{}", wf.name());

        let mut prev = 1.0;
        for i in 1..100 {
            let w = wf.compute_weight(i as f64 / 100.0);
            assert!(w <= prev + 1e-15, "{} not monotone", wf.name());
            assert!(w >= 0.0);
            prev = w;
        }
    }
}

#[test]
fn test_weight_at_zero_radius() {
    for wf in ALL {
        assert_eq!(wf.weight_at(0.0, 0.0), 1.0);
    }
}

#[test]
fn test_neighborhood_weights_boundary_is_zero() {
    let nbh = neighborhood(&[0.0, 1.0, 1.0, 2.0, 2.0]);
    let mut weights = vec![0.0; 5];
    let sum = WeightFunction::Tricube.neighborhood_weights(&nbh, &mut weights);

    assert_relative_eq!(weights[0], 1.0);
    assert_relative_eq!(weights[1], 0.669921875);
    assert_relative_eq!(weights[2], 0.669921875);
    assert_eq!(weights[3], 0.0);
    assert_eq!(weights[4], 0.0);
    assert_relative_eq!(sum, 1.0 + 2.0 * 0.669921875);
}

#[test]
fn test_neighborhood_weights_equidistant() {
    // All neighbors at the same positive distance
    let nbh = neighborhood(&[3.0, 3.0, 3.0]);
    let mut weights = vec![0.0; 3];
    let sum = WeightFunction::Tricube.neighborhood_weights(&nbh, &mut weights);
    assert_eq!(weights, vec![1.0, 1.0, 1.0]);
    assert_relative_eq!(sum, 3.0);

    // All neighbors coincide with the query (maxdist = 0)
    let nbh = neighborhood(&[0.0, 0.0]);
    let mut weights = vec![0.0; 2];
    WeightFunction::Tricube.neighborhood_weights(&nbh, &mut weights);
    assert_eq!(weights, vec![1.0, 1.0]);
}

#[test]
fn test_default_kernel() {
    assert_eq!(WeightFunction::default(), WeightFunction::Tricube);
    assert_eq!(WeightFunction::Tricube.name(), "Tricube");
}
