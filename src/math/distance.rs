//! Distance metrics for nD neighborhoods.
//!
//! ## Purpose
//!
//! This module provides the distance computation shared by local regression
//! and k-nearest-neighbor estimation. In one dimension distance is simply
//! |x - x_i|; for feature vectors we need proper metrics in higher-dimensional
//! spaces.
//!
//! ## Design notes
//!
//! * **Decoupling**: Distance calculation is separated from kernel evaluation.
//! * **Comparison space**: Searches rank points by a monotone transform of the
//!   distance (e.g. the squared Euclidean distance) and only convert the
//!   selected neighbors back to metric space.
//! * **Normalization**: Supports rescaling dimensions by their range to handle differing scales.
//!
//! ## Invariants
//!
//! * Distance is always non-negative.
//! * Distance is symmetric: d(a, b) = d(b, a).
//! * d(a, a) = 0.
//!
//! ## Non-goals
//!
//! * This module does not handle the kernel weighting (bandwidth/smoothing).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::neighborhood::PointDistance;
use crate::primitives::errors::SmoothError;

// ============================================================================
// Distance Metric Enum
// ============================================================================

/// Distance metric for neighborhood computation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DistanceMetric<T> {
    /// Standard Euclidean distance: √(Σ(xᵢ - yᵢ)²)
    #[default]
    Euclidean,

    /// Euclidean distance after scaling each dimension by 1 / range over the training set.
    Normalized,

    /// Manhattan distance (L1 norm): Σ|xᵢ - yᵢ|
    Manhattan,

    /// Chebyshev distance (L∞ norm): max|xᵢ - yᵢ|
    Chebyshev,

    /// Minkowski distance (Lp norm): (Σ|xᵢ - yᵢ|^p)^(1/p)
    /// Generalization of Euclidean (p=2) and Manhattan (p=1).
    /// p must be >= 1.0.
    Minkowski(T),

    /// Weighted Euclidean distance: √(Σ wᵢ(xᵢ - yᵢ)²)
    Weighted(Vec<T>),
}

// ============================================================================
// Distance Computation Functions
// ============================================================================

impl<T: Float> DistanceMetric<T> {
    /// Distance between two points, checking that their dimensionality agrees.
    ///
    /// `Normalized` has no training set to take ranges from here and is
    /// evaluated with unit scales (plain Euclidean).
    pub fn compute(&self, a: &[T], b: &[T]) -> Result<T, SmoothError> {
        if a.len() != b.len() {
            return Err(SmoothError::DimensionMismatch {
                expected: a.len(),
                got: b.len(),
            });
        }
        if a.is_empty() {
            return Err(SmoothError::InvalidDimensions(0));
        }
        if let Self::Weighted(w) = self {
            if w.len() != a.len() {
                return Err(SmoothError::DimensionMismatch {
                    expected: a.len(),
                    got: w.len(),
                });
            }
        }

        Ok(match self {
            Self::Euclidean | Self::Normalized => Self::euclidean(a, b),
            Self::Manhattan => Self::manhattan(a, b),
            Self::Chebyshev => Self::chebyshev(a, b),
            Self::Minkowski(p) => Self::minkowski(a, b, *p),
            Self::Weighted(w) => Self::weighted(a, b, w),
        })
    }

    /// Compute Euclidean distance between two nD points.
    #[inline]
    pub fn euclidean(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        squared_sum(a, b).sqrt()
    }

    /// Compute normalized distance between two nD points.
    #[inline]
    pub fn normalized(a: &[T], b: &[T], scales: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), scales.len());
        scaled_squared_sum(a, b, scales).sqrt()
    }

    /// Compute Manhattan distance (L1 norm).
    #[inline]
    pub fn manhattan(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| (ai - bi).abs())
            .fold(T::zero(), |acc, x| acc + x)
    }

    /// Compute Chebyshev distance (L-inf norm).
    #[inline]
    pub fn chebyshev(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| (ai - bi).abs())
            .fold(T::zero(), T::max)
    }

    /// Compute Minkowski distance (Lp norm).
    #[inline]
    pub fn minkowski(a: &[T], b: &[T], p: T) -> T {
        debug_assert_eq!(a.len(), b.len());
        powered_sum(a, b, p).powf(T::one() / p)
    }

    /// Compute Weighted Euclidean distance.
    #[inline]
    pub fn weighted(a: &[T], b: &[T], weights: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), weights.len());
        weighted_squared_sum(a, b, weights).sqrt()
    }

    /// Compute min and max for each dimension across a set of nD points.
    pub fn compute_ranges(points: &[T], dimensions: usize) -> (Vec<T>, Vec<T>) {
        let n_points = points.len() / dimensions;
        debug_assert_eq!(
            points.len() % dimensions,
            0,
            "Points array length must be divisible by dimensions"
        );

        if n_points == 0 {
            return (vec![T::zero(); dimensions], vec![T::one(); dimensions]);
        }

        let mut mins = vec![T::infinity(); dimensions];
        let mut maxs = vec![T::neg_infinity(); dimensions];

        for point in points.chunks_exact(dimensions) {
            for (d, &val) in point.iter().enumerate() {
                if val < mins[d] {
                    mins[d] = val;
                }
                if val > maxs[d] {
                    maxs[d] = val;
                }
            }
        }

        (mins, maxs)
    }

    /// Compute normalization scales from ranges.
    ///
    /// Constant dimensions get a scale of zero and are ignored.
    pub fn compute_normalization_scales(mins: &[T], maxs: &[T]) -> Vec<T> {
        mins.iter()
            .zip(maxs.iter())
            .map(|(&min, &max)| {
                let range = max - min;
                if range > T::epsilon() {
                    T::one() / range
                } else {
                    T::zero()
                }
            })
            .collect()
    }

    /// Per-dimension scales this metric needs for a training set.
    ///
    /// Only `Normalized` depends on the data; every other metric uses unit scales.
    pub fn scales_for(&self, points: &[T], dimensions: usize) -> Vec<T> {
        match self {
            Self::Normalized => {
                let (mins, maxs) = Self::compute_ranges(points, dimensions);
                Self::compute_normalization_scales(&mins, &maxs)
            }
            _ => vec![T::one(); dimensions],
        }
    }
}

/// Euclidean distance between two points of equal dimensionality.
///
/// Fails with `DimensionMismatch` when the dimensionalities differ.
pub fn distance<T: Float>(a: &[T], b: &[T]) -> Result<T, SmoothError> {
    DistanceMetric::Euclidean.compute(a, b)
}

// ============================================================================
// Accumulators (comparison space)
// ============================================================================

#[inline]
fn squared_sum<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| {
            let diff = ai - bi;
            diff * diff
        })
        .fold(T::zero(), |acc, x| acc + x)
}

#[inline]
fn scaled_squared_sum<T: Float>(a: &[T], b: &[T], scales: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .zip(scales.iter())
        .map(|((&ai, &bi), &scale)| {
            let diff = (ai - bi) * scale;
            diff * diff
        })
        .fold(T::zero(), |acc, x| acc + x)
}

#[inline]
fn weighted_squared_sum<T: Float>(a: &[T], b: &[T], weights: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .zip(weights.iter())
        .map(|((&ai, &bi), &w)| {
            let diff = ai - bi;
            w * diff * diff
        })
        .fold(T::zero(), |acc, x| acc + x)
}

#[inline]
fn powered_sum<T: Float>(a: &[T], b: &[T], p: T) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| (ai - bi).abs().powf(p))
        .fold(T::zero(), |acc, x| acc + x)
}

// ============================================================================
// Distance Calculator
// ============================================================================

/// Metric bound to the per-dimension scales of one training set.
///
/// Implements [`PointDistance`] so that brute-force and KD-tree searches
/// rank points identically.
#[derive(Debug, Clone, Copy)]
pub struct DistanceCalculator<'a, T> {
    /// The distance metric.
    pub metric: &'a DistanceMetric<T>,
    /// Normalization scales for each dimension (used if metric is Normalized).
    pub scales: &'a [T],
}

impl<'a, T: Float> DistanceCalculator<'a, T> {
    /// Bind a metric to precomputed scales.
    pub fn new(metric: &'a DistanceMetric<T>, scales: &'a [T]) -> Self {
        Self { metric, scales }
    }

    /// Distance in metric space.
    #[inline]
    pub fn distance(&self, a: &[T], b: &[T]) -> T {
        self.post_process_distance(self.distance_squared(a, b))
    }
}

impl<'a, T: Float> PointDistance<T> for DistanceCalculator<'a, T> {
    #[inline]
    fn distance_squared(&self, a: &[T], b: &[T]) -> T {
        match self.metric {
            DistanceMetric::Euclidean => squared_sum(a, b),
            DistanceMetric::Normalized => scaled_squared_sum(a, b, self.scales),
            DistanceMetric::Manhattan => DistanceMetric::manhattan(a, b),
            DistanceMetric::Chebyshev => DistanceMetric::chebyshev(a, b),
            DistanceMetric::Minkowski(p) => powered_sum(a, b, *p),
            DistanceMetric::Weighted(w) => weighted_squared_sum(a, b, w),
        }
    }

    #[inline]
    fn split_distance_squared(&self, dim: usize, split_val: T, query_val: T) -> T {
        let diff = (query_val - split_val).abs();
        match self.metric {
            DistanceMetric::Euclidean => diff * diff,
            DistanceMetric::Normalized => {
                let scaled = diff * self.scales[dim];
                scaled * scaled
            }
            DistanceMetric::Manhattan | DistanceMetric::Chebyshev => diff,
            DistanceMetric::Minkowski(p) => diff.powf(*p),
            DistanceMetric::Weighted(w) => w[dim] * diff * diff,
        }
    }

    #[inline]
    fn post_process_distance(&self, d: T) -> T {
        match self.metric {
            DistanceMetric::Euclidean | DistanceMetric::Normalized | DistanceMetric::Weighted(_) => {
                d.sqrt()
            }
            DistanceMetric::Manhattan | DistanceMetric::Chebyshev => d,
            DistanceMetric::Minkowski(p) => d.powf(T::one() / *p),
        }
    }
}
