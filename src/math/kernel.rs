//! Kernel (weight) functions for neighborhood weighting.
//!
//! ## Purpose
//!
//! This module maps a neighbor's distance to the query point into a weight.
//! Distances are normalized by the neighborhood radius (the distance to the
//! farthest neighbor) so that u = d / maxdist lies in [0, 1].
//!
//! ## Key concepts
//!
//! * **Tricube**: The default kernel (Cleveland's original), K(u) = (1 - u³)³.
//! * **Support**: Every kernel here is bounded; K(u) = 0 for u >= 1.
//!
//! ## Invariants
//!
//! * K(0) = 1 and K(u) >= 0.
//! * K is non-increasing in u on [0, 1] and exactly 0 at the neighborhood boundary.
//! * If every neighbor is equidistant from the query (including maxdist = 0),
//!   every weight is 1.
//!
//! ## Non-goals
//!
//! * This module does not perform weight normalization.
//! * This module does not select the neighborhood.

// External dependencies
use core::f64::consts::FRAC_PI_2;
use num_traits::Float;

// Internal dependencies
use crate::math::neighborhood::Neighborhood;

// ============================================================================
// Weight Function Enum
// ============================================================================

/// Weight function (kernel) for local fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightFunction {
    /// Tricube kernel: K(u) = (1 - |u|³)³ for |u| < 1.
    ///
    /// This is the default and recommended kernel choice.
    #[default]
    Tricube,

    /// Biweight (quartic) kernel: K(u) = (1 - u²)² for |u| < 1.
    Biweight,

    /// Epanechnikov kernel: K(u) = 1 - u² for |u| < 1.
    Epanechnikov,

    /// Triangular (linear) kernel: K(u) = 1 - |u| for |u| < 1.
    Triangle,

    /// Cosine kernel: K(u) = cos(πu/2) for |u| < 1.
    Cosine,

    /// Uniform (rectangular) kernel: K(u) = 1 for |u| < 1.
    Uniform,
}

impl WeightFunction {
    /// Get the name of the weight function.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            WeightFunction::Tricube => "Tricube",
            WeightFunction::Biweight => "Biweight",
            WeightFunction::Epanechnikov => "Epanechnikov",
            WeightFunction::Triangle => "Triangle",
            WeightFunction::Cosine => "Cosine",
            WeightFunction::Uniform => "Uniform",
        }
    }

    /// Compute the weight K(u) for a normalized distance u.
    #[inline]
    pub fn compute_weight<T: Float>(&self, u: T) -> T {
        let abs_u = u.abs();
        if abs_u >= T::one() {
            return T::zero();
        }

        match self {
            WeightFunction::Tricube => {
                let tmp = T::one() - abs_u * abs_u * abs_u;
                tmp * tmp * tmp
            }
            WeightFunction::Biweight => {
                let tmp = T::one() - abs_u * abs_u;
                tmp * tmp
            }
            WeightFunction::Epanechnikov => T::one() - abs_u * abs_u,
            WeightFunction::Triangle => T::one() - abs_u,
            WeightFunction::Cosine => {
                let half_pi = T::from(FRAC_PI_2).unwrap_or_else(T::one);
                (half_pi * abs_u).cos()
            }
            WeightFunction::Uniform => T::one(),
        }
    }

    /// Weight of a neighbor at `distance` in a neighborhood of radius `max_distance`.
    ///
    /// A non-positive radius means every neighbor coincides with the query;
    /// all of them get weight 1.
    #[inline]
    pub fn weight_at<T: Float>(&self, distance: T, max_distance: T) -> T {
        if max_distance <= T::zero() {
            return T::one();
        }
        self.compute_weight(distance / max_distance)
    }

    /// Fill `weights` with the kernel weight of every neighbor and return their sum.
    pub fn neighborhood_weights<T: Float>(&self, neighborhood: &Neighborhood<T>, weights: &mut [T]) -> T {
        debug_assert!(weights.len() >= neighborhood.len());
        let equidistant = neighborhood.is_equidistant();
        let max_distance = neighborhood.max_distance;

        let mut sum = T::zero();
        for (w, &d) in weights.iter_mut().zip(neighborhood.distances.iter()) {
            *w = if equidistant {
                T::one()
            } else {
                self.weight_at(d, max_distance)
            };
            sum = sum + *w;
        }
        sum
    }
}
