//! Robustness weight computation for outlier downweighting.
//!
//! ## Purpose
//!
//! This module implements the reweighting step of iteratively reweighted
//! local regression. After a fit, residuals at every observation are turned
//! into robustness weights that shrink the influence of large residuals in
//! the next fit.
//!
//! ## Design notes
//!
//! * **Estimation**: Residual scale is the median absolute residual (or MAD),
//!   with a mean-absolute-residual fallback when the median scale collapses.
//! * **Methods**: Implements Bisquare (default), Huber, and Talwar.
//!
//! ## Key concepts
//!
//! * **Bisquare**: u = r / (6s), w = (1 - u²)² for |u| < 1, else 0 (Cleveland 1979).
//! * **Huber**: u = |r| / s, w = min(1, c / u) with c = 1.345.
//! * **Talwar**: u = |r| / s, w = 1 if u <= c else 0 with c = 2.5.
//!
//! ## Invariants
//!
//! * Robustness weights are in [0, 1].
//! * A zero scale (perfect fit) yields weight 1 everywhere.
//!
//! ## Non-goals
//!
//! * This module does not perform the regression itself.
//! * This module does not decide the number of robustness iterations.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::scaling::ScalingMethod;

// ============================================================================
// Robustness Method
// ============================================================================

/// Robustness weighting method for outlier downweighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobustnessMethod {
    /// Bisquare (Tukey's biweight) - default and most common.
    #[default]
    Bisquare,

    /// Huber weights - less aggressive downweighting.
    Huber,

    /// Talwar (hard threshold) - most aggressive.
    Talwar,
}

impl RobustnessMethod {
    /// Tuning constant for bisquare robustness weights (applied to the residual scale).
    const BISQUARE_C: f64 = 6.0;

    /// Tuning constant for Huber weights.
    const HUBER_C: f64 = 1.345;

    /// Tuning constant for Talwar weights.
    const TALWAR_C: f64 = 2.5;

    /// If the median scale falls below this fraction of the mean absolute residual,
    /// the mean absolute residual is used instead.
    const SCALE_THRESHOLD: f64 = 1e-7;

    /// Minimum tuned-scale absolute epsilon to avoid division by zero.
    const MIN_TUNED_SCALE: f64 = 1e-12;

    // ========================================================================
    // Main API
    // ========================================================================

    /// Compute robustness weights for `residuals` into `weights`.
    ///
    /// `scratch` must have the same length as `residuals`.
    pub fn apply_robustness_weights<T: Float>(
        &self,
        residuals: &[T],
        weights: &mut [T],
        scaling_method: ScalingMethod,
        scratch: &mut [T],
    ) {
        if residuals.is_empty() {
            return;
        }

        let scale = Self::compute_scale(residuals, scaling_method, scratch);
        let c = T::from(match self {
            Self::Bisquare => Self::BISQUARE_C,
            Self::Huber => Self::HUBER_C,
            Self::Talwar => Self::TALWAR_C,
        })
        .unwrap_or_else(T::one);

        for (w, &r) in weights.iter_mut().zip(residuals.iter()) {
            *w = match self {
                Self::Bisquare => Self::bisquare_weight(r, scale, c),
                Self::Huber => Self::huber_weight(r, scale, c),
                Self::Talwar => Self::talwar_weight(r, scale, c),
            };
        }
    }

    // ========================================================================
    // Scale Estimation
    // ========================================================================

    /// Robust scale estimate with a mean-absolute-residual fallback.
    fn compute_scale<T: Float>(residuals: &[T], scaling_method: ScalingMethod, scratch: &mut [T]) -> T {
        let n = residuals.len();
        let sum_abs = residuals.iter().fold(T::zero(), |acc, r| acc + r.abs());
        let mae = sum_abs / T::from(n).unwrap_or_else(T::one);

        // Mean of zero implies median of zero
        if mae.is_zero() {
            return T::zero();
        }

        let relative = T::from(Self::SCALE_THRESHOLD).unwrap_or_else(T::zero) * mae;
        let absolute = T::from(Self::MIN_TUNED_SCALE).unwrap_or_else(T::zero);
        let threshold = relative.max(absolute);

        scratch.copy_from_slice(residuals);
        let scale = scaling_method.compute(scratch);

        if scale <= threshold { mae.max(scale) } else { scale }
    }

    // ========================================================================
    // Weight Functions
    // ========================================================================

    /// Bisquare weight: u = r / (c·s), w = (1 - u²)² for |u| < 1, else 0.
    #[inline]
    pub(crate) fn bisquare_weight<T: Float>(residual: T, scale: T, c: T) -> T {
        if scale <= T::zero() {
            return T::one();
        }
        let min_eps = T::from(Self::MIN_TUNED_SCALE).unwrap_or_else(T::epsilon);
        let tuned_scale = (scale * c).max(min_eps);
        let u = (residual / tuned_scale).abs();

        if u >= T::one() {
            T::zero()
        } else {
            let tmp = T::one() - u * u;
            tmp * tmp
        }
    }

    /// Huber weight: u = |r| / s, w = 1 if u <= c else c / u.
    #[inline]
    pub(crate) fn huber_weight<T: Float>(residual: T, scale: T, c: T) -> T {
        if scale <= T::zero() {
            return T::one();
        }
        let u = (residual / scale).abs();
        if u <= c { T::one() } else { c / u }
    }

    /// Talwar weight: u = |r| / s, w = 1 if u <= c else 0.
    #[inline]
    pub(crate) fn talwar_weight<T: Float>(residual: T, scale: T, c: T) -> T {
        if scale <= T::zero() {
            return T::one();
        }
        let u = (residual / scale).abs();
        if u <= c { T::one() } else { T::zero() }
    }
}
