//! Diagnostic metrics for fit and classification quality.
//!
//! ## Purpose
//!
//! This module evaluates estimator output: goodness-of-fit metrics for a
//! local regression and accuracy for a nearest-neighbor classifier.
//!
//! ## Design notes
//!
//! * **Residual-based**: Regression metrics are computed from y and the fitted values.
//! * **Robustness**: Residual SD uses the MAD (scaled by 1.4826).
//!
//! ## Invariants
//!
//! * Error metrics (RMSE, MAE) are non-negative.
//! * R² <= 1 (R² = 1 is a perfect fit).
//! * Accuracy lies in [0, 1].
//!
//! ## Non-goals
//!
//! * This module does not perform the smoothing or classification.
//! * This module does not provide p-values or formal hypothesis tests.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::math::scaling::ScalingMethod;

// ============================================================================
// Regression Diagnostics
// ============================================================================

/// Diagnostic metrics for assessing a local regression fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics<T> {
    /// Root Mean Squared Error (RMSE).
    pub rmse: T,

    /// Mean Absolute Error (MAE).
    pub mae: T,

    /// Coefficient of determination (R²).
    pub r_squared: T,

    /// Robust residual standard deviation estimated from MAD.
    pub residual_sd: T,
}

impl<T: Float> Diagnostics<T> {
    /// Scale factor converting MAD to a normal-consistent standard deviation.
    const MAD_TO_STD_FACTOR: f64 = 1.4826;

    /// Compute diagnostic statistics from observed and fitted values.
    pub fn compute(y: &[T], y_smooth: &[T]) -> Self {
        let residuals: Vec<T> = y
            .iter()
            .zip(y_smooth.iter())
            .map(|(&yi, &ys)| yi - ys)
            .collect();

        Diagnostics {
            rmse: Self::calculate_rmse(y, y_smooth),
            mae: Self::calculate_mae(y, y_smooth),
            r_squared: Self::calculate_r_squared(y, y_smooth),
            residual_sd: Self::calculate_residual_sd(&residuals),
        }
    }

    /// RMSE = sqrt((1/n) * sum (y_i - y_hat_i)^2).
    pub fn calculate_rmse(y: &[T], y_smooth: &[T]) -> T {
        if y.is_empty() {
            return T::zero();
        }
        let n_t = T::from(y.len()).unwrap_or_else(T::one);
        let rss = y
            .iter()
            .zip(y_smooth.iter())
            .fold(T::zero(), |acc, (&yi, &ys)| {
                let r = yi - ys;
                acc + r * r
            });

        (rss / n_t).sqrt()
    }

    /// MAE = (1/n) * sum |y_i - y_hat_i|.
    pub fn calculate_mae(y: &[T], y_smooth: &[T]) -> T {
        if y.is_empty() {
            return T::zero();
        }
        let n_t = T::from(y.len()).unwrap_or_else(T::one);
        let sum = y
            .iter()
            .zip(y_smooth.iter())
            .fold(T::zero(), |acc, (&yi, &ys)| acc + (yi - ys).abs());

        sum / n_t
    }

    /// R² = 1 - SS_res / SS_tot.
    pub fn calculate_r_squared(y: &[T], y_smooth: &[T]) -> T {
        let n = y.len();
        if n <= 1 {
            return T::one();
        }

        let n_t = T::from(n).unwrap_or_else(T::one);
        let mean = y.iter().copied().fold(T::zero(), |acc, v| acc + v) / n_t;

        let (ss_tot, ss_res) =
            y.iter()
                .zip(y_smooth.iter())
                .fold((T::zero(), T::zero()), |(tot, res), (&yi, &ys)| {
                    let deviation = yi - mean;
                    let residual = yi - ys;
                    (tot + deviation * deviation, res + residual * residual)
                });

        if ss_tot == T::zero() {
            // All y values are identical
            if ss_res == T::zero() { T::one() } else { T::zero() }
        } else {
            T::one() - ss_res / ss_tot
        }
    }

    /// sigma_hat = 1.4826 * MAD(residuals).
    pub fn calculate_residual_sd(residuals: &[T]) -> T {
        let scale_const = T::from(Self::MAD_TO_STD_FACTOR).unwrap_or_else(T::one);
        match residuals.len() {
            0 => T::zero(),
            1 => residuals[0].abs() * scale_const,
            _ => {
                let mut vals = residuals.to_vec();
                ScalingMethod::MAD.compute(&mut vals) * scale_const
            }
        }
    }
}

impl<T: Float + Display> Display for Diagnostics<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "LOESS Diagnostics:")?;
        writeln!(f, "  RMSE:         {:.6}", self.rmse)?;
        writeln!(f, "  MAE:          {:.6}", self.mae)?;
        writeln!(f, "  R²:           {:.6}", self.r_squared)?;
        writeln!(f, "  Residual SD:  {:.6}", self.residual_sd)
    }
}

// ============================================================================
// Classification Diagnostics
// ============================================================================

/// Fraction of predictions equal to the true labels.
///
/// Returns 0 for empty input.
pub fn accuracy<L: PartialEq>(predicted: &[L], truth: &[L]) -> f64 {
    let n = predicted.len().min(truth.len());
    if n == 0 {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / n as f64
}
