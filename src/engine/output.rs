//! Output types for estimator runs.
//!
//! ## Purpose
//!
//! This module defines the result structures returned by local regression
//! and k-nearest-neighbor prediction.
//!
//! ## Design notes
//!
//! * **Memory Efficiency**: All optional outputs use `Option<Vec<T>>`.
//! * **Ergonomics**: `LoessResult` implements `Display` for human-readable output.
//!
//! ## Invariants
//!
//! * `y` holds one fitted value per evaluation point, in query order.
//! * Residuals and robustness weights, when present, have one entry per observation.
//! * Robustness weights are always in the range [0, 1].
//! * k-NN proportions are in label order and sum to 1.
//!
//! ## Non-goals
//!
//! * This module does not perform calculations; it only stores results.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::cmp::Ordering;
use core::fmt::{Debug, Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::evaluation::diagnostics::Diagnostics;

// ============================================================================
// Local Regression Result
// ============================================================================

/// Output of a local regression run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoessResult<T> {
    /// Evaluation points (flattened, row-major).
    pub x: Vec<T>,

    /// Feature dimensionality of `x`.
    pub dimensions: usize,

    /// Fitted value at each evaluation point.
    pub y: Vec<T>,

    /// Residuals y_i - ŷ_i at each observation.
    pub residuals: Option<Vec<T>>,

    /// Final robustness weights at each observation.
    pub robustness_weights: Option<Vec<T>>,

    /// Goodness-of-fit metrics at the observations.
    pub diagnostics: Option<Diagnostics<T>>,

    /// Number of robustness iterations actually performed.
    pub iterations_used: usize,

    /// Span used for the fit (optimal if selected by CV).
    pub fraction_used: T,

    /// Number of observations in every neighborhood.
    pub neighborhood_size: usize,

    /// Cross-validation score of each candidate span.
    pub cv_scores: Option<Vec<T>>,
}

impl<T: Float> LoessResult<T> {
    /// Number of evaluation points.
    #[inline]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns true if there are no evaluation points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Coordinates of evaluation point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> &[T] {
        &self.x[i * self.dimensions..(i + 1) * self.dimensions]
    }

    /// Check if cross-validation was performed.
    pub fn has_cv_scores(&self) -> bool {
        self.cv_scores.is_some()
    }

    /// Get the best (minimum) CV score.
    pub fn best_cv_score(&self) -> Option<T> {
        self.cv_scores.as_ref().and_then(|scores| {
            scores
                .iter()
                .copied()
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        })
    }
}

impl<T: Float + Display + Debug> Display for LoessResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Points:       {}", self.len())?;
        writeln!(f, "  Dimensions:   {}", self.dimensions)?;
        writeln!(f, "  Fraction:     {}", self.fraction_used)?;
        writeln!(f, "  Neighborhood: {}", self.neighborhood_size)?;
        writeln!(f, "  Iterations:   {}", self.iterations_used)?;
        if let Some(best_score) = self.best_cv_score() {
            writeln!(f, "  Best CV score: {}", best_score)?;
        }
        writeln!(f)?;

        if let Some(diag) = &self.diagnostics {
            writeln!(f, "{}", diag)?;
        }

        let has_resid = self.residuals.as_ref().is_some_and(|r| r.len() == self.len());
        let has_weights = self
            .robustness_weights
            .as_ref()
            .is_some_and(|w| w.len() == self.len());

        write!(f, "{:>12} {:>12}", "X[0]", "Fitted")?;
        if has_resid {
            write!(f, " {:>12}", "Residual")?;
        }
        if has_weights {
            write!(f, " {:>10}", "Rob_Weight")?;
        }
        writeln!(f)?;

        let line_width = 25 + if has_resid { 13 } else { 0 } + if has_weights { 11 } else { 0 };
        writeln!(f, "{:-<width$}", "", width = line_width)?;

        // First 10 and last 10 rows
        let n = self.len();
        let rows: Vec<usize> = if n <= 20 {
            (0..n).collect()
        } else {
            (0..10).chain(n - 10..n).collect()
        };

        let mut prev_idx = 0;
        for (i, &idx) in rows.iter().enumerate() {
            if i > 0 && idx != prev_idx + 1 {
                writeln!(f, "{:>12}", "...")?;
            }
            prev_idx = idx;

            write!(f, "{:>12.4} {:>12.6}", self.point(idx)[0], self.y[idx])?;
            if has_resid {
                if let Some(resid) = &self.residuals {
                    write!(f, " {:>12.6}", resid[idx])?;
                }
            }
            if has_weights {
                if let Some(weights) = &self.robustness_weights {
                    write!(f, " {:>10.4}", weights[idx])?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

// ============================================================================
// k-NN Prediction
// ============================================================================

/// Output of a k-nearest-neighbor classification at one query point.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnPrediction<L, T> {
    /// Majority label (ties go to the earliest label in ascending order).
    pub label: L,

    /// Proportion of each label among the k neighbors, in ascending label order.
    pub proportions: Vec<(L, T)>,

    /// Training indices of the k neighbors, nearest first.
    pub neighbors: Vec<usize>,
}

impl<L: PartialEq, T: Float> KnnPrediction<L, T> {
    /// Proportion of `label` among the neighbors (0 if the label is unknown).
    pub fn probability(&self, label: &L) -> T {
        self.proportions
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, p)| p)
            .unwrap_or_else(T::zero)
    }
}
