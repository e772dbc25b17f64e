//! Robust scale estimation for residuals.
//!
//! ## Purpose
//!
//! Robustness reweighting divides residuals by a scale estimate. This module
//! provides the median-based scales used for that purpose.
//!
//! ## Design notes
//!
//! * **Algorithm**: Uses Quickselect for O(n) median finding.
//! * **Memory**: Operates in place on a caller-provided scratch slice.
//!
//! ## Invariants
//!
//! * Every scale is >= 0 for any input.
//! * Handles even and odd population sizes correctly.
//!
//! ## Non-goals
//!
//! * This module does not handle non-finite values (NaN/Inf).

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;

/// Method for measuring the scale of residuals.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMethod {
    /// Median Absolute Residual: `median(|r|)` (Cleveland 1979).
    #[default]
    MAR,

    /// Median Absolute Deviation: `median(|r - median(r)|)`.
    MAD,
}

impl ScalingMethod {
    /// Compute the scale of `vals`. The slice is reordered and overwritten.
    pub fn compute<T: Float>(&self, vals: &mut [T]) -> T {
        if vals.is_empty() {
            return T::zero();
        }
        match self {
            Self::MAR => {
                for val in vals.iter_mut() {
                    *val = val.abs();
                }
                median_inplace(vals)
            }
            Self::MAD => {
                let median = median_inplace(vals);
                for val in vals.iter_mut() {
                    *val = (*val - median).abs();
                }
                median_inplace(vals)
            }
        }
    }
}

/// Median of `vals` by Quickselect; reorders the slice.
pub fn median_inplace<T: Float>(vals: &mut [T]) -> T {
    let n = vals.len();
    if n == 0 {
        return T::zero();
    }

    let mid = n / 2;
    vals.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Equal));
    let upper = vals[mid];

    if n % 2 == 0 {
        // Largest value in the lower half
        let lower = vals[..mid].iter().copied().fold(T::neg_infinity(), T::max);
        (lower + upper) / (T::one() + T::one())
    } else {
        upper
    }
}
