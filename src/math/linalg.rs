//! Linear algebra backend for local weighted least squares.
//!
//! ## Purpose
//!
//! This module solves the small normal-equation systems X'WX β = X'Wy that
//! arise at every query point, delegating to nalgebra.
//!
//! ## Design notes
//!
//! * Uses QR decomposition (Householder reflections) instead of Cholesky for better
//!   numerical stability with ill-conditioned systems.
//! * The QR diagonal is not rank revealing, so a failed diagonal check is
//!   confirmed with the singular values. Rank-deficient systems have no
//!   solution here; callers report them instead of fitting a truncated model.
//! * Generic over `FloatLinalg` types (f32 and f64) which delegate to nalgebra.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + 'static {
    /// Solve normal equations X'WX * beta = X'Wy.
    ///
    /// `a` is the n x n normal matrix, `b` the right-hand side. Returns `None`
    /// if the matrix is numerically rank deficient or the solution is not finite.
    fn solve_normal(a: &[Self], b: &[Self], n: usize) -> Option<Vec<Self>>;
}

impl FloatLinalg for f64 {
    #[inline]
    fn solve_normal(a: &[Self], b: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::solve_normal_equations(a, b, n, f64::EPSILON * 100.0)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn solve_normal(a: &[Self], b: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::solve_normal_equations(a, b, n, f32::EPSILON * 100.0)
    }
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::*;
    use nalgebra::{DMatrix, DVector, RealField};

    /// Solve X'WX * beta = X'Wy by QR, confirming rank with an SVD when needed.
    ///
    /// QR is trusted when every diagonal entry of R exceeds `eps` relative to
    /// the largest. Otherwise the system is solved by SVD only if its smallest
    /// singular value still exceeds `eps` relative to the largest.
    pub fn solve_normal_equations<R: RealField + Copy>(
        xtw_x: &[R],
        xtw_y: &[R],
        n_coeffs: usize,
        eps: R,
    ) -> Option<Vec<R>> {
        let matrix = DMatrix::from_column_slice(n_coeffs, n_coeffs, xtw_x);
        let rhs = DVector::from_column_slice(xtw_y);

        let qr = matrix.clone().qr();
        let r_diag = qr.r().diagonal();
        let r_max = largest_abs(r_diag.iter().copied());
        let well_conditioned = r_max > R::zero() && r_diag.iter().all(|d| d.abs() > eps * r_max);
        if well_conditioned {
            if let Some(solution) = qr.solve(&rhs) {
                if solution.iter().all(|v| v.is_finite()) {
                    return Some(solution.as_slice().to_vec());
                }
            }
        }

        let svd = matrix.svd(true, true);
        let sv_max = largest_abs(svd.singular_values.iter().copied());
        let full_rank = sv_max > R::zero() && svd.singular_values.iter().all(|s| s.abs() > eps * sv_max);
        if !full_rank {
            return None;
        }
        svd.solve(&rhs, R::zero())
            .ok()
            .filter(|s: &DVector<R>| s.iter().all(|v| v.is_finite()))
            .map(|s| s.as_slice().to_vec())
    }

    fn largest_abs<R: RealField + Copy>(vals: impl Iterator<Item = R>) -> R {
        vals.fold(R::zero(), |acc, v| {
            let a = v.abs();
            if a > acc { a } else { acc }
        })
    }
}
