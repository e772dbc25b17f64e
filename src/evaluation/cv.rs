//! Cross-validation for parameter selection.
//!
//! ## Purpose
//!
//! This module provides the fold machinery used to select the span of a
//! local regression and the neighbor count of a k-NN classifier. It
//! implements generic k-fold and leave-one-out cross-validation strategies.
//!
//! ## Design notes
//!
//! * **Generic Strategy**: Supports both k-fold and leave-one-out (LOOCV).
//! * **Callback scoring**: The caller fits and scores each fold, so this module
//!   stays independent of the estimators.
//! * **Pooled loss**: A candidate's score is the total held-out loss divided by
//!   the number of observations.
//!
//! ## Key concepts
//!
//! * **K-Fold**: Partitions data into k subsamples (train on k-1, test on 1).
//! * **LOOCV**: Extreme case where k equals sample size (n iterations).
//! * **Seeded shuffling**: With a seed, indices are shuffled before fold
//!   assignment; the same seed always yields the same folds.
//!
//! ## Invariants
//!
//! * Training and test sets are disjoint in each fold.
//! * Every observation is held out exactly once.
//! * The selected candidate has the minimal score; ties pick the first.
//!
//! ## Non-goals
//!
//! * This module does not perform the actual fitting (done via callback).
//! * This module does not provide confidence intervals for CV scores.

// Feature-gated dependencies
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::validator::Validator;
use crate::primitives::errors::SmoothError;

// ============================================================================
// Internal PRNG
// ============================================================================

/// Minimal PRNG for no-std shuffling.
///
/// Uses an LCG (Linear Congruential Generator) with constants from PCG/MQL.
#[derive(Debug, Clone)]
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        // LCG constants for 64-bit state
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
}

// ============================================================================
// CV Kind
// ============================================================================

/// Cross-validation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CVKind {
    /// K-fold cross-validation with k folds.
    KFold(usize),
    /// Leave-one-out cross-validation.
    #[allow(clippy::upper_case_acronyms)]
    LOOCV,
}

/// One train/test split, as observation indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Indices used for fitting.
    pub train: Vec<usize>,
    /// Held-out indices used for scoring.
    pub test: Vec<usize>,
}

// ============================================================================
// Cross-Validation Configuration
// ============================================================================

/// Cross-validation configuration combining strategy, candidates, and seed.
///
/// Candidates are spans (`T`) for local regression and neighbor counts
/// (`usize`) for k-NN.
#[derive(Debug, Clone)]
pub struct CVConfig<'a, C> {
    pub(crate) kind: CVKind,
    pub(crate) candidates: &'a [C],
    pub(crate) seed: Option<u64>,
}

impl<'a, C> CVConfig<'a, C> {
    /// Set the random seed for reproducible K-Fold cross-validation.
    ///
    /// This only affects K-Fold CV. LOOCV is deterministic and ignores the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Candidate values, in evaluation order.
    pub fn candidates(&self) -> &[C] {
        self.candidates
    }

    /// The CV strategy.
    pub fn kind(&self) -> CVKind {
        self.kind
    }

    /// The shuffling seed, if any.
    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Create a K-fold cross-validation configuration.
#[allow(non_snake_case)]
pub fn KFold<C>(k: usize, candidates: &[C]) -> CVConfig<'_, C> {
    CVConfig {
        kind: CVKind::KFold(k),
        candidates,
        seed: None,
    }
}

/// Create a leave-one-out cross-validation configuration.
#[allow(non_snake_case)]
pub fn LOOCV<C>(candidates: &[C]) -> CVConfig<'_, C> {
    CVConfig {
        kind: CVKind::LOOCV,
        candidates,
        seed: None,
    }
}

// ============================================================================
// Cross-Validation Execution
// ============================================================================

impl CVKind {
    // ========================================================================
    // Public API
    // ========================================================================

    /// Split `n` observations into train/test folds.
    ///
    /// K-fold assigns `n / k` consecutive (optionally shuffled) indices to each
    /// fold; the last fold also takes the remainder.
    pub fn folds(self, n: usize, seed: Option<u64>) -> Result<Vec<Fold>, SmoothError> {
        match self {
            CVKind::KFold(k) => {
                Validator::validate_folds(k, n)?;

                let mut indices: Vec<usize> = (0..n).collect();
                if let Some(s) = seed {
                    let mut rng = SimpleRng::new(s);
                    for i in (1..n).rev() {
                        let j = (rng.next_u32() as usize) % (i + 1);
                        indices.swap(i, j);
                    }
                }

                let fold_size = n / k;
                Ok((0..k)
                    .map(|fold| {
                        let test_start = fold * fold_size;
                        let test_end = if fold == k - 1 { n } else { (fold + 1) * fold_size };
                        let mut train = Vec::with_capacity(n - (test_end - test_start));
                        train.extend_from_slice(&indices[..test_start]);
                        train.extend_from_slice(&indices[test_end..]);
                        Fold {
                            train,
                            test: indices[test_start..test_end].to_vec(),
                        }
                    })
                    .collect())
            }
            CVKind::LOOCV => {
                Validator::validate_folds(n, n)?;
                Ok((0..n)
                    .map(|i| Fold {
                        train: (0..n).filter(|&j| j != i).collect(),
                        test: vec![i],
                    })
                    .collect())
            }
        }
    }

    /// Score every candidate and select the best.
    ///
    /// `fold_loss(candidate, fold)` fits on `fold.train` and returns the
    /// summed loss over `fold.test`. A candidate's score is its total loss
    /// divided by `n`.
    pub fn run<C, T, F>(
        self,
        n: usize,
        candidates: &[C],
        seed: Option<u64>,
        mut fold_loss: F,
    ) -> Result<(C, Vec<T>), SmoothError>
    where
        C: Copy,
        T: Float,
        F: FnMut(C, &Fold) -> Result<T, SmoothError>,
    {
        if candidates.is_empty() {
            return Err(SmoothError::InvalidInput(
                "no cross-validation candidates".into(),
            ));
        }

        let folds = self.folds(n, seed)?;
        let n_t = T::from(n).unwrap_or_else(T::one);

        let mut scores = Vec::with_capacity(candidates.len());
        for &candidate in candidates {
            let mut total = T::zero();
            for fold in &folds {
                total = total + fold_loss(candidate, fold)?;
            }
            scores.push(total / n_t);
        }

        log::debug!("cv: {:?} over {} candidates", self, candidates.len());

        Ok(Self::select_best(candidates, scores))
    }

    // ========================================================================
    // Utility Methods
    // ========================================================================

    /// Pick the candidate with the lowest score (first on ties, NaN never wins).
    ///
    /// `candidates` must be non-empty and as long as `scores`.
    pub fn select_best<C: Copy, T: Float>(candidates: &[C], scores: Vec<T>) -> (C, Vec<T>) {
        let mut best: Option<usize> = None;
        for (i, &score) in scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some(b) if score >= scores[b] => {}
                _ => best = Some(i),
            }
        }
        (candidates[best.unwrap_or(0)], scores)
    }

    /// Gather the rows `indices` of a flattened array with `width` values per row.
    pub fn gather<V: Clone>(values: &[V], width: usize, indices: &[usize]) -> Vec<V> {
        let mut out = Vec::with_capacity(indices.len() * width);
        for &i in indices {
            out.extend_from_slice(&values[i * width..(i + 1) * width]);
        }
        out
    }
}
