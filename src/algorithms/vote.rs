//! Neighbor voting for k-nearest-neighbor estimation.
//!
//! ## Purpose
//!
//! Turns the labels (or numeric responses) of a query's k nearest neighbors
//! into a prediction: label proportions, a majority label, or a mean response.
//!
//! ## Key concepts
//!
//! * **Label ordering**: Distinct training labels are kept in ascending order;
//!   each label is identified by its position (its code) in that ordering.
//! * **Tie-break**: Among labels with the same vote count, the one with the
//!   lowest code wins.
//!
//! ## Invariants
//!
//! * Proportions sum to 1 and are reported in label order.
//! * Voting never depends on iteration order of any hash structure.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// ============================================================================
// Label Set
// ============================================================================

/// Fixed ascending ordering of the distinct labels of a training set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet<L> {
    labels: Vec<L>,
}

impl<L: Ord + Clone> LabelSet<L> {
    /// Collect the distinct labels in ascending order.
    pub fn from_labels(labels: &[L]) -> Self {
        let mut distinct = labels.to_vec();
        distinct.sort();
        distinct.dedup();
        Self { labels: distinct }
    }

    /// Position of `label` in the ordering.
    #[inline]
    pub fn code_of(&self, label: &L) -> Option<usize> {
        self.labels.binary_search(label).ok()
    }

    /// Encode every label as its position in the ordering.
    pub fn encode(&self, labels: &[L]) -> Vec<usize> {
        labels
            .iter()
            .map(|l| self.code_of(l).unwrap_or(usize::MAX))
            .collect()
    }
}

impl<L> LabelSet<L> {
    /// Distinct labels in ascending order.
    #[inline]
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Label with the given code.
    #[inline]
    pub fn label(&self, code: usize) -> &L {
        &self.labels[code]
    }

    /// Number of distinct labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

// ============================================================================
// Vote Tally
// ============================================================================

/// Vote counts per label code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    counts: Vec<usize>,
    total: usize,
}

impl VoteTally {
    /// Count the votes of `neighbors`, whose label codes are looked up in `codes`.
    pub fn tally(codes: &[usize], neighbors: &[usize], n_labels: usize) -> Self {
        let mut counts = vec![0; n_labels];
        for &idx in neighbors {
            counts[codes[idx]] += 1;
        }
        Self {
            counts,
            total: neighbors.len(),
        }
    }

    /// Code of the most voted label; ties go to the lowest code.
    pub fn majority(&self) -> usize {
        let mut best = 0;
        for (code, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] {
                best = code;
            }
        }
        best
    }

    /// Fraction of votes per label code.
    pub fn proportions<T: Float>(&self) -> Vec<T> {
        let total = T::from(self.total.max(1)).unwrap_or_else(T::one);
        self.counts
            .iter()
            .map(|&c| T::from(c).unwrap_or_else(T::zero) / total)
            .collect()
    }
}

/// Mean response of the neighbors (numeric k-NN regression).
pub fn mean_vote<T: Float>(y: &[T], neighbors: &[usize]) -> T {
    let sum = neighbors.iter().fold(T::zero(), |acc, &idx| acc + y[idx]);
    sum / T::from(neighbors.len().max(1)).unwrap_or_else(T::one)
}
