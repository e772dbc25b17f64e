//! Reusable scratch space for per-query estimation.
//!
//! ## Purpose
//!
//! Every query point needs a neighbor search, a weight vector and (for
//! local regression) a small normal-equation system. This module bundles
//! those buffers so that one allocation serves all queries of a call.
//!
//! ## Design notes
//!
//! * **Per-worker ownership**: A `QueryWorkspace` is owned by exactly one
//!   thread; parallel evaluation creates one per worker.
//! * **Lazy Expansion**: Buffers grow on demand and are only logically
//!   cleared between queries.
//!
//! ## Non-goals
//!
//! * Cross-call caching. Workspaces never outlive the estimator call.

// Feature-gated dependencies
#[cfg(not(feature = "std"))]
use alloc::collections::BinaryHeap;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::BinaryHeap;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::neighborhood::{Neighborhood, NodeDistance};

// ============================================================================
// Search Buffer
// ============================================================================

/// Persistent buffers for KD-tree search to avoid allocations.
#[derive(Debug, Clone)]
pub struct NeighborhoodSearchBuffer<N> {
    pub(crate) heap: BinaryHeap<N>,
    pub(crate) stack: Vec<usize>,
    pub(crate) candidates: Vec<N>,
}

impl<N: Ord> NeighborhoodSearchBuffer<N> {
    /// Create a new search buffer with capacity k.
    pub fn new(k: usize) -> Self {
        // Stack depth is bounded by tree height.
        Self {
            heap: BinaryHeap::with_capacity(k + 1),
            stack: Vec::with_capacity(32),
            candidates: Vec::new(),
        }
    }

    /// Clear all internal buffers for reuse.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.stack.clear();
        self.candidates.clear();
    }
}

// ============================================================================
// Fitting Buffer
// ============================================================================

/// Persistent buffers for local weighted least squares.
#[derive(Debug, Clone)]
pub struct FittingBuffer<T> {
    /// Combined (kernel x robustness) weight of each neighbor.
    pub weights: Vec<T>,
    /// Normal matrix X'WX (row-major, n_coeffs x n_coeffs).
    pub xtw_x: Vec<T>,
    /// Normal vector X'Wy.
    pub xtw_y: Vec<T>,
    /// Polynomial terms of one neighbor.
    pub terms: Vec<T>,
}

impl<T: Float> FittingBuffer<T> {
    /// Create a new fitting buffer with estimated capacities.
    pub fn new(k: usize, n_coeffs: usize) -> Self {
        Self {
            weights: Vec::with_capacity(k),
            xtw_x: Vec::with_capacity(n_coeffs * n_coeffs),
            xtw_y: Vec::with_capacity(n_coeffs),
            terms: Vec::with_capacity(n_coeffs),
        }
    }

    /// Zero the normal equations for a system with `n_coeffs` unknowns.
    pub fn reset_system(&mut self, n_coeffs: usize) {
        self.xtw_x.clear();
        self.xtw_x.resize(n_coeffs * n_coeffs, T::zero());
        self.xtw_y.clear();
        self.xtw_y.resize(n_coeffs, T::zero());
        self.terms.clear();
        self.terms.resize(n_coeffs, T::zero());
    }
}

// ============================================================================
// Query Workspace
// ============================================================================

/// All scratch space one worker needs to evaluate a query point.
#[derive(Debug, Clone)]
pub struct QueryWorkspace<T: Float> {
    /// KD-tree / brute-force search state.
    pub search: NeighborhoodSearchBuffer<NodeDistance<T>>,
    /// Neighbors of the current query.
    pub neighborhood: Neighborhood<T>,
    /// Weighted least squares system.
    pub fitting: FittingBuffer<T>,
}

impl<T: Float> QueryWorkspace<T> {
    /// Create a workspace for neighborhoods of size `k` and `n_coeffs` unknowns.
    pub fn new(k: usize, n_coeffs: usize) -> Self {
        Self {
            search: NeighborhoodSearchBuffer::new(k),
            neighborhood: Neighborhood::with_capacity(k),
            fitting: FittingBuffer::new(k, n_coeffs),
        }
    }
}
