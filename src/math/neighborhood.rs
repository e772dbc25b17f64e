//! Neighbor ranking and k-nearest search in nD space.
//!
//! ## Purpose
//!
//! This module selects, for one query point, the observations closest to it.
//! It offers a full stable ranking, a linear-scan k-nearest search and a
//! KD-tree accelerated k-nearest search that return identical results.
//!
//! ## Design notes
//!
//! * **Deterministic ties**: Candidates are ordered by (distance, input index),
//!   so equidistant points are resolved by original input order.
//! * **Eytzinger Layout**: Tree nodes are stored in a left-complete binary tree
//!   (array) layout; children of node i live at 2i+1 and 2i+2.
//! * **Trait-based Distance**: Searches are generic over [`PointDistance`].
//!
//! ## Key concepts
//!
//! * **Splitting Plane**: The dimension and value used to split points at each node.
//! * **Pruning**: Skipping branches that cannot contain a nearer (or equally near,
//!   lower-indexed) neighbor.
//!
//! ## Invariants
//!
//! * Queries always return the exact nearest neighbors (no approximation).
//! * `Neighborhood` entries are sorted by (distance, index).
//!
//! ## Non-goals
//!
//! * This module does not support dynamic insertions or deletions.
//! * This module does not support approximate nearest neighbor search.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::cmp::Ordering::{self, Equal};
use num_traits::Float;

// Internal dependencies
use crate::primitives::buffer::NeighborhoodSearchBuffer;

// ============================================================================
// Helper Types
// ============================================================================

/// Candidate neighbor: (input index, comparison-space distance).
///
/// Ordered by distance, then by index.
#[derive(Debug, Clone, Copy)]
pub struct NodeDistance<T>(pub usize, pub T);

impl<T: PartialOrd> PartialEq for NodeDistance<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Equal
    }
}
impl<T: PartialOrd> Eq for NodeDistance<T> {}

impl<T: PartialOrd> PartialOrd for NodeDistance<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: PartialOrd> Ord for NodeDistance<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1
            .partial_cmp(&other.1)
            .unwrap_or(Equal)
            .then(self.0.cmp(&other.0))
    }
}

/// Trait for distance calculations used in neighbor search.
pub trait PointDistance<T: Float> {
    /// Distance in comparison space (monotone in the metric distance, e.g. squared).
    fn distance_squared(&self, a: &[T], b: &[T]) -> T;

    /// Comparison-space lower bound of the distance to a splitting plane.
    fn split_distance_squared(&self, dim: usize, split_val: T, query_val: T) -> T;

    /// Convert a distance from the comparison space to the metric space.
    fn post_process_distance(&self, d: T) -> T;
}

// ============================================================================
// Neighborhood Structure
// ============================================================================

/// Result container for k-nearest neighbor search.
#[derive(Debug, Clone)]
pub struct Neighborhood<T> {
    /// Indices of the k nearest neighbors, nearest first.
    pub indices: Vec<usize>,
    /// Distances to each neighbor (corresponding to indices).
    pub distances: Vec<T>,
    /// Maximum distance in the neighborhood (bandwidth).
    pub max_distance: T,
}

impl<T: Float> Neighborhood<T> {
    /// Create a new empty neighborhood.
    pub fn new() -> Self {
        Self {
            indices: Vec::new(),
            distances: Vec::new(),
            max_distance: T::zero(),
        }
    }

    /// Pre-allocate buffers for a neighborhood of size k.
    pub fn with_capacity(k: usize) -> Self {
        Self {
            indices: Vec::with_capacity(k),
            distances: Vec::with_capacity(k),
            max_distance: T::zero(),
        }
    }

    /// Returns the number of neighbors currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no neighbors are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns true if every neighbor lies at the same distance from the query.
    pub fn is_equidistant(&self) -> bool {
        match self.distances.first() {
            Some(&first) => self.distances.iter().all(|&d| d == first),
            None => true,
        }
    }

    fn clear(&mut self) {
        self.indices.clear();
        self.distances.clear();
        self.max_distance = T::zero();
    }

    /// Fill from candidates sorted by (distance, index).
    fn fill_sorted<D: PointDistance<T>>(&mut self, sorted: &[NodeDistance<T>], dist_calc: &D) {
        self.clear();
        for &NodeDistance(idx, dist) in sorted {
            self.indices.push(idx);
            self.distances.push(dist_calc.post_process_distance(dist));
        }
        self.max_distance = self.distances.last().copied().unwrap_or(T::zero());
    }
}

impl<T: Float> Default for Neighborhood<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Full Ranking
// ============================================================================

/// Rank every point by ascending distance to `query`.
///
/// Returns `(index, distance)` pairs. The sort is stable, so equidistant
/// points keep their input order.
pub fn rank_by_distance<T: Float, D: PointDistance<T>>(
    points: &[T],
    dimensions: usize,
    query: &[T],
    dist_calc: &D,
) -> Vec<(usize, T)> {
    let mut ranked: Vec<(usize, T)> = points
        .chunks_exact(dimensions)
        .enumerate()
        .map(|(i, p)| (i, dist_calc.distance_squared(query, p)))
        .collect();

    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Equal));

    for entry in ranked.iter_mut() {
        entry.1 = dist_calc.post_process_distance(entry.1);
    }
    ranked
}

// ============================================================================
// Linear Scan
// ============================================================================

/// Exact k-nearest search by scanning every point.
#[allow(clippy::too_many_arguments)]
pub fn brute_force_k_nearest<T: Float, D: PointDistance<T>>(
    points: &[T],
    dimensions: usize,
    query: &[T],
    k: usize,
    dist_calc: &D,
    exclude: Option<usize>,
    buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
    neighborhood: &mut Neighborhood<T>,
) {
    buffer.clear();
    let candidates = &mut buffer.candidates;
    candidates.extend(
        points
            .chunks_exact(dimensions)
            .enumerate()
            .filter(|(i, _)| exclude != Some(*i))
            .map(|(i, p)| NodeDistance(i, dist_calc.distance_squared(query, p))),
    );

    let k = k.min(candidates.len());
    if k == 0 {
        neighborhood.clear();
        return;
    }
    if k < candidates.len() {
        candidates.select_nth_unstable(k - 1);
        candidates.truncate(k);
    }
    candidates.sort_unstable();

    neighborhood.fill_sorted(candidates, dist_calc);
}

// ============================================================================
// KD-Tree Implementation
// ============================================================================

/// Node of the Eytzinger-ordered tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct KDNode {
    /// Index of the point in the original flattened data array.
    pub index: usize,
}

/// KD-tree for spatial indexing of nD points.
#[derive(Debug, Clone)]
pub struct KDTree<T: Float> {
    /// The implicit Eytzinger tree nodes.
    nodes: Vec<KDNode>,
    /// Permuted points aligned with the nodes for cache locality.
    points: Vec<T>,
    /// Dimensionality of the data.
    dimensions: usize,
}

impl<T: Float> KDTree<T> {
    /// Build a KD-tree from a flattened data array.
    ///
    /// The input points are copied into a layout matching the node order.
    pub fn new(points: &[T], dimensions: usize) -> Self {
        let n = points.len() / dimensions;
        let mut indices: Vec<usize> = (0..n).collect();

        let mut nodes = vec![KDNode::default(); n];
        let mut permuted_points = vec![T::zero(); n * dimensions];

        Self::build_recursive(
            points,
            dimensions,
            &mut indices,
            0,
            &mut nodes,
            &mut permuted_points,
            0,
        );

        Self {
            nodes,
            points: permuted_points,
            dimensions,
        }
    }

    /// Exact search for the k nearest neighbors, sorted by (distance, index).
    pub fn find_k_nearest<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        exclude: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        neighborhood: &mut Neighborhood<T>,
    ) {
        buffer.clear();
        if k == 0 || self.nodes.is_empty() {
            neighborhood.clear();
            return;
        }

        self.search_iterative(query, k, dist_calc, exclude, buffer);

        let candidates = &mut buffer.candidates;
        candidates.extend(buffer.heap.drain());
        candidates.sort_unstable();
        neighborhood.fill_sorted(candidates, dist_calc);
    }

    /// Recursively builds the tree in Eytzinger layout.
    fn build_recursive(
        points: &[T],
        dims: usize,
        indices: &mut [usize],
        depth: usize,
        nodes: &mut [KDNode],
        permuted_points: &mut [T],
        curr_idx: usize,
    ) {
        if indices.is_empty() {
            return;
        }

        let axis = depth % dims;
        let n = indices.len();

        // Pivot rank for a left-complete tree
        let median_idx = Self::calculate_left_subtree_size(n);

        if median_idx < n {
            indices.select_nth_unstable_by(median_idx, |&a, &b| {
                points[a * dims + axis]
                    .partial_cmp(&points[b * dims + axis])
                    .unwrap_or(Equal)
            });
        }

        let point_idx = indices[median_idx];
        nodes[curr_idx] = KDNode { index: point_idx };

        let src_start = point_idx * dims;
        let dest_start = curr_idx * dims;
        permuted_points[dest_start..dest_start + dims]
            .copy_from_slice(&points[src_start..src_start + dims]);

        let (left_part, right_part_with_median) = indices.split_at_mut(median_idx);
        let right_part = &mut right_part_with_median[1..];

        Self::build_recursive(
            points,
            dims,
            left_part,
            depth + 1,
            nodes,
            permuted_points,
            2 * curr_idx + 1,
        );
        Self::build_recursive(
            points,
            dims,
            right_part,
            depth + 1,
            nodes,
            permuted_points,
            2 * curr_idx + 2,
        );
    }

    /// Iterative search using an explicit stack of node indices.
    fn search_iterative<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        exclude: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
    ) {
        let d = self.dimensions;
        let heap = &mut buffer.heap;
        let stack = &mut buffer.stack;
        let nodes_len = self.nodes.len();

        stack.push(0);

        while let Some(node_idx) = stack.pop() {
            let node = self.nodes[node_idx];
            let offset = node_idx * d;
            let node_point = &self.points[offset..offset + d];

            if exclude != Some(node.index) {
                let candidate = NodeDistance(node.index, dist_calc.distance_squared(query, node_point));
                if heap.len() < k {
                    heap.push(candidate);
                } else if let Some(mut top) = heap.peek_mut() {
                    if candidate < *top {
                        *top = candidate;
                    }
                }
            }

            let left_child = 2 * node_idx + 1;
            if left_child >= nodes_len {
                continue;
            }
            let right_child = left_child + 1;
            let has_right = right_child < nodes_len;

            let axis = Self::depth_of(node_idx) % d;
            let split_val = node_point[axis];
            let diff = query[axis] - split_val;

            // If diff <= 0 the query is on the left side
            let (near, far, near_exists, far_exists) = if diff <= T::zero() {
                (left_child, right_child, true, has_right)
            } else {
                (right_child, left_child, has_right, true)
            };

            // Ties must still be explored: an equidistant point with a lower index wins.
            if far_exists {
                let heap_full = heap.len() == k;
                let bound = heap.peek().map(|nd| nd.1).unwrap_or(T::infinity());
                let dist_to_plane = dist_calc.split_distance_squared(axis, split_val, query[axis]);
                if !heap_full || dist_to_plane <= bound {
                    stack.push(far);
                }
            }
            if near_exists {
                stack.push(near);
            }
        }
    }

    /// Depth of a node in the implicit tree.
    #[inline]
    fn depth_of(node_idx: usize) -> usize {
        (usize::BITS - (node_idx + 1).leading_zeros() - 1) as usize
    }

    /// Calculate number of nodes in the left subtree of a left-complete binary tree of size N.
    pub fn calculate_left_subtree_size(n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        // Height: H = floor(log2(n))
        let h = (usize::BITS - n.leading_zeros() - 1) as usize;
        if h == 0 {
            return 0;
        }

        let max_leaf_capacity = 1 << h;

        // Nodes in the last level
        let total_nodes_above_leaf = max_leaf_capacity - 1;
        let r = n - total_nodes_above_leaf;

        let left_part_leaves = r.min(max_leaf_capacity / 2);
        let left_subtree_capacity_full = (max_leaf_capacity / 2) - 1;
        left_subtree_capacity_full + left_part_leaves
    }
}

// ============================================================================
// Search Strategy
// ============================================================================

/// How k-nearest neighbors are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// KD-tree for large, low-dimensional data; linear scan otherwise.
    #[default]
    Auto,

    /// Always scan every point.
    BruteForce,

    /// Always build a KD-tree.
    KdTree,
}

impl SearchStrategy {
    /// Minimum number of points before `Auto` builds a tree.
    pub const KD_TREE_MIN_POINTS: usize = 256;

    /// Maximum dimensionality for which `Auto` builds a tree.
    pub const KD_TREE_MAX_DIMENSIONS: usize = 16;

    /// Whether this strategy builds a tree for the given data shape.
    pub const fn uses_tree(&self, n: usize, dimensions: usize) -> bool {
        match self {
            Self::Auto => n >= Self::KD_TREE_MIN_POINTS && dimensions <= Self::KD_TREE_MAX_DIMENSIONS,
            Self::BruteForce => false,
            Self::KdTree => true,
        }
    }
}

/// Searchable view of a training set.
#[derive(Debug, Clone)]
pub struct NeighborIndex<'a, T: Float> {
    points: &'a [T],
    dimensions: usize,
    tree: Option<KDTree<T>>,
}

impl<'a, T: Float> NeighborIndex<'a, T> {
    /// Index `points` (flattened, row-major) with the given strategy.
    pub fn build(points: &'a [T], dimensions: usize, strategy: SearchStrategy) -> Self {
        let n = points.len() / dimensions;
        let tree = strategy
            .uses_tree(n, dimensions)
            .then(|| KDTree::new(points, dimensions));
        Self {
            points,
            dimensions,
            tree,
        }
    }

    /// Whether a KD-tree backs this index.
    #[inline]
    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Find the k nearest neighbors of `query`, optionally skipping one index.
    pub fn find_k_nearest<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        exclude: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        neighborhood: &mut Neighborhood<T>,
    ) {
        match &self.tree {
            Some(tree) => tree.find_k_nearest(query, k, dist_calc, exclude, buffer, neighborhood),
            None => brute_force_k_nearest(
                self.points,
                self.dimensions,
                query,
                k,
                dist_calc,
                exclude,
                buffer,
                neighborhood,
            ),
        }
    }
}
