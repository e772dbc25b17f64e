//! k-nearest-neighbor query engine.
//!
//! ## Purpose
//!
//! This module indexes a labeled (or numeric) training set and answers
//! k-nearest-neighbor queries: majority-vote classification with label
//! proportions, and mean-response regression.
//!
//! ## Design notes
//!
//! * **Exact search**: Brute force or KD-tree, both returning the first k
//!   entries of the stable distance ranking.
//! * **Immutable**: A fitted model never changes; queries only borrow it.
//! * **Leave-one-out**: Queries at a training point may exclude that point,
//!   which is how cross-validation scores k without refitting.
//!
//! ## Invariants
//!
//! * 1 <= k <= number of training observations.
//! * Labels are voted in ascending label order; ties go to the lowest label.
//!
//! ## Non-goals
//!
//! * This module does not weight votes by distance.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Internal dependencies
use crate::algorithms::vote::{LabelSet, VoteTally, mean_vote};
use crate::engine::output::KnnPrediction;
use crate::engine::validator::Validator;
use crate::evaluation::diagnostics::accuracy;
use crate::math::distance::{DistanceCalculator, DistanceMetric};
use crate::math::neighborhood::{
    KDTree, Neighborhood, NodeDistance, SearchStrategy, brute_force_k_nearest, rank_by_distance,
};
use crate::primitives::buffer::NeighborhoodSearchBuffer;
use crate::primitives::errors::SmoothError;

// ============================================================================
// Configuration
// ============================================================================

/// Resolved configuration of a k-NN model.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnConfig<T> {
    /// Number of neighbors consulted per query.
    pub k: usize,

    /// Distance metric between feature vectors.
    pub distance_metric: DistanceMetric<T>,

    /// Neighbor search strategy.
    pub search_strategy: SearchStrategy,

    /// Feature dimensionality.
    pub dimensions: usize,

    /// Answer batches in parallel (requires the `parallel` feature).
    pub parallel: bool,
}

impl<T> Default for KnnConfig<T> {
    fn default() -> Self {
        Self {
            k: 5,
            distance_metric: DistanceMetric::Euclidean,
            search_strategy: SearchStrategy::default(),
            dimensions: 1,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

// ============================================================================
// Training Index
// ============================================================================

/// Owned, searchable copy of the training features.
#[derive(Debug, Clone)]
pub struct KnnIndex<T: Float> {
    features: Vec<T>,
    dimensions: usize,
    k: usize,
    metric: DistanceMetric<T>,
    scales: Vec<T>,
    tree: Option<KDTree<T>>,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<T: Float + Debug + Send + Sync> KnnIndex<T> {
    /// Validate and index `n` observations of flattened `features`.
    pub fn build(config: &KnnConfig<T>, features: Vec<T>, n: usize) -> Result<Self, SmoothError> {
        let dims = config.dimensions;
        Validator::validate_features(&features, n, dims)?;
        Validator::validate_metric(&config.distance_metric, dims)?;
        Validator::validate_neighbors(config.k, n)?;

        let scales = config.distance_metric.scales_for(&features, dims);
        let tree = config
            .search_strategy
            .uses_tree(n, dims)
            .then(|| KDTree::new(&features, dims));

        log::debug!(
            "knn: n={} dims={} k={} kd_tree={}",
            n,
            dims,
            config.k,
            tree.is_some()
        );

        Ok(Self {
            features,
            dimensions: dims,
            k: config.k,
            metric: config.distance_metric.clone(),
            scales,
            tree,
            parallel: config.parallel,
        })
    }

    /// Number of training observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len() / self.dimensions
    }

    /// Returns true if the index holds no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature dimensionality.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of neighbors consulted per query.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Whether a KD-tree backs the search.
    #[inline]
    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Training features (flattened, row-major).
    #[inline]
    pub fn features(&self) -> &[T] {
        &self.features
    }

    /// The k nearest training observations of `query`, nearest first.
    pub fn neighbors(&self, query: &[T]) -> Result<Neighborhood<T>, SmoothError> {
        Validator::validate_point(query, self.dimensions)?;
        let mut buffer = NeighborhoodSearchBuffer::new(self.k);
        let mut nbh = Neighborhood::with_capacity(self.k);
        self.search(query, None, &mut buffer, &mut nbh);
        Ok(nbh)
    }

    /// The k nearest neighbors of training observation `i`, excluding `i` itself.
    pub fn neighbors_excluding(&self, i: usize) -> Result<Neighborhood<T>, SmoothError> {
        let n = self.len();
        if i >= n {
            return Err(SmoothError::InvalidInput(format!(
                "observation index {} out of range for {} observations",
                i, n
            )));
        }
        Validator::validate_neighbors(self.k, n - 1)?;
        let mut buffer = NeighborhoodSearchBuffer::new(self.k);
        let mut nbh = Neighborhood::with_capacity(self.k);
        let query = &self.features[i * self.dimensions..(i + 1) * self.dimensions];
        self.search(query, Some(i), &mut buffer, &mut nbh);
        Ok(nbh)
    }

    /// Every training observation ranked by ascending distance to `query`.
    pub fn rank(&self, query: &[T]) -> Result<Vec<(usize, T)>, SmoothError> {
        Validator::validate_point(query, self.dimensions)?;
        let calc = DistanceCalculator::new(&self.metric, &self.scales);
        Ok(rank_by_distance(&self.features, self.dimensions, query, &calc))
    }

    /// Apply `f` to the neighborhood of every point of a flattened batch.
    pub(crate) fn map_batch<R, F>(&self, queries: &[T], f: F) -> Result<Vec<R>, SmoothError>
    where
        R: Send,
        F: Fn(&Neighborhood<T>) -> R + Sync + Send,
    {
        Validator::validate_queries(queries, self.dimensions)?;
        let dims = self.dimensions;

        #[cfg(feature = "parallel")]
        if self.parallel {
            return Ok(queries
                .par_chunks(dims)
                .map_init(
                    || (NeighborhoodSearchBuffer::new(self.k), Neighborhood::with_capacity(self.k)),
                    |(buffer, nbh), query| {
                        self.search(query, None, buffer, nbh);
                        f(nbh)
                    },
                )
                .collect());
        }

        let mut buffer = NeighborhoodSearchBuffer::new(self.k);
        let mut nbh = Neighborhood::with_capacity(self.k);
        Ok(queries
            .chunks_exact(dims)
            .map(|query| {
                self.search(query, None, &mut buffer, &mut nbh);
                f(&nbh)
            })
            .collect())
    }

    fn search(
        &self,
        query: &[T],
        exclude: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        nbh: &mut Neighborhood<T>,
    ) {
        let calc = DistanceCalculator::new(&self.metric, &self.scales);
        match &self.tree {
            Some(tree) => tree.find_k_nearest(query, self.k, &calc, exclude, buffer, nbh),
            None => brute_force_k_nearest(
                &self.features,
                self.dimensions,
                query,
                self.k,
                &calc,
                exclude,
                buffer,
                nbh,
            ),
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Fitted k-NN classifier.
#[derive(Debug, Clone)]
pub struct KnnClassifier<T: Float, L> {
    index: KnnIndex<T>,
    label_set: LabelSet<L>,
    codes: Vec<usize>,
}

impl<T, L> KnnClassifier<T, L>
where
    T: Float + Debug + Send + Sync,
    L: Ord + Clone + Debug + Send + Sync,
{
    /// Index the training set: `features` holds one row per entry of `labels`.
    pub fn fit(config: &KnnConfig<T>, features: Vec<T>, labels: &[L]) -> Result<Self, SmoothError> {
        let index = KnnIndex::build(config, features, labels.len())?;
        let label_set = LabelSet::from_labels(labels);
        let codes = label_set.encode(labels);
        Ok(Self {
            index,
            label_set,
            codes,
        })
    }

    /// The underlying training index.
    #[inline]
    pub fn index(&self) -> &KnnIndex<T> {
        &self.index
    }

    /// Distinct training labels in vote order.
    #[inline]
    pub fn labels(&self) -> &[L] {
        self.label_set.labels()
    }

    /// Majority label among the k nearest neighbors of `query`.
    pub fn classify(&self, query: &[T]) -> Result<L, SmoothError> {
        let nbh = self.index.neighbors(query)?;
        Ok(self.vote_label(&nbh))
    }

    /// Majority label, label proportions and neighbor indices for `query`.
    pub fn predict(&self, query: &[T]) -> Result<KnnPrediction<L, T>, SmoothError> {
        let nbh = self.index.neighbors(query)?;
        Ok(self.vote(&nbh))
    }

    /// Classify every point of a flattened batch.
    pub fn classify_batch(&self, queries: &[T]) -> Result<Vec<L>, SmoothError> {
        self.index.map_batch(queries, |nbh| self.vote_label(nbh))
    }

    /// Predict every point of a flattened batch.
    pub fn predict_batch(&self, queries: &[T]) -> Result<Vec<KnnPrediction<L, T>>, SmoothError> {
        self.index.map_batch(queries, |nbh| self.vote(nbh))
    }

    /// Classify training observation `i` from its k nearest *other* observations.
    pub fn classify_excluding(&self, i: usize) -> Result<L, SmoothError> {
        let nbh = self.index.neighbors_excluding(i)?;
        Ok(self.vote_label(&nbh))
    }

    /// Share of `queries` classified as their entry in `truth`.
    ///
    /// `queries` holds one flattened point per entry of `truth`.
    pub fn accuracy(&self, queries: &[T], truth: &[L]) -> Result<f64, SmoothError> {
        if queries.len() != truth.len() * self.index.dimensions() {
            return Err(SmoothError::MismatchedInputs {
                x_len: queries.len(),
                y_len: truth.len(),
            });
        }
        let predicted = self.classify_batch(queries)?;
        Ok(accuracy(&predicted, truth))
    }

    fn vote_label(&self, nbh: &Neighborhood<T>) -> L {
        let tally = VoteTally::tally(&self.codes, &nbh.indices, self.label_set.len());
        self.label_set.label(tally.majority()).clone()
    }

    fn vote(&self, nbh: &Neighborhood<T>) -> KnnPrediction<L, T> {
        let tally = VoteTally::tally(&self.codes, &nbh.indices, self.label_set.len());
        let proportions = self
            .label_set
            .labels()
            .iter()
            .cloned()
            .zip(tally.proportions::<T>())
            .collect();
        KnnPrediction {
            label: self.label_set.label(tally.majority()).clone(),
            proportions,
            neighbors: nbh.indices.clone(),
        }
    }
}

// ============================================================================
// Regressor
// ============================================================================

/// Fitted k-NN regressor (mean response of the k nearest neighbors).
#[derive(Debug, Clone)]
pub struct KnnRegressor<T: Float> {
    index: KnnIndex<T>,
    responses: Vec<T>,
}

impl<T: Float + Debug + Send + Sync> KnnRegressor<T> {
    /// Index the training set: `features` holds one row per response.
    pub fn fit(config: &KnnConfig<T>, features: Vec<T>, responses: Vec<T>) -> Result<Self, SmoothError> {
        Validator::validate_inputs(&features, &responses, config.dimensions)?;
        let index = KnnIndex::build(config, features, responses.len())?;
        Ok(Self { index, responses })
    }

    /// The underlying training index.
    #[inline]
    pub fn index(&self) -> &KnnIndex<T> {
        &self.index
    }

    /// Mean response of the k nearest neighbors of `query`.
    pub fn predict(&self, query: &[T]) -> Result<T, SmoothError> {
        let nbh = self.index.neighbors(query)?;
        Ok(mean_vote(&self.responses, &nbh.indices))
    }

    /// Predict every point of a flattened batch.
    pub fn predict_batch(&self, queries: &[T]) -> Result<Vec<T>, SmoothError> {
        self.index
            .map_batch(queries, |nbh| mean_vote(&self.responses, &nbh.indices))
    }

    /// Predict training observation `i` from its k nearest *other* observations.
    pub fn predict_excluding(&self, i: usize) -> Result<T, SmoothError> {
        let nbh = self.index.neighbors_excluding(i)?;
        Ok(mean_vote(&self.responses, &nbh.indices))
    }
}
