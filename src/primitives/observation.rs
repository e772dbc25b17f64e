//! Observation records and dimension-checked observation sets.
//!
//! ## Purpose
//!
//! Estimators consume observations as a flattened, row-major feature array
//! plus one response per row. This module provides the named record that
//! loaders produce and the conversion into that flattened layout.
//!
//! ## Invariants
//!
//! * Every observation in a set has the same dimensionality (>= 1).
//! * `features.len() == responses.len() * dimensions`.
//! * A set is immutable once built.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::primitives::errors::SmoothError;

// ============================================================================
// Observation
// ============================================================================

/// A single observation: feature coordinates and a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T, R> {
    /// Feature coordinates (length = dimensionality).
    pub features: Vec<T>,
    /// Numeric or categorical response.
    pub response: R,
}

impl<T, R> Observation<T, R> {
    /// Create an observation from its features and response.
    pub fn new(features: Vec<T>, response: R) -> Self {
        Self { features, response }
    }

    /// Dimensionality of the feature vector.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.features.len()
    }
}

// ============================================================================
// Observation Set
// ============================================================================

/// A fixed set of observations in flattened row-major layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet<T, R> {
    features: Vec<T>,
    responses: Vec<R>,
    dimensions: usize,
}

impl<T: Copy, R: Clone> ObservationSet<T, R> {
    /// Build a set from observation records.
    ///
    /// Fails with `EmptyInput` for no records, `InvalidDimensions` for
    /// zero-length features and `DimensionMismatch` when records disagree.
    pub fn from_observations(observations: &[Observation<T, R>]) -> Result<Self, SmoothError> {
        let first = observations.first().ok_or(SmoothError::EmptyInput)?;
        let dimensions = first.dimensions();
        if dimensions == 0 {
            return Err(SmoothError::InvalidDimensions(0));
        }

        let mut features = Vec::with_capacity(observations.len() * dimensions);
        let mut responses = Vec::with_capacity(observations.len());
        for obs in observations {
            if obs.dimensions() != dimensions {
                return Err(SmoothError::DimensionMismatch {
                    expected: dimensions,
                    got: obs.dimensions(),
                });
            }
            features.extend_from_slice(&obs.features);
            responses.push(obs.response.clone());
        }

        Ok(Self {
            features,
            responses,
            dimensions,
        })
    }

    /// Build a set from already flattened features.
    pub fn from_flat(features: Vec<T>, responses: Vec<R>, dimensions: usize) -> Result<Self, SmoothError> {
        if dimensions == 0 {
            return Err(SmoothError::InvalidDimensions(0));
        }
        if responses.is_empty() {
            return Err(SmoothError::EmptyInput);
        }
        if features.len() != responses.len() * dimensions {
            return Err(SmoothError::MismatchedInputs {
                x_len: features.len(),
                y_len: responses.len(),
            });
        }
        Ok(Self {
            features,
            responses,
            dimensions,
        })
    }
}

impl<T, R> ObservationSet<T, R> {
    /// Flattened row-major features.
    #[inline]
    pub fn features(&self) -> &[T] {
        &self.features
    }

    /// Responses, one per observation.
    #[inline]
    pub fn responses(&self) -> &[R] {
        &self.responses
    }

    /// Feature dimensionality.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Returns true if the set holds no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Feature coordinates of observation `i`.
    #[inline]
    pub fn point(&self, i: usize) -> &[T] {
        &self.features[i * self.dimensions..(i + 1) * self.dimensions]
    }
}
