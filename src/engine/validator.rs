//! Input validation for estimator configuration and data.
//!
//! ## Purpose
//!
//! This module checks estimator parameters and input data before any
//! computation starts, so that every configuration error is reported as a
//! `SmoothError` rather than a panic or a silently degraded fit.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective mathematical constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not sort, transform, or filter input data.
//! * This module does not provide automatic correction of invalid inputs.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::SmoothError;

/// Validation utility for estimator configuration and input data.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Data Validation
    // ========================================================================

    /// Validate a flattened feature array holding `n` observations of `dimensions` coordinates.
    pub fn validate_features<T: Float>(x: &[T], n: usize, dimensions: usize) -> Result<(), SmoothError> {
        if dimensions == 0 {
            return Err(SmoothError::InvalidDimensions(0));
        }
        if x.is_empty() || n == 0 {
            return Err(SmoothError::EmptyInput);
        }
        if x.len() != n * dimensions {
            return Err(SmoothError::MismatchedInputs { x_len: x.len(), y_len: n });
        }
        Self::validate_finite(x, "x")
    }

    /// Validate features plus numeric responses.
    pub fn validate_inputs<T: Float>(x: &[T], y: &[T], dimensions: usize) -> Result<(), SmoothError> {
        Self::validate_features(x, y.len(), dimensions)?;
        Self::validate_finite(y, "y")
    }

    /// Validate one query point against the training dimensionality.
    pub fn validate_point<T: Float>(point: &[T], dimensions: usize) -> Result<(), SmoothError> {
        if point.len() != dimensions {
            return Err(SmoothError::DimensionMismatch {
                expected: dimensions,
                got: point.len(),
            });
        }
        Self::validate_finite(point, "query")
    }

    /// Validate a flattened batch of query points.
    pub fn validate_queries<T: Float>(queries: &[T], dimensions: usize) -> Result<(), SmoothError> {
        if queries.is_empty() {
            return Err(SmoothError::EmptyInput);
        }
        if queries.len() % dimensions != 0 {
            return Err(SmoothError::InvalidInput(format!(
                "query array of length {} is not a multiple of dimensions {}",
                queries.len(),
                dimensions
            )));
        }
        Self::validate_finite(queries, "query")
    }

    fn validate_finite<T: Float>(vals: &[T], name: &str) -> Result<(), SmoothError> {
        for (i, &val) in vals.iter().enumerate() {
            if !val.is_finite() {
                return Err(SmoothError::InvalidNumericValue(format!(
                    "{}[{}]={}",
                    name,
                    i,
                    val.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the span (fraction of observations per neighborhood).
    pub fn validate_fraction<T: Float>(fraction: T) -> Result<(), SmoothError> {
        if !fraction.is_finite() || fraction <= T::zero() || fraction > T::one() {
            return Err(SmoothError::InvalidFraction(
                fraction.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the number of robustness iterations.
    ///
    /// 0 iterations means a single, non-robust fit.
    pub fn validate_iterations(iterations: usize) -> Result<(), SmoothError> {
        const MAX_ITERATIONS: usize = 1000;
        if iterations > MAX_ITERATIONS {
            return Err(SmoothError::InvalidIterations(iterations));
        }
        Ok(())
    }

    /// Validate the auto-convergence tolerance.
    pub fn validate_tolerance<T: Float>(tol: T) -> Result<(), SmoothError> {
        if !tol.is_finite() || tol <= T::zero() {
            return Err(SmoothError::InvalidTolerance(
                tol.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate a neighbor count against the training-set size.
    pub fn validate_neighbors(k: usize, available: usize) -> Result<(), SmoothError> {
        if k == 0 {
            return Err(SmoothError::InvalidNeighbors(k));
        }
        if k > available {
            return Err(SmoothError::InsufficientNeighbors { k, available });
        }
        Ok(())
    }

    /// Validate that a neighborhood can support a model with `n_coeffs` coefficients.
    pub fn validate_neighborhood_size(size: usize, n_coeffs: usize) -> Result<(), SmoothError> {
        if size < n_coeffs {
            return Err(SmoothError::TooFewPoints {
                got: size,
                min: n_coeffs,
            });
        }
        Ok(())
    }

    /// Validate metric parameters for the given dimensionality.
    pub fn validate_metric<T: Float>(metric: &DistanceMetric<T>, dimensions: usize) -> Result<(), SmoothError> {
        match metric {
            DistanceMetric::Minkowski(p) => {
                if !p.is_finite() || *p < T::one() {
                    return Err(SmoothError::InvalidInput(format!(
                        "Minkowski exponent must be finite and >= 1, got {}",
                        p.to_f64().unwrap_or(f64::NAN)
                    )));
                }
            }
            DistanceMetric::Weighted(w) => {
                if w.len() != dimensions {
                    return Err(SmoothError::DimensionMismatch {
                        expected: dimensions,
                        got: w.len(),
                    });
                }
                if w.iter().any(|&wi| !wi.is_finite() || wi < T::zero()) {
                    return Err(SmoothError::InvalidInput(
                        "metric weights must be finite and non-negative".into(),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Fail if a builder parameter was set more than once.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), SmoothError> {
        if let Some(parameter) = duplicate_param {
            return Err(SmoothError::DuplicateParameter { parameter });
        }
        Ok(())
    }

    /// Validate the number of cross-validation folds.
    pub fn validate_folds(folds: usize, n: usize) -> Result<(), SmoothError> {
        if folds < 2 || folds > n {
            return Err(SmoothError::InvalidFolds { folds, n });
        }
        Ok(())
    }
}
