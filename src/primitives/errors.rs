//! Error types for local regression and nearest-neighbor estimation.
//!
//! ## Purpose
//!
//! This module defines every error condition an estimator call can report,
//! from malformed input and parameter constraints to data that is too small
//! for the requested model order or neighbor count.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending values (lengths, counts, parameters).
//! * **Two kinds**: Every variant maps onto [`ErrorKind::InvalidInput`] or
//!   [`ErrorKind::InsufficientData`] through [`SmoothError::kind`].
//! * **No-std**: Dynamic messages use `alloc::string::String`.
//! * **Trait Implementation**: Implements `Display` and `std::error::Error` (when `std` is enabled).
//!
//! ## Invariants
//!
//! * Errors are reported synchronously by the failing call; nothing is retried.
//! * No partial or degraded result is returned alongside an error.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification of an estimator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied malformed data or an out-of-range parameter.
    InvalidInput,

    /// The data is too small for the requested model order or neighbor count.
    InsufficientData,
}

// ============================================================================
// Error Type
// ============================================================================

/// Error type for smoothing and nearest-neighbor operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothError {
    /// No observations were supplied.
    EmptyInput,

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// Feature and response arrays disagree on the number of observations.
    MismatchedInputs {
        /// Number of feature values (flattened) in `x`.
        x_len: usize,
        /// Number of responses in `y`.
        y_len: usize,
    },

    /// Two points (or a point and a dataset) differ in dimensionality.
    DimensionMismatch {
        /// Dimensionality required by the dataset or first operand.
        expected: usize,
        /// Dimensionality actually supplied.
        got: usize,
    },

    /// Input data contains NaN or infinite values.
    InvalidNumericValue(String),

    /// Span must lie in (0, 1].
    InvalidFraction(f64),

    /// Neighbor count must be positive.
    InvalidNeighbors(usize),

    /// Robustness iteration count exceeds the supported maximum.
    InvalidIterations(usize),

    /// Convergence tolerance must be positive and finite.
    InvalidTolerance(f64),

    /// Feature dimensionality must be at least 1.
    InvalidDimensions(usize),

    /// Local polynomial degree is not supported.
    InvalidDegree(usize),

    /// Cross-validation fold configuration is unusable.
    InvalidFolds {
        /// Number of folds requested.
        folds: usize,
        /// Number of observations available.
        n: usize,
    },

    /// The neighborhood holds fewer points than the local model needs.
    TooFewPoints {
        /// Number of points available.
        got: usize,
        /// Minimum required points.
        min: usize,
    },

    /// More neighbors were requested than training observations exist.
    InsufficientNeighbors {
        /// Requested neighbor count.
        k: usize,
        /// Training observations available.
        available: usize,
    },

    /// The weighted neighbors of a query do not determine the local polynomial
    /// (for example, all of them lie on one line in a planar fit).
    DegenerateNeighborhood {
        /// Index of the query point whose local system is rank deficient.
        query: usize,
    },

    /// Every combined weight in a neighborhood is zero (only with `ZeroWeightFallback::Reject`).
    ZeroWeights {
        /// Index of the query point whose neighborhood collapsed.
        query: usize,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}

impl SmoothError {
    /// Classify the error as an input problem or a data-size problem.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TooFewPoints { .. }
            | Self::InsufficientNeighbors { .. }
            | Self::DegenerateNeighborhood { .. }
            | Self::ZeroWeights { .. } => ErrorKind::InsufficientData,
            _ => ErrorKind::InvalidInput,
        }
    }

    /// Returns `true` if the error is an [`ErrorKind::InsufficientData`] condition.
    #[inline]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self.kind(), ErrorKind::InsufficientData)
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for SmoothError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input arrays are empty"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::MismatchedInputs { x_len, y_len } => {
                write!(f, "Length mismatch: x has {x_len} values, y has {y_len}")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch: expected {expected}, got {got}")
            }
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::InvalidFraction(frac) => {
                write!(f, "Invalid fraction: {frac} (must be > 0 and <= 1)")
            }
            Self::InvalidNeighbors(k) => write!(f, "Invalid neighbor count: {k} (must be >= 1)"),
            Self::InvalidIterations(iter) => {
                write!(f, "Invalid iterations: {iter} (must be in [0, 1000])")
            }
            Self::InvalidTolerance(tol) => {
                write!(f, "Invalid tolerance: {tol} (must be > 0 and finite)")
            }
            Self::InvalidDimensions(d) => write!(f, "Invalid dimensions: {d} (must be >= 1)"),
            Self::InvalidDegree(d) => write!(f, "Invalid polynomial degree: {d} (must be 0, 1 or 2)"),
            Self::InvalidFolds { folds, n } => {
                write!(f, "Invalid folds: {folds} (must be in [2, {n}])")
            }
            Self::TooFewPoints { got, min } => {
                write!(f, "Too few points: got {got}, need at least {min}")
            }
            Self::InsufficientNeighbors { k, available } => {
                write!(f, "Too few observations for k={k}: only {available} available")
            }
            Self::DegenerateNeighborhood { query } => {
                write!(f, "Local system at query point {query} is rank deficient")
            }
            Self::ZeroWeights { query } => {
                write!(f, "All neighborhood weights are zero at query point {query}")
            }
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for SmoothError {}
