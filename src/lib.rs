//! # loess-knn: Local Regression and k-Nearest Neighbors for Rust
//!
//! Two stateless, nonparametric estimators over a shared distance layer:
//!
//! * **Local weighted regression (loess)**: smooths a scatter of observations
//!   with locally weighted polynomial fits, optionally robustified against
//!   outliers.
//! * **k-nearest neighbors (k-NN)**: classifies a query point by majority vote
//!   among its k closest labeled observations, or estimates a numeric response
//!   as their mean.
//!
//! ## What is loess?
//!
//! For every evaluation point x₀, loess:
//!
//! 1. selects the `ceil(span * N)` observations closest to x₀,
//! 2. weights each by the tricube kernel `(1 - (d / maxdist)³)³`,
//! 3. fits a weighted least-squares polynomial (degree 0, 1 or 2),
//! 4. evaluates the polynomial at x₀.
//!
//! With robustness enabled, residuals are turned into bisquare weights that
//! downweight outliers, and the fit is repeated.
//!
//! ## Quick Start
//!
//! ### Local regression
//!
//! ```rust
//! use loess_knn::prelude::*;
//!
//! let x = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
//! let y = vec![0.0, 0.0, 10.0, 0.0, 0.0];
//!
//! let model = Loess::new()
//!     .fraction(1.0)      // every observation in each neighborhood
//!     .degree(Constant)   // weighted mean (bin smoother)
//!     .build()?;
//!
//! let result = model.fit(&x, &y)?;
//!
//! // Smoothing, not interpolation
//! assert!(result.y[2] > 0.0 && result.y[2] < 10.0);
//! # Result::<(), SmoothError>::Ok(())
//! ```
//!
//! ### Robust fit at arbitrary points
//!
//! ```rust
//! use loess_knn::prelude::*;
//!
//! let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
//! let mut y: Vec<f64> = x.iter().map(|&xi| 2.0 * xi + 1.0).collect();
//! y[10] = 100.0; // outlier
//!
//! let model = Loess::new()
//!     .fraction(0.5)
//!     .robust(true)
//!     .return_robustness_weights()
//!     .build()?;
//!
//! let result = model.fit_at(&x, &y, &[9.5, 10.5])?;
//! assert_eq!(result.y.len(), 2);
//!
//! let weights = result.robustness_weights.as_ref().unwrap();
//! assert!(weights[10] < 0.5);
//! # Result::<(), SmoothError>::Ok(())
//! ```
//!
//! ### k-NN classification
//!
//! ```rust
//! use loess_knn::prelude::*;
//!
//! // (0,0)->A, (1,0)->A, (0,1)->B, (5,5)->B
//! let features = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 5.0, 5.0];
//! let labels = vec!['A', 'A', 'B', 'B'];
//!
//! let classifier = Knn::new().k(3).dimensions(2).build()?.fit(&features, &labels)?;
//!
//! let prediction = classifier.predict(&[0.1, 0.1])?;
//! assert_eq!(prediction.label, 'A');
//! assert_eq!(prediction.neighbors, vec![0, 1, 2]);
//! # Result::<(), SmoothError>::Ok(())
//! ```
//!
//! ## Parameters
//!
//! | Parameter               | Default        | Meaning                                         |
//! |-------------------------|----------------|-------------------------------------------------|
//! | `fraction`              | 0.75           | Span: share of observations per neighborhood    |
//! | `degree`                | `Linear`       | Local polynomial: `Constant`, `Linear`, `Quadratic` |
//! | `iterations` / `robust` | 0 / 4          | Robustness iterations                           |
//! | `weight_function`       | `Tricube`      | Distance kernel                                 |
//! | `robustness_method`     | `Bisquare`     | Residual downweighting                          |
//! | `scaling_method`        | `MAR`          | Residual scale (median absolute residual)       |
//! | `distance_metric`       | `Euclidean`    | Distance between feature vectors                |
//! | `zero_weight_fallback`  | `UseLocalMean` | Behavior when every weight vanishes             |
//! | `k` (k-NN)              | 5              | Neighbors per query                             |
//!
//! ## Errors
//!
//! Every fallible call returns [`SmoothError`](prelude::SmoothError). Its
//! [`kind()`](prelude::SmoothError::kind) is either `InvalidInput`
//! (malformed parameters or data) or `InsufficientData` (too few observations
//! for the requested model order or neighbor count).
//!
//! ```rust
//! use loess_knn::prelude::*;
//!
//! let features = vec![0.0, 1.0, 2.0, 3.0];
//! let labels = vec![0, 0, 1, 1];
//! let err = Knn::new().k(10).build()?.fit(&features, &labels).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InsufficientData);
//! # Result::<(), SmoothError>::Ok(())
//! ```
//!
//! ## Logging
//!
//! Runs emit `debug!` records through the [`log`](https://docs.rs/log) facade;
//! numerical fallbacks emit `trace!`. No logger is installed by this crate.
//!
//! ## References
//!
//! - Cleveland, W. S. (1979). "Robust Locally Weighted Regression and Smoothing Scatterplots"
//! - Cleveland, W. S. & Devlin, S. J. (1988). "Locally Weighted Regression: An Approach to Regression Analysis by Local Fitting"

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, observation records, and reusable scratch buffers.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains distance metrics, neighbor search (brute force and KD-tree),
// kernel functions, robust scale estimators, and least-squares solving.
mod math;

// Layer 3: Algorithms - per-query estimation.
//
// Contains local regression (via `RegressionContext`), robustness
// weighting (`Bisquare`, `Huber`, `Talwar`), and neighbor voting.
mod algorithms;

// Layer 4: Evaluation - diagnostics and parameter selection.
//
// Contains fit diagnostics (RMSE, MAE, R²), classification accuracy, and
// cross-validation.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains the robustness iteration loop, the k-NN query engine,
// validation, and result assembly.
mod engine;

// High-level fluent API.
//
// Provides the `Loess` and `Knn` builders.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use loess_knn::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        Diagnostics, DistanceMetric,
        DistanceMetric::{Chebyshev, Euclidean, Manhattan, Minkowski, Normalized, Weighted},
        ErrorKind, KFold, KnnBuilder as Knn, KnnClassifier, KnnModel, KnnPrediction, KnnRegressor,
        LOOCV, LoessBuilder as Loess, LoessModel, LoessResult, Observation, ObservationSet,
        PolynomialDegree::{Constant, Linear, Quadratic},
        RobustnessMethod::{Bisquare, Huber, Talwar},
        ScalingMethod::MAD,
        ScalingMethod::MAR,
        SearchStrategy, SmoothError,
        WeightFunction::{Biweight, Cosine, Epanechnikov, Triangle, Tricube, Uniform},
        ZeroWeightFallback::{Reject, UseLocalMean},
        accuracy, distance,
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal evaluation and diagnostics.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
