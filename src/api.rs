//! High-level API for local regression and k-nearest-neighbor estimation.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry points. It implements
//! fluent builders for configuring both estimators and the fitted models
//! they produce.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builders with sensible defaults for all parameters.
//! * **Validated**: Parameters are validated when `.build()` is called; data is
//!   validated on every fit.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//! * **Stateless models**: A built model holds configuration only; each fit
//!   starts from scratch.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`LoessBuilder`] via `Loess::new()` (or a [`KnnBuilder`] via `Knn::new()`).
//! 2. Chain configuration methods (`.fraction()`, `.degree()`, `.k()`, etc.).
//! 3. Call `.build()` to validate and obtain a model.
//! 4. Call `.fit(...)` on the model.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::{ExecutorOutput, LoessConfig, LoessExecutor};
use crate::engine::knn::KnnConfig;
use crate::engine::validator::Validator;
use crate::evaluation::cv::CVKind;
use crate::math::linalg::FloatLinalg;

// Publicly re-exported types
pub use crate::algorithms::regression::{PolynomialDegree, ZeroWeightFallback};
pub use crate::algorithms::robustness::RobustnessMethod;
pub use crate::engine::knn::{KnnClassifier, KnnRegressor};
pub use crate::engine::output::{KnnPrediction, LoessResult};
pub use crate::evaluation::cv::{CVConfig, KFold, LOOCV};
pub use crate::evaluation::diagnostics::{Diagnostics, accuracy};
pub use crate::math::distance::{DistanceMetric, distance};
pub use crate::math::kernel::WeightFunction;
pub use crate::math::neighborhood::SearchStrategy;
pub use crate::math::scaling::ScalingMethod;
pub use crate::primitives::errors::{ErrorKind, SmoothError};
pub use crate::primitives::observation::{Observation, ObservationSet};

// ============================================================================
// Local Regression Builder
// ============================================================================

/// Fluent builder for configuring local regression.
#[derive(Debug, Clone)]
pub struct LoessBuilder<T: FloatLinalg + Debug + Send + Sync> {
    /// Span: fraction of observations per neighborhood (0..1].
    pub fraction: Option<T>,

    /// Robustness iterations.
    pub iterations: Option<usize>,

    /// Kernel weight function.
    pub weight_function: Option<WeightFunction>,

    /// Outlier downweighting method.
    pub robustness_method: Option<RobustnessMethod>,

    /// Residual scale estimator for robustness weights.
    pub scaling_method: Option<ScalingMethod>,

    /// Absolute convergence tolerance for robustness iterations.
    pub auto_convergence: Option<T>,

    /// Polynomial degree for local regression (0=constant, 1=linear, 2=quadratic).
    pub polynomial_degree: Option<PolynomialDegree>,

    /// Number of predictor dimensions (default: 1).
    pub dimensions: Option<usize>,

    /// Distance metric for neighborhood computation.
    pub distance_metric: Option<DistanceMetric<T>>,

    /// Behavior when local neighborhood weights are zero (default: UseLocalMean).
    pub zero_weight_fallback: Option<ZeroWeightFallback>,

    /// Neighbor search strategy (default: Auto).
    pub search_strategy: Option<SearchStrategy>,

    /// Enable goodness-of-fit diagnostics.
    pub return_diagnostics: Option<bool>,

    /// Return residuals r_i.
    pub compute_residuals: Option<bool>,

    /// Return final robustness weights w_i.
    pub return_robustness_weights: Option<bool>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg + Debug + Send + Sync> Default for LoessBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg + Debug + Send + Sync> LoessBuilder<T> {
    /// Robustness iterations selected by `.robust(true)`.
    pub const ROBUST_ITERATIONS: usize = 4;

    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            fraction: None,
            iterations: None,
            weight_function: None,
            robustness_method: None,
            scaling_method: None,
            auto_convergence: None,
            polynomial_degree: None,
            dimensions: None,
            distance_metric: None,
            zero_weight_fallback: None,
            search_strategy: None,
            return_diagnostics: None,
            compute_residuals: None,
            return_robustness_weights: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the span (fraction of observations in each neighborhood).
    pub fn fraction(mut self, fraction: T) -> Self {
        if self.fraction.is_some() {
            self.duplicate_param = Some("fraction");
        }
        self.fraction = Some(fraction);
        self
    }

    /// Set the number of robustness iterations (typically 0-4).
    pub fn iterations(mut self, iterations: usize) -> Self {
        if self.iterations.is_some() {
            self.duplicate_param = Some("iterations");
        }
        self.iterations = Some(iterations);
        self
    }

    /// Toggle robust fitting: 4 iterations when enabled, 0 otherwise.
    pub fn robust(self, enabled: bool) -> Self {
        self.iterations(if enabled { Self::ROBUST_ITERATIONS } else { 0 })
    }

    /// Set the kernel weight function.
    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        if self.weight_function.is_some() {
            self.duplicate_param = Some("weight_function");
        }
        self.weight_function = Some(wf);
        self
    }

    /// Set the robustness weighting method.
    pub fn robustness_method(mut self, rm: RobustnessMethod) -> Self {
        if self.robustness_method.is_some() {
            self.duplicate_param = Some("robustness_method");
        }
        self.robustness_method = Some(rm);
        self
    }

    /// Set the residual scale estimator.
    pub fn scaling_method(mut self, method: ScalingMethod) -> Self {
        if self.scaling_method.is_some() {
            self.duplicate_param = Some("scaling_method");
        }
        self.scaling_method = Some(method);
        self
    }

    /// Stop robustness iterations once no fitted value moves more than `tolerance`.
    pub fn auto_converge(mut self, tolerance: T) -> Self {
        if self.auto_convergence.is_some() {
            self.duplicate_param = Some("auto_convergence");
        }
        self.auto_convergence = Some(tolerance);
        self
    }

    /// Set the local polynomial degree.
    pub fn degree(mut self, degree: PolynomialDegree) -> Self {
        if self.polynomial_degree.is_some() {
            self.duplicate_param = Some("degree");
        }
        self.polynomial_degree = Some(degree);
        self
    }

    /// Set the number of predictor dimensions.
    pub fn dimensions(mut self, dims: usize) -> Self {
        if self.dimensions.is_some() {
            self.duplicate_param = Some("dimensions");
        }
        self.dimensions = Some(dims);
        self
    }

    /// Set the distance metric.
    pub fn distance_metric(mut self, metric: DistanceMetric<T>) -> Self {
        if self.distance_metric.is_some() {
            self.duplicate_param = Some("distance_metric");
        }
        self.distance_metric = Some(metric);
        self
    }

    /// Set behavior for handling zero-weight neighborhoods.
    pub fn zero_weight_fallback(mut self, policy: ZeroWeightFallback) -> Self {
        if self.zero_weight_fallback.is_some() {
            self.duplicate_param = Some("zero_weight_fallback");
        }
        self.zero_weight_fallback = Some(policy);
        self
    }

    /// Set the neighbor search strategy.
    pub fn search_strategy(mut self, strategy: SearchStrategy) -> Self {
        if self.search_strategy.is_some() {
            self.duplicate_param = Some("search_strategy");
        }
        self.search_strategy = Some(strategy);
        self
    }

    /// Include RMSE, MAE, R² and residual SD in the result.
    pub fn return_diagnostics(mut self) -> Self {
        if self.return_diagnostics.is_some() {
            self.duplicate_param = Some("return_diagnostics");
        }
        self.return_diagnostics = Some(true);
        self
    }

    /// Include residuals at the observations in the result.
    pub fn return_residuals(mut self) -> Self {
        if self.compute_residuals.is_some() {
            self.duplicate_param = Some("return_residuals");
        }
        self.compute_residuals = Some(true);
        self
    }

    /// Include the final robustness weights in the result.
    pub fn return_robustness_weights(mut self) -> Self {
        if self.return_robustness_weights.is_some() {
            self.duplicate_param = Some("return_robustness_weights");
        }
        self.return_robustness_weights = Some(true);
        self
    }

    /// Set parallel execution mode.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Validate the configuration and build a model.
    pub fn build(self) -> Result<LoessModel<T>, SmoothError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let defaults = LoessConfig::<T>::default();
        let dimensions = self.dimensions.unwrap_or(defaults.dimensions);
        if dimensions == 0 {
            return Err(SmoothError::InvalidDimensions(0));
        }

        let fraction = self.fraction.unwrap_or(defaults.fraction);
        Validator::validate_fraction(fraction)?;

        let iterations = self.iterations.unwrap_or(defaults.iterations);
        Validator::validate_iterations(iterations)?;

        if let Some(tol) = self.auto_convergence {
            Validator::validate_tolerance(tol)?;
        }

        let distance_metric = self.distance_metric.unwrap_or(defaults.distance_metric);
        Validator::validate_metric(&distance_metric, dimensions)?;

        let config = LoessConfig {
            fraction,
            iterations,
            auto_convergence: self.auto_convergence,
            polynomial_degree: self.polynomial_degree.unwrap_or(defaults.polynomial_degree),
            weight_function: self.weight_function.unwrap_or(defaults.weight_function),
            robustness_method: self.robustness_method.unwrap_or(defaults.robustness_method),
            scaling_method: self.scaling_method.unwrap_or(defaults.scaling_method),
            distance_metric,
            zero_weight_fallback: self
                .zero_weight_fallback
                .unwrap_or(defaults.zero_weight_fallback),
            search_strategy: self.search_strategy.unwrap_or(defaults.search_strategy),
            dimensions,
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        Ok(LoessModel {
            config,
            return_diagnostics: self.return_diagnostics.unwrap_or(false),
            compute_residuals: self.compute_residuals.unwrap_or(false),
            return_robustness_weights: self.return_robustness_weights.unwrap_or(false),
        })
    }
}

// ============================================================================
// Local Regression Model
// ============================================================================

/// Validated local regression model.
#[derive(Debug, Clone)]
pub struct LoessModel<T: FloatLinalg + Debug + Send + Sync> {
    config: LoessConfig<T>,
    return_diagnostics: bool,
    compute_residuals: bool,
    return_robustness_weights: bool,
}

impl<T: FloatLinalg + Debug + Send + Sync> LoessModel<T> {
    /// The resolved configuration.
    #[inline]
    pub fn config(&self) -> &LoessConfig<T> {
        &self.config
    }

    /// Smooth `y` at the observations themselves.
    ///
    /// `x` holds `y.len()` observations of `dimensions` coordinates each.
    pub fn fit(&self, x: &[T], y: &[T]) -> Result<LoessResult<T>, SmoothError> {
        let output = LoessExecutor::new(self.config.clone()).run(x, y, None)?;
        Ok(self.assemble(x.to_vec(), y, output, self.config.fraction))
    }

    /// Fit on the observations, then evaluate the final fit at `queries`.
    ///
    /// Residuals, robustness weights and diagnostics still refer to the observations.
    pub fn fit_at(&self, x: &[T], y: &[T], queries: &[T]) -> Result<LoessResult<T>, SmoothError> {
        let output = LoessExecutor::new(self.config.clone()).run(x, y, Some(queries))?;
        Ok(self.assemble(queries.to_vec(), y, output, self.config.fraction))
    }

    /// Smooth an observation set; its dimensionality overrides the configured one.
    pub fn fit_observations(&self, set: &ObservationSet<T, T>) -> Result<LoessResult<T>, SmoothError> {
        let mut config = self.config.clone();
        config.dimensions = set.dimensions();
        Validator::validate_metric(&config.distance_metric, config.dimensions)?;
        let output = LoessExecutor::new(config).run(set.features(), set.responses(), None)?;

        let mut result = self.assemble(set.features().to_vec(), set.responses(), output, self.config.fraction);
        result.dimensions = set.dimensions();
        Ok(result)
    }

    /// Select the span by cross-validation, then fit with the winner.
    ///
    /// Each candidate is scored by the root mean squared error of its
    /// predictions at the held-out observations.
    pub fn cross_validate(
        &self,
        x: &[T],
        y: &[T],
        cv: CVConfig<'_, T>,
    ) -> Result<LoessResult<T>, SmoothError> {
        let dims = self.config.dimensions;
        Validator::validate_inputs(x, y, dims)?;
        for &fraction in cv.candidates() {
            Validator::validate_fraction(fraction)?;
        }

        let (best, mean_squared) = cv.kind().run(
            y.len(),
            cv.candidates(),
            cv.get_seed(),
            |fraction, fold| {
                let train_x = CVKind::gather(x, dims, &fold.train);
                let train_y = CVKind::gather(y, 1, &fold.train);
                let test_x = CVKind::gather(x, dims, &fold.test);

                let mut config = self.config.clone();
                config.fraction = fraction;
                let output = LoessExecutor::new(config).run(&train_x, &train_y, Some(&test_x))?;

                let predicted = output.query_fitted.unwrap_or_default();
                Ok(fold
                    .test
                    .iter()
                    .zip(predicted.iter())
                    .fold(T::zero(), |acc, (&i, &p)| acc + (y[i] - p) * (y[i] - p)))
            },
        )?;
        let scores: Vec<T> = mean_squared.into_iter().map(|s| s.sqrt()).collect();

        let mut config = self.config.clone();
        config.fraction = best;
        let output = LoessExecutor::new(config).run(x, y, None)?;
        let mut result = self.assemble(x.to_vec(), y, output, best);
        result.cv_scores = Some(scores);
        Ok(result)
    }

    fn assemble(&self, points: Vec<T>, y: &[T], output: ExecutorOutput<T>, fraction: T) -> LoessResult<T> {
        let diagnostics = self
            .return_diagnostics
            .then(|| Diagnostics::compute(y, &output.fitted));
        let fitted = output.query_fitted.unwrap_or(output.fitted);

        LoessResult {
            x: points,
            dimensions: self.config.dimensions,
            y: fitted,
            residuals: self.compute_residuals.then_some(output.residuals),
            robustness_weights: if self.return_robustness_weights {
                output.robustness_weights
            } else {
                None
            },
            diagnostics,
            iterations_used: output.iterations_used,
            fraction_used: fraction,
            neighborhood_size: output.neighborhood_size,
            cv_scores: None,
        }
    }
}

// ============================================================================
// k-NN Builder
// ============================================================================

/// Fluent builder for configuring k-nearest-neighbor estimation.
#[derive(Debug, Clone)]
pub struct KnnBuilder<T: Float + Debug + Send + Sync> {
    /// Neighbors consulted per query (default: 5).
    pub k: Option<usize>,

    /// Number of feature dimensions (default: 1).
    pub dimensions: Option<usize>,

    /// Distance metric.
    pub distance_metric: Option<DistanceMetric<T>>,

    /// Neighbor search strategy (default: Auto).
    pub search_strategy: Option<SearchStrategy>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float + Debug + Send + Sync> Default for KnnBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + Debug + Send + Sync> KnnBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            k: None,
            dimensions: None,
            distance_metric: None,
            search_strategy: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the number of neighbors.
    pub fn k(mut self, k: usize) -> Self {
        if self.k.is_some() {
            self.duplicate_param = Some("k");
        }
        self.k = Some(k);
        self
    }

    /// Set the number of feature dimensions.
    pub fn dimensions(mut self, dims: usize) -> Self {
        if self.dimensions.is_some() {
            self.duplicate_param = Some("dimensions");
        }
        self.dimensions = Some(dims);
        self
    }

    /// Set the distance metric.
    pub fn distance_metric(mut self, metric: DistanceMetric<T>) -> Self {
        if self.distance_metric.is_some() {
            self.duplicate_param = Some("distance_metric");
        }
        self.distance_metric = Some(metric);
        self
    }

    /// Set the neighbor search strategy.
    pub fn search_strategy(mut self, strategy: SearchStrategy) -> Self {
        if self.search_strategy.is_some() {
            self.duplicate_param = Some("search_strategy");
        }
        self.search_strategy = Some(strategy);
        self
    }

    /// Set parallel execution mode.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Validate the configuration and build a model.
    pub fn build(self) -> Result<KnnModel<T>, SmoothError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let defaults = KnnConfig::<T>::default();
        let dimensions = self.dimensions.unwrap_or(defaults.dimensions);
        if dimensions == 0 {
            return Err(SmoothError::InvalidDimensions(0));
        }

        let k = self.k.unwrap_or(defaults.k);
        if k == 0 {
            return Err(SmoothError::InvalidNeighbors(k));
        }

        let distance_metric = self.distance_metric.unwrap_or(defaults.distance_metric);
        Validator::validate_metric(&distance_metric, dimensions)?;

        Ok(KnnModel {
            config: KnnConfig {
                k,
                distance_metric,
                search_strategy: self.search_strategy.unwrap_or(defaults.search_strategy),
                dimensions,
                parallel: self.parallel.unwrap_or(defaults.parallel),
            },
        })
    }
}

// ============================================================================
// k-NN Model
// ============================================================================

/// Validated k-NN configuration, ready to index training sets.
#[derive(Debug, Clone)]
pub struct KnnModel<T: Float + Debug + Send + Sync> {
    config: KnnConfig<T>,
}

impl<T: Float + Debug + Send + Sync> KnnModel<T> {
    /// The resolved configuration.
    #[inline]
    pub fn config(&self) -> &KnnConfig<T> {
        &self.config
    }

    /// Index a labeled training set for classification.
    ///
    /// Fails with `InsufficientNeighbors` when k exceeds the number of labels.
    pub fn fit<L>(&self, features: &[T], labels: &[L]) -> Result<KnnClassifier<T, L>, SmoothError>
    where
        L: Ord + Clone + Debug + Send + Sync,
    {
        KnnClassifier::fit(&self.config, features.to_vec(), labels)
    }

    /// Index a numeric training set for mean-response regression.
    pub fn fit_regression(&self, features: &[T], responses: &[T]) -> Result<KnnRegressor<T>, SmoothError> {
        KnnRegressor::fit(&self.config, features.to_vec(), responses.to_vec())
    }

    /// Index a labeled observation set; its dimensionality overrides the configured one.
    pub fn fit_observations<L>(&self, set: &ObservationSet<T, L>) -> Result<KnnClassifier<T, L>, SmoothError>
    where
        L: Ord + Clone + Debug + Send + Sync,
    {
        let mut config = self.config.clone();
        config.dimensions = set.dimensions();
        Validator::validate_metric(&config.distance_metric, config.dimensions)?;
        KnnClassifier::fit(&config, set.features().to_vec(), set.responses())
    }

    /// Select k by cross-validated misclassification rate.
    ///
    /// Returns the best k and the error rate of every candidate. LOOCV indexes
    /// the full set once per candidate and excludes each held-out point from
    /// its own neighborhood.
    pub fn cross_validate<L>(
        &self,
        features: &[T],
        labels: &[L],
        cv: CVConfig<'_, usize>,
    ) -> Result<(usize, Vec<T>), SmoothError>
    where
        L: Ord + Clone + Debug + Send + Sync,
    {
        let dims = self.config.dimensions;
        let n = labels.len();
        Validator::validate_features(features, n, dims)?;

        match cv.kind() {
            CVKind::LOOCV => {
                if cv.candidates().is_empty() {
                    return Err(SmoothError::InvalidInput(
                        "no cross-validation candidates".into(),
                    ));
                }
                Validator::validate_folds(n, n)?;

                let n_t = T::from(n).unwrap_or_else(T::one);
                let mut scores = Vec::with_capacity(cv.candidates().len());
                for &k in cv.candidates() {
                    let mut config = self.config.clone();
                    config.k = k;
                    let classifier = KnnClassifier::fit(&config, features.to_vec(), labels)?;

                    let mut errors = 0usize;
                    for (i, truth) in labels.iter().enumerate() {
                        if classifier.classify_excluding(i)? != *truth {
                            errors += 1;
                        }
                    }
                    scores.push(T::from(errors).unwrap_or_else(T::zero) / n_t);
                }
                Ok(CVKind::select_best(cv.candidates(), scores))
            }
            kind => kind.run(n, cv.candidates(), cv.get_seed(), |k, fold| {
                let mut config = self.config.clone();
                config.k = k;
                let train_labels = CVKind::gather(labels, 1, &fold.train);
                let classifier =
                    KnnClassifier::fit(&config, CVKind::gather(features, dims, &fold.train), &train_labels)?;

                let predicted = classifier.classify_batch(&CVKind::gather(features, dims, &fold.test))?;
                let errors = fold
                    .test
                    .iter()
                    .zip(predicted.iter())
                    .filter(|&(&i, p)| labels[i] != *p)
                    .count();
                Ok(T::from(errors).unwrap_or_else(T::zero))
            }),
        }
    }
}
