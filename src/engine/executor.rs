//! Execution engine for local weighted regression.
//!
//! ## Purpose
//!
//! This module orchestrates a complete local regression run: it validates
//! the configuration, indexes the observations, fits every evaluation point,
//! and drives the robustness iterations.
//!
//! ## Design notes
//!
//! * **Stateless**: A run depends only on the observations, the configuration
//!   and the evaluation points. Nothing is cached across runs.
//! * **Independent queries**: Every evaluation point is fitted on its own, so
//!   points may be processed in any order (in parallel with the `parallel` feature)
//!   with identical results.
//! * **Robustness**: Residuals are taken at the observations; the final
//!   robustness weights then apply to every evaluation point.
//!
//! ## Key concepts
//!
//! * **Neighborhood size**: q = ceil(span * N), clamped to [1, N].
//! * **Auto-convergence**: Robustness iterations stop early once the largest
//!   change of any fitted value is within the tolerance.
//!
//! ## Invariants
//!
//! * q >= number of polynomial coefficients, otherwise the run fails with
//!   `TooFewPoints` before any fitting. Each point must also keep that many
//!   positively weighted neighbors, otherwise the run fails at that point.
//! * Robustness weights are in [0, 1].
//!
//! ## Non-goals
//!
//! * This module does not build the configuration (see the API layer).
//! * This module does not select the span (see cross-validation).

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
use crate::algorithms::regression::{PolynomialDegree, RegressionContext, ZeroWeightFallback};
use crate::algorithms::robustness::RobustnessMethod;
use crate::engine::validator::Validator;
use crate::math::distance::{DistanceCalculator, DistanceMetric};
use crate::math::kernel::WeightFunction;
use crate::math::linalg::FloatLinalg;
use crate::math::neighborhood::{NeighborIndex, SearchStrategy};
use crate::math::scaling::ScalingMethod;
use crate::primitives::buffer::QueryWorkspace;
use crate::primitives::errors::SmoothError;

// ============================================================================
// Configuration
// ============================================================================

/// Resolved configuration of a local regression run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoessConfig<T> {
    /// Span: fraction of observations in each neighborhood, in (0, 1].
    pub fraction: T,

    /// Number of robustness iterations (0 = plain fit).
    pub iterations: usize,

    /// Stop robustness iterations once max |Δfitted| <= tolerance.
    pub auto_convergence: Option<T>,

    /// Local polynomial degree.
    pub polynomial_degree: PolynomialDegree,

    /// Kernel for distance weights.
    pub weight_function: WeightFunction,

    /// Robustness weighting method.
    pub robustness_method: RobustnessMethod,

    /// Residual scale estimator.
    pub scaling_method: ScalingMethod,

    /// Distance metric between feature vectors.
    pub distance_metric: DistanceMetric<T>,

    /// Behavior when all weights in a neighborhood vanish.
    pub zero_weight_fallback: ZeroWeightFallback,

    /// Neighbor search strategy.
    pub search_strategy: SearchStrategy,

    /// Feature dimensionality.
    pub dimensions: usize,

    /// Evaluate points in parallel (requires the `parallel` feature).
    pub parallel: bool,
}

impl<T: Float> Default for LoessConfig<T> {
    fn default() -> Self {
        Self {
            fraction: T::from(0.75).unwrap_or_else(T::one),
            iterations: 0,
            auto_convergence: None,
            polynomial_degree: PolynomialDegree::default(),
            weight_function: WeightFunction::default(),
            robustness_method: RobustnessMethod::default(),
            scaling_method: ScalingMethod::default(),
            distance_metric: DistanceMetric::Euclidean,
            zero_weight_fallback: ZeroWeightFallback::default(),
            search_strategy: SearchStrategy::default(),
            dimensions: 1,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

// ============================================================================
// Executor Output
// ============================================================================

/// Raw output of a run, before assembly into a user-facing result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorOutput<T> {
    /// Fitted values at the observations.
    pub fitted: Vec<T>,

    /// Fitted values at the extra query points, if any were given.
    pub query_fitted: Option<Vec<T>>,

    /// Residuals y_i - ŷ_i at the observations.
    pub residuals: Vec<T>,

    /// Final robustness weights (only when iterations > 0).
    pub robustness_weights: Option<Vec<T>>,

    /// Robustness iterations actually performed.
    pub iterations_used: usize,

    /// Observations per neighborhood.
    pub neighborhood_size: usize,
}

// ============================================================================
// Pass Context
// ============================================================================

/// Shared, read-only state of one smoothing pass.
struct PassContext<'a, T: Float> {
    x: &'a [T],
    y: &'a [T],
    dimensions: usize,
    index: &'a NeighborIndex<'a, T>,
    dist_calc: DistanceCalculator<'a, T>,
    neighborhood_size: usize,
    n_coeffs: usize,
}

// ============================================================================
// Executor
// ============================================================================

/// Local regression executor.
#[derive(Debug, Clone)]
pub struct LoessExecutor<T> {
    config: LoessConfig<T>,
}

impl<T: FloatLinalg + Debug + Send + Sync> LoessExecutor<T> {
    /// Create an executor for a resolved configuration.
    pub fn new(config: LoessConfig<T>) -> Self {
        Self { config }
    }

    /// Neighborhood size q = ceil(fraction * n), clamped to [1, n].
    pub fn neighborhood_size(n: usize, fraction: T) -> usize {
        // Absorb the rounding of fraction * n (0.3 * 10 = 3.0000000000000004)
        let n_t = T::from(n).unwrap_or_else(T::zero);
        let four = T::from(4.0).unwrap_or_else(T::one);
        let guard = n_t * T::epsilon() * four;
        let q = (fraction * n_t - guard).ceil().to_usize().unwrap_or(n);
        q.clamp(1, n.max(1))
    }

    /// Validate the configuration and data, then fit.
    ///
    /// `x` holds `y.len()` observations of `dimensions` coordinates. When
    /// `queries` is given, the final fit is also evaluated at those points.
    pub fn run(&self, x: &[T], y: &[T], queries: Option<&[T]>) -> Result<ExecutorOutput<T>, SmoothError> {
        let cfg = &self.config;
        let dims = cfg.dimensions;

        Validator::validate_inputs(x, y, dims)?;
        Validator::validate_fraction(cfg.fraction)?;
        Validator::validate_iterations(cfg.iterations)?;
        if let Some(tol) = cfg.auto_convergence {
            Validator::validate_tolerance(tol)?;
        }
        Validator::validate_metric(&cfg.distance_metric, dims)?;
        if let Some(q) = queries {
            Validator::validate_queries(q, dims)?;
        }

        let n = y.len();
        let neighborhood_size = Self::neighborhood_size(n, cfg.fraction);
        let n_coeffs = cfg.polynomial_degree.num_coefficients(dims);
        Validator::validate_neighborhood_size(neighborhood_size, n_coeffs)?;

        let scales = cfg.distance_metric.scales_for(x, dims);
        let index = NeighborIndex::build(x, dims, cfg.search_strategy);
        let ctx = PassContext {
            x,
            y,
            dimensions: dims,
            index: &index,
            dist_calc: DistanceCalculator::new(&cfg.distance_metric, &scales),
            neighborhood_size,
            n_coeffs,
        };

        log::debug!(
            "loess: n={} dims={} q={} degree={} kd_tree={} iterations={}",
            n,
            dims,
            neighborhood_size,
            cfg.polynomial_degree.value(),
            index.has_tree(),
            cfg.iterations
        );

        let mut fitted = vec![T::zero(); n];
        self.smooth_pass(&ctx, x, None, &mut fitted)?;

        let mut iterations_used = 0;
        let mut robustness_weights = None;
        if cfg.iterations > 0 {
            let mut weights = vec![T::one(); n];
            let mut residuals = vec![T::zero(); n];
            let mut scratch = vec![T::zero(); n];
            let mut next = vec![T::zero(); n];

            for iter in 0..cfg.iterations {
                for ((r, &yi), &fi) in residuals.iter_mut().zip(y.iter()).zip(fitted.iter()) {
                    *r = yi - fi;
                }
                cfg.robustness_method.apply_robustness_weights(
                    &residuals,
                    &mut weights,
                    cfg.scaling_method,
                    &mut scratch,
                );

                self.smooth_pass(&ctx, x, Some(&weights), &mut next)?;
                let max_change = next
                    .iter()
                    .zip(fitted.iter())
                    .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()));
                core::mem::swap(&mut fitted, &mut next);
                iterations_used += 1;

                log::debug!("loess: robustness iteration {} max change {:?}", iter + 1, max_change);

                if let Some(tol) = cfg.auto_convergence {
                    if max_change <= tol {
                        break;
                    }
                }
            }
            robustness_weights = Some(weights);
        }

        let residuals: Vec<T> = y.iter().zip(fitted.iter()).map(|(&yi, &fi)| yi - fi).collect();

        let query_fitted = match queries {
            Some(q) => {
                let mut out = vec![T::zero(); q.len() / dims];
                self.smooth_pass(&ctx, q, robustness_weights.as_deref(), &mut out)?;
                Some(out)
            }
            None => None,
        };

        Ok(ExecutorOutput {
            fitted,
            query_fitted,
            residuals,
            robustness_weights,
            iterations_used,
            neighborhood_size,
        })
    }

    /// Fit every point of `points` into `out`.
    fn smooth_pass(
        &self,
        ctx: &PassContext<'_, T>,
        points: &[T],
        robustness_weights: Option<&[T]>,
        out: &mut [T],
    ) -> Result<(), SmoothError> {
        let dims = ctx.dimensions;

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return out.par_iter_mut().enumerate().try_for_each_init(
                || QueryWorkspace::new(ctx.neighborhood_size, ctx.n_coeffs),
                |ws, (i, slot)| {
                    let query = &points[i * dims..(i + 1) * dims];
                    *slot = self.fit_point(ctx, i, query, robustness_weights, ws)?;
                    Ok(())
                },
            );
        }

        let mut ws = QueryWorkspace::new(ctx.neighborhood_size, ctx.n_coeffs);
        for (i, slot) in out.iter_mut().enumerate() {
            let query = &points[i * dims..(i + 1) * dims];
            *slot = self.fit_point(ctx, i, query, robustness_weights, &mut ws)?;
        }
        Ok(())
    }

    /// Select the neighborhood of `query` and evaluate the local fit there.
    fn fit_point(
        &self,
        ctx: &PassContext<'_, T>,
        query_idx: usize,
        query: &[T],
        robustness_weights: Option<&[T]>,
        ws: &mut QueryWorkspace<T>,
    ) -> Result<T, SmoothError> {
        ctx.index.find_k_nearest(
            query,
            ctx.neighborhood_size,
            &ctx.dist_calc,
            None,
            &mut ws.search,
            &mut ws.neighborhood,
        );

        let context = RegressionContext {
            x: ctx.x,
            y: ctx.y,
            dimensions: ctx.dimensions,
            query,
            query_index: query_idx,
            neighborhood: &ws.neighborhood,
            robustness_weights,
            weight_function: self.config.weight_function,
            polynomial_degree: self.config.polynomial_degree,
            zero_weight_fallback: self.config.zero_weight_fallback,
        };

        context.fit(&mut ws.fitting)
    }
}
