//! Local weighted polynomial regression at a single query point.
//!
//! ## Purpose
//!
//! Given a query point and its neighborhood, this module computes kernel
//! weights, folds in optional robustness weights, and fits a weighted
//! least-squares polynomial whose value at the query is the fitted value.
//!
//! ## Design notes
//!
//! * **Centering**: Terms are built relative to the query point, so the
//!   fitted value is the intercept β₀.
//! * **Degree 0**: The local constant fit is the weighted mean and needs no solver.
//! * **Support**: The kernel gives the farthest neighbor weight 0, so a
//!   neighborhood of exactly `num_coefficients` points usually leaves too few
//!   weighted points. Fits with fewer positively weighted neighbors than
//!   coefficients, or with a rank-deficient local system, fail instead of
//!   returning a truncated model.
//! * **Zero weights**: An all-zero weight vector follows the
//!   [`ZeroWeightFallback`] policy.
//!
//! ## Invariants
//!
//! * Only neighborhood members contribute to the fit.
//! * A returned value always comes from a full-rank local system, the
//!   weighted mean (degree 0) or the zero-weight policy.
//!
//! ## Non-goals
//!
//! * This module does not select neighbors or iterate robustness.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::WeightFunction;
use crate::math::linalg::FloatLinalg;
use crate::math::neighborhood::Neighborhood;
use crate::primitives::buffer::FittingBuffer;
use crate::primitives::errors::SmoothError;

// ============================================================================
// Polynomial Degree
// ============================================================================

/// Polynomial degree for local regression fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolynomialDegree {
    /// Degree 0: Local constant (weighted mean, kernel bin smoother)
    Constant,

    /// Degree 1: Local linear regression (default)
    #[default]
    Linear,

    /// Degree 2: Local quadratic regression
    Quadratic,
}

impl PolynomialDegree {
    /// Get the numeric degree value.
    #[inline]
    pub const fn value(&self) -> usize {
        match self {
            PolynomialDegree::Constant => 0,
            PolynomialDegree::Linear => 1,
            PolynomialDegree::Quadratic => 2,
        }
    }

    /// Parse a numeric degree.
    pub const fn from_value(degree: usize) -> Result<Self, SmoothError> {
        match degree {
            0 => Ok(PolynomialDegree::Constant),
            1 => Ok(PolynomialDegree::Linear),
            2 => Ok(PolynomialDegree::Quadratic),
            other => Err(SmoothError::InvalidDegree(other)),
        }
    }

    /// Number of coefficients of a full polynomial of this degree in `dimensions` variables.
    #[inline]
    pub const fn num_coefficients(&self, dimensions: usize) -> usize {
        match self {
            PolynomialDegree::Constant => 1,
            PolynomialDegree::Linear => 1 + dimensions,
            PolynomialDegree::Quadratic => 1 + dimensions + (dimensions * (dimensions + 1)) / 2,
        }
    }

    /// Build polynomial terms for a point relative to center.
    ///
    /// Returns the number of terms written.
    pub fn build_terms<T: Float>(&self, point: &[T], center: &[T], terms: &mut [T]) -> usize {
        let d = point.len();

        terms[0] = T::one();
        if *self == PolynomialDegree::Constant {
            return 1;
        }

        let mut count = 1;
        for i in 0..d {
            terms[count] = point[i] - center[i];
            count += 1;
        }
        if *self == PolynomialDegree::Linear {
            return count;
        }

        // Quadratic: squares and cross products
        for i in 0..d {
            for j in i..d {
                terms[count] = terms[1 + i] * terms[1 + j];
                count += 1;
            }
        }
        count
    }
}

// ============================================================================
// Zero-Weight Fallback Policy
// ============================================================================

/// Policy for neighborhoods whose combined weights are all zero.
///
/// This can only happen once robustness weights reject every neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroWeightFallback {
    /// Use the unweighted neighborhood mean (default).
    #[default]
    UseLocalMean,

    /// Fail the call with `SmoothError::ZeroWeights`.
    Reject,
}

// ============================================================================
// Regression Context
// ============================================================================

/// Everything needed to fit the local model at one query point.
#[derive(Debug, Clone, Copy)]
pub struct RegressionContext<'a, T> {
    /// Training features (flattened, row-major).
    pub x: &'a [T],
    /// Training responses.
    pub y: &'a [T],
    /// Feature dimensionality.
    pub dimensions: usize,
    /// Query point.
    pub query: &'a [T],
    /// Position of the query in its batch, reported in errors.
    pub query_index: usize,
    /// Neighbors of the query, nearest first.
    pub neighborhood: &'a Neighborhood<T>,
    /// Robustness weights per training point, if reweighting.
    pub robustness_weights: Option<&'a [T]>,
    /// Kernel for distance weights.
    pub weight_function: WeightFunction,
    /// Local polynomial degree.
    pub polynomial_degree: PolynomialDegree,
    /// Behavior when all weights vanish.
    pub zero_weight_fallback: ZeroWeightFallback,
}

impl<'a, T: FloatLinalg> RegressionContext<'a, T> {
    /// Fit the local model and evaluate it at the query point.
    ///
    /// Fails with `TooFewPoints` when fewer neighbors carry positive weight than
    /// the polynomial has coefficients, with `DegenerateNeighborhood` when the
    /// weighted neighbors do not determine the polynomial, and with
    /// `ZeroWeights` when every weight vanishes under `Reject`.
    pub fn fit(&self, buffer: &mut FittingBuffer<T>) -> Result<T, SmoothError> {
        let nbh = self.neighborhood;
        let k = nbh.len();

        buffer.weights.clear();
        buffer.weights.resize(k, T::zero());
        let mut sum = self
            .weight_function
            .neighborhood_weights(nbh, &mut buffer.weights);

        if let Some(rw) = self.robustness_weights {
            sum = T::zero();
            for (w, &idx) in buffer.weights.iter_mut().zip(nbh.indices.iter()) {
                *w = *w * rw[idx];
                sum = sum + *w;
            }
        }

        if sum <= T::zero() {
            return match self.zero_weight_fallback {
                ZeroWeightFallback::UseLocalMean => {
                    log::trace!("all {k} neighborhood weights are zero; using local mean");
                    Ok(self.local_mean())
                }
                ZeroWeightFallback::Reject => Err(SmoothError::ZeroWeights {
                    query: self.query_index,
                }),
            };
        }

        let n_coeffs = self.polynomial_degree.num_coefficients(self.dimensions);
        let support = buffer.weights.iter().filter(|&&w| w > T::zero()).count();
        if support < n_coeffs {
            return Err(SmoothError::TooFewPoints {
                got: support,
                min: n_coeffs,
            });
        }

        if self.polynomial_degree == PolynomialDegree::Constant {
            return Ok(self.weighted_mean(&buffer.weights, sum));
        }

        buffer.reset_system(n_coeffs);
        self.accumulate_normal_equations(buffer, n_coeffs);

        T::solve_normal(&buffer.xtw_x, &buffer.xtw_y, n_coeffs)
            .map(|beta| beta[0])
            .ok_or(SmoothError::DegenerateNeighborhood {
                query: self.query_index,
            })
    }

    /// Accumulate X'WX and X'Wy over the neighborhood.
    fn accumulate_normal_equations(&self, buffer: &mut FittingBuffer<T>, n_coeffs: usize) {
        let dims = self.dimensions;
        let FittingBuffer {
            weights,
            xtw_x,
            xtw_y,
            terms,
        } = buffer;

        for (&w, &idx) in weights.iter().zip(self.neighborhood.indices.iter()) {
            if w <= T::zero() {
                continue;
            }
            let point = &self.x[idx * dims..(idx + 1) * dims];
            let y_val = self.y[idx];

            self.polynomial_degree.build_terms(point, self.query, terms);

            for j in 0..n_coeffs {
                let w_tj = w * terms[j];
                for k in j..n_coeffs {
                    xtw_x[j * n_coeffs + k] = xtw_x[j * n_coeffs + k] + w_tj * terms[k];
                }
                xtw_y[j] = xtw_y[j] + w_tj * y_val;
            }
        }

        // Fill symmetric part
        for j in 0..n_coeffs {
            for k in 0..j {
                xtw_x[j * n_coeffs + k] = xtw_x[k * n_coeffs + j];
            }
        }
    }

    fn weighted_mean(&self, weights: &[T], sum: T) -> T {
        let acc = weights
            .iter()
            .zip(self.neighborhood.indices.iter())
            .fold(T::zero(), |acc, (&w, &idx)| acc + w * self.y[idx]);
        acc / sum
    }

    fn local_mean(&self) -> T {
        let k = self.neighborhood.len();
        let acc = self
            .neighborhood
            .indices
            .iter()
            .fold(T::zero(), |acc, &idx| acc + self.y[idx]);
        acc / T::from(k).unwrap_or_else(T::one)
    }
}
