//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! The per-query estimation algorithms:
//! - Local weighted polynomial regression
//! - Robustness reweighting
//! - Nearest-neighbor voting
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Local weighted polynomial regression.
pub mod regression;

/// Robustness weights for outlier downweighting.
pub mod robustness;

/// Label tallies, majority and mean votes.
pub mod vote;
