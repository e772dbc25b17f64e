//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used by both estimators:
//! - Distance metrics and neighbor search
//! - Kernel functions for distance-based weighting
//! - Robust scale estimation
//! - Weighted least squares solving
//!
//! These are reusable mathematical building blocks with no algorithm-specific logic.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Distance metrics for nD points.
pub mod distance;

/// Stable ranking, linear-scan and KD-tree k-nearest search.
pub mod neighborhood;

/// Kernel (weight) functions for distance-based weighting.
pub mod kernel;

/// Robust scale estimation (MAR, MAD).
pub mod scaling;

/// Linear algebra backend.
pub mod linalg;
