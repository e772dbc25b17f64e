//! Layer 5: Engine
//!
//! # Purpose
//!
//! Orchestration of complete estimator runs:
//! - Input and parameter validation
//! - Local regression execution with robustness iterations
//! - k-nearest-neighbor indexing and queries
//! - Result assembly
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Fail-fast validation of inputs and parameters.
pub mod validator;

/// Local regression executor.
pub mod executor;

/// k-nearest-neighbor query engine.
pub mod knn;

/// Result types.
pub mod output;
