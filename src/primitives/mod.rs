//! Layer 1: Primitives
//!
//! # Purpose
//!
//! Fundamental data structures shared by every other layer: the error type,
//! observation records, and reusable scratch buffers.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types and error kinds.
pub mod errors;

/// Observation records and observation sets.
pub mod observation;

/// Reusable per-query scratch buffers.
pub mod buffer;
