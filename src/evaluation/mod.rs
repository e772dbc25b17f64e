//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! Quality measures and parameter selection:
//! - Fit diagnostics (RMSE, MAE, R², residual SD) and classification accuracy
//! - K-fold and leave-one-out cross-validation
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Cross-validation for span and neighbor-count selection.
pub mod cv;

/// Fit and classification diagnostics.
pub mod diagnostics;
