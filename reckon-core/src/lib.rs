//! Reckon Core - Fundamental types
//!
//! This crate provides the core types used throughout Reckon:
//! - `ReckonError`: Structured errors with machine-readable codes
//! - `MathError`: Failures of the guarded float operations
//! - Checked `f64` helpers for division, square root and logarithm

mod error;
mod number;

pub use error::{codes, ErrorContext, ReckonError, Severity};
pub use number::{checked_div, checked_ln, checked_sqrt, MathError};
