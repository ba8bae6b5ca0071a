//! Checked floating point operations
//!
//! Plain IEEE-754 doubles. Only the operations with a guarded domain live
//! here; everything else (overflow to infinity, NaN from unguarded paths)
//! propagates silently.

use thiserror::Error;

/// Error type for guarded float operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),
}

/// Divide, failing when the divisor is exactly zero (either sign)
pub fn checked_div(numerator: f64, denominator: f64) -> Result<f64, MathError> {
    if denominator == 0.0 {
        Err(MathError::DivisionByZero)
    } else {
        Ok(numerator / denominator)
    }
}

/// Square root, defined for `x >= 0`
pub fn checked_sqrt(x: f64) -> Result<f64, MathError> {
    if x < 0.0 {
        return Err(MathError::DomainError(format!(
            "square root of negative number ({})",
            x
        )));
    }
    Ok(x.sqrt())
}

/// Natural logarithm, defined for `x > 0`
pub fn checked_ln(x: f64) -> Result<f64, MathError> {
    if x <= 0.0 {
        return Err(MathError::DomainError(format!(
            "logarithm of non-positive number ({})",
            x
        )));
    }
    Ok(x.ln())
}
