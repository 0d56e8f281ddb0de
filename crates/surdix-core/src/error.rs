//! Error taxonomy of surd arithmetic.

use std::convert::Infallible;

use thiserror::Error;

/// Errors raised by exact surd arithmetic.
///
/// Every failure is reported at the point of detection; no operation
/// returns a partial result.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SurdError {
    /// Square root of a negative or not-a-number argument.
    #[error("math domain error: {0}")]
    Domain(String),
    /// Division, inversion or reciprocal of exact zero.
    #[error("division by zero")]
    DivideByZero,
    /// Undefined combination of signed infinities.
    #[error("undefined operation: {0}")]
    Undefined(String),
    /// No closed form exists in this algebra for the requested operation.
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

impl From<Infallible> for SurdError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Result type for surd arithmetic.
pub type Result<T> = std::result::Result<T, SurdError>;
