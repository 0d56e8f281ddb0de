//! # Surdix
//!
//! Exact arithmetic over rationals closed under nested square roots.
//!
//! Values are canonical expression trees, so equality, hashing and
//! ordering are exact: `sqrt(8) == 2 * sqrt(2)` holds structurally, and
//! comparing `sqrt(2) + sqrt(3)` with a decimal never consults a float.
//! Floating point only appears in [`Expression::evaluate`].
//!
//! ## Quick Start
//!
//! ```rust
//! use surdix::prelude::*;
//!
//! let two = sqrt(2).unwrap();
//! let three = sqrt(3).unwrap();
//! assert_eq!(&two * &two, 2i64);
//! assert!(&two + &three > 3i64);
//! assert_eq!((1 + &two) * (1 - &two), -1i64);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use surdix_core as core;
pub use surdix_integers as integers;

pub use surdix_core::{
    get_sqrt_evaluator, set_sqrt_evaluator, Constant, Expression, Form, Ratio, Result, Sign,
    SqrtEvaluator, SurdError, Term,
};
pub use surdix_integers::{Integer, Rational};

/// Square root of a rational or of an existing expression.
///
/// # Errors
///
/// Returns [`SurdError::Domain`] for negative values and NaN floats.
pub fn sqrt<T: TryInto<Expression>>(value: T) -> Result<Expression>
where
    SurdError: From<T::Error>,
{
    value.try_into()?.sqrt()
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::sqrt;
    pub use surdix_core::{Expression, Sign, SurdError};
    pub use surdix_integers::{Integer, Rational};
}
