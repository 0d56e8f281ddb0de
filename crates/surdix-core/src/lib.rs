//! # surdix-core
//!
//! Canonical exact expressions over rationals and nested square roots.
//!
//! This crate provides:
//! - The closed [`Expression`] type: constants, terms, forms and ratios
//! - Canonical construction, so equal values are structurally equal
//! - Exact sign decision, ordering and rational bounds
//! - Denesting of square roots of forms
//! - Rationalization of form denominators through a factor tree
//!
//! ## Design Principles
//!
//! - **Canonical by construction**: every result is rebuilt through
//!   [`Term::from_components`] or [`Form::from_components`]
//! - **Exact decisions**: floats appear only in [`Expression::evaluate`]
//! - **Plain ownership**: expressions are immutable trees without sharing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constant;
pub mod context;
mod denest;
pub mod error;
pub mod expression;
pub mod factorization;
pub mod form;
mod ops;
pub mod ratio;
mod rounding;
pub mod term;

#[cfg(test)]
mod proptests;

pub use constant::{Constant, Sign};
pub use context::{get_sqrt_evaluator, set_sqrt_evaluator, SqrtEvaluator};
pub use error::{Result, SurdError};
pub use expression::Expression;
pub use factorization::{Factor, Factorization, RATIONALIZATION_LIMIT};
pub use form::{Form, MAX_REFINEMENT_DIGITS};
pub use ratio::Ratio;
pub use term::Term;
