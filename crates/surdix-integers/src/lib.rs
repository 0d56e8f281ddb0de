//! # surdix-integers
//!
//! Arbitrary precision integer and rational arithmetic for surdix.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//! - Integer square roots, perfect-square tests and square-free parts (`roots`)
//!
//! Everything here is exact. The only lossy operations are the explicit
//! `to_f64` conversions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;
pub mod rational;
pub mod roots;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use rational::Rational;
pub use roots::{
    ceil_half, perfect_sqrt, rational_perfect_sqrt, rational_sqrt_exact,
    rational_sqrt_lower_bound, rational_sqrt_upper_bound, sqrt_ceil, sqrt_floor,
    square_factor_root, to_square_free, SQUARE_FACTOR_SEARCH_LIMIT,
};
