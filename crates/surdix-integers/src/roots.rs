//! Integer square roots and square-free decomposition.
//!
//! These are the number-theoretic primitives the surd core treats as black
//! boxes: floor/ceiling square roots, perfect-square tests, the square-free
//! part of an integer, and rational brackets of square roots.

use num_traits::{One, Zero};

use crate::{Integer, Rational};

/// Rounds `value / 2` up.
#[must_use]
pub fn ceil_half(value: usize) -> usize {
    value / 2 + value % 2
}

/// Largest integer whose square does not exceed `value`.
///
/// Non-positive inputs give zero.
#[must_use]
pub fn sqrt_floor(value: &Integer) -> Integer {
    if !value.is_positive() {
        return Integer::zero();
    }
    if let Some(small) = value.to_u64() {
        return Integer::from(sqrt_floor_u64(small));
    }
    // Newton iteration from an over-estimate decreases monotonically.
    let two = Integer::new(2);
    let mut candidate = Integer::power_of_two((value.bit_len() + 1) / 2);
    loop {
        let next = (&candidate + &(value / &candidate)) / two.clone();
        if next >= candidate {
            return candidate;
        }
        candidate = next;
    }
}

/// Smallest integer whose square is not less than `value`.
#[must_use]
pub fn sqrt_ceil(value: &Integer) -> Integer {
    let floor = sqrt_floor(value);
    if &floor * &floor == *value || !value.is_positive() {
        floor
    } else {
        floor + Integer::one()
    }
}

/// Exact square root of `value` if it is a perfect square.
#[must_use]
pub fn perfect_sqrt(value: &Integer) -> Option<Integer> {
    if value.is_negative() {
        return None;
    }
    let root = sqrt_floor(value);
    (&root * &root == *value).then_some(root)
}

/// Square root of the largest square dividing both parts of `value`
/// separately: `perfect_sqrt(n) / perfect_sqrt(d)` where each side falls
/// back to one when it is not itself a perfect square.
#[must_use]
pub fn rational_perfect_sqrt(value: &Rational) -> Rational {
    let numerator = perfect_sqrt(&value.numerator().abs()).unwrap_or_else(Integer::one);
    let denominator = perfect_sqrt(&value.denominator()).unwrap_or_else(Integer::one);
    Rational::new(numerator, denominator)
}

/// Exact square root of a rational, if there is one.
#[must_use]
pub fn rational_sqrt_exact(value: &Rational) -> Option<Rational> {
    if value.is_negative() {
        return None;
    }
    Some(Rational::new(
        perfect_sqrt(&value.numerator())?,
        perfect_sqrt(&value.denominator())?,
    ))
}

/// A rational not greater than `sqrt(value)`; zero for non-positive input.
#[must_use]
pub fn rational_sqrt_lower_bound(value: &Rational) -> Rational {
    if !value.is_positive() {
        return Rational::zero();
    }
    let denominator = value.denominator();
    Rational::new(sqrt_floor(&(value.numerator() * &denominator)), denominator)
}

/// A rational not less than `sqrt(value)`; zero for non-positive input.
#[must_use]
pub fn rational_sqrt_upper_bound(value: &Rational) -> Rational {
    if !value.is_positive() {
        return Rational::zero();
    }
    let denominator = value.denominator();
    Rational::new(sqrt_ceil(&(value.numerator() * &denominator)), denominator)
}

/// Largest prime tried when pulling square factors out of a radicand.
pub const SQUARE_FACTOR_SEARCH_LIMIT: u64 = 1 << 10;

/// Root of the square factor of `value` that is cheap to find.
///
/// Squares of primes up to [`SQUARE_FACTOR_SEARCH_LIMIT`] are divided out,
/// and what remains is taken whole when it is itself a perfect square. The
/// result is a deterministic function of `value`, exact for every value
/// whose square factors are all small. Non-positive input gives one.
#[must_use]
pub fn square_factor_root(value: &Integer) -> Integer {
    if !value.is_positive() {
        return Integer::one();
    }
    if let Some(root) = perfect_sqrt(value) {
        return root;
    }
    let mut remainder = value.clone();
    let mut root = Integer::one();
    let mut divisor: u64 = 2;
    while divisor <= SQUARE_FACTOR_SEARCH_LIMIT {
        let factor = Integer::from(divisor);
        let square = &factor * &factor;
        if square > remainder {
            break;
        }
        while (&remainder % &square).is_zero() {
            remainder = remainder / &square;
            root = root * &factor;
        }
        divisor += if divisor == 2 { 1 } else { 2 };
    }
    match perfect_sqrt(&remainder) {
        Some(rest) => root * rest,
        None => root,
    }
}

/// Square-free part of a positive integer: the value left after dividing
/// out every square factor.
///
/// Values fitting a machine word take a native trial-division loop, larger
/// ones the same loop over big integers. Both give identical results.
///
/// # Panics
///
/// Panics if `value` is not positive.
#[must_use]
pub fn to_square_free(value: &Integer) -> Integer {
    assert!(value.is_positive(), "square-free part is defined for positive integers");
    match value.to_u64() {
        Some(small) => Integer::from(to_square_free_u64(small)),
        None => to_square_free_big(value),
    }
}

fn to_square_free_big(value: &Integer) -> Integer {
    let mut result = value.clone();
    let four = Integer::new(4);
    while (&result % &four).is_zero() {
        result = result / &four;
    }
    let mut divisor = Integer::new(3);
    loop {
        let square = &divisor * &divisor;
        if square > result {
            return result;
        }
        while (&result % &square).is_zero() {
            result = result / &square;
        }
        divisor = divisor + Integer::new(2);
    }
}

fn to_square_free_u64(mut value: u64) -> u64 {
    while value % 4 == 0 {
        value /= 4;
    }
    let mut divisor: u64 = 3;
    while let Some(square) = divisor.checked_mul(divisor) {
        if square > value {
            break;
        }
        while value % square == 0 {
            value /= square;
        }
        divisor += 2;
    }
    value
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn sqrt_floor_u64(value: u64) -> u64 {
    // Float estimate, corrected to the exact floor.
    let mut root = (value as f64).sqrt() as u64;
    while root.checked_mul(root).map_or(true, |square| square > value) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|square| square <= value) {
        root += 1;
    }
    root
}
