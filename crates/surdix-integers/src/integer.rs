//! Arbitrary precision integers.
//!
//! A thin wrapper around `dashu::IBig` carrying the integer operations
//! that surd arithmetic needs: floor division, gcd/lcm, decimal digit
//! counts and lossy conversion to `f64`.

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && DashuSigned::is_positive(&self.0)
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is divisible by two.
    #[must_use]
    pub fn is_even(&self) -> bool {
        (&self.0 % IBig::from(2u8)).is_zero()
    }

    /// Returns the number of bits of the absolute value.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Number of decimal digits of the absolute value (`0` has one digit).
    #[must_use]
    pub fn digits_count(&self) -> usize {
        self.abs().to_string().len()
    }

    /// Computes the greatest common divisor, always non-negative.
    ///
    /// `gcd(0, n) == |n|`.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.abs();
        }
        if other.is_zero() {
            return self.abs();
        }
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Computes the least common multiple, always non-negative.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        Self(&self.0 / &g.0 * &other.0).abs()
    }

    /// Division rounding towards negative infinity.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    #[must_use]
    pub fn div_floor(&self, divisor: &Self) -> Self {
        assert!(!divisor.is_zero(), "division by zero");
        let quotient = &self.0 / &divisor.0;
        let remainder = &self.0 % &divisor.0;
        if !remainder.is_zero() && (self.is_negative() != divisor.is_negative()) {
            Self(quotient - IBig::ONE)
        } else {
            Self(quotient)
        }
    }

    /// Division rounding towards positive infinity.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    #[must_use]
    pub fn div_ceil(&self, divisor: &Self) -> Self {
        -(-self).div_floor(divisor)
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Attempts to convert to an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a u64.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.clone().try_into().ok()
    }

    /// Nearest `f64`, saturating to infinity for huge magnitudes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        if let Some(value) = self.to_i64() {
            return value as f64;
        }
        // Keep the top 63 bits and rescale.
        let shift = self.bit_len() - 63;
        let top = (self / &Self::power_of_two(shift)).to_i64().unwrap_or(0);
        top as f64 * 2f64.powi(i32::try_from(shift).unwrap_or(i32::MAX))
    }

    /// Returns `2^exponent`.
    #[must_use]
    pub fn power_of_two(exponent: usize) -> Self {
        Self(IBig::from(2u8).pow(exponent))
    }

    /// Returns `10^exponent`.
    #[must_use]
    pub fn power_of_ten(exponent: usize) -> Self {
        Self(IBig::from(10u8).pow(exponent))
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! integer_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                Integer($trait::$method(self.0, rhs.0))
            }
        }

        impl $trait<&Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer($trait::$method(self.0, &rhs.0))
            }
        }

        impl $trait<&Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer($trait::$method(&self.0, &rhs.0))
            }
        }
    };
}

integer_binop!(Add, add);
integer_binop!(Sub, sub);
integer_binop!(Mul, mul);
// Truncating, as for primitive integers; see `div_floor` for flooring.
integer_binop!(Div, div);
integer_binop!(Rem, rem);

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let a = Integer::new(10);
        let b = Integer::new(3);

        assert_eq!((&a + &b).to_i64(), Some(13));
        assert_eq!((&a - &b).to_i64(), Some(7));
        assert_eq!((&a * &b).to_i64(), Some(30));
        assert_eq!((&a / &b).to_i64(), Some(3));
        assert_eq!((a % b).to_i64(), Some(1));
    }

    #[test]
    fn test_floor_and_ceil_division() {
        let seven = Integer::new(7);
        let two = Integer::new(2);
        assert_eq!(seven.div_floor(&two), Integer::new(3));
        assert_eq!((-&seven).div_floor(&two), Integer::new(-4));
        assert_eq!(seven.div_floor(&-&two), Integer::new(-4));
        assert_eq!(seven.div_ceil(&two), Integer::new(4));
        assert_eq!((-&seven).div_ceil(&two), Integer::new(-3));
        assert_eq!(Integer::new(8).div_floor(&two), Integer::new(4));
    }

    #[test]
    fn test_gcd_lcm() {
        let a = Integer::new(48);
        let b = Integer::new(-18);
        assert_eq!(a.gcd(&b), Integer::new(6));
        assert_eq!(a.lcm(&b), Integer::new(144));
        assert_eq!(Integer::new(0).gcd(&b), Integer::new(18));
    }

    #[test]
    fn test_digits_count() {
        assert_eq!(Integer::new(0).digits_count(), 1);
        assert_eq!(Integer::new(9).digits_count(), 1);
        assert_eq!(Integer::new(-10).digits_count(), 2);
        assert_eq!(Integer::power_of_ten(20).digits_count(), 21);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Integer::new(-12).to_f64(), -12.0);
        let big = Integer::power_of_two(100);
        assert_eq!(big.to_f64(), 2f64.powi(100));
    }

    #[test]
    fn test_large_numbers() {
        let a = Integer::power_of_ten(30) - Integer::new(1);
        let b = Integer::power_of_ten(30) + Integer::new(2);
        assert_eq!((a + b).to_string(), "2000000000000000000000000000001");
    }

    #[test]
    fn test_sign_predicates() {
        let zero = Integer::zero();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert_eq!(zero.signum(), 0);
        assert!(Integer::new(3).is_positive());
        assert!(Integer::new(-3).is_negative());
    }
}
