//! Integer parts, rounding and powers of expressions.
//!
//! The integer candidates come from rational bounds; each one is then
//! confirmed by exact comparison, so no result depends on how tight the
//! bounds happen to be.

use std::cmp::Ordering;

use num_traits::One;
use surdix_integers::{Integer, Rational};

use crate::constant::{Constant, Sign};
use crate::error::Result;
use crate::expression::Expression;

impl Expression {
    /// Largest integer not greater than the value.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`](crate::SurdError::Undefined) for
    /// infinities.
    pub fn floor(&self) -> Result<Integer> {
        self.ensure_finite("floor")?;
        if let Some(value) = self.to_rational() {
            return Ok(value.floor());
        }
        let mut floor = self.lower_bound_at(0).floor();
        while Self::from(&floor + &Integer::one()) <= *self {
            floor = floor + Integer::one();
        }
        Ok(floor)
    }

    /// Smallest integer not less than the value.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`](crate::SurdError::Undefined) for
    /// infinities.
    pub fn ceil(&self) -> Result<Integer> {
        self.ensure_finite("ceiling")?;
        Ok(-(-self).floor()?)
    }

    /// Integer part, rounding towards zero.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`](crate::SurdError::Undefined) for
    /// infinities.
    pub fn trunc(&self) -> Result<Integer> {
        if let Some(value) = self.to_rational() {
            return Ok(value.trunc());
        }
        if self.is_negative() {
            self.ceil()
        } else {
            self.floor()
        }
    }

    /// Nearest integer, with ties going to the even neighbour.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`](crate::SurdError::Undefined) for
    /// infinities.
    pub fn round(&self) -> Result<Integer> {
        let floor = self.floor()?;
        let fraction = self.add_rational(&-Rational::from_integer(floor.clone()));
        let next = &floor + &Integer::one();
        Ok(match fraction.cmp(&Self::from(Rational::from_i64(1, 2))) {
            Ordering::Less => floor,
            Ordering::Greater => next,
            Ordering::Equal if floor.is_even() => floor,
            Ordering::Equal => next,
        })
    }

    /// The value rounded to `digits` decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`](crate::SurdError::Undefined) for
    /// infinities.
    pub fn round_to(&self, digits: usize) -> Result<Rational> {
        let scale = Rational::from_integer(Integer::power_of_ten(digits));
        let rounded = self.scale_by(&scale).round()?;
        Ok(Rational::from_integer(rounded) / scale)
    }

    /// Floor of the quotient.
    ///
    /// # Errors
    ///
    /// Fails like [`Expression::checked_div`], and with
    /// [`SurdError::Undefined`](crate::SurdError::Undefined) when the
    /// quotient is infinite.
    pub fn floor_div(&self, divisor: &Self) -> Result<Integer> {
        self.checked_div(divisor)?.floor()
    }

    /// Remainder of the flooring division, `self - divisor * floor(self / divisor)`.
    ///
    /// # Errors
    ///
    /// Fails like [`Expression::floor_div`].
    pub fn checked_rem(&self, divisor: &Self) -> Result<Self> {
        let quotient = self.floor_div(divisor)?;
        self.checked_sub(&divisor.checked_mul(&Self::from(quotient))?)
    }

    /// Integer power by repeated squaring; `x^0` is one for every `x`.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::DivideByZero`](crate::SurdError::DivideByZero)
    /// for a negative power of zero.
    pub fn pow(&self, exponent: i64) -> Result<Self> {
        if exponent == 0 {
            return Ok(Self::one());
        }
        // Powers of infinities follow repeated multiplication.
        if let Self::Constant(Constant::Infinite(sign)) = self {
            if exponent < 0 {
                return Ok(Self::zero());
            }
            return Ok(Self::infinity(if exponent % 2 == 0 {
                Sign::Positive
            } else {
                *sign
            }));
        }
        let mut step = if exponent < 0 {
            self.inverse()?
        } else {
            self.clone()
        };
        let mut exponent = exponent.unsigned_abs();
        let mut result = Self::one();
        while exponent > 1 {
            if exponent & 1 == 1 {
                result = result.mul_finite(&step);
            }
            step = step.square();
            exponent >>= 1;
        }
        Ok(result.mul_finite(&step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurdError;

    fn sqrt(value: i64) -> Expression {
        Expression::from(value).sqrt().unwrap()
    }

    fn int(value: i64) -> Integer {
        Integer::new(value)
    }

    #[test]
    fn test_floor_and_ceil() {
        assert_eq!(sqrt(2).floor().unwrap(), int(1));
        assert_eq!(sqrt(2).ceil().unwrap(), int(2));
        assert_eq!((-sqrt(2)).floor().unwrap(), int(-2));
        assert_eq!((-sqrt(2)).ceil().unwrap(), int(-1));
        assert_eq!((&sqrt(2) + &sqrt(3)).floor().unwrap(), int(3));
        assert_eq!(Expression::from(-7).floor().unwrap(), int(-7));
    }

    #[test]
    fn test_floor_just_below_an_integer() {
        // sqrt(10^12 - 1) lies within 10^-6 of 10^6
        let value = sqrt(999_999_999_999);
        assert_eq!(value.floor().unwrap(), int(999_999));
        assert_eq!(value.ceil().unwrap(), int(1_000_000));
    }

    #[test]
    fn test_trunc() {
        assert_eq!(sqrt(5).trunc().unwrap(), int(2));
        assert_eq!((-sqrt(5)).trunc().unwrap(), int(-2));
        assert_eq!(Expression::from(Rational::from_i64(-7, 3)).trunc().unwrap(), int(-2));
        assert_eq!(Expression::zero().trunc().unwrap(), int(0));
    }

    #[test]
    fn test_round() {
        assert_eq!(sqrt(2).round().unwrap(), int(1));
        assert_eq!(sqrt(3).round().unwrap(), int(2));
        assert_eq!(Expression::from(Rational::from_i64(5, 2)).round().unwrap(), int(2));
        assert_eq!(Expression::from(Rational::from_i64(7, 2)).round().unwrap(), int(4));
        assert_eq!(Expression::from(Rational::from_i64(-5, 2)).round().unwrap(), int(-2));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(sqrt(2).round_to(3).unwrap(), Rational::from_i64(707, 500));
        assert_eq!(sqrt(3).round_to(0).unwrap(), Rational::from(2));
    }

    #[test]
    fn test_floor_div_and_rem() {
        assert_eq!(sqrt(8).floor_div(&sqrt(2)).unwrap(), int(2));
        assert_eq!(sqrt(5).floor_div(&Expression::one()).unwrap(), int(2));
        assert_eq!(
            sqrt(5).checked_rem(&Expression::one()).unwrap(),
            &sqrt(5) - &Expression::from(2)
        );
        assert_eq!(
            sqrt(2).floor_div(&Expression::zero()),
            Err(SurdError::DivideByZero)
        );
    }

    #[test]
    fn test_pow() {
        let base = &Expression::one() + &sqrt(2);
        assert_eq!(
            base.pow(3).unwrap(),
            &Expression::from(7) + &(&sqrt(2) * &Expression::from(5))
        );
        assert_eq!(sqrt(2).pow(-2).unwrap(), Expression::from(Rational::from_i64(1, 2)));
        assert_eq!(base.pow(0).unwrap(), Expression::one());
        assert_eq!(base.pow(-1).unwrap(), &sqrt(2) - &Expression::one());
    }

    #[test]
    fn test_pow_errors() {
        assert_eq!(Expression::zero().pow(-1), Err(SurdError::DivideByZero));
        assert_eq!(Expression::zero().pow(3).unwrap(), Expression::zero());
    }

    #[test]
    fn test_pow_of_infinities() {
        let positive = Expression::infinity(Sign::Positive);
        let negative = Expression::infinity(Sign::Negative);
        assert_eq!(positive.pow(2).unwrap(), positive);
        assert_eq!(positive.pow(3).unwrap(), positive);
        assert_eq!(negative.pow(2).unwrap(), positive);
        assert_eq!(negative.pow(3).unwrap(), negative);
        assert_eq!(positive.pow(-1).unwrap(), Expression::zero());
        assert_eq!(negative.pow(-2).unwrap(), Expression::zero());
        assert_eq!(negative.pow(0).unwrap(), Expression::one());
        // agrees with repeated multiplication
        assert_eq!(
            negative.pow(3).unwrap(),
            negative.checked_mul(&negative).unwrap().checked_mul(&negative).unwrap()
        );
    }

    #[test]
    fn test_infinite_rounding_fails() {
        let infinity = Expression::infinity(Sign::Positive);
        assert!(matches!(infinity.floor(), Err(SurdError::Undefined(_))));
        assert!(matches!(infinity.round_to(2), Err(SurdError::Undefined(_))));
    }
}
