//! Exact rational constants and signed infinities.

use std::fmt;
use std::ops::Neg;

use num_traits::{One, Zero};
use surdix_integers::{rational_perfect_sqrt, Integer, Rational};

use crate::error::{Result, SurdError};

/// Sign of an infinite constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Towards negative infinity.
    Negative,
    /// Towards positive infinity.
    Positive,
}

impl Sign {
    /// Sign of a nonzero quantity given its positivity.
    #[must_use]
    pub fn from_positive(positive: bool) -> Self {
        if positive {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Returns true for [`Sign::Positive`].
    #[must_use]
    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }

    /// Sign of a product.
    #[must_use]
    pub fn times(self, other: Self) -> Self {
        Self::from_positive(self == other)
    }
}

impl Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

/// A degree-zero value: zero, a nonzero rational, or a signed infinity.
///
/// Zero has a dedicated variant so that every construction path yields the
/// same value; `Finite` never holds zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Exact zero.
    Zero,
    /// A nonzero rational.
    Finite(Rational),
    /// Positive or negative infinity.
    Infinite(Sign),
}

impl Constant {
    /// Wraps a rational, mapping zero to [`Constant::Zero`].
    #[must_use]
    pub fn new(value: Rational) -> Self {
        if value.is_zero() {
            Self::Zero
        } else {
            Self::Finite(value)
        }
    }

    /// The constant one.
    #[must_use]
    pub fn one() -> Self {
        Self::Finite(Rational::one())
    }

    /// Exact value of a float; infinities map to signed infinite constants.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Domain`] for NaN.
    pub fn from_f64(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(SurdError::Domain("NaN values are not supported".into()));
        }
        if value.is_infinite() {
            return Ok(Self::Infinite(Sign::from_positive(value > 0.0)));
        }
        Ok(Rational::from_f64(value).map_or(Self::Zero, Self::new))
    }

    /// Rational value, `None` for infinities.
    #[must_use]
    pub fn to_rational(&self) -> Option<Rational> {
        match self {
            Self::Zero => Some(Rational::zero()),
            Self::Finite(value) => Some(value.clone()),
            Self::Infinite(_) => None,
        }
    }

    /// Returns true for exact zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Zero)
    }

    /// Returns true unless this is an infinity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        !matches!(self, Self::Infinite(_))
    }

    /// Returns true for values strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Zero => false,
            Self::Finite(value) => value.is_positive(),
            Self::Infinite(sign) => sign.is_positive(),
        }
    }

    /// Returns true for values strictly less than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && !self.is_positive()
    }

    /// Exact sum.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinities of opposite signs.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Infinite(left), Self::Infinite(right)) if left != right => Err(
                SurdError::Undefined("sum of infinities with opposite signs".into()),
            ),
            (Self::Infinite(sign), _) | (_, Self::Infinite(sign)) => Ok(Self::Infinite(*sign)),
            (Self::Zero, value) | (value, Self::Zero) => Ok(value.clone()),
            (Self::Finite(left), Self::Finite(right)) => Ok(Self::new(left + right)),
        }
    }

    /// Exact product.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinity times zero.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Infinite(_), Self::Zero) | (Self::Zero, Self::Infinite(_)) => Err(
                SurdError::Undefined("product of infinity and zero".into()),
            ),
            (Self::Infinite(left), Self::Infinite(right)) => Ok(Self::Infinite(left.times(*right))),
            (Self::Infinite(sign), Self::Finite(value)) | (Self::Finite(value), Self::Infinite(sign)) => {
                Ok(Self::Infinite(sign.times(Sign::from_positive(value.is_positive()))))
            }
            (Self::Zero, _) | (_, Self::Zero) => Ok(Self::Zero),
            (Self::Finite(left), Self::Finite(right)) => Ok(Self::Finite(left * right)),
        }
    }

    /// Multiplicative inverse; infinities invert to zero.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::DivideByZero`] for zero.
    pub fn inverse(&self) -> Result<Self> {
        match self {
            Self::Zero => Err(SurdError::DivideByZero),
            Self::Finite(value) => Ok(Self::Finite(value.recip())),
            Self::Infinite(_) => Ok(Self::Zero),
        }
    }

    /// Square of the value.
    #[must_use]
    pub fn square(&self) -> Self {
        match self {
            Self::Zero => Self::Zero,
            Self::Finite(value) => Self::Finite(value * value),
            Self::Infinite(_) => Self::Infinite(Sign::Positive),
        }
    }

    /// Square root of the perfect-square parts of the numerator and the
    /// denominator; one for each part that is not a perfect square.
    #[must_use]
    pub fn perfect_sqrt(&self) -> Self {
        match self {
            Self::Finite(value) => Self::Finite(rational_perfect_sqrt(value)),
            other => other.clone(),
        }
    }

    /// Decimal digits of the nearest integer to the magnitude.
    #[must_use]
    pub fn significant_digits_count(&self) -> usize {
        match self {
            Self::Zero => 1,
            Self::Finite(value) => value.abs().round().digits_count(),
            Self::Infinite(_) => 0,
        }
    }

    /// Splits off the denominator: `(d, self * d)`.
    #[must_use]
    pub fn extract_common_denominator(&self) -> (Integer, Self) {
        match self {
            Self::Finite(value) => (
                value.denominator(),
                Self::Finite(Rational::from_integer(value.numerator())),
            ),
            other => (Integer::one(), other.clone()),
        }
    }

    /// Splits off the numerator magnitude: `(n, self / n)`.
    #[must_use]
    pub fn extract_common_numerator(&self) -> (Integer, Self) {
        match self {
            Self::Zero => (Integer::zero(), Self::one()),
            Self::Finite(value) => {
                let numerator = value.numerator();
                let sign = Rational::from(i64::from(numerator.signum()));
                (numerator.abs(), Self::Finite(sign / Rational::from_integer(value.denominator())))
            }
            Self::Infinite(_) => (Integer::one(), self.clone()),
        }
    }

    /// Approximate float value.
    #[must_use]
    pub fn evaluate(&self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Finite(value) => value.to_f64(),
            Self::Infinite(Sign::Positive) => f64::INFINITY,
            Self::Infinite(Sign::Negative) => f64::NEG_INFINITY,
        }
    }
}

impl Neg for Constant {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Zero => Self::Zero,
            Self::Finite(value) => Self::Finite(-value),
            Self::Infinite(sign) => Self::Infinite(-sign),
        }
    }
}

impl Neg for &Constant {
    type Output = Constant;

    fn neg(self) -> Constant {
        -self.clone()
    }
}

impl From<Rational> for Constant {
    fn from(value: Rational) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "0"),
            Self::Finite(value) => write!(f, "{value}"),
            Self::Infinite(Sign::Positive) => write!(f, "inf"),
            Self::Infinite(Sign::Negative) => write!(f, "-inf"),
        }
    }
}
