//! Quotients whose form denominator is kept unrationalized.
//!
//! A ratio appears only when rationalizing `1 / form` would blow past
//! [`RATIONALIZATION_LIMIT`](crate::factorization::RATIONALIZATION_LIMIT).
//! Its numerator is never itself a ratio and its denominator is a positive
//! form, so the sign of a ratio is the sign of its numerator.

use std::fmt;
use std::ops::Neg;

use surdix_integers::{Integer, Rational};

use crate::constant::Constant;
use crate::context::SqrtEvaluator;
use crate::error::{Result, SurdError};
use crate::expression::{rational_ratio, Expression};
use crate::factorization::{rationalized_inverse, RATIONALIZATION_LIMIT};
use crate::form::Form;

/// `numerator / denominator` with a positive form denominator.
#[derive(Clone, Debug)]
pub struct Ratio {
    numerator: Box<Expression>,
    denominator: Form,
}

impl Ratio {
    /// Canonical quotient of two expressions.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::DivideByZero`] for a zero denominator and
    /// [`SurdError::Undefined`] when either side is infinite.
    pub fn from_components(numerator: Expression, denominator: Expression) -> Result<Expression> {
        if denominator.is_zero() {
            return Err(SurdError::DivideByZero);
        }
        numerator.ensure_finite("ratio")?;
        denominator.ensure_finite("ratio")?;
        Ok(Self::build(numerator, denominator, false))
    }

    /// Quotient of finite values with a nonzero denominator.
    ///
    /// Constant and term denominators are divided out, nested ratios are
    /// flattened and the denominator is made positive. With `rationalize`
    /// set, a form denominator is inverted when that fits the budget.
    pub(crate) fn build(
        numerator: Expression,
        denominator: Expression,
        rationalize: bool,
    ) -> Expression {
        if numerator.is_zero() {
            return Expression::zero();
        }
        let form = match denominator {
            Expression::Constant(Constant::Finite(value)) => {
                return numerator.scale_by(&value.recip())
            }
            Expression::Constant(Constant::Zero) => unreachable!("ratio over zero"),
            Expression::Constant(Constant::Infinite(_)) => return Expression::zero(),
            Expression::Term(term) => return numerator.mul_finite(&term.inverse()),
            // n / (a / b) == n * b / a
            Expression::Ratio(ratio) => {
                let numerator =
                    numerator.mul_finite(&Expression::Form(ratio.denominator.clone()));
                return Self::build(numerator, *ratio.numerator, rationalize);
            }
            Expression::Form(form) => form,
        };
        if let Expression::Ratio(inner) = numerator {
            let denominator = Expression::Form(inner.denominator).mul_finite(&Expression::Form(form));
            return Self::build(*inner.numerator, denominator, rationalize);
        }
        let (numerator, form) = if form.is_positive() {
            (numerator, form)
        } else {
            (-numerator, -form)
        };
        if let Some(quotient) = rational_ratio(&Expression::Form(form.clone()), &numerator) {
            return Expression::from(quotient);
        }
        if rationalize {
            if let Some(inverse) = rationalized_inverse(&form, Some(RATIONALIZATION_LIMIT)) {
                return numerator.mul_finite(&inverse);
            }
        }
        Expression::Ratio(Self {
            numerator: Box::new(numerator),
            denominator: form,
        })
    }

    /// The numerator, never itself a ratio.
    #[must_use]
    pub fn numerator(&self) -> &Expression {
        &self.numerator
    }

    /// The positive form denominator.
    #[must_use]
    pub fn denominator(&self) -> &Form {
        &self.denominator
    }

    fn denominator_expression(&self) -> Expression {
        Expression::Form(self.denominator.clone())
    }

    /// Deepest radical nesting on either side.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.numerator.degree().max(self.denominator.degree())
    }

    /// Exact test for `self > 0`, decided by the numerator.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.numerator.is_positive()
    }

    /// Digit budget of the quotient.
    #[must_use]
    pub fn significant_digits_count(&self) -> usize {
        self.numerator
            .significant_digits_count()
            .saturating_sub(self.denominator.significant_digits_count())
    }

    /// Exact square, kept as a quotient of squares.
    #[must_use]
    pub fn square(&self) -> Expression {
        Self::build(self.numerator.square(), self.denominator.square(), false)
    }

    /// Swaps the sides, rationalizing the new denominator when it is a form.
    #[must_use]
    pub fn inverse(&self) -> Expression {
        Self::build(self.denominator_expression(), (*self.numerator).clone(), true)
    }

    /// Square root taken side by side, `perfect_sqrt(n) / perfect_sqrt(d)`.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Unsupported`] when either side is a form with
    /// no closed-form square root.
    pub fn perfect_sqrt(&self) -> Result<Expression> {
        let numerator = self.numerator.perfect_sqrt()?;
        let denominator = self.denominator.perfect_sqrt()?;
        Ok(Self::build(numerator, denominator, true))
    }

    /// Sum by cross multiplication.
    pub(crate) fn add(&self, other: &Expression) -> Expression {
        match other {
            Expression::Ratio(other) => {
                let numerator = self
                    .numerator
                    .mul_finite(&other.denominator_expression())
                    .add_finite(&other.numerator.mul_finite(&self.denominator_expression()));
                let denominator = self.denominator.multiply(&other.denominator);
                Self::build(numerator, denominator, true)
            }
            value => {
                let numerator = self
                    .numerator
                    .add_finite(&value.mul_finite(&self.denominator_expression()));
                Self::build(numerator, self.denominator_expression(), false)
            }
        }
    }

    pub(crate) fn multiply(&self, other: &Expression) -> Expression {
        match other {
            Expression::Ratio(other) => Self::build(
                self.numerator.mul_finite(&other.numerator),
                self.denominator.multiply(&other.denominator),
                true,
            ),
            value => Self::build(
                self.numerator.mul_finite(value),
                self.denominator_expression(),
                false,
            ),
        }
    }

    pub(crate) fn scaled(&self, factor: &Rational) -> Self {
        Self {
            numerator: Box::new(self.numerator.scale_by(factor)),
            denominator: self.denominator.clone(),
        }
    }

    /// Exact comparison with any expression, by cross multiplication.
    pub(crate) fn equals(&self, value: &Expression) -> bool {
        match value {
            Expression::Ratio(other) => self == other,
            value => *self.numerator == value.mul_finite(&self.denominator_expression()),
        }
    }

    /// The same value with the denominator rationalized regardless of size.
    #[must_use]
    pub fn rationalized(&self) -> Expression {
        match rationalized_inverse(&self.denominator, None) {
            Some(inverse) => self.numerator.mul_finite(&inverse),
            None => unreachable!("inverse of a nonzero form"),
        }
    }

    /// Splits the numerator's common denominator `d` off: `(d, self * d)`.
    #[must_use]
    pub fn extract_common_denominator(&self) -> (Integer, Expression) {
        let (denominator, numerator) = self.numerator.extract_common_denominator();
        (denominator, Self::build(numerator, self.denominator_expression(), false))
    }

    /// Splits the numerator's rational content off: `(c, self / c)`.
    #[must_use]
    pub fn extract_common_numerator(&self) -> (Integer, Expression) {
        let (common, numerator) = self.numerator.extract_common_numerator();
        (common, Self::build(numerator, self.denominator_expression(), false))
    }

    /// Lower bound from numerator and denominator bounds at a shared scale.
    pub(crate) fn lower_bound_at(&self, extra: usize) -> Rational {
        if !self.is_positive() {
            return -(-self).upper_bound_at(extra);
        }
        let digits = self.bound_digits(extra);
        let numerator = self.numerator.lower_bound_at(digits);
        if !numerator.is_positive() {
            return Rational::default();
        }
        numerator / self.denominator.upper_bound_at(digits)
    }

    pub(crate) fn upper_bound_at(&self, extra: usize) -> Rational {
        if !self.is_positive() {
            return -(-self).lower_bound_at(extra);
        }
        let mut digits = self.bound_digits(extra);
        // the denominator is positive, so its lower bound eventually is too
        loop {
            let denominator = self.denominator.lower_bound_at(digits);
            if denominator.is_positive() {
                return self.numerator.upper_bound_at(digits) / denominator;
            }
            digits *= 2;
        }
    }

    fn bound_digits(&self, extra: usize) -> usize {
        self.numerator.significant_digits_count()
            + self.denominator.significant_digits_count()
            + 1
            + extra
    }

    pub(crate) fn evaluate_with(&self, sqrt: SqrtEvaluator) -> f64 {
        self.numerator.evaluate_with(sqrt) / self.denominator.evaluate_with(sqrt)
    }
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        self.numerator.mul_finite(&other.denominator_expression())
            == other.numerator.mul_finite(&self.denominator_expression())
    }
}

impl Neg for Ratio {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numerator: Box::new(-*self.numerator),
            denominator: self.denominator,
        }
    }
}

impl Neg for &Ratio {
    type Output = Ratio;

    fn neg(self) -> Ratio {
        -self.clone()
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.numerator {
            Expression::Form(numerator) => write!(f, "({numerator})")?,
            numerator => write!(f, "{numerator}")?,
        }
        write!(f, " / ({})", self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    use crate::term::Term;

    const PRIMES: [i64; 7] = [2, 3, 5, 7, 11, 13, 17];

    fn sqrt(value: i64) -> Expression {
        Term::from_components(Rational::one(), Expression::from(value))
    }

    fn radical_sum(primes: &[i64]) -> Expression {
        primes
            .iter()
            .fold(Expression::zero(), |sum, &prime| sum.add_finite(&sqrt(prime)))
    }

    fn unwrap_ratio(expression: &Expression) -> &Ratio {
        match expression {
            Expression::Ratio(ratio) => ratio,
            other => panic!("expected a ratio, got {other}"),
        }
    }

    #[test]
    fn test_large_inverse_is_a_ratio() {
        let sum = radical_sum(&PRIMES);
        let inverse = sum.inverse().unwrap();
        let ratio = unwrap_ratio(&inverse);
        assert_eq!(ratio.numerator(), &Expression::one());
        assert!(inverse.is_positive());
        assert_eq!(inverse.mul_finite(&sum), Expression::one());
    }

    #[test]
    fn test_small_inverse_is_rationalized() {
        let inverse = radical_sum(&PRIMES[..6]).inverse().unwrap();
        assert!(!matches!(inverse, Expression::Ratio(_)));
    }

    #[test]
    fn test_denominator_sign_is_normalized() {
        let sum = radical_sum(&PRIMES);
        let quotient = Ratio::from_components(Expression::one(), -&sum).unwrap();
        let ratio = unwrap_ratio(&quotient);
        assert_eq!(ratio.numerator(), &Expression::from(-1));
        assert!(ratio.denominator().is_positive());
        assert!(quotient.is_negative());
    }

    #[test]
    fn test_proportional_sides_collapse() {
        let sum = radical_sum(&PRIMES);
        let quotient = Ratio::from_components(sum.scale_by(&Rational::from(3)), sum).unwrap();
        assert_eq!(quotient, Expression::from(3));
    }

    #[test]
    fn test_invalid_components() {
        assert_eq!(
            Ratio::from_components(Expression::one(), Expression::zero()),
            Err(SurdError::DivideByZero)
        );
        assert!(matches!(
            Ratio::from_components(Expression::infinity(crate::constant::Sign::Positive), sqrt(2)),
            Err(SurdError::Undefined(_))
        ));
    }

    #[test]
    fn test_nested_ratios_flatten() {
        let sum = radical_sum(&PRIMES);
        let inverse = sum.inverse().unwrap();
        let nested = Ratio::from_components(inverse.clone(), sum.clone()).unwrap();
        let ratio = unwrap_ratio(&nested);
        assert!(!matches!(ratio.numerator(), Expression::Ratio(_)));
        assert_eq!(nested.mul_finite(&sum), inverse);
    }

    #[test]
    fn test_inverse_swaps_sides() {
        let sum = radical_sum(&PRIMES);
        let inverse = sum.inverse().unwrap();
        assert_eq!(inverse.inverse().unwrap(), sum);
    }

    #[test]
    fn test_sum_of_ratios() {
        let inverse = radical_sum(&PRIMES).inverse().unwrap();
        let doubled = inverse.add_finite(&inverse);
        assert_eq!(doubled, inverse.scale_by(&Rational::from(2)));
        assert!(inverse.sub_finite(&inverse).is_zero());
    }

    #[test]
    fn test_bounds_bracket_value() {
        let inverse = radical_sum(&PRIMES).inverse().unwrap();
        let value = inverse.evaluate(Some(f64::sqrt));
        let lower = inverse.lower_bound().unwrap();
        let upper = inverse.upper_bound().unwrap();
        assert!(lower <= upper);
        assert!(lower.to_f64() <= value + 1e-12);
        assert!(upper.to_f64() >= value - 1e-12);
        let negated = -&inverse;
        assert_eq!(negated.upper_bound().unwrap(), -lower);
    }

    fn binomial(tail: i64, scale: i64, radicand: i64) -> Expression {
        Expression::from(tail).add_finite(&sqrt(radicand).scale_by(&Rational::from(scale)))
    }

    #[test]
    fn test_perfect_sqrt_of_binomial_ratio() {
        // (3 + 2 * sqrt(2)) / (3 - 2 * sqrt(2)) == (3 + 2 * sqrt(2))^2
        let quotient = Ratio::from_components(binomial(3, 2, 2), binomial(3, -2, 2)).unwrap();
        assert!(matches!(quotient, Expression::Ratio(_)));
        assert_eq!(quotient.perfect_sqrt().unwrap(), binomial(3, 2, 2));
    }

    #[test]
    fn test_perfect_sqrt_denests_both_sides() {
        let numerator = Expression::one().add_finite(&sqrt(2));
        let denominator = radical_sum(&[2, 3]).add_finite(&Expression::one());
        let quotient =
            Ratio::from_components(numerator.square(), denominator.square()).unwrap();
        let expected = numerator.mul_finite(&denominator.inverse().unwrap());
        assert_eq!(quotient.perfect_sqrt().unwrap(), expected);
        assert_eq!(expected.square().mul_finite(&denominator.square()), numerator.square());
    }

    #[test]
    fn test_perfect_sqrt_without_closed_form() {
        let quotient = Ratio::from_components(binomial(1, 1, 2), binomial(3, -2, 2)).unwrap();
        assert!(matches!(
            quotient.perfect_sqrt(),
            Err(SurdError::Unsupported(_))
        ));
    }

    #[test]
    fn test_display() {
        let inverse = radical_sum(&PRIMES).inverse().unwrap();
        let rendered = inverse.to_string();
        assert!(rendered.starts_with("1 / (sqrt(2) + sqrt(3)"));
        assert!(rendered.ends_with(')'));
    }
}
