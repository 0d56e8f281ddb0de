//! The closed expression type and the dispatch over its variants.
//!
//! Every operation on [`Expression`] matches on the concrete variant pair
//! and routes the result back through the canonical constructors of
//! [`Term`], [`Form`] and [`Ratio`], so results are always canonical.
//!
//! Equality, hashing and ordering are exact: two expressions denoting the
//! same real number compare equal and hash equal.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_traits::{One, Zero};
use surdix_integers::{rational_sqrt_exact, Integer, Rational};

use crate::constant::{Constant, Sign};
use crate::context::{get_sqrt_evaluator, SqrtEvaluator};
use crate::error::{Result, SurdError};
use crate::form::Form;
use crate::ratio::Ratio;
use crate::term::Term;

/// An exact real number built from rationals and nested square roots.
#[derive(Clone, Debug)]
pub enum Expression {
    /// A rational value or a signed infinity.
    Constant(Constant),
    /// `scale * sqrt(argument)`.
    Term(Term),
    /// `tail + sum of terms`, with pairwise incommensurable terms.
    Form(Form),
    /// A quotient whose denominator was kept unrationalized.
    Ratio(Ratio),
}

impl Expression {
    /// The value zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::Constant(Constant::Zero)
    }

    /// The value one.
    #[must_use]
    pub fn one() -> Self {
        Self::Constant(Constant::one())
    }

    /// A signed infinity.
    #[must_use]
    pub fn infinity(sign: Sign) -> Self {
        Self::Constant(Constant::Infinite(sign))
    }

    /// A rational constant.
    #[must_use]
    pub fn from_rational(value: Rational) -> Self {
        Self::Constant(Constant::new(value))
    }

    /// Exact value of a float.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Domain`] for NaN.
    pub fn from_f64(value: f64) -> Result<Self> {
        Constant::from_f64(value).map(Self::Constant)
    }

    /// The rational value of a finite constant.
    #[must_use]
    pub fn to_rational(&self) -> Option<Rational> {
        match self {
            Self::Constant(constant) => constant.to_rational(),
            _ => None,
        }
    }

    /// Nesting depth of square roots.
    #[must_use]
    pub fn degree(&self) -> usize {
        match self {
            Self::Constant(_) => 0,
            Self::Term(term) => term.degree(),
            Self::Form(form) => form.degree(),
            Self::Ratio(ratio) => ratio.degree(),
        }
    }

    /// Returns true for exact zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Constant(Constant::Zero))
    }

    /// Returns true unless this is a signed infinity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        !matches!(self, Self::Constant(Constant::Infinite(_)))
    }

    /// Exact test for `self > 0`.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Constant(constant) => constant.is_positive(),
            Self::Term(term) => term.is_positive(),
            Self::Form(form) => form.is_positive(),
            Self::Ratio(ratio) => ratio.is_positive(),
        }
    }

    /// Exact test for `self < 0`.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && !self.is_positive()
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.is_zero() {
            0
        } else if self.is_positive() {
            1
        } else {
            -1
        }
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    /// Square of the value, renormalized.
    #[must_use]
    pub fn square(&self) -> Self {
        match self {
            Self::Constant(constant) => Self::Constant(constant.square()),
            Self::Term(term) => term.square(),
            Self::Form(form) => form.square(),
            Self::Ratio(ratio) => ratio.square(),
        }
    }

    /// Exact multiplicative inverse.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::DivideByZero`] for zero.
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(SurdError::DivideByZero);
        }
        Ok(self.reciprocal())
    }

    /// Inverse of a value known to be nonzero.
    pub(crate) fn reciprocal(&self) -> Self {
        match self {
            Self::Constant(Constant::Zero) => unreachable!("reciprocal of zero"),
            Self::Constant(Constant::Finite(value)) => Self::from_rational(value.recip()),
            Self::Constant(Constant::Infinite(_)) => Self::zero(),
            Self::Term(term) => term.inverse(),
            Self::Form(form) => form.inverse(),
            Self::Ratio(ratio) => ratio.inverse(),
        }
    }

    /// Exact sum.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinities of opposite signs.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Constant(left), Self::Constant(right)) => {
                left.checked_add(right).map(Self::Constant)
            }
            (Self::Constant(Constant::Infinite(sign)), _)
            | (_, Self::Constant(Constant::Infinite(sign))) => Ok(Self::infinity(*sign)),
            _ => Ok(self.add_finite(other)),
        }
    }

    /// Exact difference.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinities of equal signs.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.checked_add(&-other)
    }

    /// Exact product.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinity times zero.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Constant(left), Self::Constant(right)) => {
                left.checked_mul(right).map(Self::Constant)
            }
            (Self::Constant(Constant::Infinite(sign)), value)
            | (value, Self::Constant(Constant::Infinite(sign))) => Ok(Self::infinity(
                sign.times(Sign::from_positive(value.is_positive())),
            )),
            _ => Ok(self.mul_finite(other)),
        }
    }

    /// Exact quotient.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::DivideByZero`] for a zero divisor and
    /// [`SurdError::Undefined`] for a quotient of infinities.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        if !self.is_finite() && !other.is_finite() {
            return Err(SurdError::Undefined("quotient of infinities".into()));
        }
        self.checked_mul(&other.inverse()?)
    }

    /// Sum of two finite values.
    pub(crate) fn add_finite(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Constant(constant), value) | (value, Self::Constant(constant)) => {
                match constant {
                    Constant::Zero => value.clone(),
                    Constant::Finite(rational) => value.add_rational(rational),
                    Constant::Infinite(_) => Self::Constant(constant.clone()),
                }
            }
            (Self::Ratio(ratio), value) | (value, Self::Ratio(ratio)) => ratio.add(value),
            (Self::Term(left), Self::Term(right)) => {
                Form::from_components(vec![left.clone(), right.clone()], Rational::zero())
            }
            (Self::Term(term), Self::Form(form)) | (Self::Form(form), Self::Term(term)) => {
                form.add_term(term)
            }
            (Self::Form(left), Self::Form(right)) => left.add_form(right),
        }
    }

    /// Difference of two finite values.
    pub(crate) fn sub_finite(&self, other: &Self) -> Self {
        self.add_finite(&-other)
    }

    /// Product of two finite values.
    pub(crate) fn mul_finite(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Constant(constant), value) | (value, Self::Constant(constant)) => {
                match constant {
                    Constant::Zero => Self::zero(),
                    Constant::Finite(rational) => value.scale_by(rational),
                    Constant::Infinite(sign) => Self::infinity(
                        sign.times(Sign::from_positive(value.is_positive())),
                    ),
                }
            }
            (Self::Ratio(ratio), value) | (value, Self::Ratio(ratio)) => ratio.multiply(value),
            (Self::Term(left), Self::Term(right)) => left.multiply(right),
            (Self::Term(term), Self::Form(form)) | (Self::Form(form), Self::Term(term)) => {
                form.multiply_term(term)
            }
            (Self::Form(left), Self::Form(right)) => left.multiply(right),
        }
    }

    /// Product with a rational.
    pub(crate) fn scale_by(&self, factor: &Rational) -> Self {
        if factor.is_zero() {
            return Self::zero();
        }
        match self {
            Self::Constant(Constant::Zero) => Self::zero(),
            Self::Constant(Constant::Finite(value)) => Self::from_rational(value * factor),
            Self::Constant(Constant::Infinite(sign)) => {
                Self::infinity(sign.times(Sign::from_positive(factor.is_positive())))
            }
            Self::Term(term) => Self::Term(term.scaled(factor)),
            Self::Form(form) => Self::Form(form.scaled(factor)),
            Self::Ratio(ratio) => Self::Ratio(ratio.scaled(factor)),
        }
    }

    /// Sum with a rational.
    pub(crate) fn add_rational(&self, addend: &Rational) -> Self {
        if addend.is_zero() {
            return self.clone();
        }
        match self {
            Self::Constant(Constant::Zero) => Self::from_rational(addend.clone()),
            Self::Constant(Constant::Finite(value)) => Self::from_rational(value + addend),
            Self::Constant(Constant::Infinite(_)) => self.clone(),
            Self::Term(term) => Form::from_components(vec![term.clone()], addend.clone()),
            Self::Form(form) => form.add_rational(addend),
            Self::Ratio(ratio) => ratio.add(&Self::from_rational(addend.clone())),
        }
    }

    /// Square root of a non-negative value.
    ///
    /// Positive infinity is its own square root.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Domain`] for negative values, including negative
    /// infinity.
    pub fn sqrt(&self) -> Result<Self> {
        match self {
            Self::Constant(Constant::Infinite(Sign::Positive)) => Ok(self.clone()),
            value if value.is_negative() => Err(SurdError::Domain(format!(
                "square root of negative value {value}"
            ))),
            value => Ok(Term::from_components(Rational::one(), value.clone())),
        }
    }

    /// Largest square root that can be extracted in closed form.
    ///
    /// For constants and terms this is the rational perfect-square part;
    /// for forms it is the denesting result, and ratios combine the roots
    /// of their two sides.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Unsupported`] when a form involved has no
    /// closed-form square root.
    pub fn perfect_sqrt(&self) -> Result<Self> {
        match self {
            Self::Form(form) => form.perfect_sqrt(),
            Self::Ratio(ratio) => ratio.perfect_sqrt(),
            other => Ok(other.perfect_sqrt_part()),
        }
    }

    /// Like [`Expression::perfect_sqrt`], falling back to the rational
    /// content of forms that have no closed-form root.
    pub(crate) fn perfect_sqrt_part(&self) -> Self {
        match self {
            Self::Constant(constant) => Self::Constant(constant.perfect_sqrt()),
            Self::Term(term) => Self::Constant(term.perfect_sqrt()),
            Self::Form(form) => form
                .perfect_sqrt()
                .unwrap_or_else(|_| Self::Constant(form.content_sqrt())),
            Self::Ratio(ratio) => ratio.perfect_sqrt().unwrap_or_else(|_| Self::one()),
        }
    }

    /// Digit budget used to size comparison precision.
    #[must_use]
    pub fn significant_digits_count(&self) -> usize {
        match self {
            Self::Constant(constant) => constant.significant_digits_count(),
            Self::Term(term) => term.significant_digits_count(),
            Self::Form(form) => form.significant_digits_count(),
            Self::Ratio(ratio) => ratio.significant_digits_count(),
        }
    }

    /// Splits off a common integer denominator: `(d, self * d)`.
    #[must_use]
    pub fn extract_common_denominator(&self) -> (Integer, Self) {
        match self {
            Self::Constant(constant) => {
                let (denominator, rest) = constant.extract_common_denominator();
                (denominator, Self::Constant(rest))
            }
            Self::Term(term) => {
                let (denominator, rest) = term.extract_common_denominator();
                (denominator, Self::Term(rest))
            }
            Self::Form(form) => {
                let (denominator, rest) = form.extract_common_denominator();
                (denominator, Self::Form(rest))
            }
            Self::Ratio(ratio) => ratio.extract_common_denominator(),
        }
    }

    /// Splits off a common integer numerator: `(n, self / n)`.
    #[must_use]
    pub fn extract_common_numerator(&self) -> (Integer, Self) {
        match self {
            Self::Constant(constant) => {
                let (numerator, rest) = constant.extract_common_numerator();
                (numerator, Self::Constant(rest))
            }
            Self::Term(term) => {
                let (numerator, rest) = term.extract_common_numerator();
                (numerator, Self::Term(rest))
            }
            Self::Form(form) => {
                let (numerator, rest) = form.extract_common_numerator();
                (numerator, Self::Form(rest))
            }
            Self::Ratio(ratio) => ratio.extract_common_numerator(),
        }
    }

    /// A rational not greater than the value.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinities.
    pub fn lower_bound(&self) -> Result<Rational> {
        self.ensure_finite("lower bound")?;
        Ok(self.lower_bound_at(0))
    }

    /// A rational not less than the value.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Undefined`] for infinities.
    pub fn upper_bound(&self) -> Result<Rational> {
        self.ensure_finite("upper bound")?;
        Ok(self.upper_bound_at(0))
    }

    /// Lower bound with `extra` decimal digits of precision on top of the
    /// value's own digit budget.
    pub(crate) fn lower_bound_at(&self, extra: usize) -> Rational {
        match self {
            Self::Constant(constant) => constant
                .to_rational()
                .unwrap_or_else(|| unreachable!("bounds of an infinite value")),
            Self::Term(term) => term.lower_bound_at(extra),
            Self::Form(form) => form.lower_bound_at(extra),
            Self::Ratio(ratio) => ratio.lower_bound_at(extra),
        }
    }

    /// Upper counterpart of [`Expression::lower_bound_at`].
    pub(crate) fn upper_bound_at(&self, extra: usize) -> Rational {
        match self {
            Self::Constant(constant) => constant
                .to_rational()
                .unwrap_or_else(|| unreachable!("bounds of an infinite value")),
            Self::Term(term) => term.upper_bound_at(extra),
            Self::Form(form) => form.upper_bound_at(extra),
            Self::Ratio(ratio) => ratio.upper_bound_at(extra),
        }
    }

    pub(crate) fn ensure_finite(&self, operation: &str) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(SurdError::Undefined(format!("{operation} of {self}")))
        }
    }

    /// Approximate float value.
    ///
    /// Uses `sqrt` when given, else the process-wide evaluator.
    #[must_use]
    pub fn evaluate(&self, sqrt: Option<SqrtEvaluator>) -> f64 {
        self.evaluate_with(sqrt.unwrap_or_else(get_sqrt_evaluator))
    }

    pub(crate) fn evaluate_with(&self, sqrt: SqrtEvaluator) -> f64 {
        match self {
            Self::Constant(constant) => constant.evaluate(),
            Self::Term(term) => term.evaluate_with(sqrt),
            Self::Form(form) => form.evaluate_with(sqrt),
            Self::Ratio(ratio) => ratio.evaluate_with(sqrt),
        }
    }
}

/// The rational `q` with `other == q * base`, if there is one.
///
/// Works structurally: terms are proportional when their arguments are in a
/// rational-square ratio, forms when their primitive parts coincide.
pub(crate) fn rational_ratio(base: &Expression, other: &Expression) -> Option<Rational> {
    match (base, other) {
        (
            Expression::Constant(Constant::Finite(base)),
            Expression::Constant(Constant::Finite(other)),
        ) => Some(other / base),
        (Expression::Term(base), Expression::Term(other)) => {
            let scales = other.scale() / base.scale();
            if base.argument() == other.argument() {
                return Some(scales);
            }
            let arguments = rational_ratio(base.argument(), other.argument())?;
            Some(scales * rational_sqrt_exact(&arguments)?)
        }
        (Expression::Form(base), Expression::Form(other)) => {
            if base.terms().len() != other.terms().len()
                || base.tail().is_zero() != other.tail().is_zero()
            {
                return None;
            }
            let (base_content, base_primitive) = base.primitive();
            let (other_content, other_primitive) = other.primitive();
            let contents = other_content / base_content;
            if base_primitive == other_primitive {
                Some(contents)
            } else if base_primitive == -&other_primitive {
                Some(-contents)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn compare_constants(left: &Constant, right: &Constant) -> Ordering {
    match (left, right) {
        (Constant::Infinite(left), Constant::Infinite(right)) => {
            left.is_positive().cmp(&right.is_positive())
        }
        (Constant::Infinite(sign), _) => {
            if sign.is_positive() {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (_, Constant::Infinite(sign)) => {
            if sign.is_positive() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        _ => left.to_rational().cmp(&right.to_rational()),
    }
}

/// Compares constants and single terms through their squares, which have
/// strictly lower degree.
fn compare_by_squares(left: &Expression, right: &Expression) -> Ordering {
    let (left_sign, right_sign) = (left.signum(), right.signum());
    if left_sign != right_sign {
        return left_sign.cmp(&right_sign);
    }
    if left_sign == 0 {
        return Ordering::Equal;
    }
    let squares = left.square().cmp(&right.square());
    if left_sign > 0 {
        squares
    } else {
        squares.reverse()
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Constant(left), Self::Constant(right)) => left == right,
            (Self::Term(left), Self::Term(right)) => left == right,
            (Self::Form(left), Self::Form(right)) => left == right,
            (Self::Ratio(left), Self::Ratio(right)) => left == right,
            (Self::Ratio(ratio), value) | (value, Self::Ratio(ratio)) => ratio.equals(value),
            _ => false,
        }
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Constant(constant) => {
                0u8.hash(state);
                constant.hash(state);
            }
            Self::Term(term) => {
                1u8.hash(state);
                term.hash(state);
            }
            Self::Form(form) => {
                2u8.hash(state);
                form.hash(state);
            }
            // Hash the value a ratio denotes, so it agrees with equal
            // non-ratio expressions.
            Self::Ratio(ratio) => ratio.rationalized().hash(state),
        }
    }
}

impl Ord for Expression {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Constant(left), Self::Constant(right)) => compare_constants(left, right),
            (Self::Constant(Constant::Infinite(sign)), _) => {
                if sign.is_positive() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (_, Self::Constant(Constant::Infinite(sign))) => {
                if sign.is_positive() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Self::Constant(_) | Self::Term(_), Self::Constant(_) | Self::Term(_)) => {
                compare_by_squares(self, other)
            }
            _ => self.sub_finite(other).signum().cmp(&0),
        }
    }
}

impl PartialOrd for Expression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(constant) => write!(f, "{constant}"),
            Self::Term(term) => write!(f, "{term}"),
            Self::Form(form) => write!(f, "{form}"),
            Self::Ratio(ratio) => write!(f, "{ratio}"),
        }
    }
}

impl From<Constant> for Expression {
    fn from(value: Constant) -> Self {
        Self::Constant(value)
    }
}

impl From<Term> for Expression {
    fn from(value: Term) -> Self {
        Self::Term(value)
    }
}

impl From<Form> for Expression {
    fn from(value: Form) -> Self {
        Self::Form(value)
    }
}

impl From<Ratio> for Expression {
    fn from(value: Ratio) -> Self {
        Self::Ratio(value)
    }
}

impl From<Rational> for Expression {
    fn from(value: Rational) -> Self {
        Self::from_rational(value)
    }
}

impl From<Integer> for Expression {
    fn from(value: Integer) -> Self {
        Self::from_rational(Rational::from_integer(value))
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Self::from_rational(Rational::from(value))
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Self::from_rational(Rational::from(value))
    }
}

impl TryFrom<f64> for Expression {
    type Error = SurdError;

    fn try_from(value: f64) -> Result<Self> {
        Self::from_f64(value)
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::zero()
    }
}
