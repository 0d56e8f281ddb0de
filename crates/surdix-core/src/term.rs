//! Scaled square roots.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

use num_traits::{One, Zero};
use surdix_integers::{
    ceil_half, rational_sqrt_lower_bound, rational_sqrt_upper_bound, square_factor_root,
    Integer, Rational,
};

use crate::constant::{Constant, Sign};
use crate::context::SqrtEvaluator;
use crate::expression::{rational_ratio, Expression};
use crate::ratio::Ratio;

/// `scale * sqrt(argument)` with a nonzero rational scale.
///
/// Canonical terms have a positive argument with an integer common
/// denominator of one and no extractable perfect-square part, so that
/// `sqrt(8)` is always stored as `2 * sqrt(2)`.
#[derive(Clone, Debug)]
pub struct Term {
    scale: Rational,
    argument: Box<Expression>,
}

impl Term {
    /// Wraps already canonical components.
    pub(crate) fn new(scale: Rational, argument: Expression) -> Self {
        debug_assert!(!scale.is_zero(), "terms have nonzero scales");
        Self {
            scale,
            argument: Box::new(argument),
        }
    }

    /// Canonical form of `scale * sqrt(argument)`.
    ///
    /// Collapses to a constant when the argument is a perfect square, moves
    /// denominators out of the radical and extracts rational square factors
    /// into the scale. The argument must not be negative.
    #[must_use]
    pub fn from_components(scale: Rational, argument: Expression) -> Expression {
        if scale.is_zero() || argument.is_zero() {
            return Expression::zero();
        }
        match argument {
            Expression::Constant(Constant::Infinite(_)) => {
                Expression::infinity(Sign::from_positive(scale.is_positive()))
            }
            // sqrt(n / d) == sqrt(n * d) / d
            Expression::Ratio(ratio) => {
                let denominator = Expression::Form(ratio.denominator().clone());
                let radicand = ratio.numerator().mul_finite(&denominator);
                Ratio::build(Self::from_components(scale, radicand), denominator, false)
            }
            argument => Self::from_integral_components(scale, &argument),
        }
    }

    fn from_integral_components(scale: Rational, argument: &Expression) -> Expression {
        let (denominator, argument) = argument.extract_common_denominator();
        let denominator = Rational::from_integer(denominator);
        let scale = scale / &denominator;
        let argument = argument.scale_by(&denominator);
        let integral_scale = match &argument {
            Expression::Constant(Constant::Finite(value)) => Some(value.numerator()),
            Expression::Term(term) => Some(term.scale().numerator()),
            _ => None,
        };
        let root = match integral_scale {
            Some(value) => Expression::from(Rational::from_integer(square_factor_root(&value))),
            None => argument.perfect_sqrt_part(),
        };
        if root.square() == argument {
            return root.scale_by(&scale);
        }
        match root {
            Expression::Constant(Constant::Finite(root)) if !root.is_one() => {
                let square = &root * &root;
                Expression::Term(Self::new(scale * root, argument.scale_by(&square.recip())))
            }
            _ => Expression::Term(Self::new(scale, argument)),
        }
    }

    /// The rational coefficient.
    #[must_use]
    pub fn scale(&self) -> &Rational {
        &self.scale
    }

    /// The radicand.
    #[must_use]
    pub fn argument(&self) -> &Expression {
        &self.argument
    }

    /// Nesting depth, one more than the argument's.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.argument.degree() + 1
    }

    /// Returns true when the scale is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.scale.is_positive()
    }

    /// `scale^2 * argument`.
    #[must_use]
    pub fn square(&self) -> Expression {
        self.argument.scale_by(&(&self.scale * &self.scale))
    }

    /// Exact inverse, rationalizing the radicand.
    #[must_use]
    pub fn inverse(&self) -> Expression {
        Self::from_components(self.scale.recip(), self.argument.reciprocal())
    }

    /// Perfect-square part of the scale.
    #[must_use]
    pub fn perfect_sqrt(&self) -> Constant {
        Constant::new(self.scale.clone()).perfect_sqrt()
    }

    /// Half the digit budget of the square, rounded up.
    #[must_use]
    pub fn significant_digits_count(&self) -> usize {
        ceil_half(self.square().significant_digits_count())
    }

    /// Splits off the scale denominator: `(d, self * d)`.
    #[must_use]
    pub fn extract_common_denominator(&self) -> (Integer, Self) {
        let denominator = self.scale.denominator();
        let scale = Rational::from_integer(self.scale.numerator());
        (denominator, Self::new(scale, (*self.argument).clone()))
    }

    /// Splits off the scale numerator magnitude: `(n, self / n)`.
    #[must_use]
    pub fn extract_common_numerator(&self) -> (Integer, Self) {
        let numerator = self.scale.numerator();
        let sign = Integer::from(i64::from(numerator.signum()));
        let scale = Rational::new(sign, self.scale.denominator());
        (numerator.abs(), Self::new(scale, (*self.argument).clone()))
    }

    pub(crate) fn scaled(&self, factor: &Rational) -> Self {
        Self::new(&self.scale * factor, (*self.argument).clone())
    }

    pub(crate) fn multiply(&self, other: &Self) -> Expression {
        let scale = &self.scale * &other.scale;
        if self.argument == other.argument {
            return self.argument.scale_by(&scale);
        }
        let (lesser, greater) = if self.argument < other.argument {
            (&*self.argument, &*other.argument)
        } else {
            (&*other.argument, &*self.argument)
        };
        // sqrt(x) * sqrt(q * x) == x * sqrt(q)
        if let Some(ratio) = rational_ratio(lesser, greater) {
            return lesser.mul_finite(&Self::from_components(scale, Expression::from(ratio)));
        }
        Self::from_components(scale, lesser.mul_finite(greater))
    }

    /// Rational below the value, precise to `extra` decimal digits.
    pub(crate) fn lower_bound_at(&self, extra: usize) -> Rational {
        if !self.is_positive() {
            return -(-self).upper_bound_at(extra);
        }
        if extra == 0 {
            return rational_sqrt_lower_bound(&self.square().lower_bound_at(0));
        }
        let scale = Rational::from_integer(Integer::power_of_ten(extra));
        let square = self.square().scale_by(&(&scale * &scale));
        rational_sqrt_lower_bound(&square.lower_bound_at(0)) / scale
    }

    /// Rational above the value, precise to `extra` decimal digits.
    pub(crate) fn upper_bound_at(&self, extra: usize) -> Rational {
        if !self.is_positive() {
            return -(-self).lower_bound_at(extra);
        }
        if extra == 0 {
            return rational_sqrt_upper_bound(&self.square().upper_bound_at(0));
        }
        let scale = Rational::from_integer(Integer::power_of_ten(extra));
        let square = self.square().scale_by(&(&scale * &scale));
        rational_sqrt_upper_bound(&square.upper_bound_at(0)) / scale
    }

    pub(crate) fn evaluate_with(&self, sqrt: SqrtEvaluator) -> f64 {
        self.scale.to_f64() * sqrt(self.argument.evaluate_with(sqrt))
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.is_positive() == other.is_positive() && self.square() == other.square()
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_positive().hash(state);
        self.square().hash(state);
    }
}

impl Neg for Term {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            scale: -self.scale,
            argument: self.argument,
        }
    }
}

impl Neg for &Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(-&self.scale, (*self.argument).clone())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale.is_one() {
            write!(f, "sqrt({})", self.argument)
        } else if (-&self.scale).is_one() {
            write!(f, "-sqrt({})", self.argument)
        } else {
            write!(f, "{} * sqrt({})", self.scale, self.argument)
        }
    }
}
