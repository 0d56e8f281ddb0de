//! Sums of incommensurable terms plus a rational tail.
//!
//! [`Form::from_components`] is the only place where radicals that look
//! different are recognized as rational multiples of one another and
//! merged. Everything producing a sum funnels through it.
//!
//! The sign of a form is decided exactly: first by two sum-of-squares
//! inequalities over its positive and negative components, then, when those
//! leave the question open, by rational bounds refined until they exclude
//! zero.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

use num_traits::{One, Zero};
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use surdix_integers::{rational_sqrt_exact, square_factor_root, Integer, Rational};
use tracing::{trace, warn};

use crate::constant::Constant;
use crate::context::SqrtEvaluator;
use crate::expression::{rational_ratio, Expression};
use crate::factorization::{rationalized_inverse, RATIONALIZATION_LIMIT};
use crate::ratio::Ratio;
use crate::term::Term;

/// Cap on the extra decimal digits used to settle the sign of a form.
pub const MAX_REFINEMENT_DIGITS: usize = 1024;

/// First step of the sign refinement; later steps double it.
const INITIAL_REFINEMENT_DIGITS: usize = 8;

pub(crate) type Terms = SmallVec<[Term; 4]>;

/// `tail + sum of terms`.
///
/// Canonical forms have at least one term, and at least two when the tail
/// is zero. Terms are ordered by degree and then by argument, and no two
/// arguments differ by a rational square factor.
#[derive(Clone, Debug)]
pub struct Form {
    terms: Terms,
    tail: Rational,
}

impl Form {
    /// Canonical sum of `terms` and `tail`.
    ///
    /// Terms with arguments in a rational-square ratio are merged into one,
    /// vanishing terms are dropped, and the result degrades to a single
    /// term or a constant when that is all that is left.
    #[must_use]
    pub fn from_components(mut terms: Vec<Term>, tail: Rational) -> Expression {
        terms.sort_by(compare_terms);
        let mut merged = Terms::new();
        let mut queue = terms;
        while !queue.is_empty() {
            let representative = queue.remove(0);
            let argument = representative.argument();
            let mut scale = representative.scale().clone();
            queue.retain(|term| match proportional_scale(argument, term) {
                Some(contribution) => {
                    scale = &scale + &contribution;
                    false
                }
                None => true,
            });
            if !scale.is_zero() {
                merged.push(Term::new(scale, argument.clone()));
            }
        }
        match merged.len() {
            0 => Expression::from(tail),
            1 if tail.is_zero() => Expression::Term(merged.remove(0)),
            _ => Expression::Form(Self {
                terms: merged,
                tail,
            }),
        }
    }

    /// The terms, in canonical order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The rational part.
    #[must_use]
    pub fn tail(&self) -> &Rational {
        &self.tail
    }

    /// Number of terms plus one for a nonzero tail.
    #[must_use]
    pub fn components_count(&self) -> usize {
        self.terms.len() + usize::from(!self.tail.is_zero())
    }

    /// Deepest radical nesting among the terms.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.terms.iter().map(Term::degree).max().unwrap_or(0)
    }

    /// Exact test for `self > 0`.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for term in &self.terms {
            if term.is_positive() {
                positive.push(term.square());
            } else {
                negative.push(term.square());
            }
        }
        if !self.tail.is_zero() {
            let square = Expression::from(&self.tail * &self.tail);
            if self.tail.is_positive() {
                positive.push(square);
            } else {
                negative.push(square);
            }
        }
        if positive.is_empty() || negative.is_empty() {
            return negative.is_empty();
        }
        let positive_count = Rational::from_integer(Integer::from(positive.len() as u64));
        let negative_count = Rational::from_integer(Integer::from(negative.len() as u64));
        let positive_squares = sum(&positive);
        let negative_squares = sum(&negative);
        // (sum of p values)^2 <= p * (sum of their squares), likewise for n
        if !positive_squares
            .scale_by(&positive_count)
            .sub_finite(&negative_squares)
            .is_positive()
        {
            return false;
        }
        if positive_squares
            .sub_finite(&negative_squares.scale_by(&negative_count))
            .is_positive()
        {
            return true;
        }
        self.is_positive_by_refinement()
    }

    fn is_positive_by_refinement(&self) -> bool {
        let mut extra = 0;
        loop {
            let lower = self.lower_bound_at(extra);
            if lower.is_positive() {
                return true;
            }
            let upper = self.upper_bound_at(extra);
            if !upper.is_positive() {
                return false;
            }
            if extra >= MAX_REFINEMENT_DIGITS {
                warn!(
                    form = %self,
                    digits = extra,
                    "sign refinement exhausted its precision, bounds still straddle zero"
                );
                return !lower.is_negative();
            }
            extra = if extra == 0 {
                INITIAL_REFINEMENT_DIGITS
            } else {
                extra * 2
            };
            trace!(form = %self, digits = extra, "refining sign bounds");
        }
    }

    /// Lower bound precise to the form's digit budget plus `extra` digits.
    pub(crate) fn lower_bound_at(&self, extra: usize) -> Rational {
        let (denominator, form) = self.extract_common_denominator();
        let digits = form.significant_digits_count() + extra;
        let sum = form
            .terms
            .iter()
            .fold(form.tail.clone(), |sum, term| sum + term.lower_bound_at(digits));
        sum / Rational::from_integer(denominator)
    }

    pub(crate) fn upper_bound_at(&self, extra: usize) -> Rational {
        let (denominator, form) = self.extract_common_denominator();
        let digits = form.significant_digits_count() + extra;
        let sum = form
            .terms
            .iter()
            .fold(form.tail.clone(), |sum, term| sum + term.upper_bound_at(digits));
        sum / Rational::from_integer(denominator)
    }

    /// Digit budget used to size comparison precision.
    #[must_use]
    pub fn significant_digits_count(&self) -> usize {
        let terms_digits = self
            .terms
            .iter()
            .map(Term::significant_digits_count)
            .max()
            .unwrap_or(0);
        let tail_digits = Constant::new(self.tail.clone()).significant_digits_count();
        let components = Integer::from(self.components_count() as u64);
        terms_digits.max(tail_digits) + components.digits_count() + 1
    }

    /// Square, expanded and renormalized.
    #[must_use]
    pub fn square(&self) -> Expression {
        let mut terms = Vec::new();
        let mut tail = &self.tail * &self.tail;
        if !self.tail.is_zero() {
            let doubled_tail = &self.tail * &Rational::from(2);
            terms.extend(self.terms.iter().map(|term| term.scaled(&doubled_tail)));
        }
        let two = Rational::from(2);
        for (index, term) in self.terms.iter().enumerate() {
            for other in &self.terms[..index] {
                sift(term.multiply(other).scale_by(&two), &mut terms, &mut tail);
            }
            sift(term.square(), &mut terms, &mut tail);
        }
        Self::from_components(terms, tail)
    }

    /// Product of two forms.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Expression {
        if self == other {
            return self.square();
        }
        let mut terms = Vec::new();
        if !other.tail.is_zero() {
            terms.extend(self.terms.iter().map(|term| term.scaled(&other.tail)));
        }
        if !self.tail.is_zero() {
            terms.extend(other.terms.iter().map(|term| term.scaled(&self.tail)));
        }
        let mut tail = &self.tail * &other.tail;
        for term in &self.terms {
            for other_term in &other.terms {
                sift(term.multiply(other_term), &mut terms, &mut tail);
            }
        }
        Self::from_components(terms, tail)
    }

    pub(crate) fn multiply_term(&self, term: &Term) -> Expression {
        let mut terms = Vec::new();
        let mut tail = Rational::zero();
        if !self.tail.is_zero() {
            terms.push(term.scaled(&self.tail));
        }
        for own in &self.terms {
            sift(own.multiply(term), &mut terms, &mut tail);
        }
        Self::from_components(terms, tail)
    }

    pub(crate) fn add_term(&self, term: &Term) -> Expression {
        let mut terms = self.terms.to_vec();
        terms.push(term.clone());
        Self::from_components(terms, self.tail.clone())
    }

    pub(crate) fn add_form(&self, other: &Self) -> Expression {
        let mut terms = self.terms.to_vec();
        terms.extend(other.terms.iter().cloned());
        Self::from_components(terms, &self.tail + &other.tail)
    }

    pub(crate) fn add_rational(&self, addend: &Rational) -> Expression {
        let tail = &self.tail + addend;
        if tail.is_zero() && self.terms.len() == 1 {
            Expression::Term(self.terms[0].clone())
        } else {
            Expression::Form(Self {
                terms: self.terms.clone(),
                tail,
            })
        }
    }

    pub(crate) fn scaled(&self, factor: &Rational) -> Self {
        if factor.is_one() {
            return self.clone();
        }
        Self {
            terms: self.terms.iter().map(|term| term.scaled(factor)).collect(),
            tail: &self.tail * factor,
        }
    }

    /// Splits off the lcm of all scale denominators: `(d, self * d)`.
    #[must_use]
    pub fn extract_common_denominator(&self) -> (Integer, Self) {
        let denominator = self
            .terms
            .iter()
            .map(|term| term.scale().denominator())
            .fold(self.tail.denominator(), |lcm, value| lcm.lcm(&value));
        let form = self.scaled(&Rational::from_integer(denominator.clone()));
        (denominator, form)
    }

    /// Splits off the gcd of all scale numerators: `(n, self / n)`.
    #[must_use]
    pub fn extract_common_numerator(&self) -> (Integer, Self) {
        let numerator = self
            .terms
            .iter()
            .map(|term| term.scale().numerator())
            .fold(self.tail.numerator(), |gcd, value| gcd.gcd(&value));
        let form = self.scaled(&Rational::from_integer(numerator.clone()).recip());
        (numerator, form)
    }

    /// Positive rational content and the primitive form `self / content`.
    pub(crate) fn primitive(&self) -> (Rational, Self) {
        let (denominator, integral) = self.extract_common_denominator();
        let (numerator, primitive) = integral.extract_common_numerator();
        (Rational::new(numerator, denominator), primitive)
    }

    /// Root of the square factors of the rational content.
    pub(crate) fn content_sqrt(&self) -> Constant {
        let (content, _) = self.primitive();
        Constant::new(Rational::new(
            square_factor_root(&content.numerator()),
            square_factor_root(&content.denominator()),
        ))
    }

    /// Exact inverse.
    ///
    /// Rationalizes the denominator by successive conjugate multiplication
    /// while the numerator stays within [`RATIONALIZATION_LIMIT`]
    /// monomials, and keeps an unrationalized [`Ratio`] past that.
    #[must_use]
    pub fn inverse(&self) -> Expression {
        rationalized_inverse(self, Some(RATIONALIZATION_LIMIT)).unwrap_or_else(|| {
            tracing::debug!(form = %self, "inverse kept as a ratio");
            Ratio::build(Expression::one(), Expression::Form(self.clone()), false)
        })
    }

    pub(crate) fn evaluate_with(&self, sqrt: SqrtEvaluator) -> f64 {
        self.terms
            .iter()
            .fold(self.tail.to_f64(), |sum, term| sum + term.evaluate_with(sqrt))
    }
}

/// Orders terms by degree, then by argument.
fn compare_terms(left: &Term, right: &Term) -> Ordering {
    left.degree()
        .cmp(&right.degree())
        .then_with(|| left.argument().cmp(right.argument()))
}

/// Scale `term` contributes to a term over `argument`, if their radicands
/// differ by a rational square.
fn proportional_scale(argument: &Expression, term: &Term) -> Option<Rational> {
    let ratio = rational_ratio(argument, term.argument())?;
    if !ratio.is_positive() {
        return None;
    }
    Some(term.scale() * &rational_sqrt_exact(&ratio)?)
}

fn sum(values: &[Expression]) -> Expression {
    values
        .iter()
        .fold(Expression::zero(), |sum, value| sum.add_finite(value))
}

/// Distributes a product of terms into the pending terms and tail.
pub(crate) fn sift(component: Expression, terms: &mut Vec<Term>, tail: &mut Rational) {
    match component {
        Expression::Constant(constant) => {
            if let Some(value) = constant.to_rational() {
                *tail = &*tail + &value;
            }
        }
        Expression::Term(term) => terms.push(term),
        Expression::Form(form) => {
            *tail = &*tail + &form.tail;
            terms.extend(form.terms);
        }
        Expression::Ratio(_) => unreachable!("products of terms are never ratios"),
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        self.tail == other.tail
            && self.terms.len() == other.terms.len()
            && self.terms.iter().zip(&other.terms).all(|(left, right)| left == right)
    }
}

impl Eq for Form {}

impl Hash for Form {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order independent, so it only depends on the set of terms.
        let terms = self.terms.iter().fold(0u64, |combined, term| {
            let mut hasher = FxHasher::default();
            term.hash(&mut hasher);
            combined.wrapping_add(hasher.finish())
        });
        terms.hash(state);
        self.tail.hash(state);
    }
}

impl Neg for Form {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            terms: self.terms.into_iter().map(Neg::neg).collect(),
            tail: -self.tail,
        }
    }
}

impl Neg for &Form {
    type Output = Form;

    fn neg(self) -> Form {
        -self.clone()
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = self.terms.iter();
        if let Some(first) = terms.next() {
            write!(f, "{first}")?;
        }
        for term in terms {
            if term.is_positive() {
                write!(f, " + {term}")?;
            } else {
                write!(f, " - {}", -term)?;
            }
        }
        if self.tail.is_positive() {
            write!(f, " + {}", self.tail)?;
        } else if self.tail.is_negative() {
            write!(f, " - {}", self.tail.abs())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(numerator: i64, denominator: i64) -> Rational {
        Rational::from_i64(numerator, denominator)
    }

    fn root(value: i64) -> Term {
        match Term::from_components(q(1, 1), Expression::from(value)) {
            Expression::Term(term) => term,
            other => panic!("expected a term, got {other:?}"),
        }
    }

    fn as_form(expression: Expression) -> Form {
        match expression {
            Expression::Form(form) => form,
            other => panic!("expected a form, got {other:?}"),
        }
    }

    #[test]
    fn test_proportional_terms_merge() {
        // sqrt(2) + sqrt(8) == 3 * sqrt(2)
        let merged = Form::from_components(
            vec![root(2), Term::new(q(1, 1), Expression::from(8))],
            Rational::zero(),
        );
        assert_eq!(
            merged,
            Term::from_components(q(3, 1), Expression::from(2))
        );
    }

    #[test]
    fn test_cancelling_terms_leave_tail() {
        let cancelled = Form::from_components(vec![root(3), -root(3)], q(5, 2));
        assert_eq!(cancelled, Expression::from(q(5, 2)));
        let single = Form::from_components(vec![root(5)], Rational::zero());
        assert_eq!(single, Expression::Term(root(5)));
    }

    #[test]
    fn test_terms_are_ordered() {
        let form = as_form(Form::from_components(vec![root(7), root(2), root(3)], q(1, 1)));
        let arguments: Vec<_> = form.terms().iter().map(|term| term.argument().clone()).collect();
        assert_eq!(
            arguments,
            vec![Expression::from(2), Expression::from(3), Expression::from(7)]
        );
        assert_eq!(form.components_count(), 4);
    }

    #[test]
    fn test_sign_of_forms() {
        let positive = as_form(Form::from_components(vec![root(2), root(3)], q(-3, 1)));
        assert!(positive.is_positive()); // 3.146 - 3
        let negative = as_form(Form::from_components(vec![root(2), root(3)], q(-16, 5)));
        assert!(!negative.is_positive()); // 3.146 - 3.2
        let trivial = as_form(Form::from_components(vec![root(2)], q(1, 1)));
        assert!(trivial.is_positive());
    }

    #[test]
    fn test_sign_needs_refinement() {
        // sqrt(2) + sqrt(3) - 3.14626436994197 is about 2.3e-15
        let tail = -Rational::new(
            Integer::new(314_626_436_994_197),
            Integer::power_of_ten(14),
        );
        let close = as_form(Form::from_components(vec![root(2), root(3)], tail.clone()));
        assert!(close.is_positive());
        let closer = as_form(Form::from_components(
            vec![root(2), root(3)],
            tail - q(1, 1_000_000_000_000_000),
        ));
        assert!(closer.is_positive());
        let past = as_form(Form::from_components(
            vec![root(2), root(3)],
            -Rational::new(Integer::new(314_626_436_994_198), Integer::power_of_ten(14)),
        ));
        assert!(!past.is_positive());
    }

    #[test]
    fn test_square() {
        // (1 + sqrt(2))^2 == 3 + 2 * sqrt(2)
        let form = as_form(Form::from_components(vec![root(2)], q(1, 1)));
        let expected = Form::from_components(vec![root(2).scaled(&q(2, 1))], q(3, 1));
        assert_eq!(form.square(), expected);
    }

    #[test]
    fn test_multiply_conjugates() {
        let sum = as_form(Form::from_components(vec![root(5)], q(2, 1)));
        let difference = as_form(Form::from_components(vec![-root(5)], q(2, 1)));
        assert_eq!(sum.multiply(&difference), Expression::from(-1));
    }

    #[test]
    fn test_multiply_by_term() {
        // (sqrt(2) + sqrt(3)) * sqrt(6) == 3 * sqrt(2) + 2 * sqrt(3)
        let form = as_form(Form::from_components(vec![root(2), root(3)], Rational::zero()));
        let expected = Form::from_components(
            vec![root(2).scaled(&q(3, 1)), root(3).scaled(&q(2, 1))],
            Rational::zero(),
        );
        assert_eq!(form.multiply_term(&root(6)), expected);
    }

    #[test]
    fn test_common_parts() {
        let form = as_form(Form::from_components(
            vec![root(2).scaled(&q(2, 3))],
            q(4, 5),
        ));
        let (denominator, integral) = form.extract_common_denominator();
        assert_eq!(denominator, Integer::new(15));
        assert_eq!(integral.tail(), &q(12, 1));
        let (numerator, primitive) = integral.extract_common_numerator();
        assert_eq!(numerator, Integer::new(2));
        assert_eq!(primitive.tail(), &q(6, 1));
        assert_eq!(primitive.terms()[0].scale(), &q(5, 1));
    }

    #[test]
    fn test_bounds_bracket() {
        let form = as_form(Form::from_components(vec![root(2), -root(3)], q(1, 3)));
        let lower = form.lower_bound_at(0);
        let upper = form.upper_bound_at(0);
        assert!(lower <= upper);
        assert!(lower.to_f64() <= form.evaluate_with(f64::sqrt));
        assert!(form.evaluate_with(f64::sqrt) <= upper.to_f64());
    }

    #[test]
    fn test_display() {
        let form = as_form(Form::from_components(vec![root(2), -root(3)], q(1, 1)));
        assert_eq!(form.to_string(), "sqrt(2) - sqrt(3) + 1");
        let form = as_form(Form::from_components(vec![root(2)], q(-1, 2)));
        assert_eq!(form.to_string(), "sqrt(2) - 1/2");
    }

    #[test]
    fn test_display_without_tail() {
        let form = as_form(Form::from_components(vec![root(2), root(3)], Rational::zero()));
        assert_eq!(form.to_string(), "sqrt(2) + sqrt(3)");
        let form = as_form(Form::from_components(vec![root(2), -root(5)], Rational::zero()));
        assert_eq!(form.to_string(), "sqrt(2) - sqrt(5)");
    }
}
