//! Closed-form square roots of degree-one forms.
//!
//! Three identities are tried, most specific first:
//!
//! - a form without a tail whose radicands share a factor `g` is rewritten
//!   as `sqrt(g) * (form / sqrt(g))` and the quotient denested;
//! - `t + s * sqrt(a)` is matched against `(sqrt(x) + sqrt(y))^2` and, failing
//!   that, against `(sqrt(x * sqrt(a)) + sqrt(y * sqrt(a)))^2`;
//! - larger forms are split into a greater and a lesser part `G + L`, and
//!   with `A = G + sqrt(G^2 - L^2)` the root is `(L + A) / sqrt(2 * A)`.

use num_traits::{One, Zero};
use surdix_integers::{rational_sqrt_exact, to_square_free, Integer, Rational};
use tracing::debug;

use crate::error::{Result, SurdError};
use crate::expression::Expression;
use crate::form::Form;
use crate::term::Term;

impl Form {
    /// Square root of the form as an expression without the outer radical.
    ///
    /// # Errors
    ///
    /// Returns [`SurdError::Unsupported`] when the form has nested radicals
    /// or none of the denesting identities applies. This is an expected
    /// outcome for most forms; `sqrt` keeps such values as a term.
    pub fn perfect_sqrt(&self) -> Result<Expression> {
        if self.degree() != 1 {
            return Err(SurdError::Unsupported(format!(
                "square root of {self} with degree {}",
                self.degree()
            )));
        }
        let (denominator, integral) = self.extract_common_denominator();
        if !denominator.is_one() {
            // sqrt(f) == sqrt(f * d^2) / d
            let denominator = Rational::from_integer(denominator);
            return integral
                .scaled(&denominator)
                .perfect_sqrt()
                .map(|root| root.scale_by(&denominator.recip()));
        }
        let denested = if self.tail().is_zero() {
            self.denest_common_radical()
        } else if self.terms().len() == 1 {
            self.denest_binomial()
        } else {
            self.denest_by_split()
        };
        denested.ok_or_else(|| {
            SurdError::Unsupported(format!("no closed-form square root of {self}"))
        })
    }

    fn denest_common_radical(&self) -> Option<Expression> {
        let gcd = self
            .terms()
            .iter()
            .map(integer_argument)
            .try_fold(Integer::zero(), |gcd, argument| Some(gcd.gcd(&argument?)))?;
        if gcd.is_one() {
            return None;
        }
        let common = Term::from_components(Rational::one(), Expression::from(gcd));
        let normalized = Expression::Form(self.clone()).mul_finite(&common.reciprocal());
        let root = normalized.perfect_sqrt_part();
        if root.square() != normalized {
            return None;
        }
        debug!(form = %self, common = %common, "denested around a common radical");
        Some(Term::from_components(Rational::one(), common).mul_finite(&root))
    }

    fn denest_binomial(&self) -> Option<Expression> {
        let term = &self.terms()[0];
        let tail = self.tail();
        let scale = term.scale();
        let argument = term.argument().to_rational()?;
        let two = Rational::from(2);
        let discriminant = tail * tail - scale * scale * &argument;
        let (lesser, greater, lesser_positive) = if discriminant.is_positive() {
            // t + s * sqrt(a) == (sqrt((t - r) / 2) +- sqrt((t + r) / 2))^2
            if !tail.is_positive() {
                return None;
            }
            let root = rational_sqrt_exact(&discriminant)?;
            (
                Term::from_components(Rational::one(), Expression::from((tail - &root) / &two)),
                Term::from_components(Rational::one(), Expression::from((tail + &root) / &two)),
                scale.is_positive(),
            )
        } else {
            // t + s * sqrt(a) == (sqrt((s - r) / 2 * sqrt(a)) +- sqrt((s + r) / 2 * sqrt(a)))^2
            if !scale.is_positive() {
                return None;
            }
            let root = rational_sqrt_exact(&(-discriminant / &argument))?;
            let radical = Term::from_components(Rational::one(), Expression::from(argument));
            (
                Term::from_components(Rational::one(), radical.scale_by(&((scale - &root) / &two))),
                Term::from_components(Rational::one(), radical.scale_by(&((scale + &root) / &two))),
                tail.is_positive(),
            )
        };
        debug!(form = %self, "denested a binomial");
        let lesser = if lesser_positive { lesser } else { -lesser };
        Some(lesser.add_finite(&greater))
    }

    fn denest_by_split(&self) -> Option<Expression> {
        let (lesser, greater) = split_form(self)?;
        let discriminant = greater.square().sub_finite(&lesser.square());
        if !discriminant.is_positive() {
            return None;
        }
        let root = if discriminant.degree() == 0 {
            Term::from_components(Rational::one(), discriminant)
        } else {
            let root = discriminant.perfect_sqrt_part();
            if root.square() != discriminant {
                return None;
            }
            root
        };
        let addend = greater.add_finite(&root);
        let smaller = match &addend {
            Expression::Form(form) => form.components_count() < self.components_count(),
            _ => true,
        };
        if !smaller || !addend.is_positive() {
            return None;
        }
        let numerator = lesser.add_finite(&addend);
        if !numerator.is_positive() {
            return None;
        }
        let denominator =
            Term::from_components(Rational::one(), addend.scale_by(&Rational::from(2)));
        debug!(form = %self, addend = %addend, "denested by splitting");
        Some(numerator.mul_finite(&denominator.reciprocal()))
    }
}

fn integer_argument(term: &Term) -> Option<Integer> {
    term.argument().to_rational()?.to_integer()
}

/// Splits a form with a tail into its lesser and greater parts.
///
/// Three-term forms give up their first term to the tail. Otherwise terms
/// whose square-free radicands share a common factor form the lesser part.
fn split_form(form: &Form) -> Option<(Expression, Expression)> {
    let terms = form.terms();
    if terms.len() == 3 {
        let lesser = Form::from_components(terms[1..].to_vec(), Rational::zero());
        let greater = Form::from_components(vec![terms[0].clone()], form.tail().clone());
        return Some((lesser, greater));
    }
    let mut keyed = terms
        .iter()
        .map(|term| Some((to_square_free(&integer_argument(term)?), term)))
        .collect::<Option<Vec<_>>>()?;
    keyed.sort_by(|left, right| left.0.cmp(&right.0));
    let surds: Vec<Integer> = keyed.iter().map(|(surd, _)| surd.clone()).collect();
    let (cocomposite, coprime) = split_integers(&surds);
    let pick = |indices: &[usize]| -> Vec<Term> {
        indices.iter().map(|&index| keyed[index].1.clone()).collect()
    };
    let lesser = Form::from_components(pick(&cocomposite), Rational::zero());
    let greater = Form::from_components(pick(&coprime), form.tail().clone());
    if lesser.is_zero() {
        return None;
    }
    Some((lesser, greater))
}

/// Indices of values sharing a running common factor, and of the rest.
///
/// When every value shares the factor, it is divided out and the split
/// repeated once.
fn split_integers(values: &[Integer]) -> (Vec<usize>, Vec<usize>) {
    let (gcd, cocomposite, coprime) = split_integers_by_gcd(values);
    if !coprime.is_empty() {
        return (cocomposite, coprime);
    }
    let reduced: Vec<Integer> = values.iter().map(|value| value / &gcd).collect();
    let (_, cocomposite, coprime) = split_integers_by_gcd(&reduced);
    (cocomposite, coprime)
}

fn split_integers_by_gcd(values: &[Integer]) -> (Integer, Vec<usize>, Vec<usize>) {
    let (mut cocomposite, mut coprime, mut gcd, start) = if values[0].is_one() {
        (vec![1], vec![0], values[1].clone(), 2)
    } else {
        (vec![0], Vec::new(), values[0].clone(), 1)
    };
    for (index, value) in values.iter().enumerate().skip(start) {
        let value_gcd = gcd.gcd(value);
        if value_gcd.is_one() {
            coprime.push(index);
        } else {
            gcd = value_gcd;
            cocomposite.push(index);
        }
    }
    (gcd, cocomposite, coprime)
}
