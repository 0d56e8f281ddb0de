//! Exact inversion of forms by eliminating radicals one at a time.
//!
//! A [`Factorization`] views a form as a polynomial whose indeterminates
//! are [`Factor`]s, irreducible radical axes satisfying
//! `factor^2 == factor.square()`, an expression of lower degree. It is
//! stored as a tree: every key of a node is greater than all keys of its
//! subtree, so a path from the root lists the factors of one monomial in
//! descending order.
//!
//! Inverting `D` pops the greatest factor `f` with cofactor `M` and rest
//! `R`, multiplies the numerator by the conjugate `R - f * M` and replaces
//! the denominator by `R^2 - f^2 * M^2`, which no longer mentions `f`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use num_traits::{One, Zero};
use surdix_integers::{Integer, Rational};
use tracing::trace;

use crate::expression::Expression;
use crate::form::{sift, Form};
use crate::term::Term;

/// Largest numerator, in monomials, for which the inverse of a form is
/// rationalized; past it the inverse stays a ratio.
pub const RATIONALIZATION_LIMIT: usize = 32;

/// The positive square root of `square`, used as an indeterminate.
#[derive(Clone, Debug)]
pub struct Factor {
    square: Expression,
    degree: usize,
}

impl Factor {
    /// `argument` under `nesting` nested square roots.
    fn nested(argument: Expression, nesting: usize) -> Self {
        let mut square = argument;
        for _ in 1..nesting {
            square = Term::from_components(Rational::one(), square);
        }
        let degree = square.degree() + 1;
        Self { square, degree }
    }

    /// The value of the factor squared.
    #[must_use]
    pub fn square(&self) -> &Expression {
        &self.square
    }

    /// Nesting depth of the radical.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The factor as an expression.
    #[must_use]
    pub fn express(&self) -> Expression {
        Term::from_components(Rational::one(), self.square.clone())
    }
}

impl PartialEq for Factor {
    fn eq(&self, other: &Self) -> bool {
        self.degree == other.degree && self.square == other.square
    }
}

impl Eq for Factor {}

impl Ord for Factor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree
            .cmp(&other.degree)
            .then_with(|| self.square.cmp(&other.square))
    }
}

impl PartialOrd for Factor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sqrt({})", self.square)
    }
}

/// The factors whose product, times the outer scale, is `term`.
fn term_factors(term: &Term) -> Vec<Factor> {
    let mut factors = Vec::new();
    let mut nesting = 0;
    let mut current = term;
    loop {
        if nesting > 0 && !current.scale().is_one() {
            factors.push(Factor::nested(Expression::from(current.scale().clone()), nesting));
        }
        match current.argument() {
            Expression::Term(inner) => {
                nesting += 1;
                current = inner;
            }
            Expression::Form(form) => {
                let (content, primitive) = form.primitive();
                if !content.is_one() {
                    factors.push(Factor::nested(Expression::from(content), nesting + 1));
                }
                factors.push(Factor::nested(Expression::Form(primitive), nesting + 1));
                return factors;
            }
            argument => {
                factors.push(Factor::nested(argument.clone(), nesting + 1));
                return factors;
            }
        }
    }
}

/// A form as a tree of factors with rational leaves.
#[derive(Clone, Debug, Default)]
pub struct Factorization {
    factors: BTreeMap<Factor, Factorization>,
    tail: Rational,
}

type Monomial = (Vec<Factor>, Rational);

impl Factorization {
    /// A rational constant.
    #[must_use]
    pub fn constant(value: Rational) -> Self {
        Self {
            factors: BTreeMap::new(),
            tail: value,
        }
    }

    /// A single factor.
    #[must_use]
    pub fn from_factor(factor: Factor) -> Self {
        if let Some(value) = factor.express().to_rational() {
            return Self::constant(value);
        }
        let mut factors = BTreeMap::new();
        factors.insert(factor, Self::constant(Rational::one()));
        Self {
            factors,
            tail: Rational::zero(),
        }
    }

    /// Factor tree of a single term.
    #[must_use]
    pub fn from_term(term: &Term) -> Self {
        term_factors(term)
            .into_iter()
            .fold(Self::constant(term.scale().clone()), |product, factor| {
                product.multiply(&Self::from_factor(factor))
            })
    }

    /// Factor tree of a form, one branch per term plus the rational tail.
    #[must_use]
    pub fn from_form(form: &Form) -> Self {
        let mut result = Self::constant(form.tail().clone());
        for term in form.terms() {
            result.add_assign(&Self::from_term(term));
        }
        result
    }

    /// Factorization of a finite expression other than a ratio.
    ///
    /// # Panics
    ///
    /// Panics on ratios and infinities, which have no polynomial view.
    #[must_use]
    pub fn from_expression(expression: &Expression) -> Self {
        match expression {
            Expression::Constant(constant) => Self::constant(
                constant
                    .to_rational()
                    .unwrap_or_else(|| panic!("infinite value {constant} has no factorization")),
            ),
            Expression::Term(term) => Self::from_term(term),
            Expression::Form(form) => Self::from_form(form),
            Expression::Ratio(ratio) => panic!("ratio {ratio} has no factorization"),
        }
    }

    /// The rational part.
    #[must_use]
    pub fn tail(&self) -> &Rational {
        &self.tail
    }

    /// Returns true when no irrational factor is left.
    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.factors.is_empty()
    }

    /// Returns true when there are no factors and no tail.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.factors.is_empty() && self.tail.is_zero()
    }

    /// Number of monomials.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(!self.tail.is_zero()) + self.factors.values().map(Self::len).sum::<usize>()
    }

    /// Alias of [`Factorization::is_zero`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_zero()
    }

    /// Removes the greatest factor and returns it with its cofactor.
    pub fn pop_max(&mut self) -> Option<(Factor, Self)> {
        self.factors.pop_last()
    }

    fn monomials(&self) -> Vec<Monomial> {
        let mut monomials = Vec::new();
        self.collect_monomials(&mut Vec::new(), &mut monomials);
        monomials
    }

    fn collect_monomials(&self, path: &mut Vec<Factor>, monomials: &mut Vec<Monomial>) {
        if !self.tail.is_zero() {
            monomials.push((path.clone(), self.tail.clone()));
        }
        for (factor, child) in &self.factors {
            path.push(factor.clone());
            child.collect_monomials(path, monomials);
            path.pop();
        }
    }

    /// Adds `coefficient` times the product of `path`, given in descending
    /// order, pruning branches that cancel out.
    fn insert(&mut self, path: &[Factor], coefficient: Rational) {
        let Some((first, rest)) = path.split_first() else {
            self.tail = &self.tail + &coefficient;
            return;
        };
        let vanished = {
            let child = self.factors.entry(first.clone()).or_default();
            child.insert(rest, coefficient);
            child.is_zero()
        };
        if vanished {
            self.factors.remove(first);
        }
    }

    /// Adds `other` in place, merging equal factor paths.
    pub fn add_assign(&mut self, other: &Self) {
        for (path, coefficient) in other.monomials() {
            self.insert(&path, coefficient);
        }
    }

    /// Difference of two trees.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.add_assign(&other.scale(&-Rational::one()));
        result
    }

    /// Every coefficient multiplied by `factor`.
    #[must_use]
    pub fn scale(&self, factor: &Rational) -> Self {
        if factor.is_zero() {
            return Self::default();
        }
        Self {
            factors: self
                .factors
                .iter()
                .map(|(key, child)| (key.clone(), child.scale(factor)))
                .collect(),
            tail: &self.tail * factor,
        }
    }

    /// Product, reducing repeated factors through their squares.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::default();
        let right = other.monomials();
        for (left_path, left_coefficient) in self.monomials() {
            for (right_path, right_coefficient) in &right {
                let coefficient = &left_coefficient * right_coefficient;
                let (path, repeated) = merge_paths(&left_path, right_path);
                if repeated.is_empty() {
                    result.insert(&path, coefficient);
                    continue;
                }
                let mut product = Self::default();
                product.insert(&path, coefficient);
                for factor in repeated {
                    product = product.multiply(&Self::from_expression(factor.square()));
                }
                result.add_assign(&product);
            }
        }
        result
    }

    /// Product of the tree with itself.
    #[must_use]
    pub fn square(&self) -> Self {
        self.multiply(self)
    }

    /// Sums the monomials back into a canonical expression.
    #[must_use]
    pub fn express(&self) -> Expression {
        let mut terms = Vec::new();
        let mut tail = Rational::zero();
        for (path, coefficient) in self.monomials() {
            let product = path
                .iter()
                .fold(Expression::from(coefficient), |product, factor| {
                    product.mul_finite(&factor.express())
                });
            sift(product, &mut terms, &mut tail);
        }
        Form::from_components(terms, tail)
    }
}

/// Merges two descending factor lists into distinct and repeated factors.
fn merge_paths(left: &[Factor], right: &[Factor]) -> (Vec<Factor>, Vec<Factor>) {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut repeated = Vec::new();
    let (mut left_index, mut right_index) = (0, 0);
    while left_index < left.len() && right_index < right.len() {
        match left[left_index].cmp(&right[right_index]) {
            Ordering::Greater => {
                merged.push(left[left_index].clone());
                left_index += 1;
            }
            Ordering::Less => {
                merged.push(right[right_index].clone());
                right_index += 1;
            }
            Ordering::Equal => {
                repeated.push(left[left_index].clone());
                left_index += 1;
                right_index += 1;
            }
        }
    }
    merged.extend_from_slice(&left[left_index..]);
    merged.extend_from_slice(&right[right_index..]);
    (merged, repeated)
}

enum Elimination {
    Inverted(Expression),
    OverBudget,
    /// A conjugate vanished, so the denominator collapsed to zero.
    Degenerate,
}

/// Exact inverse of a form with a rational denominator.
///
/// Returns `None` when the numerator grows past `limit` monomials.
pub(crate) fn rationalized_inverse(form: &Form, limit: Option<usize>) -> Option<Expression> {
    let (denominator, integral) = form.extract_common_denominator();
    match eliminate(&integral, &denominator, limit, false) {
        Elimination::Inverted(inverse) => Some(inverse),
        Elimination::OverBudget => None,
        Elimination::Degenerate => match eliminate(&integral, &denominator, limit, true) {
            Elimination::Inverted(inverse) => Some(inverse),
            Elimination::OverBudget | Elimination::Degenerate => None,
        },
    }
}

fn eliminate(
    form: &Form,
    denominator: &Integer,
    limit: Option<usize>,
    guarded: bool,
) -> Elimination {
    let mut numerator = Factorization::constant(Rational::from_integer(denominator.clone()));
    let mut remaining = Factorization::from_form(form);
    while let Some((factor, cofactor)) = remaining.pop_max() {
        let shifted = cofactor.multiply(&Factorization::from_factor(factor.clone()));
        let conjugate = remaining.sub(&shifted);
        if guarded && conjugate.express().is_zero() {
            // rest == factor * cofactor, so the denominator is twice the rest
            remaining = remaining.scale(&Rational::from(2));
            continue;
        }
        numerator = numerator.multiply(&conjugate);
        if limit.is_some_and(|limit| numerator.len() > limit) {
            return Elimination::OverBudget;
        }
        let eliminated = cofactor
            .square()
            .multiply(&Factorization::from_expression(factor.square()));
        remaining = remaining.square().sub(&eliminated);
        trace!(
            factor = %factor,
            numerator = numerator.len(),
            denominator = remaining.len(),
            "eliminated factor"
        );
    }
    if remaining.tail.is_zero() {
        return Elimination::Degenerate;
    }
    Elimination::Inverted(numerator.scale(&remaining.tail.recip()).express())
}
