//! Operator overloading for [`Expression`].
//!
//! The operators wrap the `checked_*` methods. Like integer division in
//! the standard library they panic where the exact result does not exist:
//! dividing by zero, `inf - inf`, `inf * 0`, or a NaN float operand.
//!
//! Native numbers (`i64`, [`Integer`], [`Rational`] and `f64`) are
//! accepted on either side and converted exactly; a float contributes its
//! exact binary value. A single primitive integer type keeps bare integer
//! literals unambiguous, so `sqrt2 + 1` infers `i64`.

use std::cmp::Ordering;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

use surdix_integers::{Integer, Rational};

use crate::error::Result;
use crate::expression::Expression;

impl Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        match self {
            Expression::Constant(constant) => Expression::Constant(-constant),
            Expression::Term(term) => Expression::Term(-term),
            Expression::Form(form) => Expression::Form(-form),
            Expression::Ratio(ratio) => Expression::Ratio(-ratio),
        }
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        match self {
            Self::Constant(constant) => Self::Constant(-constant),
            Self::Term(term) => Self::Term(-term),
            Self::Form(form) => Self::Form(-form),
            Self::Ratio(ratio) => Self::Ratio(-ratio),
        }
    }
}

fn exact(result: Result<Expression>) -> Expression {
    result.unwrap_or_else(|error| panic!("{error}"))
}

macro_rules! expression_binop {
    ($trait:ident, $method:ident, $checked:ident, $assign_trait:ident, $assign_method:ident) => {
        /// # Panics
        ///
        /// Panics where the checked counterpart returns an error.
        impl $trait<&Expression> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                exact(self.$checked(rhs))
            }
        }

        impl $trait<Expression> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                exact(self.$checked(&rhs))
            }
        }

        impl $trait<&Expression> for Expression {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                exact(self.$checked(rhs))
            }
        }

        impl $trait for Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                exact(self.$checked(&rhs))
            }
        }

        impl $assign_trait<&Expression> for Expression {
            fn $assign_method(&mut self, rhs: &Expression) {
                *self = exact(self.$checked(rhs));
            }
        }

        impl $assign_trait for Expression {
            fn $assign_method(&mut self, rhs: Expression) {
                *self = exact(self.$checked(&rhs));
            }
        }
    };
}

expression_binop!(Add, add, checked_add, AddAssign, add_assign);
expression_binop!(Sub, sub, checked_sub, SubAssign, sub_assign);
expression_binop!(Mul, mul, checked_mul, MulAssign, mul_assign);
expression_binop!(Div, div, checked_div, DivAssign, div_assign);

impl Rem<&Expression> for &Expression {
    type Output = Expression;

    /// # Panics
    ///
    /// Panics for a zero divisor or an infinite quotient.
    fn rem(self, rhs: &Expression) -> Expression {
        exact(self.checked_rem(rhs))
    }
}

impl Rem for Expression {
    type Output = Expression;

    fn rem(self, rhs: Expression) -> Expression {
        &self % &rhs
    }
}

/// Exact conversion of a native number, `None` for NaN.
trait NativeOperand {
    fn to_expression(&self) -> Option<Expression>;
}

impl NativeOperand for i64 {
    fn to_expression(&self) -> Option<Expression> {
        Some(Expression::from(*self))
    }
}

impl NativeOperand for Integer {
    fn to_expression(&self) -> Option<Expression> {
        Some(Expression::from(self.clone()))
    }
}

impl NativeOperand for Rational {
    fn to_expression(&self) -> Option<Expression> {
        Some(Expression::from_rational(self.clone()))
    }
}

impl NativeOperand for f64 {
    fn to_expression(&self) -> Option<Expression> {
        Expression::from_f64(*self).ok()
    }
}

fn operand<T: NativeOperand>(value: &T) -> Expression {
    value
        .to_expression()
        .unwrap_or_else(|| panic!("NaN is not a valid operand"))
}

macro_rules! native_binop {
    ($native:ty, $trait:ident, $method:ident) => {
        impl $trait<$native> for Expression {
            type Output = Expression;

            fn $method(self, rhs: $native) -> Expression {
                $trait::$method(&self, &operand(&rhs))
            }
        }

        impl $trait<$native> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: $native) -> Expression {
                $trait::$method(self, &operand(&rhs))
            }
        }

        impl $trait<Expression> for $native {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                $trait::$method(&operand(&self), &rhs)
            }
        }

        impl $trait<&Expression> for $native {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                $trait::$method(&operand(&self), rhs)
            }
        }
    };
}

macro_rules! native_operand {
    ($($native:ty),*) => {$(
        native_binop!($native, Add, add);
        native_binop!($native, Sub, sub);
        native_binop!($native, Mul, mul);
        native_binop!($native, Div, div);

        impl PartialEq<$native> for Expression {
            fn eq(&self, other: &$native) -> bool {
                other.to_expression().is_some_and(|other| *self == other)
            }
        }

        impl PartialEq<Expression> for $native {
            fn eq(&self, other: &Expression) -> bool {
                other == self
            }
        }

        impl PartialOrd<$native> for Expression {
            fn partial_cmp(&self, other: &$native) -> Option<Ordering> {
                other.to_expression().map(|other| self.cmp(&other))
            }
        }

        impl PartialOrd<Expression> for $native {
            fn partial_cmp(&self, other: &Expression) -> Option<Ordering> {
                other.partial_cmp(self).map(Ordering::reverse)
            }
        }
    )*};
}

native_operand!(i64, Integer, Rational, f64);

impl Sum for Expression {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |sum, value| sum + value)
    }
}

impl<'a> Sum<&'a Expression> for Expression {
    fn sum<I: Iterator<Item = &'a Expression>>(iter: I) -> Self {
        iter.fold(Self::zero(), |sum, value| sum + value)
    }
}

impl Product for Expression {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |product, value| product * value)
    }
}

impl<'a> Product<&'a Expression> for Expression {
    fn product<I: Iterator<Item = &'a Expression>>(iter: I) -> Self {
        iter.fold(Self::one(), |product, value| product * value)
    }
}
