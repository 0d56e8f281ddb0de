//! Property-based tests for the exact integer helpers.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::roots::{
        perfect_sqrt, rational_sqrt_lower_bound, rational_sqrt_upper_bound, sqrt_ceil,
        sqrt_floor, to_square_free,
    };
    use crate::{Integer, Rational};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating positive integers
    fn positive_int() -> impl Strategy<Value = i64> {
        1i64..100_000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn sqrt_floor_brackets(a in 0i64..i64::MAX) {
            let value = Integer::new(a);
            let root = sqrt_floor(&value);
            let next = &root + &Integer::one();
            prop_assert!(&root * &root <= value);
            prop_assert!(&next * &next > value);
        }

        #[test]
        fn sqrt_floor_brackets_big(a in 1i64..i64::MAX, b in 0i64..i64::MAX) {
            let value = Integer::new(a) * Integer::new(a) * Integer::new(a) + Integer::new(b);
            let root = sqrt_floor(&value);
            let next = &root + &Integer::one();
            prop_assert!(&root * &root <= value);
            prop_assert!(&next * &next > value);
        }

        #[test]
        fn sqrt_ceil_brackets(a in 0i64..1_000_000_000i64) {
            let value = Integer::new(a);
            let root = sqrt_ceil(&value);
            prop_assert!(&root * &root >= value);
            if !root.is_zero() {
                let previous = &root - &Integer::one();
                prop_assert!(&previous * &previous < value);
            }
        }

        #[test]
        fn perfect_squares_are_recognized(a in 0i64..1_000_000i64) {
            let root = Integer::new(a);
            prop_assert_eq!(perfect_sqrt(&(&root * &root)), Some(root));
        }

        #[test]
        fn square_free_part_divides_and_is_square_free(a in positive_int()) {
            let value = Integer::new(a);
            let kernel = to_square_free(&value);
            prop_assert!((&value % &kernel).is_zero());
            let cofactor = &value / &kernel;
            prop_assert!(perfect_sqrt(&cofactor).is_some());
            prop_assert_eq!(to_square_free(&kernel), kernel);
        }

        #[test]
        fn rational_sqrt_bounds_bracket(n in positive_int(), d in positive_int()) {
            let value = Rational::from_i64(n, d);
            let lower = rational_sqrt_lower_bound(&value);
            let upper = rational_sqrt_upper_bound(&value);
            prop_assert!(&lower * &lower <= value);
            prop_assert!(&upper * &upper >= value);
            prop_assert!(&upper - &lower <= Rational::new(Integer::one(), value.denominator()));
        }

        #[test]
        fn floor_ceil_bracket(n in small_int(), d in non_zero_int()) {
            let value = Rational::from_i64(n, d);
            let floor = Rational::from_integer(value.floor());
            let ceil = Rational::from_integer(value.ceil());
            prop_assert!(floor <= value);
            prop_assert!(value < &floor + &Rational::one());
            prop_assert!(ceil >= value);
            prop_assert!(value > &ceil - &Rational::one());
        }

        #[test]
        fn div_floor_matches_rational_floor(a in small_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            prop_assert_eq!(a.div_floor(&b), Rational::new(a.clone(), b.clone()).floor());
        }

        #[test]
        fn gcd_lcm_product(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            prop_assert_eq!(a.gcd(&b) * a.lcm(&b), (&a * &b).abs());
        }

        #[test]
        fn float_round_trip(x in -1.0e12f64..1.0e12f64) {
            let exact = Rational::from_f64(x).unwrap();
            prop_assert_eq!(exact.to_f64(), x);
        }

        #[test]
        fn rational_add_commutative(a in small_int(), b in non_zero_int(), c in small_int(), d in non_zero_int()) {
            let x = Rational::from_i64(a, b);
            let y = Rational::from_i64(c, d);
            prop_assert_eq!(&x + &y, &y + &x);
        }

        #[test]
        fn rational_mul_inverse(a in non_zero_int(), b in non_zero_int()) {
            let x = Rational::from_i64(a, b);
            prop_assert_eq!(&x * &x.recip(), Rational::one());
        }
    }
}
