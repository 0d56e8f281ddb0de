//! Property-based tests for canonical surd arithmetic.

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use num_traits::One;
    use proptest::prelude::*;
    use surdix_integers::{Integer, Rational};

    use crate::{Expression, Form, Ratio};

    const RADICANDS: [i64; 6] = [2, 3, 5, 6, 7, 12];
    const WIDE_PRIMES: [i64; 7] = [2, 3, 5, 7, 11, 13, 17];

    fn small_int() -> impl Strategy<Value = i64> {
        -20i64..20i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-20i64..=-1i64), (1i64..=20i64)]
    }

    fn radical() -> impl Strategy<Value = Expression> {
        (non_zero_int(), 0..RADICANDS.len()).prop_map(|(scale, index)| {
            Expression::from(RADICANDS[index]).sqrt().unwrap() * scale
        })
    }

    // Strategy for `a + b * sqrt(p) + c * sqrt(q)` with small coefficients
    fn surd_sum() -> impl Strategy<Value = Expression> {
        (small_int(), radical(), radical()).prop_map(|(tail, first, second)| first + second + tail)
    }

    // `scale * sqrt(a + b * sqrt(c))` with `a^2 > b^2 * c`, so the radicand is positive
    fn nested_radical() -> impl Strategy<Value = Expression> {
        (non_zero_int(), -3i64..=3i64, 0..3usize, 0i64..4i64).prop_map(
            |(scale, b, index, offset)| {
                let c = [2i64, 3, 5][index];
                let a = b.abs() * c + offset + 1;
                let inner = Expression::from(c).sqrt().unwrap() * b + a;
                inner.sqrt().unwrap() * scale
            },
        )
    }

    fn nested_sum() -> impl Strategy<Value = Expression> {
        (nested_radical(), radical(), small_int()).prop_map(|(nested, flat, tail)| nested + flat + tail)
    }

    // Seven independent radicals, past what inversion rationalizes
    fn wide_form() -> impl Strategy<Value = Expression> {
        (prop::collection::vec(1i64..4, WIDE_PRIMES.len()), -5i64..5).prop_map(
            |(scales, tail)| {
                WIDE_PRIMES
                    .iter()
                    .zip(scales)
                    .map(|(&prime, scale)| Expression::from(prime).sqrt().unwrap() * scale)
                    .sum::<Expression>()
                    + tail
            },
        )
    }

    fn ratio() -> impl Strategy<Value = Expression> {
        (surd_sum(), wide_form())
            .prop_map(|(numerator, denominator)| Ratio::from_components(numerator, denominator).unwrap())
    }

    fn hash_of(value: &Expression) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    proptest! {
        #[test]
        fn addition_is_commutative_and_associative(
            a in surd_sum(),
            b in surd_sum(),
            c in surd_sum(),
        ) {
            prop_assert_eq!(&a + &b, &b + &a);
            let left = &(&a + &b) + &c;
            let right = &a + &(&b + &c);
            prop_assert_eq!(hash_of(&left), hash_of(&right));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn multiplication_distributes(a in surd_sum(), b in surd_sum(), c in radical()) {
            let product = &a * &(&b + &c);
            prop_assert_eq!(product, &(&a * &b) + &(&a * &c));
            prop_assert_eq!(&a * &b, &b * &a);
        }

        #[test]
        fn subtraction_cancels(a in surd_sum()) {
            prop_assert!((&a - &a).is_zero());
            prop_assert_eq!(&(&a + &a) - &a, a);
        }

        #[test]
        fn sqrt_round_trip(n in 0i64..10_000, d in 1i64..100) {
            let value = Expression::from(Rational::from_i64(n, d));
            prop_assert_eq!(value.sqrt().unwrap().square(), value);
        }

        #[test]
        fn sqrt_of_square_is_abs(a in non_zero_int(), b in non_zero_int(), index in 0..3usize) {
            let prime = [2i64, 3, 5][index];
            let value = Expression::from(prime).sqrt().unwrap() * b + a;
            prop_assert_eq!(value.square().sqrt().unwrap(), value.abs());
        }

        #[test]
        fn ordering_is_antisymmetric_and_matches_sign(a in surd_sum(), b in surd_sum()) {
            let order = a.cmp(&b);
            prop_assert_eq!(b.cmp(&a), order.reverse());
            prop_assert_eq!((&a - &b).signum().cmp(&0), order);
            prop_assert_eq!(order == Ordering::Equal, a == b);
        }

        #[test]
        fn ordering_agrees_with_evaluation(a in surd_sum(), b in surd_sum()) {
            let difference = a.evaluate(Some(f64::sqrt)) - b.evaluate(Some(f64::sqrt));
            if difference.abs() > 1e-6 {
                prop_assert_eq!(a > b, difference > 0.0);
            }
        }

        #[test]
        fn inverse_is_exact(a in surd_sum()) {
            prop_assume!(!a.is_zero());
            let inverse = a.inverse().unwrap();
            prop_assert_eq!(&a * &inverse, Expression::one());
        }

        #[test]
        fn division_undoes_multiplication(a in surd_sum(), b in surd_sum()) {
            prop_assume!(!b.is_zero());
            prop_assert_eq!(&(&a / &b) * &b, a);
        }

        #[test]
        fn construction_is_idempotent(a in surd_sum()) {
            if let Expression::Form(form) = &a {
                let rebuilt = Form::from_components(form.terms().to_vec(), form.tail().clone());
                prop_assert_eq!(hash_of(&rebuilt), hash_of(&a));
                prop_assert_eq!(rebuilt, a);
            }
        }

        #[test]
        fn floor_and_ceil_bracket(a in surd_sum()) {
            let floor = a.floor().unwrap();
            let ceil = a.ceil().unwrap();
            prop_assert!(Expression::from(floor.clone()) <= a);
            prop_assert!(a < Expression::from(&floor + &Integer::one()));
            prop_assert!(Expression::from(ceil.clone()) >= a);
            prop_assert!(&ceil - &floor <= Integer::one());
            let rounded = a.round().unwrap();
            prop_assert!(rounded == floor || rounded == ceil);
        }

        #[test]
        fn bounds_bracket_the_value(a in surd_sum()) {
            let lower = a.lower_bound().unwrap();
            let upper = a.upper_bound().unwrap();
            prop_assert!(Expression::from(lower) <= a);
            prop_assert!(Expression::from(upper) >= a);
        }
    }
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn nested_values_hash_like_equal_values(a in nested_sum(), b in nested_sum()) {
            let sum = &a + &b;
            prop_assert_eq!(hash_of(&sum), hash_of(&(&b + &a)));
            let restored = &sum - &b;
            prop_assert_eq!(hash_of(&restored), hash_of(&a));
            prop_assert_eq!(restored, a);
        }

        #[test]
        fn nested_ordering_is_total(a in nested_sum(), b in nested_sum()) {
            let order = a.cmp(&b);
            prop_assert_eq!(b.cmp(&a), order.reverse());
            prop_assert_eq!(order == Ordering::Equal, a == b);
            let difference = a.evaluate(Some(f64::sqrt)) - b.evaluate(Some(f64::sqrt));
            if difference.abs() > 1e-6 {
                prop_assert_eq!(order, if difference > 0.0 { Ordering::Greater } else { Ordering::Less });
            }
        }

        #[test]
        fn nested_sqrt_of_square_is_abs(a in nested_radical()) {
            prop_assert_eq!(a.square().sqrt().unwrap(), a.abs());
        }

        #[test]
        fn nested_inverse_is_exact(a in nested_sum()) {
            prop_assume!(!a.is_zero());
            prop_assert_eq!(&a * &a.inverse().unwrap(), Expression::one());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn wide_inverse_is_exact(form in wide_form()) {
            let inverse = form.inverse().unwrap();
            prop_assert!(inverse.is_positive());
            prop_assert_eq!(&form * &inverse, Expression::one());
            prop_assert_eq!(inverse.inverse().unwrap(), form);
        }

        #[test]
        fn ratios_hash_like_equal_values(numerator in surd_sum(), denominator in wide_form()) {
            prop_assume!(!numerator.is_zero());
            let ratio = Ratio::from_components(numerator.clone(), denominator.clone()).unwrap();
            let product = &numerator * &denominator.inverse().unwrap();
            prop_assert_eq!(&ratio, &product);
            prop_assert_eq!(hash_of(&ratio), hash_of(&product));
            prop_assert_eq!(&ratio * &denominator, numerator);
        }

        #[test]
        fn ratio_ordering_agrees_with_evaluation(r in ratio(), b in surd_sum()) {
            let order = r.cmp(&b);
            prop_assert_eq!(b.cmp(&r), order.reverse());
            let difference = r.evaluate(Some(f64::sqrt)) - b.evaluate(Some(f64::sqrt));
            if difference.abs() > 1e-6 {
                prop_assert_eq!(order, if difference > 0.0 { Ordering::Greater } else { Ordering::Less });
            }
            let lower = r.lower_bound().unwrap();
            let upper = r.upper_bound().unwrap();
            prop_assert!(Expression::from(lower) <= r);
            prop_assert!(Expression::from(upper) >= r);
        }
    }
}
