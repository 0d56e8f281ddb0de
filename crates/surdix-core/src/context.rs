//! The process-wide approximate square root used by evaluation.
//!
//! Nothing exact reads this slot; it only affects [`Expression::evaluate`].
//!
//! [`Expression::evaluate`]: crate::Expression::evaluate

use std::sync::{PoisonError, RwLock};

/// Approximate square root of a non-negative float.
pub type SqrtEvaluator = fn(f64) -> f64;

fn float_sqrt(value: f64) -> f64 {
    value.sqrt()
}

static SQRT_EVALUATOR: RwLock<SqrtEvaluator> = RwLock::new(float_sqrt);

/// The current default evaluator, `f64::sqrt` unless replaced.
#[must_use]
pub fn get_sqrt_evaluator() -> SqrtEvaluator {
    // a plain fn pointer cannot be left half-written, so poisoning is moot
    *SQRT_EVALUATOR.read().unwrap_or_else(PoisonError::into_inner)
}

/// Replaces the default evaluator and returns the previous one.
pub fn set_sqrt_evaluator(evaluator: SqrtEvaluator) -> SqrtEvaluator {
    let mut slot = SQRT_EVALUATOR
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, evaluator)
}
