//! Tree-walking evaluator for validated expressions.
//!
//! The evaluator reduces a [`Validated`] tree to a [`Value`]: a number, or a
//! tuple of values when the expression is a comma list.
//!
//! ## Design Principles
//!
//! - **Never panic**: numeric failures become [`RuntimeError`]s carrying the
//!   span of the failing node
//! - **Stack-safe**: depth tracking bounds recursion on deep trees
//! - **Pure**: no state survives a call; the registry is only read
//!
//! ## Example
//!
//! ```
//! use tally_core::{evaluator, parser, registry::Registry, validator};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let registry = Registry::standard();
//!
//! let parsed = parser::parse(&arena, "1 + 2").unwrap();
//! let validated = validator::validate(registry, parsed, 100).unwrap();
//!
//! let result = evaluator::eval(registry, validated).unwrap();
//! assert_eq!(result.as_int(), Some(3));
//! ```

mod error;
mod eval;
mod operators;

#[cfg(test)]
mod eval_test;

pub use error::RuntimeError;
pub use eval::Evaluator;

use crate::{
    api::{DEFAULT_MAX_DEPTH, EvalError},
    registry::Registry,
    validator::Validated,
    values::Value,
};

/// Options controlling evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatorOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Evaluate a validated expression with the default depth limit.
pub fn eval(registry: &Registry, validated: Validated<'_>) -> Result<Value, EvalError> {
    eval_with_limits(registry, validated, DEFAULT_MAX_DEPTH)
}

/// Evaluate a validated expression with a custom depth limit.
///
/// `registry` should be the one `validated` was checked against; names it
/// does not bind fail with the same errors the validator reports.
pub fn eval_with_limits(
    registry: &Registry,
    validated: Validated<'_>,
    max_depth: usize,
) -> Result<Value, EvalError> {
    Evaluator::new(EvaluatorOptions { max_depth }, registry, validated).eval()
}
