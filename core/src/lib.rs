//! Sandboxed arithmetic expression evaluator.
//!
//! `tally-core` turns a text expression such as `sin(pi / 2) + 2 ** -1` into
//! a number while never executing anything beyond a fixed set of arithmetic
//! operators and math functions. The pipeline is:
//!
//! 1. [`parser`]: a `pest` grammar and Pratt parser build an arena-allocated
//!    tree, after a lexical pre-scan has bounded the nesting depth;
//! 2. [`validator`]: a default-deny walk accepts only numbers, arithmetic
//!    operators, tuples, and names bound in the [`registry`];
//! 3. [`evaluator`]: a tree walk with Python-compatible numeric semantics.
//!
//! ```
//! use tally_core::{evaluate, values::Value};
//!
//! assert_eq!(evaluate("7 // 2").unwrap(), Value::int(3));
//! assert_eq!(evaluate("7 / 2").unwrap(), Value::float(3.5));
//! assert!(evaluate("__import__('os').system('ls')").is_err());
//! ```

// pest_derive without its `std` feature generates `::alloc` paths.
extern crate alloc;

pub mod api;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod validator;
pub mod values;

pub use api::{DEFAULT_MAX_DEPTH, Engine, EngineOptions, ErrorKind, EvalError};
pub use values::{Number, Value};

/// Evaluate `source` with the default options and the standard registry.
pub fn evaluate(source: &str) -> Result<Value, EvalError> {
    Engine::default().evaluate(source)
}

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_rejection() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_with_logging() {
        test_utils::init_test_logging();
        assert_eq!(evaluate("1 + 2 * 3"), Ok(Value::int(7)));
        assert!(evaluate("x").is_err());
    }
}
