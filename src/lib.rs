//! Tally - a sandboxed arithmetic expression evaluator
//!
//! # Overview
//!
//! Tally evaluates calculator input such as `sin(pi / 2) + 7 // 2` and
//! guarantees that nothing beyond a fixed set of arithmetic operators and
//! math functions ever runs. Expressions are parsed into a tree, checked
//! against an allow-list of syntactic forms and a closed registry of names,
//! and only then evaluated.
//!
//! Numbers behave the way they do in a Python calculator: integers stay exact
//! at any size (`7 // 2` is `3`, `2 ** 64` is `18446744073709551616`), `/`
//! always yields a float (`7 / 2` is `3.5`), and
//! failures carry Python's messages (`division by zero`,
//! `math domain error`).
//!
//! # Quick Start
//!
//! ```
//! use tally::{evaluate, Value};
//!
//! assert_eq!(evaluate("1 + 2 * 3").unwrap(), Value::int(7));
//! assert_eq!(evaluate("2 ** -1").unwrap(), Value::float(0.5));
//! assert_eq!(evaluate("factorial(25)").unwrap().to_string(), "15511210043330985984000000");
//! assert_eq!(evaluate("1, 2").unwrap().to_string(), "(1, 2)");
//!
//! let err = evaluate("foo(1)").unwrap_err();
//! assert_eq!(err.to_string(), "Use of function 'foo' is not allowed");
//! ```
//!
//! # Custom Registries
//!
//! Hosts can evaluate against their own set of names:
//!
//! ```
//! use tally::{Engine, EngineOptions, Value};
//! use tally::registry::{Arity, Registry};
//! use tally::values::Number;
//! use tally::RuntimeError;
//!
//! fn double(args: &[Number]) -> Result<Number, RuntimeError> {
//!     Ok(Number::Float(args[0].as_f64() * 2.0))
//! }
//!
//! let registry = Registry::builder()
//!     .constant("rate", 0.25)
//!     .function("double", Arity::Exact(1), double)
//!     .build();
//!
//! let engine = Engine::with_registry(EngineOptions::default(), &registry);
//! assert_eq!(engine.evaluate("double(rate)").unwrap(), Value::float(0.5));
//! ```

mod error_renderer;

// Re-export public API from tally_core
pub use tally_core::api::{DEFAULT_MAX_DEPTH, Engine, EngineOptions, ErrorKind, EvalError};
pub use tally_core::evaluate;

// Re-export commonly used types and values
pub use tally_core::parser::{self, Span};
pub use tally_core::registry;
pub use tally_core::values::{self, Number, Value};

// Re-export errors
pub use tally_core::evaluator::RuntimeError;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
