//! Public API for the Tally expression evaluator.
//!
//! An [`Engine`] runs the whole pipeline: depth pre-scan, parsing,
//! allow-list validation and evaluation. Every stage reports failures as an
//! [`EvalError`].
//!
//! # Example
//!
//! ```
//! use tally_core::api::{Engine, EngineOptions, ErrorKind};
//!
//! let engine = Engine::new(EngineOptions::default());
//!
//! let value = engine.evaluate("sqrt(16) + 1").unwrap();
//! assert_eq!(value.to_string(), "5.0");
//!
//! let err = engine.evaluate("foo(1)").unwrap_err();
//! assert!(matches!(err.kind(), ErrorKind::UnknownFunction { .. }));
//! assert_eq!(err.to_string(), "Use of function 'foo' is not allowed");
//! ```

pub mod engine;
pub mod error;
pub mod options;

pub use engine::Engine;
pub use error::{ErrorKind, EvalError};
pub use options::{DEFAULT_MAX_DEPTH, EngineOptions};
