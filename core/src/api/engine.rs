//! The Tally evaluation engine.

use bumpalo::Bump;
use tracing::debug;

use super::{EngineOptions, EvalError};
use crate::{
    evaluator,
    parser::{self, ParsedExpr},
    registry::Registry,
    validator::{self, Validated},
    values::Value,
};

/// Parses, validates and evaluates expressions against a registry.
///
/// The engine holds no per-expression state: every call to
/// [`Engine::evaluate`] allocates its tree in a fresh arena that is dropped
/// before the call returns. An engine can be shared between threads.
///
/// # Lifetimes
///
/// - `'r`: Lifetime of the registry. Engines built with [`Engine::new`] use
///   the process-wide standard registry and are `Engine<'static>`.
///
/// # Example
///
/// ```
/// use tally_core::api::{Engine, EngineOptions};
/// use tally_core::values::Value;
///
/// let engine = Engine::new(EngineOptions::default());
/// assert_eq!(engine.evaluate("1 + 2 * 3").unwrap(), Value::int(7));
/// assert!(engine.evaluate("__import__('os')").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Engine<'r> {
    registry: &'r Registry,
    options: EngineOptions,
}

impl Engine<'static> {
    /// Create an engine over the standard registry.
    pub fn new(options: EngineOptions) -> Self {
        Self::with_registry(options, Registry::standard())
    }
}

impl Default for Engine<'static> {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl<'r> Engine<'r> {
    /// Create an engine over a custom registry.
    ///
    /// # Example
    ///
    /// ```
    /// use tally_core::api::{Engine, EngineOptions};
    /// use tally_core::registry::Registry;
    /// use tally_core::values::Value;
    ///
    /// let registry = Registry::builder().constant("answer", 42).build();
    /// let engine = Engine::with_registry(EngineOptions::default(), &registry);
    /// assert_eq!(engine.evaluate("answer // 2").unwrap(), Value::int(21));
    /// assert!(engine.evaluate("pi").is_err());
    /// ```
    pub fn with_registry(options: EngineOptions, registry: &'r Registry) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Parse `source` into a raw tree without validating it.
    ///
    /// The tree may contain constructs that would be rejected; use it for
    /// inspection only.
    pub fn parse<'a>(&self, arena: &'a Bump, source: &'a str) -> Result<ParsedExpr<'a>, EvalError> {
        let parsed = parser::parse_with_max_depth(arena, source, self.options.max_depth)?;
        debug!(source, "Parsed expression");
        Ok(parsed)
    }

    /// Check a parsed tree against the allow-list and this engine's registry.
    pub fn validate<'a>(&self, parsed: ParsedExpr<'a>) -> Result<Validated<'a>, EvalError> {
        validator::validate(self.registry, parsed, self.options.max_depth)
    }

    /// Evaluate `source` to a number or a tuple of numbers.
    pub fn evaluate(&self, source: &str) -> Result<Value, EvalError> {
        let arena = Bump::new();
        let parsed = self.parse(&arena, source)?;
        let validated = self.validate(parsed)?;
        let value = evaluator::eval_with_limits(self.registry, validated, self.options.max_depth)
            .inspect_err(|e| debug!(error = %e, "Evaluation failed"))?;
        debug!(%value, "Evaluated expression");
        Ok(value)
    }
}
