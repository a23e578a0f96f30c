//! Public error type for the Tally API.
//!
//! Every stage (parsing, validation, evaluation) reports failures through
//! [`EvalError`]. Its `Display` is the stable message shown to users;
//! [`EvalError::kind`] and [`EvalError::span`] carry the distinction and
//! the location of the offending text.

use thiserror::Error;

use crate::evaluator::RuntimeError;
use crate::parser::{ParseError, ParseErrorKind, Span};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct EvalError {
    kind: ErrorKind,
    span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// The input does not conform to the grammar.
    #[error("Syntax error: {0}")]
    Syntax(ParseError),

    /// Nesting beyond the configured maximum, from any stage.
    #[error("Expression nesting depth exceeds maximum of {max_depth} levels")]
    DepthExceeded { max_depth: usize },

    /// A syntactic construct outside the allow-list.
    #[error("Disallowed expression or node: {kind}")]
    Disallowed { kind: &'static str },

    #[error("Use of name '{name}' is not allowed")]
    UnknownName { name: String },

    #[error("Use of function '{name}' is not allowed")]
    UnknownFunction { name: String },

    #[error("'{name}' is not callable")]
    NotCallable { name: String },

    /// A function name used where a number is expected, e.g. `sin + 1`.
    #[error("Function '{name}' cannot be used as a value")]
    FunctionAsValue { name: String },

    /// A call whose callee is not a bare identifier, e.g. `(1)(2)`.
    #[error("Only simple function calls allowed, found a call through a {callee}")]
    ComplexCall { callee: &'static str },

    /// A node kind the evaluator cannot reduce. Unreachable for validated
    /// expressions.
    #[error("Unsupported expression: {kind}")]
    Unsupported { kind: &'static str },

    /// Numeric failure during evaluation.
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl EvalError {
    pub fn new(kind: ErrorKind, span: Option<Span>) -> Self {
        Self { kind, span }
    }

    pub(crate) fn at(kind: ErrorKind, span: Span) -> Self {
        Self::new(kind, Some(span))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte range of the offending text, when known.
    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    /// Stable code for documentation lookup.
    pub fn code(&self) -> &'static str {
        match &self.kind {
            ErrorKind::Syntax(e) => e.code(),
            ErrorKind::DepthExceeded { .. } => "E001",
            ErrorKind::Disallowed { .. } => "E002",
            ErrorKind::UnknownName { .. } => "E003",
            ErrorKind::UnknownFunction { .. } => "E004",
            ErrorKind::NotCallable { .. } => "E005",
            ErrorKind::FunctionAsValue { .. } => "E006",
            ErrorKind::ComplexCall { .. } => "E007",
            ErrorKind::Unsupported { .. } => "E008",
            ErrorKind::Runtime(_) => "R001",
        }
    }

    /// Optional hint on how to fix the expression.
    pub fn help(&self) -> Option<&'static str> {
        match &self.kind {
            ErrorKind::Syntax(e) => e.help(),
            ErrorKind::DepthExceeded { .. } => Some("Reduce nesting or simplify the expression"),
            ErrorKind::Disallowed { .. } => {
                Some("Only numbers, arithmetic operators and math functions are allowed")
            }
            ErrorKind::UnknownName { .. } | ErrorKind::UnknownFunction { .. } => {
                Some("Available names are the math constants pi and e and the math functions")
            }
            ErrorKind::NotCallable { .. } => Some("Constants are used without parentheses"),
            ErrorKind::FunctionAsValue { .. } => Some("Call the function with arguments, e.g. sin(x)"),
            ErrorKind::ComplexCall { .. } => Some("Call functions by name, e.g. sqrt(2)"),
            ErrorKind::Unsupported { .. } | ErrorKind::Runtime(_) => None,
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self.kind, ErrorKind::Runtime(_))
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        let span = err.span.clone();
        let kind = match err.kind {
            ParseErrorKind::MaxDepthExceeded { max_depth, .. } => {
                ErrorKind::DepthExceeded { max_depth }
            }
            _ => ErrorKind::Syntax(err),
        };
        Self::at(kind, span)
    }
}
