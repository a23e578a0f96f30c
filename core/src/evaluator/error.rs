//! Numeric failures raised while evaluating a validated expression.
//!
//! Messages follow the wording of Python's arithmetic and `math` module so a
//! calculator front end can show them as they are.

use thiserror::Error;

use crate::registry::Arity;
use crate::values::MAX_INT_BITS;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Division, floor division or modulo by zero, or zero raised to a
    /// negative power.
    #[error("{message}")]
    DivisionByZero { message: &'static str },

    /// Argument outside the domain of the operation.
    #[error("{message}")]
    Domain { message: &'static str },

    /// Finite input whose float result does not fit.
    #[error("{message}")]
    Range { message: &'static str },

    /// Integer result larger than [`MAX_INT_BITS`](crate::values::MAX_INT_BITS).
    #[error("integer result exceeds {max_bits} bits")]
    IntegerTooLarge { max_bits: u64 },

    #[error("{name}() takes {expected} ({given} given)")]
    Arity {
        name: String,
        expected: Arity,
        given: usize,
    },

    /// Operand of the wrong type, e.g. a tuple given to `+`.
    #[error("{message}")]
    Type { message: String },
}

impl RuntimeError {
    pub(crate) fn domain() -> Self {
        RuntimeError::Domain {
            message: "math domain error",
        }
    }

    pub(crate) fn too_large() -> Self {
        RuntimeError::IntegerTooLarge {
            max_bits: MAX_INT_BITS,
        }
    }

    pub(crate) fn range() -> Self {
        RuntimeError::Range {
            message: "math range error",
        }
    }
}
