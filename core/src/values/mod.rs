//! Runtime values produced by evaluation.
//!
//! A result is either a single [`Number`] or a tuple of values. Numbers keep
//! integer exactness where the operation allows it and print the way a
//! Python calculator prints them (`4.0`, `0.5`, `1e+16`, `(1, 2)`).

use core::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::evaluator::RuntimeError;

mod float_repr;


pub use float_repr::float_repr;

/// Largest magnitude, in bits, of an integer result.
///
/// Integers are exact and unbounded in principle; this caps the memory and
/// time a single `**`, `*` or `factorial` can consume.
pub const MAX_INT_BITS: u64 = 1 << 16;

/// An exact integer or a double precision float.
///
/// Integers that fit in `i64` are always held as [`Number::Int`];
/// [`Number::BigInt`] only carries values outside that range. Build integers
/// from a [`BigInt`] through [`Number::from_bigint`] to keep that invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
}

impl Number {
    /// Demote `n` to [`Number::Int`] when it fits.
    pub fn from_bigint(n: BigInt) -> Self {
        match n.to_i64() {
            Some(i) => Number::Int(i),
            None => Number::BigInt(n),
        }
    }

    /// Lossy conversion; integers too large for a float become infinite.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::BigInt(n) => n.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }

    /// Conversion used wherever an integer takes part in float arithmetic.
    pub fn to_f64(&self) -> Result<f64, RuntimeError> {
        match self {
            Number::BigInt(n) => match n.to_f64() {
                Some(f) if f.is_finite() => Ok(f),
                _ => Err(RuntimeError::Range {
                    message: "int too large to convert to float",
                }),
            },
            other => Ok(other.as_f64()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::BigInt(_) | Number::Float(_) => None,
        }
    }

    /// The exact integer value; `None` for floats.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Number::Int(i) => Some(BigInt::from(*i)),
            Number::BigInt(n) => Some(n.clone()),
            Number::Float(_) => None,
        }
    }

    pub fn is_int(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    /// Name of the type as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Int(_) | Number::BigInt(_) => "int",
            Number::Float(_) => "float",
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::from_bigint(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::BigInt(n) => write!(f, "{}", n),
            Number::Float(x) => f.write_str(&float_repr(*x)),
        }
    }
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }

    pub fn float(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            Value::Tuple(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_int)
    }

    /// Numeric value as a float; `None` for tuples.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            Value::Number(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(n) => n.type_name(),
            Value::Tuple(_) => "tuple",
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}
