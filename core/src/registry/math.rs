//! Math constants and functions of the standard registry.
//!
//! Constants: pi, e
//! Functions: sin, cos, tan, asin, acos, atan, sinh, cosh, tanh, asinh,
//!            acosh, atanh, radians, degrees, log, ln, log10, log2, exp,
//!            sqrt, fabs, factorial, pow
//!
//! Every function except `factorial` returns a float. Failures carry the
//! messages of Python's `math` module.

use core::f64::consts::LN_2;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::{
    evaluator::RuntimeError,
    registry::{Arity, RegistryBuilder},
    values::{MAX_INT_BITS, Number},
};

/// Above this magnitude `acosh` and `asinh` are `ln(2|x|)` to double precision.
const HYPERBOLIC_LARGE: f64 = 268_435_456.0; // 2**28

/// Apply a float function the way `math` does: a NaN produced from a non-NaN
/// argument is a domain error, and an infinity produced from a finite one is
/// a range error if the function can overflow, a domain error otherwise.
fn math_1(x: f64, f: fn(f64) -> f64, can_overflow: bool) -> Result<Number, RuntimeError> {
    let r = f(x);
    if r.is_nan() && !x.is_nan() {
        return Err(RuntimeError::domain());
    }
    if r.is_infinite() && x.is_finite() {
        return Err(if can_overflow {
            RuntimeError::range()
        } else {
            RuntimeError::domain()
        });
    }
    Ok(Number::Float(r))
}

// ============================================================================
// Trigonometric Functions
// ============================================================================

fn math_sin(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::sin, false)
}

fn math_cos(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::cos, false)
}

fn math_tan(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::tan, false)
}

fn math_asin(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::asin, false)
}

fn math_acos(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::acos, false)
}

fn math_atan(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::atan, false)
}

// ============================================================================
// Hyperbolic Functions
// ============================================================================

fn math_sinh(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::sinh, true)
}

fn math_cosh(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::cosh, true)
}

fn math_tanh(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::tanh, false)
}

// `f64::asinh` and `f64::acosh` overflow internally near `f64::MAX`.
fn asinh(x: f64) -> f64 {
    if x.is_finite() && x.abs() > HYPERBOLIC_LARGE {
        (x.abs().ln() + LN_2).copysign(x)
    } else {
        x.asinh()
    }
}

fn acosh(x: f64) -> f64 {
    if x.is_finite() && x > HYPERBOLIC_LARGE {
        x.ln() + LN_2
    } else {
        x.acosh()
    }
}

fn math_asinh(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, asinh, false)
}

fn math_acosh(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, acosh, false)
}

fn math_atanh(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::atanh, false)
}

// ============================================================================
// Angle Conversion
// ============================================================================

// Plain scaling; an overflow to infinity is returned as is.
fn math_radians(args: &[Number]) -> Result<Number, RuntimeError> {
    Ok(Number::Float(args[0].to_f64()?.to_radians()))
}

fn math_degrees(args: &[Number]) -> Result<Number, RuntimeError> {
    Ok(Number::Float(args[0].to_f64()?.to_degrees()))
}

// ============================================================================
// Exponents and Logarithms
// ============================================================================

/// `log(n)` for a float or an integer of any size, rejecting zero and
/// negative arguments.
fn log_with(n: &Number, log: fn(f64) -> f64) -> Result<f64, RuntimeError> {
    if let Number::BigInt(b) = n {
        if !b.is_positive() {
            return Err(RuntimeError::domain());
        }
        // log(m * 2**shift) == log(m) + shift * log(2)
        let shift = b.bits().saturating_sub(64);
        let m = (b >> shift).to_f64().unwrap_or(f64::NAN);
        return Ok(log(m) + shift as f64 * log(2.0));
    }

    let x = n.as_f64();
    if x.is_nan() || x == f64::INFINITY {
        return Ok(x);
    }
    if x <= 0.0 {
        return Err(RuntimeError::domain());
    }
    Ok(log(x))
}

/// `log(x)` or `log(x, base)`.
fn math_log(args: &[Number]) -> Result<Number, RuntimeError> {
    let num = log_with(&args[0], f64::ln)?;
    let Some(base) = args.get(1) else {
        return Ok(Number::Float(num));
    };
    let den = log_with(base, f64::ln)?;
    if den == 0.0 {
        return Err(RuntimeError::DivisionByZero {
            message: "float division by zero",
        });
    }
    Ok(Number::Float(num / den))
}

fn math_log10(args: &[Number]) -> Result<Number, RuntimeError> {
    log_with(&args[0], f64::log10).map(Number::Float)
}

fn math_log2(args: &[Number]) -> Result<Number, RuntimeError> {
    log_with(&args[0], f64::log2).map(Number::Float)
}

fn math_exp(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::exp, true)
}

fn math_sqrt(args: &[Number]) -> Result<Number, RuntimeError> {
    math_1(args[0].to_f64()?, f64::sqrt, false)
}

/// Float power. Unlike `**`, zero to a negative power is a domain error.
fn math_pow(args: &[Number]) -> Result<Number, RuntimeError> {
    let x = args[0].to_f64()?;
    let y = args[1].to_f64()?;

    // IEEE pow already gives the expected results for NaN and infinities.
    if !x.is_finite() || !y.is_finite() {
        return Ok(Number::Float(x.powf(y)));
    }
    if x == 0.0 && y < 0.0 {
        return Err(RuntimeError::domain());
    }
    if x < 0.0 && y.fract() != 0.0 {
        return Err(RuntimeError::domain());
    }

    let r = x.powf(y);
    if r.is_infinite() {
        return Err(RuntimeError::range());
    }
    Ok(Number::Float(r))
}

// ============================================================================
// Miscellaneous
// ============================================================================

fn math_fabs(args: &[Number]) -> Result<Number, RuntimeError> {
    Ok(Number::Float(args[0].to_f64()?.abs()))
}

/// Exact factorial of a non-negative integer.
fn math_factorial(args: &[Number]) -> Result<Number, RuntimeError> {
    let negative = RuntimeError::Domain {
        message: "factorial() not defined for negative values",
    };
    let n = match &args[0] {
        Number::Int(n) if *n < 0 => return Err(negative),
        Number::Int(n) => *n,
        Number::BigInt(n) if n.is_negative() => return Err(negative),
        Number::BigInt(_) => return Err(RuntimeError::too_large()),
        Number::Float(_) => {
            return Err(RuntimeError::Type {
                message: "'float' object cannot be interpreted as an integer".to_string(),
            });
        }
    };

    let mut acc = BigInt::from(1u8);
    for k in 2..=n {
        acc *= k;
        if acc.bits() > MAX_INT_BITS {
            return Err(RuntimeError::too_large());
        }
    }
    Ok(Number::from_bigint(acc))
}

/// Add the standard constants and functions to `builder`.
pub fn register_math(builder: RegistryBuilder) -> RegistryBuilder {
    let one = Arity::Exact(1);

    builder
        // Constants
        .constant("pi", core::f64::consts::PI)
        .constant("e", core::f64::consts::E)
        // Trigonometric
        .function("sin", one, math_sin)
        .function("cos", one, math_cos)
        .function("tan", one, math_tan)
        .function("asin", one, math_asin)
        .function("acos", one, math_acos)
        .function("atan", one, math_atan)
        // Hyperbolic
        .function("sinh", one, math_sinh)
        .function("cosh", one, math_cosh)
        .function("tanh", one, math_tanh)
        .function("asinh", one, math_asinh)
        .function("acosh", one, math_acosh)
        .function("atanh", one, math_atanh)
        // Angles
        .function("radians", one, math_radians)
        .function("degrees", one, math_degrees)
        // Exponents and logarithms
        .function("log", Arity::Range(1, 2), math_log)
        .function("ln", Arity::Range(1, 2), math_log)
        .function("log10", one, math_log10)
        .function("log2", one, math_log2)
        .function("exp", one, math_exp)
        .function("sqrt", one, math_sqrt)
        .function("pow", Arity::Exact(2), math_pow)
        // Miscellaneous
        .function("fabs", one, math_fabs)
        .function("factorial", one, math_factorial)
}
