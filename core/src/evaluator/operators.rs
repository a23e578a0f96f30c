//! Binary and unary operator implementations.
//!
//! Integer arithmetic stays exact: it runs on `i64` and moves to `BigInt`
//! when a result leaves that range. Any float operand makes the whole
//! operation a float one. Results and failures follow Python's `int` and
//! `float` operators.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{
    evaluator::RuntimeError,
    parser::{BinaryOp, UnaryOp},
    values::{MAX_INT_BITS, Number},
};

/// Apply a binary operator to two numbers.
pub(super) fn eval_binary(op: BinaryOp, left: Number, right: Number) -> Result<Number, RuntimeError> {
    if let (Number::Int(l), Number::Int(r)) = (&left, &right) {
        return eval_binary_int(op, *l, *r);
    }
    match (left.to_bigint(), right.to_bigint()) {
        (Some(l), Some(r)) => eval_binary_big(op, l, r),
        _ => eval_binary_float(op, left.to_f64()?, right.to_f64()?).map(Number::Float),
    }
}

/// Apply a unary operator to a number.
pub(super) fn eval_unary(op: UnaryOp, operand: Number) -> Result<Number, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Pos, n) => Ok(n),
        (UnaryOp::Neg, Number::Int(i)) => Ok(i
            .checked_neg()
            .map_or_else(|| Number::from_bigint(-BigInt::from(i)), Number::Int)),
        (UnaryOp::Neg, Number::BigInt(n)) => Ok(Number::from_bigint(-n)),
        (UnaryOp::Neg, Number::Float(f)) => Ok(Number::Float(-f)),
    }
}

/// Evaluate a binary operation on two integers.
///
/// `/` and `**` with a negative exponent leave the integers for floats.
/// Results outside `i64` are recomputed on `BigInt`.
pub(super) fn eval_binary_int(op: BinaryOp, left: i64, right: i64) -> Result<Number, RuntimeError> {
    let promote = || eval_binary_big(op, BigInt::from(left), BigInt::from(right));
    match op {
        BinaryOp::Add => left.checked_add(right).map_or_else(promote, |n| Ok(Number::Int(n))),
        BinaryOp::Sub => left.checked_sub(right).map_or_else(promote, |n| Ok(Number::Int(n))),
        BinaryOp::Mul => left.checked_mul(right).map_or_else(promote, |n| Ok(Number::Int(n))),
        BinaryOp::Div => {
            if right == 0 {
                return Err(division_by_zero());
            }
            Ok(Number::Float(left as f64 / right as f64))
        }
        BinaryOp::FloorDiv => {
            if right == 0 {
                return Err(modulo_by_zero());
            }
            // i64::MIN // -1 is the only overflowing case.
            let Some(q) = left.checked_div(right) else {
                return promote();
            };
            if left % right != 0 && (left < 0) != (right < 0) {
                Ok(Number::Int(q - 1))
            } else {
                Ok(Number::Int(q))
            }
        }
        BinaryOp::Mod => {
            if right == 0 {
                return Err(modulo_by_zero());
            }
            // The result takes the sign of the divisor.
            let m = left.wrapping_rem(right);
            if m != 0 && (m < 0) != (right < 0) {
                Ok(Number::Int(m + right))
            } else {
                Ok(Number::Int(m))
            }
        }
        BinaryOp::Pow => {
            if right < 0 {
                return eval_binary_float(op, left as f64, right as f64).map(Number::Float);
            }
            int_pow(left, right).map_or_else(promote, |n| Ok(Number::Int(n)))
        }
    }
}

/// Exact `base ** exp` for a non-negative exponent, if it fits in `i64`.
fn int_pow(base: i64, exp: i64) -> Option<i64> {
    match u32::try_from(exp) {
        Ok(exp) => base.checked_pow(exp),
        // Only 0, 1 and -1 survive an exponent this large.
        Err(_) => match base {
            0 | 1 => Some(base),
            -1 => Some(if exp % 2 == 0 { 1 } else { -1 }),
            _ => None,
        },
    }
}

fn division_by_zero() -> RuntimeError {
    RuntimeError::DivisionByZero {
        message: "division by zero",
    }
}

fn modulo_by_zero() -> RuntimeError {
    RuntimeError::DivisionByZero {
        message: "integer division or modulo by zero",
    }
}

/// Reject a result above [`MAX_INT_BITS`], else normalize it.
fn bounded(n: BigInt) -> Result<Number, RuntimeError> {
    if n.bits() > MAX_INT_BITS {
        return Err(RuntimeError::too_large());
    }
    Ok(Number::from_bigint(n))
}

/// Evaluate a binary operation on two arbitrary precision integers.
pub(super) fn eval_binary_big(op: BinaryOp, left: BigInt, right: BigInt) -> Result<Number, RuntimeError> {
    match op {
        BinaryOp::Add => bounded(left + right),
        BinaryOp::Sub => bounded(left - right),
        BinaryOp::Mul => {
            if left.bits() + right.bits() > MAX_INT_BITS + 1 {
                return Err(RuntimeError::too_large());
            }
            bounded(left * right)
        }
        BinaryOp::Div => big_true_div(&left, &right).map(Number::Float),
        BinaryOp::FloorDiv => {
            if right.is_zero() {
                return Err(modulo_by_zero());
            }
            bounded(left.div_floor(&right))
        }
        BinaryOp::Mod => {
            if right.is_zero() {
                return Err(modulo_by_zero());
            }
            bounded(left.mod_floor(&right))
        }
        BinaryOp::Pow => {
            if right.is_negative() {
                let base = Number::from_bigint(left).to_f64()?;
                let exp = Number::from_bigint(right).to_f64()?;
                return eval_binary_float(op, base, exp).map(Number::Float);
            }
            big_pow(left, &right)
        }
    }
}

/// Exact `base ** exp` for a non-negative exponent.
fn big_pow(base: BigInt, exp: &BigInt) -> Result<Number, RuntimeError> {
    let magnitude = base.bits();
    if magnitude <= 1 {
        // 0, 1 and -1
        let odd = exp.is_odd();
        return Ok(match base.to_i64() {
            Some(-1) if !odd => Number::Int(1),
            Some(0) if exp.is_zero() => Number::Int(1),
            _ => Number::from_bigint(base),
        });
    }
    let exp = match exp.to_u32() {
        // The result has at least (magnitude - 1) * exp + 1 bits.
        Some(exp) if (magnitude - 1).saturating_mul(u64::from(exp)) < MAX_INT_BITS => exp,
        _ => return Err(RuntimeError::too_large()),
    };
    bounded(base.pow(exp))
}

/// Correctly scaled `left / right` for integers that may not fit a float.
fn big_true_div(left: &BigInt, right: &BigInt) -> Result<f64, RuntimeError> {
    if right.is_zero() {
        return Err(division_by_zero());
    }
    // Exact when both operands are exactly representable.
    if left.bits() <= f64::MANTISSA_DIGITS as u64 && right.bits() <= f64::MANTISSA_DIGITS as u64 {
        let l = left.to_f64().unwrap_or(f64::NAN);
        let r = right.to_f64().unwrap_or(f64::NAN);
        return Ok(l / r);
    }

    // Scale the operands so that the integer quotient keeps 64 significant
    // bits, then scale the quotient back.
    let shift = left.bits() as i64 - right.bits() as i64 - 64;
    let quotient = if shift >= 0 {
        left / (right << shift as u64)
    } else {
        (left << shift.unsigned_abs()) / right
    };
    let half = shift / 2;
    let q = quotient.to_f64().unwrap_or(f64::NAN);
    let result = q * 2f64.powi(half as i32) * 2f64.powi((shift - half) as i32);
    if result.is_infinite() {
        return Err(RuntimeError::Range {
            message: "integer division result too large for a float",
        });
    }
    Ok(result)
}

/// Evaluate a binary operation on two floats.
///
/// `+ - *` follow IEEE 754 and may produce infinities. Division by zero and
/// powers that would be complex or overflow are errors.
pub(super) fn eval_binary_float(op: BinaryOp, left: f64, right: f64) -> Result<f64, RuntimeError> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div => {
            if right == 0.0 {
                return Err(RuntimeError::DivisionByZero {
                    message: "float division by zero",
                });
            }
            Ok(left / right)
        }
        BinaryOp::FloorDiv => {
            if right == 0.0 {
                return Err(RuntimeError::DivisionByZero {
                    message: "float floor division by zero",
                });
            }
            Ok(float_divmod(left, right).0)
        }
        BinaryOp::Mod => {
            if right == 0.0 {
                return Err(RuntimeError::DivisionByZero {
                    message: "float modulo by zero",
                });
            }
            Ok(float_divmod(left, right).1)
        }
        BinaryOp::Pow => float_pow(left, right),
    }
}

/// Floor quotient and modulo of two floats, with the modulo taking the sign
/// of the divisor. `right` must be non-zero.
fn float_divmod(left: f64, right: f64) -> (f64, f64) {
    let mut m = left % right;
    let mut div = (left - m) / right;
    if m != 0.0 {
        if (right < 0.0) != (m < 0.0) {
            m += right;
            div -= 1.0;
        }
    } else {
        m = 0.0_f64.copysign(right);
    }

    let floordiv = if div != 0.0 {
        let mut f = div.floor();
        if div - f > 0.5 {
            f += 1.0;
        }
        f
    } else {
        0.0_f64.copysign(left / right)
    };
    (floordiv, m)
}

fn float_pow(base: f64, exp: f64) -> Result<f64, RuntimeError> {
    if exp == 0.0 {
        return Ok(1.0);
    }
    // IEEE pow matches the expected results for NaN and infinite operands.
    if !base.is_finite() || !exp.is_finite() {
        return Ok(base.powf(exp));
    }
    if base == 0.0 && exp < 0.0 {
        return Err(RuntimeError::DivisionByZero {
            message: "0.0 cannot be raised to a negative power",
        });
    }
    if base < 0.0 && exp.fract() != 0.0 {
        return Err(RuntimeError::Domain {
            message: "negative number cannot be raised to a fractional power",
        });
    }

    let r = base.powf(exp);
    if r.is_infinite() {
        return Err(RuntimeError::Range {
            message: "Numerical result out of range",
        });
    }
    Ok(r)
}
