//! Unit tests for the evaluator.

use super::*;
use crate::{
    api::ErrorKind,
    parser::{self, Span},
    registry::{Arity, Registry},
    validator,
    values::Number,
};
use bumpalo::Bump;

struct Runner<'r> {
    registry: &'r Registry,
}

impl<'r> Runner<'r> {
    fn new() -> Self {
        Self {
            registry: Registry::standard(),
        }
    }

    fn with_registry(registry: &'r Registry) -> Self {
        Self { registry }
    }

    fn run(&self, input: &str) -> Result<Value, EvalError> {
        self.run_with_limits(input, DEFAULT_MAX_DEPTH)
    }

    fn run_with_limits(&self, input: &str, max_depth: usize) -> Result<Value, EvalError> {
        let arena = Bump::new();
        let input = arena.alloc_str(input);
        let parsed = parser::parse(&arena, input).expect("parsing failed");
        let validated =
            validator::validate(self.registry, parsed, DEFAULT_MAX_DEPTH).expect("validation failed");
        eval_with_limits(self.registry, validated, max_depth)
    }

    fn value(&self, input: &str) -> Value {
        self.run(input)
            .unwrap_or_else(|e| panic!("'{}' failed: {}", input, e))
    }

    fn float(&self, input: &str) -> f64 {
        match self.value(input) {
            Value::Number(Number::Float(x)) => x,
            other => panic!("'{}' should be a float, got {:?}", input, other),
        }
    }

    fn error(&self, input: &str) -> EvalError {
        match self.run(input) {
            Ok(v) => panic!("'{}' should fail, got {}", input, v),
            Err(e) => e,
        }
    }
}

#[test]
fn test_basic_arithmetic() {
    let r = Runner::new();
    assert_eq!(r.value("1+2*3"), Value::int(7));
    assert_eq!(r.value("2**3"), Value::int(8));
    assert_eq!(r.value("(1 + 2) * 3"), Value::int(9));
    assert_eq!(r.value("10 - 2 - 3"), Value::int(5));
}

#[test]
fn test_python_integer_semantics() {
    let r = Runner::new();
    assert_eq!(r.value("7 // 2"), Value::int(3));
    assert_eq!(r.value("-7 // 2"), Value::int(-4));
    assert_eq!(r.value("-7 % 3"), Value::int(2));
    assert_eq!(r.value("7 / 2"), Value::float(3.5));
    assert_eq!(r.value("4 / 2"), Value::float(2.0));
    assert_eq!(r.value("2 ** -1"), Value::float(0.5));
    assert_eq!(r.value("-2 ** 2"), Value::int(-4));
    assert_eq!(r.value("2 ** 3 ** 2"), Value::int(512));
}

#[test]
fn test_float_literals_stay_float() {
    let r = Runner::new();
    assert_eq!(r.value("1.0 + 1"), Value::float(2.0));
    assert_eq!(r.value("3 * .5"), Value::float(1.5));
    assert_eq!(r.value("1e3"), Value::float(1000.0));
}

#[test]
fn test_constants_and_functions() {
    let r = Runner::new();
    assert!((r.float("sin(pi/2)") - 1.0).abs() < 1e-9);
    assert!((r.float("cos(0)") - 1.0).abs() < 1e-9);
    assert_eq!(r.value("sqrt(16)"), Value::float(4.0));
    assert!((r.float("ln(e)") - 1.0).abs() < 1e-9);
    assert!((r.float("log(8, 2)") - 3.0).abs() < 1e-9);
    assert_eq!(r.value("factorial(5)"), Value::int(120));
    assert_eq!(r.value("pow(2, 10)"), Value::float(1024.0));
}

#[test]
fn test_tuples() {
    let r = Runner::new();
    assert_eq!(
        r.value("1, 2.5"),
        Value::Tuple(vec![Value::int(1), Value::float(2.5)])
    );
    assert_eq!(r.value("(1 + 1,)"), Value::Tuple(vec![Value::int(2)]));
    assert_eq!(
        r.value("(1, (2, 3))"),
        Value::Tuple(vec![
            Value::int(1),
            Value::Tuple(vec![Value::int(2), Value::int(3)])
        ])
    );
}

#[test]
fn test_tuple_operands_are_type_errors() {
    let r = Runner::new();
    assert_eq!(
        r.error("(1, 2) + 1").to_string(),
        "unsupported operand type(s) for +: 'tuple' and 'int'"
    );
    assert_eq!(
        r.error("2.0 ** (1,)").to_string(),
        "unsupported operand type(s) for **: 'float' and 'tuple'"
    );
    assert_eq!(
        r.error("-(1, 2)").to_string(),
        "bad operand type for unary -: 'tuple'"
    );
    assert_eq!(
        r.error("sqrt((4, 9))").to_string(),
        "must be real number, not tuple"
    );
}

#[test]
fn test_division_by_zero() {
    let r = Runner::new();
    for (input, message) in [
        ("1/0", "division by zero"),
        ("1//0", "integer division or modulo by zero"),
        ("1%0", "integer division or modulo by zero"),
        ("1.0/0", "float division by zero"),
        ("1//0.0", "float floor division by zero"),
        ("1.5 % 0", "float modulo by zero"),
        ("0 ** -1", "0.0 cannot be raised to a negative power"),
    ] {
        let err = r.error(input);
        assert!(matches!(
            err.kind(),
            ErrorKind::Runtime(RuntimeError::DivisionByZero { .. })
        ));
        assert_eq!(err.to_string(), message, "{}", input);
    }
}

#[test]
fn test_numeric_failures() {
    let r = Runner::new();
    assert_eq!(r.error("sqrt(-1)").to_string(), "math domain error");
    assert_eq!(r.error("exp(1000)").to_string(), "math range error");
    assert_eq!(r.error("10.0 ** 400").to_string(), "Numerical result out of range");
    assert_eq!(
        r.error("(-8) ** (1/3)").to_string(),
        "negative number cannot be raised to a fractional power"
    );
    assert_eq!(r.error("2 ** 100000").to_string(), "integer result exceeds 65536 bits");
    assert_eq!(
        r.error("sqrt(10 ** 400)").to_string(),
        "int too large to convert to float"
    );
    assert_eq!(
        r.error("sqrt(1, 2)").to_string(),
        "sqrt() takes exactly 1 argument (2 given)"
    );
}

#[test]
fn test_float_overflow_in_plain_arithmetic_is_inf() {
    let r = Runner::new();
    assert_eq!(r.value("1e308 * 10"), Value::float(f64::INFINITY));
}

#[test]
fn test_runtime_error_span() {
    let r = Runner::new();
    let err = r.error("1 + 4 / (2 - 2)");
    assert_eq!(err.span(), Some(&Span::new(4, 15)));

    let err = r.error("2 * sqrt(-4)");
    assert_eq!(err.span(), Some(&Span::new(4, 12)));
}

#[test]
fn test_repeatable() {
    let r = Runner::new();
    assert_eq!(r.value("sin(1) + 2 ** 0.5"), r.value("sin(1) + 2 ** 0.5"));
}

#[test]
fn test_custom_registry_function() {
    fn hypot(args: &[Number]) -> Result<Number, RuntimeError> {
        Ok(Number::Float(args[0].as_f64().hypot(args[1].as_f64())))
    }
    let registry = Registry::builder()
        .constant("three", 3)
        .function("hypot", Arity::Exact(2), hypot)
        .build();
    let r = Runner::with_registry(&registry);
    assert_eq!(r.value("hypot(three, 4)"), Value::float(5.0));
}

#[test]
fn test_depth_limit() {
    let r = Runner::new();
    let nested = format!("{}1", "-".repeat(12));
    assert_eq!(r.run_with_limits(&nested, 20), Ok(Value::int(1)));

    let err = r.run_with_limits(&nested, 10).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DepthExceeded { max_depth: 10 });
}

#[test]
fn test_flat_chain_does_not_count_toward_depth() {
    let r = Runner::new();
    let sum = vec!["1"; 1000].join(" + ");
    assert_eq!(r.run_with_limits(&sum, 10), Ok(Value::int(1000)));

    let product = vec!["2"; 70].join(" * ");
    assert_eq!(
        r.run_with_limits(&product, 10).map(|v| v.to_string()),
        Ok("1180591620717411303424".to_string())
    );

    // Failures inside a chain point at the failing operator.
    let err = r.error("1 / 1 / 0 / 2");
    assert_eq!(err.span(), Some(&Span::new(0, 9)));
}
