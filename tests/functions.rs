//! Registry constants and math functions.

mod cases;

use tally::{ErrorKind, Value};

test_case!(pi_constant, input: "pi", value: Value::float(core::f64::consts::PI));
test_case!(e_constant, input: "e", value: Value::float(core::f64::consts::E));
test_case!(constant_in_expression, input: "2 * pi", approx: 2.0 * core::f64::consts::PI);

// ============================================================================
// Trigonometry
// ============================================================================

test_case!(sin_half_pi, input: "sin(pi / 2)", approx: 1.0);
test_case!(cos_zero, input: "cos(0)", value: Value::float(1.0));
test_case!(tan_quarter_pi, input: "tan(pi / 4)", approx: 1.0);
test_case!(asin_one, input: "asin(1)", approx: core::f64::consts::FRAC_PI_2);
test_case!(atan_one, input: "atan(1)", approx: core::f64::consts::FRAC_PI_4);
test_case!(pythagorean, input: "sin(1) ** 2 + cos(1) ** 2", approx: 1.0);
test_case!(tanh_zero, input: "tanh(0)", value: Value::float(0.0));
test_case!(acosh_one, input: "acosh(1)", value: Value::float(0.0));
test_case!(radians_half_turn, input: "radians(180)", approx: core::f64::consts::PI);
test_case!(degrees_pi, input: "degrees(pi)", approx: 180.0);

// ============================================================================
// Exponents and logarithms
// ============================================================================

test_case!(sqrt_is_float, input: "sqrt(16)", value: Value::float(4.0));
test_case!(exp_zero, input: "exp(0)", value: Value::float(1.0));
test_case!(log_natural, input: "log(e)", approx: 1.0);
test_case!(ln_alias, input: "ln(e ** 2)", approx: 2.0);
test_case!(log_with_base, input: "log(8, 2)", approx: 3.0);
test_case!(log10_thousand, input: "log10(1000)", approx: 3.0);
test_case!(log2_kilo, input: "log2(1024)", value: Value::float(10.0));
test_case!(pow_function, input: "pow(2, 10)", value: Value::float(1024.0));
test_case!(pow_matches_operator, input: "pow(2, 0.5) - 2 ** 0.5", approx: 0.0);

// ============================================================================
// Miscellaneous
// ============================================================================

test_case!(fabs_int, input: "fabs(-3)", value: Value::float(3.0));
test_case!(factorial_exact, input: "factorial(5)", value: Value::int(120));
test_case!(factorial_zero, input: "factorial(0)", value: Value::int(1));
test_case!(factorial_twenty, input: "factorial(20)", value: Value::int(2_432_902_008_176_640_000));
test_case!(nested_calls, input: "sqrt(fabs(-16)) + factorial(3)", value: Value::float(10.0));
test_case!(call_with_trailing_comma, input: "sqrt(4,)", value: Value::float(2.0));

// ============================================================================
// Failures
// ============================================================================

test_case!(sqrt_negative, input: "sqrt(-1)", error: "math domain error");
test_case!(asin_out_of_range, input: "asin(2)", error: "math domain error");
test_case!(log_zero, input: "log(0)", error: "math domain error");
test_case!(exp_overflow, input: "exp(1000)", error: "math range error");
test_case!(log_base_one, input: "log(10, 1)", error: "float division by zero");
test_case!(pow_zero_negative, input: "pow(0, -1)", error: "math domain error");
test_case!(
    factorial_negative,
    input: "factorial(-1)",
    error: "factorial() not defined for negative values",
);
test_case!(
    factorial_float,
    input: "factorial(2.5)",
    error: "'float' object cannot be interpreted as an integer",
);
test_case!(factorial_past_i64, input: "factorial(21)", display: "51090942171709440000");
test_case!(
    factorial_large,
    input: "factorial(30) // factorial(28)",
    value: Value::int(870),
);
test_case!(acosh_huge, input: "acosh(1e308)", approx: 709.889355822726);
test_case!(asinh_huge_negative, input: "asinh(-1e308)", approx: -709.889355822726);
test_case!(log_huge_int, input: "log10(10 ** 400)", approx: 400.0);
test_case!(
    too_many_arguments,
    input: "sqrt(1, 2)",
    error: "sqrt() takes exactly 1 argument (2 given)",
);
test_case!(
    missing_arguments,
    input: "pow(2)",
    error: "pow() takes exactly 2 arguments (1 given)",
);
test_case!(
    log_arity,
    input: "log(1, 2, 3)",
    error: "log() takes from 1 to 2 arguments (3 given)",
);
test_case!(no_arguments, input: "sin()", kind: ErrorKind::Runtime(_));
test_case!(
    tuple_argument,
    input: "sqrt((1, 2))",
    error: "must be real number, not tuple",
);

#[test]
fn test_standard_registry_contents() {
    let names = tally::registry::Registry::standard().names();
    for name in [
        "pi", "e", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh",
        "acosh", "atanh", "radians", "degrees", "log", "ln", "log10", "log2", "exp", "sqrt",
        "pow", "fabs", "factorial",
    ] {
        assert!(names.contains(&name), "missing {}", name);
    }
    assert_eq!(names.len(), 25);
}
