//! Shared harness for the expression test suites.
//!
//! `test_case!` expands to a `#[test]` that evaluates `input` with the
//! standard registry and checks one of:
//!
//! - `value:` the exact [`tally::Value`] produced;
//! - `approx:` a float result within `1e-9`;
//! - `display:` the result's printed form;
//! - `error:` the error message;
//! - `kind:` a pattern over [`tally::ErrorKind`].

#[macro_export]
macro_rules! test_case {
    ($name:ident, input: $input:expr, value: $value:expr $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(
                tally::evaluate($input),
                Ok($value),
                "input: {:?}",
                $input
            );
        }
    };
    ($name:ident, input: $input:expr, approx: $expected:expr $(,)?) => {
        #[test]
        fn $name() {
            let value = tally::evaluate($input)
                .unwrap_or_else(|e| panic!("{:?} failed: {}", $input, e));
            let actual = value
                .as_f64()
                .unwrap_or_else(|| panic!("{:?} is not a number: {}", $input, value));
            let expected: f64 = $expected;
            assert!(
                (actual - expected).abs() < 1e-9,
                "input: {:?}, expected {}, got {}",
                $input,
                expected,
                actual
            );
        }
    };
    ($name:ident, input: $input:expr, display: $display:expr $(,)?) => {
        #[test]
        fn $name() {
            let value = tally::evaluate($input)
                .unwrap_or_else(|e| panic!("{:?} failed: {}", $input, e));
            pretty_assertions::assert_eq!(value.to_string(), $display, "input: {:?}", $input);
        }
    };
    ($name:ident, input: $input:expr, error: $message:expr $(,)?) => {
        #[test]
        fn $name() {
            let err = tally::evaluate($input)
                .expect_err(&format!("{:?} should fail", $input));
            pretty_assertions::assert_eq!(err.to_string(), $message, "input: {:?}", $input);
        }
    };
    ($name:ident, input: $input:expr, kind: $pattern:pat $(,)?) => {
        #[test]
        fn $name() {
            let err = tally::evaluate($input)
                .expect_err(&format!("{:?} should fail", $input));
            assert!(
                matches!(err.kind(), $pattern),
                "input: {:?}, got {:?}",
                $input,
                err
            );
        }
    };
}
