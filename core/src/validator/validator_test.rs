use bumpalo::Bump;
use pretty_assertions::assert_eq;

use crate::api::{DEFAULT_MAX_DEPTH, ErrorKind, EvalError};
use crate::parser::{Span, parse};
use crate::registry::{Arity, Registry};
use crate::validator::validate;
use crate::values::Number;

fn check_with(registry: &Registry, source: &str, max_depth: usize) -> Result<(), EvalError> {
    let arena = Bump::new();
    let source = arena.alloc_str(source);
    let parsed = parse(&arena, source).unwrap_or_else(|e| panic!("parse failed: {}", e));
    validate(registry, parsed, max_depth).map(|_| ())
}

fn check(source: &str) -> Result<(), EvalError> {
    check_with(Registry::standard(), source, DEFAULT_MAX_DEPTH)
}

fn rejection(source: &str) -> ErrorKind {
    match check(source) {
        Ok(()) => panic!("'{}' should be rejected", source),
        Err(e) => e.kind().clone(),
    }
}

#[test]
fn test_arithmetic_is_allowed() {
    for source in [
        "1",
        "1.5",
        "1 + 2 * 3 - 4 / 5",
        "7 // 2 % 3",
        "2 ** -1",
        "-+-1",
        "(1, 2)",
        "1,",
        "((1, 2), 3)",
        "pi * e",
        "sin(pi / 2)",
        "log(8, 2)",
        "sqrt(sqrt(16))",
        "pow(2, 10) + factorial(5)",
    ] {
        assert!(check(source).is_ok(), "'{}' should be allowed", source);
    }
}

#[test]
fn test_disallowed_constructs_are_named() {
    for (source, kind) in [
        ("a.b", "attribute access"),
        ("x[0]", "subscript"),
        ("1 < 2", "comparison"),
        ("1 == 1", "comparison"),
        ("1 and 2", "boolean 'and'"),
        ("1 or 2", "boolean 'or'"),
        ("not 1", "boolean 'not'"),
        ("1 | 2", "bitwise operator"),
        ("1 << 2", "bitwise operator"),
        ("~1", "bitwise inversion"),
        ("'abc'", "string literal"),
        ("b'abc'", "bytes literal"),
        ("[1, 2]", "list display"),
        ("lambda: 1", "lambda"),
        ("x := 1", "assignment"),
    ] {
        assert_eq!(rejection(source), ErrorKind::Disallowed { kind }, "{}", source);
    }
}

#[test]
fn test_disallowed_nodes_are_found_anywhere() {
    assert_eq!(
        rejection("1 + sqrt('4')"),
        ErrorKind::Disallowed {
            kind: "string literal"
        }
    );
    assert_eq!(
        rejection("(1, (2, [3]))"),
        ErrorKind::Disallowed {
            kind: "list display"
        }
    );
}

#[test]
fn test_node_kinds_are_checked_before_names() {
    // `foo` is unknown, but the attribute access is reported first.
    assert_eq!(
        rejection("foo(a.b)"),
        ErrorKind::Disallowed {
            kind: "attribute access"
        }
    );
}

#[test]
fn test_import_attempt_is_rejected() {
    assert_eq!(
        rejection("__import__(\"os\").system(\"rm -rf /\")"),
        ErrorKind::Disallowed {
            kind: "attribute access"
        }
    );
    assert_eq!(
        rejection("__import__('os')"),
        ErrorKind::Disallowed {
            kind: "string literal"
        }
    );
    assert_eq!(
        rejection("__import__(1)"),
        ErrorKind::UnknownFunction {
            name: "__import__".to_string()
        }
    );
}

#[test]
fn test_unknown_names() {
    assert_eq!(
        rejection("x + 1"),
        ErrorKind::UnknownName {
            name: "x".to_string()
        }
    );
    assert_eq!(
        rejection("foo(1)"),
        ErrorKind::UnknownFunction {
            name: "foo".to_string()
        }
    );
    assert_eq!(
        rejection("PI"),
        ErrorKind::UnknownName {
            name: "PI".to_string()
        }
    );
}

#[test]
fn test_constants_and_functions_are_not_interchangeable() {
    assert_eq!(
        rejection("pi(2)"),
        ErrorKind::NotCallable {
            name: "pi".to_string()
        }
    );
    assert_eq!(
        rejection("sin + 1"),
        ErrorKind::FunctionAsValue {
            name: "sin".to_string()
        }
    );
    assert_eq!(
        rejection("sqrt(sin)"),
        ErrorKind::FunctionAsValue {
            name: "sin".to_string()
        }
    );
}

#[test]
fn test_only_simple_calls() {
    assert_eq!(
        rejection("(1)(2)"),
        ErrorKind::ComplexCall {
            callee: "number literal"
        }
    );
    assert_eq!(
        rejection("sin(1)(2)"),
        ErrorKind::ComplexCall {
            callee: "function call"
        }
    );
    // Parentheses around a name are transparent.
    assert!(check("(sqrt)(4)").is_ok());
}

#[test]
fn test_error_span_points_at_node() {
    let err = check("1 + foo(2)").unwrap_err();
    assert_eq!(err.span(), Some(&Span::new(4, 7)));

    let err = check("2 * 'x'").unwrap_err();
    assert_eq!(err.span(), Some(&Span::new(4, 7)));
}

#[test]
fn test_custom_registry() {
    fn twice(args: &[Number]) -> Result<Number, crate::evaluator::RuntimeError> {
        Ok(Number::Float(args[0].as_f64() * 2.0))
    }
    let registry = Registry::builder()
        .constant("answer", 42)
        .function("twice", Arity::Exact(1), twice)
        .build();

    assert!(check_with(&registry, "twice(answer)", DEFAULT_MAX_DEPTH).is_ok());
    assert!(matches!(
        check_with(&registry, "sin(1)", DEFAULT_MAX_DEPTH)
            .unwrap_err()
            .kind(),
        ErrorKind::UnknownFunction { .. }
    ));
}

#[test]
fn test_nesting_depth_is_bounded() {
    let nested = format!("{}1", "-".repeat(12));
    assert!(check_with(Registry::standard(), &nested, 20).is_ok());
    assert_eq!(
        check_with(Registry::standard(), &nested, 10)
            .unwrap_err()
            .kind(),
        &ErrorKind::DepthExceeded { max_depth: 10 }
    );
}

#[test]
fn test_flat_operator_chain_is_one_level() {
    let sum = vec!["1"; 1000].join(" + ");
    assert!(check_with(Registry::standard(), &sum, 10).is_ok());

    let mixed = vec!["2 * pi"; 500].join(" - ");
    assert!(check_with(Registry::standard(), &mixed, 10).is_ok());

    // Errors deep in a chain still come out left to right.
    assert_eq!(
        rejection(&format!("{} + 'a' + b", sum)),
        ErrorKind::Disallowed {
            kind: "string literal"
        }
    );
}
