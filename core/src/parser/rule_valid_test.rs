// Tests with valid expressions for each rule in the parser.

use crate::parser::{ExpressionParser, Rule};
use pest::Parser;
use pest::iterators::Pair;

fn contains_rule(pair: Pair<Rule>, target: Rule) -> bool {
    if pair.as_rule() == target {
        return true;
    }
    for inner in pair.into_inner() {
        if contains_rule(inner, target) {
            return true;
        }
    }
    false
}

macro_rules! rule_examples {
    ( $($rule:ident => [$($expr:expr),* $(,)?]),* $(,)? ) => {
        $(
            #[test]
            fn $rule() {
                let inputs = vec![$($expr),*];
                for input in inputs {
                    let result = ExpressionParser::parse(Rule::main, input)
                        .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e));
                    let root = result.into_iter().next().unwrap();
                    assert!(
                        contains_rule(root.clone(), Rule::$rule),
                        "Expected to find rule {:?} in parse tree for input '{}'",
                        Rule::$rule,
                        input
                    );
                }
            }
        )*
    };
}

rule_examples! {
    integer => ["42", "-99", "0", "1_000", "0_1_0_0"],
    float => ["3.14", "-0.001", "2.", ".5", "6.022e23", "1.6E-19", "1_000.0", "1e10"],
    string => ["\"hello\"", "'world'", "\"escaped \\\" quote\""],
    bytes => ["b\"abc\"", "b'\\x41'"],
    ident => ["foo", "_bar123", "pi", "notable", "android"],
    grouped => ["(1)", "(1 + 2) * 3", "((x))"],
    list => ["[]", "[1]", "[1, 2, 3]", "[a, b,]"],
    trailing_comma => ["1,", "(1,)"],
    call_op => ["foo()", "foo(1)", "pow(1, 2)", "f(x,)", "os.system(1)"],
    index_op => ["arr[0]", "matrix[1][2]", "m[1, 2]"],
    field_op => ["foo.bar", "a.b.c"],
    lambda_op => ["lambda: 1", "lambda x: x", "lambda x, y: x * y"],
    add => ["1 + 2", "a * (b + c)"],
    sub => ["1 - 2", "a - -b"],
    mul => ["1 * 2", "a * ( b + c )"],
    div => ["1 / 2"],
    floor_div => ["7 // 2"],
    rem => ["7 % 2"],
    pow => ["2 ** 3", "a ** -b"],
    neg => ["- 1", "-a"],
    pos => ["+1", "+ a"],
    invert => ["~1"],
    not => ["not x", "not not x"],
    and => ["a and b"],
    or => ["a or b"],
    eq => ["a == b"],
    ne => ["a != b"],
    lt => ["a < b"],
    le => ["a <= b"],
    gt => ["a > b"],
    ge => ["a >= b"],
    bit_and => ["a & b"],
    bit_or => ["a | b"],
    bit_xor => ["a ^ b"],
    shl => ["a << b"],
    shr => ["a >> b"],
    named_assign => ["x := 1"],
}

#[test]
fn test_invalid_inputs_rejected() {
    for input in ["", "1 +", "(1", "1 2", "$", "1__0", "lambda", "f(,)"] {
        assert!(
            ExpressionParser::parse(Rule::main, input).is_err(),
            "Expected '{}' to be rejected",
            input
        );
    }
}
