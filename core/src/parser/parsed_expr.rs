use crate::parser::{BinaryOp, BitwiseOp, BoolOp, ComparisonOp, UnaryOp, syntax::AnnotatedSource};
use num_bigint::BigUint;

use crate::values::Number;

#[derive(Debug, Clone, Copy)]
pub struct ParsedExpr<'a> {
    pub expr: &'a Expr<'a>,
    pub ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

/// A number as written in the source. Literals are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Int(i64),
    /// An integer beyond `i64`, as little-endian base 2**32 digits.
    BigInt(&'a [u32]),
    Float(f64),
}

impl Literal<'_> {
    pub fn to_number(self) -> Number {
        match self {
            Literal::Int(i) => Number::Int(i),
            Literal::BigInt(digits) => Number::from_bigint(BigUint::from_slice(digits).into()),
            Literal::Float(f) => Number::Float(f),
        }
    }
}

/// One operator of a chain unrolled by [`Expr::binary_chain`].
#[derive(Debug, Clone, Copy)]
pub struct BinaryStep<'a> {
    /// The `Binary` node itself, for error spans.
    pub node: &'a Expr<'a>,
    pub op: BinaryOp,
    pub right: &'a Expr<'a>,
}

/// Raw expression tree as produced by the grammar.
///
/// The grammar is deliberately wider than what can be evaluated: attribute
/// access, strings, comparisons and friends are parsed so that the validator
/// can name them when it rejects them. Only `Literal`, `Ident`, `Binary`,
/// `Unary`, `Call` and `Tuple` ever reach the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Literal(Literal<'a>),
    Ident(&'a str),
    Binary {
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Unary {
        op: UnaryOp,
        expr: &'a Expr<'a>,
    },
    Call {
        callable: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
    },
    Tuple(&'a [&'a Expr<'a>]),

    Comparison {
        op: ComparisonOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Boolean {
        op: BoolOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Not(&'a Expr<'a>),
    Bitwise {
        op: BitwiseOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Invert(&'a Expr<'a>),
    Field {
        value: &'a Expr<'a>,
        field: &'a str,
    },
    Index {
        value: &'a Expr<'a>,
        index: &'a Expr<'a>,
    },
    Str(&'a str),
    Bytes(&'a str),
    List(&'a [&'a Expr<'a>]),
    Lambda {
        params: &'a [&'a str],
        body: &'a Expr<'a>,
    },
    NamedAssign {
        target: &'a Expr<'a>,
        value: &'a Expr<'a>,
    },
}

impl<'a> Expr<'a> {
    pub fn as_ptr(&self) -> *const Self {
        self as *const _
    }

    /// Unroll the left spine of nested arithmetic operators.
    ///
    /// `1 + 2 * 3 - 4` yields the leftmost operand `1` and the steps
    /// `(+ node, 2 * 3)`, `(- node, 4)` in evaluation order. A flat chain
    /// is walked without recursion and adds no nesting depth.
    pub fn binary_chain(&'a self) -> (&'a Expr<'a>, Vec<BinaryStep<'a>>) {
        let mut steps = Vec::new();
        let mut node = self;
        while let Expr::Binary { op, left, right } = node {
            steps.push(BinaryStep {
                node,
                op: *op,
                right: *right,
            });
            node = *left;
        }
        steps.reverse();
        (node, steps)
    }

    /// Human readable name of the construct, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "number literal",
            Expr::Ident(_) => "name",
            Expr::Binary { .. } => "arithmetic operator",
            Expr::Unary { .. } => "unary operator",
            Expr::Call { .. } => "function call",
            Expr::Tuple(_) => "tuple",
            Expr::Comparison { .. } => "comparison",
            Expr::Boolean { op: BoolOp::And, .. } => "boolean 'and'",
            Expr::Boolean { op: BoolOp::Or, .. } => "boolean 'or'",
            Expr::Not(_) => "boolean 'not'",
            Expr::Bitwise { .. } => "bitwise operator",
            Expr::Invert(_) => "bitwise inversion",
            Expr::Field { .. } => "attribute access",
            Expr::Index { .. } => "subscript",
            Expr::Str(_) => "string literal",
            Expr::Bytes(_) => "bytes literal",
            Expr::List(_) => "list display",
            Expr::Lambda { .. } => "lambda",
            Expr::NamedAssign { .. } => "assignment",
        }
    }
}
