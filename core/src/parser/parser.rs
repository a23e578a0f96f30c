use bumpalo::Bump;
use lazy_static::lazy_static;
use num_bigint::BigUint;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use tracing::trace;

use crate::api::DEFAULT_MAX_DEPTH;
use crate::parser::{
    AnnotatedSource, BinaryOp, BitwiseOp, BoolOp, ComparisonOp, Expr, Literal, ParsedExpr, Span,
    UnaryOp,
    error::{ParseError, ParseErrorKind, convert_pest_error},
    nesting::find_excessive_nesting,
};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::named_assign, Assoc::Right))  // `:=`
        .op(Op::prefix(Rule::lambda_op))                  // `lambda x:`

        // Logical operators.
        .op(Op::infix(Rule::or, Assoc::Left))             // `or`
        .op(Op::infix(Rule::and, Assoc::Left))            // `and`
        .op(Op::prefix(Rule::not))                        // `not`
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                                 // `==`, `<`, ...

        // Bitwise operators.
        .op(Op::infix(Rule::bit_or, Assoc::Left))         // `|`
        .op(Op::infix(Rule::bit_xor, Assoc::Left))        // `^`
        .op(Op::infix(Rule::bit_and, Assoc::Left))        // `&`
        .op(
            Op::infix(Rule::shl, Assoc::Left) |
            Op::infix(Rule::shr, Assoc::Left)
        )                                                 // `<<`, `>>`

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                 // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::floor_div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                                 // `*`, `/`, `//`, `%`
        .op(
            Op::prefix(Rule::neg) |
            Op::prefix(Rule::pos) |
            Op::prefix(Rule::invert)
        )                                                 // `-`, `+`, `~`
        .op(Op::infix(Rule::pow, Assoc::Right))           // `**` (right-assoc)

        // Postfix operators.
        .op(
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::field_op)
        )                                                 // `()`, `[]`, `.`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

/// Parse `source` into an arena-allocated tree, with the default nesting limit.
pub fn parse<'a>(arena: &'a Bump, source: &'a str) -> Result<ParsedExpr<'a>, ParseError> {
    parse_with_max_depth(arena, source, DEFAULT_MAX_DEPTH)
}

/// Parse `source`, failing with `MaxDepthExceeded` when brackets, prefix
/// operators or right-associative chains nest deeper than `max_depth`.
pub fn parse_with_max_depth<'a>(
    arena: &'a Bump,
    source: &'a str,
    max_depth: usize,
) -> Result<ParsedExpr<'a>, ParseError> {
    if let Some(span) = find_excessive_nesting(source, max_depth) {
        return Err(ParseError::new(
            ParseErrorKind::MaxDepthExceeded {
                depth: max_depth + 1,
                max_depth,
            },
            source.to_string(),
            span,
        ));
    }

    let mut pairs = ExpressionParser::parse(Rule::main, source)
        .map_err(|e| convert_pest_error(e, source))?;
    let main = pairs.next().ok_or_else(|| missing_pair(source, Span::new(0, 0)))?;

    let ann = arena.alloc(AnnotatedSource::new(arena, source));
    let builder = TreeBuilder {
        arena,
        ann,
        source,
        max_depth,
    };
    let expr = builder.parse_main(main)?;
    trace!(?expr, "Parsed expression");

    Ok(ParsedExpr { expr, ann })
}

fn missing_pair(source: &str, span: Span) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: "missing expected pair in rule".to_string(),
        },
        source.to_string(),
        span,
    )
}

/// Turns Pest pairs into `Expr` nodes, recording each node's span.
struct TreeBuilder<'a> {
    arena: &'a Bump,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
    source: &'a str,
    max_depth: usize,
}

type BuildResult<'a> = Result<&'a Expr<'a>, ParseError>;

impl<'a> TreeBuilder<'a> {
    fn alloc(&self, expr: Expr<'a>, span: Span) -> &'a Expr<'a> {
        let expr = self.arena.alloc(expr);
        self.ann.add_span(expr, span);
        expr
    }

    fn span_of(&self, expr: &'a Expr<'a>) -> Span {
        self.ann
            .span_of(expr)
            .unwrap_or_else(|| Span::new(0, self.source.len()))
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source.to_string(), span)
    }

    fn parse_main(&self, pair: Pair<'a, Rule>) -> BuildResult<'a> {
        let span = Span::from(pair.as_span());
        let inner = pair
            .into_inner()
            .find(|p| p.as_rule() == Rule::tuple_expr)
            .ok_or_else(|| missing_pair(self.source, span))?;
        self.parse_tuple(inner, 0)
    }

    /// A single expression stays as it is; several, or one with a trailing
    /// comma, become a `Tuple`.
    fn parse_tuple(&self, pair: Pair<'a, Rule>, depth: usize) -> BuildResult<'a> {
        let span = Span::from(pair.as_span());
        let mut trailing_comma = false;
        let mut items = Vec::new();
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::trailing_comma => trailing_comma = true,
                _ => items.push(self.parse_expr(p, depth)?),
            }
        }

        match items.as_slice() {
            [single] if !trailing_comma => Ok(*single),
            _ => {
                let items = self.arena.alloc_slice_copy(&items);
                Ok(self.alloc(Expr::Tuple(items), span))
            }
        }
    }

    fn parse_list(&self, pairs: Pairs<'a, Rule>, depth: usize) -> Result<&'a [&'a Expr<'a>], ParseError> {
        let items = pairs
            .map(|p| self.parse_expr(p, depth))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.arena.alloc_slice_copy(&items))
    }

    /// Enter a bracketed construct, one nesting level deeper.
    fn nested(&self, depth: usize, span: &Span) -> Result<usize, ParseError> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    depth,
                    max_depth: self.max_depth,
                },
                span.clone(),
            ));
        }
        Ok(depth)
    }

    fn parse_expr(&self, pair: Pair<'a, Rule>, depth: usize) -> BuildResult<'a> {
        let span = Span::from(pair.as_span());
        match pair.as_rule() {
            Rule::expression => PRATT_PARSER
                .map_primary(|primary| self.parse_expr(primary, depth))
                .map_prefix(|op, rhs| {
                    let rhs = rhs?;
                    let span = Span::combine(&Span::from(op.as_span()), &self.span_of(rhs));
                    let expr = match op.as_rule() {
                        Rule::neg => Expr::Unary {
                            op: UnaryOp::Neg,
                            expr: rhs,
                        },
                        Rule::pos => Expr::Unary {
                            op: UnaryOp::Pos,
                            expr: rhs,
                        },
                        Rule::invert => Expr::Invert(rhs),
                        Rule::not => Expr::Not(rhs),
                        Rule::lambda_op => {
                            let params = op
                                .into_inner()
                                .flat_map(|p| p.into_inner())
                                .filter(|p| p.as_rule() == Rule::ident)
                                .map(|p| p.as_str())
                                .collect::<Vec<_>>();
                            Expr::Lambda {
                                params: self.arena.alloc_slice_copy(&params),
                                body: rhs,
                            }
                        }
                        rule => {
                            return Err(self.error(
                                ParseErrorKind::Other {
                                    message: format!("Unknown prefix operator: {:?}", rule),
                                },
                                span,
                            ));
                        }
                    };
                    Ok(self.alloc(expr, span))
                })
                .map_infix(|lhs, op, rhs| {
                    let (left, right) = (lhs?, rhs?);
                    let span = Span::combine(&self.span_of(left), &self.span_of(right));
                    let expr = match op.as_rule() {
                        Rule::add => binary(BinaryOp::Add, left, right),
                        Rule::sub => binary(BinaryOp::Sub, left, right),
                        Rule::mul => binary(BinaryOp::Mul, left, right),
                        Rule::div => binary(BinaryOp::Div, left, right),
                        Rule::floor_div => binary(BinaryOp::FloorDiv, left, right),
                        Rule::rem => binary(BinaryOp::Mod, left, right),
                        Rule::pow => binary(BinaryOp::Pow, left, right),
                        Rule::eq => comparison(ComparisonOp::Eq, left, right),
                        Rule::ne => comparison(ComparisonOp::Neq, left, right),
                        Rule::lt => comparison(ComparisonOp::Lt, left, right),
                        Rule::le => comparison(ComparisonOp::Le, left, right),
                        Rule::gt => comparison(ComparisonOp::Gt, left, right),
                        Rule::ge => comparison(ComparisonOp::Ge, left, right),
                        Rule::and => Expr::Boolean {
                            op: BoolOp::And,
                            left,
                            right,
                        },
                        Rule::or => Expr::Boolean {
                            op: BoolOp::Or,
                            left,
                            right,
                        },
                        Rule::bit_and => bitwise(BitwiseOp::And, left, right),
                        Rule::bit_or => bitwise(BitwiseOp::Or, left, right),
                        Rule::bit_xor => bitwise(BitwiseOp::Xor, left, right),
                        Rule::shl => bitwise(BitwiseOp::Shl, left, right),
                        Rule::shr => bitwise(BitwiseOp::Shr, left, right),
                        Rule::named_assign => Expr::NamedAssign {
                            target: left,
                            value: right,
                        },
                        rule => {
                            return Err(self.error(
                                ParseErrorKind::Other {
                                    message: format!("Unknown binary operator: {:?}", rule),
                                },
                                span,
                            ));
                        }
                    };
                    Ok(self.alloc(expr, span))
                })
                .map_postfix(|lhs, op| {
                    let lhs = lhs?;
                    let op_span = Span::from(op.as_span());
                    let span = Span::combine(&self.span_of(lhs), &op_span);
                    let expr = match op.as_rule() {
                        Rule::call_op => {
                            let depth = self.nested(depth, &op_span)?;
                            Expr::Call {
                                callable: lhs,
                                args: self.parse_list(op.into_inner(), depth)?,
                            }
                        }
                        Rule::index_op => {
                            let depth = self.nested(depth, &op_span)?;
                            let index = op
                                .into_inner()
                                .next()
                                .ok_or_else(|| missing_pair(self.source, op_span.clone()))?;
                            Expr::Index {
                                value: lhs,
                                index: self.parse_tuple(index, depth)?,
                            }
                        }
                        Rule::field_op => {
                            let field = op
                                .into_inner()
                                .next()
                                .ok_or_else(|| missing_pair(self.source, op_span.clone()))?;
                            Expr::Field {
                                value: lhs,
                                field: field.as_str(),
                            }
                        }
                        rule => {
                            return Err(self.error(
                                ParseErrorKind::Other {
                                    message: format!("Unknown postfix operator: {:?}", rule),
                                },
                                span,
                            ));
                        }
                    };
                    Ok(self.alloc(expr, span))
                })
                .parse(pair.into_inner()),

            Rule::grouped => {
                let depth = self.nested(depth, &span)?;
                let inner = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| missing_pair(self.source, span.clone()))?;
                let expr = self.parse_tuple(inner, depth)?;
                // The parentheses belong to the inner node's span.
                self.ann.add_span(expr, span);
                Ok(expr)
            }

            Rule::list => {
                let depth = self.nested(depth, &span)?;
                let items = self.parse_list(pair.into_inner(), depth)?;
                Ok(self.alloc(Expr::List(items), span))
            }

            Rule::integer => {
                let digits = pair.as_str().replace('_', "");
                let literal = match digits.parse::<i64>() {
                    Ok(value) => Literal::Int(value),
                    Err(_) => {
                        let value = digits.parse::<BigUint>().map_err(|_| {
                            self.error(
                                ParseErrorKind::InvalidNumber {
                                    text: pair.as_str().to_string(),
                                },
                                span.clone(),
                            )
                        })?;
                        Literal::BigInt(self.arena.alloc_slice_copy(&value.to_u32_digits()))
                    }
                };
                Ok(self.alloc(Expr::Literal(literal), span))
            }

            Rule::float => {
                let text = pair.as_str();
                let value = text.replace('_', "").parse::<f64>().map_err(|_| {
                    self.error(
                        ParseErrorKind::InvalidNumber {
                            text: text.to_string(),
                        },
                        span.clone(),
                    )
                })?;
                Ok(self.alloc(Expr::Literal(Literal::Float(value)), span))
            }

            Rule::string => {
                let s = pair.as_str();
                Ok(self.alloc(Expr::Str(&s[1..s.len() - 1]), span))
            }

            Rule::bytes => {
                let s = pair.as_str();
                Ok(self.alloc(Expr::Bytes(&s[2..s.len() - 1]), span))
            }

            Rule::ident => Ok(self.alloc(Expr::Ident(pair.as_str()), span)),

            rule => Err(self.error(
                ParseErrorKind::Other {
                    message: format!("Unhandled rule: {:?}", rule),
                },
                span,
            )),
        }
    }
}

fn binary<'a>(op: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> Expr<'a> {
    Expr::Binary { op, left, right }
}

fn comparison<'a>(op: ComparisonOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> Expr<'a> {
    Expr::Comparison { op, left, right }
}

fn bitwise<'a>(op: BitwiseOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> Expr<'a> {
    Expr::Bitwise { op, left, right }
}
