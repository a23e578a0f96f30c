//! Allow-list validation of parsed expressions.
//!
//! Nothing reaches the evaluator without passing through [`validate`]. It
//! walks the tree twice, both times in pre-order:
//!
//! 1. every node's syntactic kind and operator must be on the allow-list
//!    (numbers, the arithmetic operators, calls, names and tuples);
//! 2. every name must resolve in the registry, as a constant where a value
//!    is expected and as a function where a call is made, and every callee
//!    must be a bare name.
//!
//! Both walks fail closed: anything not explicitly permitted is rejected.

#[cfg(test)]
mod validator_test;

use tracing::debug;

use crate::{
    api::{ErrorKind, EvalError},
    parser::{AnnotatedSource, BinaryOp, Expr, ParsedExpr, UnaryOp},
    registry::{Entry, Registry},
};

/// An expression that passed validation against a registry.
///
/// Only [`validate`] can construct it, so holding one proves the checks ran.
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a> {
    parsed: ParsedExpr<'a>,
}

impl<'a> Validated<'a> {
    pub fn expr(&self) -> &'a Expr<'a> {
        self.parsed.expr
    }

    pub fn ann(&self) -> &'a AnnotatedSource<'a, Expr<'a>> {
        self.parsed.ann
    }

    pub fn source(&self) -> &'a str {
        self.parsed.ann.source
    }
}

/// Check `parsed` against the allow-list and `registry`.
pub fn validate<'a>(
    registry: &Registry,
    parsed: ParsedExpr<'a>,
    max_depth: usize,
) -> Result<Validated<'a>, EvalError> {
    let validator = Validator {
        registry,
        ann: parsed.ann,
        max_depth,
    };

    validator
        .check_kinds(parsed.expr, 0)
        .and_then(|()| validator.check_names(parsed.expr))
        .inspect_err(|e| debug!(error = %e, "Rejected expression"))?;

    Ok(Validated { parsed })
}

struct Validator<'r, 'a> {
    registry: &'r Registry,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
    max_depth: usize,
}

impl<'r, 'a> Validator<'r, 'a> {
    fn error(&self, expr: &'a Expr<'a>, kind: ErrorKind) -> EvalError {
        EvalError::new(kind, self.ann.span_of(expr))
    }

    fn disallowed(&self, expr: &'a Expr<'a>) -> EvalError {
        self.error(
            expr,
            ErrorKind::Disallowed {
                kind: expr.kind_name(),
            },
        )
    }

    /// First walk: syntactic kinds and operators. Also bounds the depth.
    fn check_kinds(&self, expr: &'a Expr<'a>, depth: usize) -> Result<(), EvalError> {
        if depth >= self.max_depth {
            return Err(self.error(
                expr,
                ErrorKind::DepthExceeded {
                    max_depth: self.max_depth,
                },
            ));
        }
        let depth = depth + 1;

        match expr {
            Expr::Literal(_) | Expr::Ident(_) => Ok(()),
            Expr::Binary { .. } => {
                // The whole left spine sits at one level.
                let (first, steps) = expr.binary_chain();
                self.check_kinds(first, depth)?;
                steps.iter().try_for_each(|step| {
                    match step.op {
                        BinaryOp::Add
                        | BinaryOp::Sub
                        | BinaryOp::Mul
                        | BinaryOp::Div
                        | BinaryOp::FloorDiv
                        | BinaryOp::Mod
                        | BinaryOp::Pow => {}
                    }
                    self.check_kinds(step.right, depth)
                })
            }
            Expr::Unary { op, expr: operand } => {
                match op {
                    UnaryOp::Pos | UnaryOp::Neg => {}
                }
                self.check_kinds(operand, depth)
            }
            Expr::Call { callable, args } => {
                self.check_kinds(callable, depth)?;
                args.iter().try_for_each(|arg| self.check_kinds(arg, depth))
            }
            Expr::Tuple(items) => items.iter().try_for_each(|item| self.check_kinds(item, depth)),

            Expr::Comparison { .. }
            | Expr::Boolean { .. }
            | Expr::Not(_)
            | Expr::Bitwise { .. }
            | Expr::Invert(_)
            | Expr::Field { .. }
            | Expr::Index { .. }
            | Expr::Str(_)
            | Expr::Bytes(_)
            | Expr::List(_)
            | Expr::Lambda { .. }
            | Expr::NamedAssign { .. } => Err(self.disallowed(expr)),
        }
    }

    /// Second walk: name resolution and call shapes.
    fn check_names(&self, expr: &'a Expr<'a>) -> Result<(), EvalError> {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Ident(name) => match self.registry.lookup(name) {
                Some(Entry::Constant(_)) => Ok(()),
                Some(Entry::Function(_)) => Err(self.error(
                    expr,
                    ErrorKind::FunctionAsValue {
                        name: name.to_string(),
                    },
                )),
                None => Err(self.error(
                    expr,
                    ErrorKind::UnknownName {
                        name: name.to_string(),
                    },
                )),
            },
            Expr::Binary { .. } => {
                let (first, steps) = expr.binary_chain();
                self.check_names(first)?;
                steps.iter().try_for_each(|step| self.check_names(step.right))
            }
            Expr::Unary { expr: operand, .. } => self.check_names(operand),
            Expr::Call { callable, args } => {
                self.check_callee(callable)?;
                args.iter().try_for_each(|arg| self.check_names(arg))
            }
            Expr::Tuple(items) => items.iter().try_for_each(|item| self.check_names(item)),

            // Already rejected by the first walk.
            Expr::Comparison { .. }
            | Expr::Boolean { .. }
            | Expr::Not(_)
            | Expr::Bitwise { .. }
            | Expr::Invert(_)
            | Expr::Field { .. }
            | Expr::Index { .. }
            | Expr::Str(_)
            | Expr::Bytes(_)
            | Expr::List(_)
            | Expr::Lambda { .. }
            | Expr::NamedAssign { .. } => Err(self.disallowed(expr)),
        }
    }

    fn check_callee(&self, callable: &'a Expr<'a>) -> Result<(), EvalError> {
        let Expr::Ident(name) = callable else {
            return Err(self.error(
                callable,
                ErrorKind::ComplexCall {
                    callee: callable.kind_name(),
                },
            ));
        };
        match self.registry.lookup(name) {
            Some(Entry::Function(_)) => Ok(()),
            Some(Entry::Constant(_)) => Err(self.error(
                callable,
                ErrorKind::NotCallable {
                    name: name.to_string(),
                },
            )),
            None => Err(self.error(
                callable,
                ErrorKind::UnknownFunction {
                    name: name.to_string(),
                },
            )),
        }
    }
}
