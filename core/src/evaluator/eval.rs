//! Core evaluation logic.

use smallvec::SmallVec;

use crate::{
    api::{ErrorKind, EvalError},
    evaluator::{
        EvaluatorOptions, RuntimeError,
        operators::{eval_binary, eval_unary},
    },
    parser::{BinaryStep, Expr},
    registry::{Entry, Registry},
    validator::Validated,
    values::{Number, Value},
};

/// Evaluator for validated expressions.
pub struct Evaluator<'r, 'a> {
    options: EvaluatorOptions,
    registry: &'r Registry,
    /// The expression being evaluated (used for error context).
    validated: Validated<'a>,
    depth: usize,
}

impl<'r, 'a> Evaluator<'r, 'a> {
    /// Create a new evaluator with the given options.
    pub fn new(options: EvaluatorOptions, registry: &'r Registry, validated: Validated<'a>) -> Self {
        Self {
            options,
            registry,
            validated,
            depth: 0,
        }
    }

    fn error(&self, expr: &'a Expr<'a>, kind: ErrorKind) -> EvalError {
        EvalError::new(kind, self.validated.ann().span_of(expr))
    }

    fn runtime_error(&self, expr: &'a Expr<'a>, error: RuntimeError) -> EvalError {
        self.error(expr, ErrorKind::Runtime(error))
    }

    fn type_error(&self, expr: &'a Expr<'a>, message: String) -> EvalError {
        self.runtime_error(expr, RuntimeError::Type { message })
    }

    /// Evaluate the validated expression.
    pub fn eval(&mut self) -> Result<Value, EvalError> {
        self.eval_expr(self.validated.expr())
    }

    /// Evaluate an expression node.
    fn eval_expr(&mut self, expr: &'a Expr<'a>) -> Result<Value, EvalError> {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(self.error(
                expr,
                ErrorKind::DepthExceeded {
                    max_depth: self.options.max_depth,
                },
            ));
        }

        self.depth += 1;
        let result = self.eval_expr_inner(expr);
        self.depth -= 1;

        result
    }

    /// Evaluate a node that must produce a single number.
    fn eval_number(
        &mut self,
        expr: &'a Expr<'a>,
        describe: impl FnOnce(&Value) -> String,
    ) -> Result<Number, EvalError> {
        match self.eval_expr(expr)? {
            Value::Number(n) => Ok(n),
            other => Err(self.type_error(expr, describe(&other))),
        }
    }

    fn apply_binary(&self, step: BinaryStep<'a>, left: Value, right: Value) -> Result<Value, EvalError> {
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => eval_binary(step.op, l, r)
                .map(Value::Number)
                .map_err(|e| self.runtime_error(step.node, e)),
            (left, right) => Err(self.type_error(
                step.node,
                format!(
                    "unsupported operand type(s) for {}: '{}' and '{}'",
                    step.op,
                    left.type_name(),
                    right.type_name()
                ),
            )),
        }
    }

    /// Inner evaluation logic (no depth tracking).
    fn eval_expr_inner(&mut self, expr: &'a Expr<'a>) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(literal) => Ok(Value::Number(literal.to_number())),

            Expr::Ident(name) => match self.registry.lookup(name) {
                Some(Entry::Constant(n)) => Ok(Value::Number(n.clone())),
                // Validation rules these out; fail the same way if it did not.
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
                let mut acc = self.eval_expr(first)?;
                for step in steps {
                    let right = self.eval_expr(step.right)?;
                    acc = self.apply_binary(step, acc, right)?;
                }
                Ok(acc)
            }

            Expr::Unary { op, expr: operand } => {
                let n = self.eval_number(operand, |v| {
                    format!("bad operand type for unary {}: '{}'", op, v.type_name())
                })?;
                eval_unary(*op, n)
                    .map(Value::Number)
                    .map_err(|e| self.runtime_error(expr, e))
            }

            Expr::Call { callable, args } => {
                let Expr::Ident(name) = callable else {
                    return Err(self.error(
                        expr,
                        ErrorKind::ComplexCall {
                            callee: callable.kind_name(),
                        },
                    ));
                };
                let function = match self.registry.lookup(name) {
                    Some(Entry::Function(f)) => f,
                    Some(Entry::Constant(_)) => {
                        return Err(self.error(
                            callable,
                            ErrorKind::NotCallable {
                                name: name.to_string(),
                            },
                        ));
                    }
                    None => {
                        return Err(self.error(
                            callable,
                            ErrorKind::UnknownFunction {
                                name: name.to_string(),
                            },
                        ));
                    }
                };

                let mut values: SmallVec<[Number; 4]> = SmallVec::new();
                for arg in args.iter() {
                    let n = self.eval_number(arg, |v| {
                        format!("must be real number, not {}", v.type_name())
                    })?;
                    values.push(n);
                }

                function
                    .call(&values)
                    .map(Value::Number)
                    .map_err(|e| self.runtime_error(expr, e))
            }

            Expr::Tuple(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items.iter() {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::Tuple(values))
            }

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
            | Expr::NamedAssign { .. } => Err(self.error(
                expr,
                ErrorKind::Unsupported {
                    kind: expr.kind_name(),
                },
            )),
        }
    }
}
