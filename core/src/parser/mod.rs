mod nesting;
mod parsed_expr;
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionParser;
pub use parser::Rule;
pub use parser::parse;
pub use parser::parse_with_max_depth;

pub use parsed_expr::{BinaryStep, Expr, Literal, ParsedExpr};
pub use syntax::AnnotatedSource;
pub use syntax::{BinaryOp, BitwiseOp, BoolOp, ComparisonOp, Span, UnaryOp};
pub use error::{ParseError, ParseErrorKind};


#[cfg(test)]
mod rule_valid_test;
