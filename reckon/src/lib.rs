//! Reckon - arithmetic expression interpreter
//!
//! `input → tokenize → Parser → Expr → Expr::interpret(&Context) → f64`

mod ast;
mod context;
mod functions;
mod lexer;
mod parser;
mod stack;

pub use ast::{BinaryOp, Expr};
pub use context::Context;
pub use functions::{Builtin, FunctionMeta};
pub use lexer::{tokenize, Token};
pub use parser::{parse, Parser};

pub use reckon_core::{codes, ReckonError, Severity};

/// Parse `input` and evaluate it against `ctx`
pub fn eval(input: &str, ctx: &Context) -> Result<f64, ReckonError> {
    let expr = parse(input)?;
    expr.interpret(ctx).map_err(|e| e.with_expression(input))
}
