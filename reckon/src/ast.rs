//! Expression tree
//!
//! Each node exclusively owns its children. Evaluation is a recursive walk
//! against a [`Context`] and never mutates the tree. Every recursive walk
//! grows the stack on demand, and dropping a tree is iterative, so depth is
//! bounded by memory only.

use crate::functions::Builtin;
use crate::stack::ensure_sufficient_stack;
use crate::Context;
use reckon_core::{checked_div, ReckonError};
use std::collections::BTreeSet;
use std::fmt;
use std::mem;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    NumberLiteral(f64),
    VariableReference(String),
    BinaryOperation {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    FunctionCall {
        function: Builtin,
        arg: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::NumberLiteral(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::VariableReference(name.into())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOperation {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a function call, resolving `name` against the built-ins
    pub fn call(name: &str, arg: Expr) -> Result<Self, ReckonError> {
        let function = Builtin::from_name(name)?;
        Ok(Expr::FunctionCall {
            function,
            arg: Box::new(arg),
        })
    }

    /// Evaluate the tree against `ctx`
    pub fn interpret(&self, ctx: &Context) -> Result<f64, ReckonError> {
        ensure_sufficient_stack(|| self.interpret_node(ctx))
    }

    fn interpret_node(&self, ctx: &Context) -> Result<f64, ReckonError> {
        match self {
            Expr::NumberLiteral(n) => Ok(*n),

            Expr::VariableReference(name) => ctx
                .get_variable(name)
                .ok_or_else(|| ReckonError::undefined_var(name)),

            Expr::BinaryOperation { op, left, right } => {
                let l = left.interpret(ctx)?;
                let r = right.interpret(ctx)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div => checked_div(l, r).map_err(|e| {
                        tracing::debug!(left = l, "division by zero");
                        ReckonError::from(e).with_note(format!("in {}", self))
                    }),
                }
            }

            Expr::FunctionCall { function, arg } => {
                let x = arg.interpret(ctx)?;
                let result = function.apply(x).map_err(|e| {
                    ReckonError::from(e).with_note(format!("in {}", self))
                })?;
                tracing::trace!(function = function.name(), x, result, "applied builtin");
                Ok(result)
            }
        }
    }

    /// Variable names referenced anywhere in the tree
    pub fn dependencies(&self) -> BTreeSet<String> {
        let mut deps = BTreeSet::new();
        self.collect_deps(&mut deps);
        deps
    }

    fn collect_deps(&self, deps: &mut BTreeSet<String>) {
        ensure_sufficient_stack(|| match self {
            Expr::NumberLiteral(_) => {}
            Expr::VariableReference(name) => {
                deps.insert(name.clone());
            }
            Expr::BinaryOperation { left, right, .. } => {
                left.collect_deps(deps);
                right.collect_deps(deps);
            }
            Expr::FunctionCall { arg, .. } => arg.collect_deps(deps),
        })
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Expr::NumberLiteral(_) | Expr::VariableReference(_))
    }

    /// Move non-leaf children into `out`, leaving placeholder leaves behind
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        let mut detach = |child: &mut Box<Expr>| {
            if !child.is_leaf() {
                out.push(mem::replace(&mut **child, Expr::NumberLiteral(0.0)));
            }
        };
        match self {
            Expr::BinaryOperation { left, right, .. } => {
                detach(left);
                detach(right);
            }
            Expr::FunctionCall { arg, .. } => detach(arg),
            Expr::NumberLiteral(_) | Expr::VariableReference(_) => {}
        }
    }
}

// The derived drop glue recurses once per level
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

/// Canonical, fully parenthesized rendering
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Expr::NumberLiteral(n) => write!(f, "{}", n),
            Expr::VariableReference(name) => f.write_str(name),
            Expr::BinaryOperation { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
            Expr::FunctionCall { function, arg } => write!(f, "{}({})", function, arg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reckon_core::codes;

    fn num(n: f64) -> Expr {
        Expr::number(n)
    }

    #[test]
    fn test_number_literal() {
        let ctx = Context::new();
        assert_eq!(num(2.5).interpret(&ctx), Ok(2.5));
        assert_eq!(num(2.5).to_string(), "2.5");
        assert_eq!(num(5.0).to_string(), "5");
    }

    #[test]
    fn test_variable_lookup() {
        let mut ctx = Context::new();
        ctx.set_variable("x", 4.0);
        assert_eq!(Expr::variable("x").interpret(&ctx), Ok(4.0));

        let err = Expr::variable("z").interpret(&ctx).unwrap_err();
        assert!(err.is(codes::UNDEFINED_VAR));
        assert!(err.message.contains('z'));
    }

    #[test]
    fn test_variable_lookup_through_parent() {
        let mut root = Context::new();
        root.set_variable("x", 4.0);
        let child = root.child();
        assert_eq!(Expr::variable("x").interpret(&child), Ok(4.0));
    }

    #[test]
    fn test_binary_operations() {
        let ctx = Context::new();
        let cases = [
            (BinaryOp::Add, 8.0),
            (BinaryOp::Sub, 2.0),
            (BinaryOp::Mul, 15.0),
            (BinaryOp::Div, 5.0 / 3.0),
        ];
        for (op, expected) in cases {
            let expr = Expr::binary(op, num(5.0), num(3.0));
            assert_eq!(expr.interpret(&ctx), Ok(expected));
        }
    }

    #[test]
    fn test_division_by_zero() {
        let ctx = Context::new();
        let expr = Expr::binary(BinaryOp::Div, num(5.0), num(0.0));
        let err = expr.interpret(&ctx).unwrap_err();
        assert!(err.is(codes::DIV_ZERO));
        assert_eq!(err.context.unwrap().notes, vec!["in (5 / 0)".to_string()]);
    }

    #[test]
    fn test_zero_numerator_is_fine() {
        let ctx = Context::new();
        let expr = Expr::binary(BinaryOp::Div, num(0.0), num(5.0));
        assert_eq!(expr.interpret(&ctx), Ok(0.0));
    }

    #[test]
    fn test_left_error_short_circuits() {
        let ctx = Context::new();
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::variable("missing"),
            Expr::binary(BinaryOp::Div, num(1.0), num(0.0)),
        );
        assert!(expr.interpret(&ctx).unwrap_err().is(codes::UNDEFINED_VAR));
    }

    #[test]
    fn test_overflow_propagates() {
        let ctx = Context::new();
        let expr = Expr::binary(BinaryOp::Mul, num(1e308), num(10.0));
        assert_eq!(expr.interpret(&ctx), Ok(f64::INFINITY));
    }

    #[test]
    fn test_function_call() {
        let ctx = Context::new();
        let expr = Expr::call("sqrt", num(9.0)).unwrap();
        assert_eq!(expr.interpret(&ctx), Ok(3.0));
        assert_eq!(expr.to_string(), "sqrt(9)");
    }

    #[test]
    fn test_unknown_function_at_construction() {
        let err = Expr::call("unknown", num(5.0)).unwrap_err();
        assert!(err.is(codes::UNKNOWN_FUNCTION));
    }

    #[test]
    fn test_function_domain_error_at_evaluation() {
        let ctx = Context::new();
        let expr = Expr::call("log", num(0.0)).unwrap();
        let err = expr.interpret(&ctx).unwrap_err();
        assert!(err.is(codes::DOMAIN_ERROR));
    }

    #[test]
    fn test_render_nested() {
        let expr = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Add, num(5.0), num(3.0)),
            Expr::call("abs", Expr::variable("x")).unwrap(),
        );
        assert_eq!(expr.to_string(), "((5 + 3) * abs(x))");
    }

    #[test]
    fn test_reevaluation_sees_context_changes() {
        let mut ctx = Context::new();
        let expr = Expr::binary(BinaryOp::Mul, Expr::variable("x"), num(2.0));
        ctx.set_variable("x", 1.0);
        assert_eq!(expr.interpret(&ctx), Ok(2.0));
        assert_eq!(expr.interpret(&ctx), Ok(2.0));
        ctx.set_variable("x", 4.0);
        assert_eq!(expr.interpret(&ctx), Ok(8.0));
    }

    #[test]
    fn test_dependencies() {
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::variable("b"),
            Expr::call("sin", Expr::binary(BinaryOp::Mul, Expr::variable("a"), Expr::variable("b"))).unwrap(),
        );
        let deps: Vec<String> = expr.dependencies().into_iter().collect();
        assert_eq!(deps, vec!["a".to_string(), "b".to_string()]);
        assert!(num(1.0).dependencies().is_empty());
    }

    fn left_spine(terms: usize) -> Expr {
        let mut expr = Expr::variable("x");
        for _ in 1..terms {
            expr = Expr::binary(BinaryOp::Add, expr, num(1.0));
        }
        expr
    }

    #[test]
    fn test_deep_tree_walks() {
        let mut ctx = Context::new();
        ctx.set_variable("x", 1.0);
        let expr = left_spine(200_000);
        assert_eq!(expr.interpret(&ctx), Ok(200_000.0));
        assert_eq!(expr.dependencies().len(), 1);

        let rendered = expr.to_string();
        assert!(rendered.starts_with("(((("));
        assert!(rendered.ends_with(" + 1)"));
    }

    #[test]
    fn test_deep_call_chain_drops() {
        let mut expr = num(0.0);
        for _ in 0..300_000 {
            expr = Expr::call("abs", expr).unwrap();
        }
        assert_eq!(expr.interpret(&Context::new()), Ok(0.0));
        drop(expr);
    }

    #[test]
    fn test_detach_children_keeps_leaves() {
        let mut expr = Expr::binary(
            BinaryOp::Sub,
            Expr::variable("a"),
            Expr::binary(BinaryOp::Mul, num(2.0), num(3.0)),
        );
        let mut pending = Vec::new();
        expr.detach_children(&mut pending);
        assert_eq!(expr.to_string(), "(a - 0)");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].to_string(), "(2 * 3)");
    }
}
