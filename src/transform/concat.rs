//! Flattening of nested `concat` calls.

use crate::expression::{Expr, FunctionCall, Operator};
use crate::transform::ExprTransformer;

/// `concat(a, concat(b, c), d)` becomes `concat(a, b, c, d)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatTransformer;

impl ConcatTransformer {
    fn is_concat(expr: &Expr) -> bool {
        matches!(expr, Expr::Function(call) if call.is_named(Operator::Concat.as_str()))
    }
}

impl ExprTransformer for ConcatTransformer {
    fn transform(&self, call: &FunctionCall) -> Option<Expr> {
        if !call.args.iter().any(Self::is_concat) {
            return None;
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            match arg {
                Expr::Function(inner) if inner.is_named(Operator::Concat.as_str()) => {
                    args.extend(inner.args.iter().cloned())
                }
                _ => args.push(arg.clone()),
            }
        }

        Some(Expr::Function(call.with_args(args)))
    }
}
