//! Partial evaluation of expressions ahead of SQL generation.
//!
//! The evaluator walks an expression bottom-up. Constants are kept,
//! variables are substituted from the binding, and function calls have their
//! arguments evaluated, are passed through the [`TransformTable`], and are
//! folded into a constant when every argument is constant and the call's
//! identifier passes the [`FunctionGate`]. Whatever cannot be folded is
//! returned in its partially evaluated form.

use crate::expression::{
    Binding, BuiltinConstantEvaluator, ConstantEvaluator, Expr, FoldError, FunctionCall, RdfTerm,
};
use crate::registry::{FunctionGate, FunctionLookup, FunctionRegistry};
use crate::transform::TransformTable;
use log::{trace, warn};
use std::fmt;
use std::sync::Arc;

/// Partial evaluator for expressions
///
/// Holds no mutable state; one instance can serve concurrent evaluations.
#[derive(Clone)]
pub struct PartialEvaluator {
    registry: Arc<dyn FunctionLookup>,
    /// Called after all of a function's arguments have been evaluated
    transformer: Option<Arc<TransformTable>>,
    constant_evaluator: Arc<dyn ConstantEvaluator>,
}

impl PartialEvaluator {
    /// Create an evaluator folding with the built-in constant evaluator
    pub fn new(
        registry: Arc<dyn FunctionLookup>,
        transformer: Option<Arc<TransformTable>>,
    ) -> Self {
        Self {
            registry,
            transformer,
            constant_evaluator: Arc::new(BuiltinConstantEvaluator),
        }
    }

    /// Evaluator with the built-in registry and the standard rewrite rules
    pub fn standard() -> Self {
        Self::new(
            Arc::new(FunctionRegistry::with_builtins()),
            Some(Arc::new(TransformTable::standard())),
        )
    }

    /// Replace the constant evaluation service
    pub fn with_constant_evaluator(
        mut self,
        constant_evaluator: Arc<dyn ConstantEvaluator>,
    ) -> Self {
        self.constant_evaluator = constant_evaluator;
        self
    }

    /// Rewrite rules applied after argument evaluation, if any
    pub fn transformer(&self) -> Option<&TransformTable> {
        self.transformer.as_deref()
    }

    /// Evaluate an expression as far as the binding allows.
    ///
    /// Never fails: calls that cannot be folded are returned partially
    /// evaluated, and incomparable operands produce the type-error sentinel.
    pub fn evaluate(&self, expr: &Expr, binding: Option<&Binding>) -> Expr {
        match expr {
            Expr::Constant(_) => expr.clone(),

            Expr::Variable(var) => match binding.and_then(|binding| binding.get(var)) {
                // The bound expression is evaluated on its own; the binding is not forwarded
                Some(bound) => self.evaluate(bound, None),
                None => expr.clone(),
            },

            Expr::Function(call) => match self.evaluate_args(call, binding) {
                Some(evaluated) => self.rewrite_and_fold(evaluated),
                None => Expr::type_error(),
            },

            Expr::RdfTerm(term) => match self.evaluate_slots(term, binding) {
                Some(evaluated) => self.rewrite_and_fold(evaluated),
                None => Expr::type_error(),
            },
        }
    }

    /// Evaluate an expression without a binding
    pub fn evaluate_unbound(&self, expr: &Expr) -> Expr {
        self.evaluate(expr, None)
    }

    /// Rebuild a call from its evaluated arguments, or `None` if one of them
    /// is the type-error sentinel.
    ///
    /// Evaluation stops at the first type error, so the remaining arguments
    /// are never simplified even though a partial result might exist for them.
    fn evaluate_args(&self, call: &FunctionCall, binding: Option<&Binding>) -> Option<Expr> {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let evaluated = self.evaluate(arg, binding);
            if evaluated.is_type_error() {
                return None;
            }
            args.push(evaluated);
        }
        Some(Expr::Function(call.with_args(args)))
    }

    fn evaluate_slots(&self, term: &RdfTerm, binding: Option<&Binding>) -> Option<Expr> {
        let lexical = self.evaluate(&term.lexical, binding);
        if lexical.is_type_error() {
            return None;
        }
        let datatype = self.evaluate(&term.datatype, binding);
        if datatype.is_type_error() {
            return None;
        }
        Some(Expr::rdf_term(lexical, datatype))
    }

    fn rewrite_and_fold(&self, evaluated: Expr) -> Expr {
        let rewritten = match self.transformer.as_deref().and_then(|t| t.try_rewrite(&evaluated)) {
            Some(rewritten) => match self.evaluate_rewritten(rewritten) {
                Some(rewritten) => rewritten,
                None => return Expr::type_error(),
            },
            None => evaluated,
        };

        if !self.is_foldable(&rewritten) {
            return rewritten;
        }

        match self.constant_evaluator.eval_constant(&rewritten) {
            Ok(value) => {
                trace!("Folded {} to {}", rewritten, value);
                Expr::Constant(value)
            }
            Err(FoldError::NotComparable { .. }) => Expr::type_error(),
            Err(err @ FoldError::Other { .. }) => {
                warn!("Failed to evaluate expr {}: {}", rewritten, err);
                rewritten
            }
        }
    }

    /// Evaluate the arguments a rule built for a rewritten node.
    ///
    /// Substitution already happened, so no binding is passed, and the node
    /// itself is not handed to the rules again.
    fn evaluate_rewritten(&self, rewritten: Expr) -> Option<Expr> {
        match rewritten {
            Expr::Function(call) => self.evaluate_args(&call, None),
            Expr::RdfTerm(term) => self.evaluate_slots(&term, None),
            other @ (Expr::Constant(_) | Expr::Variable(_)) => Some(other),
        }
    }

    /// Check whether constant folding may be attempted on a rewritten node
    fn is_foldable(&self, expr: &Expr) -> bool {
        // A rule may have produced something that is no longer a call
        if !expr.is_function() {
            return false;
        }

        if !expr.args().iter().all(|arg| arg.is_constant()) {
            return false;
        }

        FunctionGate::new(self.registry.as_ref()).admits(expr.function_name())
    }
}

impl Default for PartialEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for PartialEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialEvaluator")
            .field("transformer", &self.transformer)
            .finish_non_exhaustive()
    }
}
