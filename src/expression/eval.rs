//! Constant expression evaluation.

use crate::expression::{
    Expr, FoldError, FoldResult, FunctionCall, NodeValue, Numeric, Operator, RdfTerm,
};
use std::cmp::Ordering;

/// Service that folds a ground expression into a single value.
///
/// Implementations must be safe to share between concurrent evaluations.
pub trait ConstantEvaluator: Send + Sync {
    fn eval_constant(&self, expr: &Expr) -> FoldResult<NodeValue>;
}

/// Constant evaluator for the operators listed in [`Operator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinConstantEvaluator;

impl ConstantEvaluator for BuiltinConstantEvaluator {
    fn eval_constant(&self, expr: &Expr) -> FoldResult<NodeValue> {
        match expr {
            Expr::Constant(value) => Ok(value.clone()),

            Expr::Variable(var) => Err(FoldError::other(format!("Unbound variable {}", var))),

            Expr::Function(call) => self.evaluate_call(call),

            Expr::RdfTerm(term) => self.evaluate_rdf_term(term),
        }
    }
}

impl BuiltinConstantEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an operator call
    fn evaluate_call(&self, call: &FunctionCall) -> FoldResult<NodeValue> {
        let name = call
            .name()
            .ok_or_else(|| FoldError::other("Cannot evaluate a call without function identifier"))?;
        let op = Operator::from_name(name).ok_or_else(|| FoldError::unknown_function(name))?;

        if let Some(expected) = op.arity() {
            if call.args.len() != expected {
                return Err(FoldError::argument_count(name, expected, call.args.len()));
            }
        }

        let args = call
            .args
            .iter()
            .map(|arg| self.eval_constant(arg))
            .collect::<FoldResult<Vec<_>>>()?;
        if args.iter().any(NodeValue::is_type_error) {
            return Ok(NodeValue::TypeError);
        }

        match op {
            Operator::Eq => self.equals(&args[0], &args[1]).map(NodeValue::Boolean),
            Operator::Ne => self.equals(&args[0], &args[1]).map(|eq| NodeValue::Boolean(!eq)),
            Operator::Lt => self.compare_values(&args[0], &args[1], |cmp| cmp.is_lt()),
            Operator::Le => self.compare_values(&args[0], &args[1], |cmp| cmp.is_le()),
            Operator::Gt => self.compare_values(&args[0], &args[1], |cmp| cmp.is_gt()),
            Operator::Ge => self.compare_values(&args[0], &args[1], |cmp| cmp.is_ge()),

            Operator::And => Ok(NodeValue::Boolean(
                self.effective_boolean_value(op, &args[0])?
                    && self.effective_boolean_value(op, &args[1])?,
            )),
            Operator::Or => Ok(NodeValue::Boolean(
                self.effective_boolean_value(op, &args[0])?
                    || self.effective_boolean_value(op, &args[1])?,
            )),
            Operator::Not => Ok(NodeValue::Boolean(
                !self.effective_boolean_value(op, &args[0])?,
            )),

            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div => {
                self.evaluate_arithmetic(op, &args[0], &args[1])
            }

            Operator::Str => Ok(NodeValue::string(args[0].lexical_form())),
            Operator::Lang => args[0]
                .lang()
                .map(NodeValue::string)
                .ok_or_else(|| FoldError::invalid_operands(op.as_str(), &args)),
            Operator::Datatype => args[0]
                .datatype()
                .map(NodeValue::iri)
                .ok_or_else(|| FoldError::invalid_operands(op.as_str(), &args)),
            Operator::IsIri => Ok(NodeValue::Boolean(args[0].is_iri())),
            Operator::IsLiteral => Ok(NodeValue::Boolean(args[0].is_literal())),

            Operator::Concat => self.evaluate_concat(&args),
            Operator::StrLen => {
                let s = self.string_arg(op, &args[0])?;
                Ok(NodeValue::Integer(s.chars().count() as i64))
            }
            Operator::UCase => self.map_string(op, &args[0], str::to_uppercase),
            Operator::LCase => self.map_string(op, &args[0], str::to_lowercase),
            Operator::Contains => {
                let (haystack, needle) = self.string_pair(op, &args)?;
                Ok(NodeValue::Boolean(haystack.contains(needle)))
            }
            Operator::StrStarts => {
                let (haystack, needle) = self.string_pair(op, &args)?;
                Ok(NodeValue::Boolean(haystack.starts_with(needle)))
            }
            Operator::StrEnds => {
                let (haystack, needle) = self.string_pair(op, &args)?;
                Ok(NodeValue::Boolean(haystack.ends_with(needle)))
            }
        }
    }

    /// Build the literal denoted by a typed term constructor
    fn evaluate_rdf_term(&self, term: &RdfTerm) -> FoldResult<NodeValue> {
        let lexical = self.eval_constant(&term.lexical)?;
        let datatype = self.eval_constant(&term.datatype)?;

        match (&lexical, &datatype) {
            (NodeValue::TypeError, _) | (_, NodeValue::TypeError) => Ok(NodeValue::TypeError),
            (_, NodeValue::Iri(iri)) | (_, NodeValue::String(iri)) => {
                Ok(NodeValue::from_lexical(&lexical.lexical_form(), iri))
            }
            _ => Err(FoldError::other(format!(
                "Datatype of a typed term must be an IRI, got {}",
                datatype
            ))),
        }
    }

    /// RDF term equality with numeric promotion
    fn equals(&self, left: &NodeValue, right: &NodeValue) -> FoldResult<bool> {
        if let (Some(a), Some(b)) = (left.numeric(), right.numeric()) {
            return Ok(a == b);
        }

        match (left, right) {
            (NodeValue::String(a), NodeValue::String(b)) => Ok(a == b),
            (NodeValue::Boolean(a), NodeValue::Boolean(b)) => Ok(a == b),
            (NodeValue::LangString { .. }, NodeValue::LangString { .. }) => Ok(left == right),
            (NodeValue::Iri(a), NodeValue::Iri(b)) => Ok(a == b),
            (
                NodeValue::Typed {
                    lexical: a,
                    datatype: da,
                },
                NodeValue::Typed {
                    lexical: b,
                    datatype: db,
                },
            ) if da == db => Ok(a == b),
            // An IRI is never equal to a literal
            (NodeValue::Iri(_), _) | (_, NodeValue::Iri(_)) => Ok(false),
            _ => Err(FoldError::not_comparable(left, right)),
        }
    }

    /// Order two values and apply a comparison function
    fn compare_values<F>(
        &self,
        left: &NodeValue,
        right: &NodeValue,
        cmp_fn: F,
    ) -> FoldResult<NodeValue>
    where
        F: FnOnce(Ordering) -> bool,
    {
        let ordering = match (left.numeric(), right.numeric()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => match (left, right) {
                (NodeValue::String(a), NodeValue::String(b)) => Some(a.cmp(b)),
                (NodeValue::Boolean(a), NodeValue::Boolean(b)) => Some(a.cmp(b)),
                (
                    NodeValue::LangString { value: a, lang: la },
                    NodeValue::LangString { value: b, lang: lb },
                ) if la.eq_ignore_ascii_case(lb) => Some(a.cmp(b)),
                _ => None,
            },
        };

        match ordering {
            Some(ordering) => Ok(NodeValue::Boolean(cmp_fn(ordering))),
            None => Err(FoldError::not_comparable(left, right)),
        }
    }

    fn effective_boolean_value(&self, op: Operator, value: &NodeValue) -> FoldResult<bool> {
        if let Some(n) = value.numeric() {
            let d = n.as_f64();
            return Ok(d != 0.0 && !d.is_nan());
        }
        match value {
            NodeValue::Boolean(b) => Ok(*b),
            NodeValue::String(s) => Ok(!s.is_empty()),
            _ => Err(FoldError::invalid_operands(op.as_str(), std::slice::from_ref(value))),
        }
    }

    fn evaluate_arithmetic(
        &self,
        op: Operator,
        left: &NodeValue,
        right: &NodeValue,
    ) -> FoldResult<NodeValue> {
        let (a, b) = match (left.numeric(), right.numeric()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(FoldError::invalid_operands(
                    op.as_str(),
                    &[left.clone(), right.clone()],
                ))
            }
        };

        let overflow = || {
            FoldError::other(format!(
                "Integer overflow in {} {} {}",
                left,
                op.as_str(),
                right
            ))
        };

        let result = match (op, a, b) {
            (Operator::Div, Numeric::Integer(_), Numeric::Integer(0)) => {
                return Err(FoldError::other("Division by zero"))
            }
            (Operator::Div, _, _) => Numeric::Double(a.as_f64() / b.as_f64()),
            (Operator::Add, Numeric::Integer(x), Numeric::Integer(y)) => {
                Numeric::Integer(x.checked_add(y).ok_or_else(overflow)?)
            }
            (Operator::Sub, Numeric::Integer(x), Numeric::Integer(y)) => {
                Numeric::Integer(x.checked_sub(y).ok_or_else(overflow)?)
            }
            (Operator::Mul, Numeric::Integer(x), Numeric::Integer(y)) => {
                Numeric::Integer(x.checked_mul(y).ok_or_else(overflow)?)
            }
            (Operator::Add, _, _) => Numeric::Double(a.as_f64() + b.as_f64()),
            (Operator::Sub, _, _) => Numeric::Double(a.as_f64() - b.as_f64()),
            (Operator::Mul, _, _) => Numeric::Double(a.as_f64() * b.as_f64()),
            _ => return Err(FoldError::unknown_function(op.as_str())),
        };

        Ok(result.into())
    }

    /// Concatenate string literals; a common language tag is preserved
    fn evaluate_concat(&self, args: &[NodeValue]) -> FoldResult<NodeValue> {
        let mut result = String::new();
        let mut lang: Option<&str> = None;
        let mut same_lang = true;

        for (i, arg) in args.iter().enumerate() {
            result.push_str(self.string_arg(Operator::Concat, arg)?);
            let arg_lang = match arg {
                NodeValue::LangString { lang, .. } => Some(lang.as_str()),
                _ => None,
            };
            if i == 0 {
                lang = arg_lang;
            } else if lang != arg_lang {
                same_lang = false;
            }
        }

        match lang {
            Some(lang) if same_lang => Ok(NodeValue::lang_string(result, lang)),
            _ => Ok(NodeValue::String(result)),
        }
    }

    fn map_string<F>(&self, op: Operator, value: &NodeValue, f: F) -> FoldResult<NodeValue>
    where
        F: FnOnce(&str) -> String,
    {
        match value {
            NodeValue::String(s) => Ok(NodeValue::String(f(s))),
            NodeValue::LangString { value, lang } => {
                Ok(NodeValue::lang_string(f(value), lang.as_str()))
            }
            _ => Err(FoldError::invalid_operands(op.as_str(), std::slice::from_ref(value))),
        }
    }

    fn string_arg<'v>(&self, op: Operator, value: &'v NodeValue) -> FoldResult<&'v str> {
        value
            .as_str()
            .ok_or_else(|| FoldError::invalid_operands(op.as_str(), std::slice::from_ref(value)))
    }

    fn string_pair<'v>(
        &self,
        op: Operator,
        args: &'v [NodeValue],
    ) -> FoldResult<(&'v str, &'v str)> {
        Ok((self.string_arg(op, &args[0])?, self.string_arg(op, &args[1])?))
    }
}

/// Helper function to fold a ground expression with the built-in operators
pub fn evaluate_constant(expr: &Expr) -> FoldResult<NodeValue> {
    BuiltinConstantEvaluator.eval_constant(expr)
}
