//! Rewrite hooks applied to function calls after their arguments have been
//! evaluated and before constant folding is attempted.
//!
//! Rules are keyed by function identifier. Each rule inspects the call and
//! either returns a replacement expression or declines by returning `None`
//! when the call does not have the shape it handles. At most one rule fires
//! per node: the first registered rule that accepts the call.

pub mod concat;
pub mod datatype;
pub mod str;

pub use self::concat::ConcatTransformer;
pub use self::datatype::DatatypeTransformer;
pub use self::str::StrTransformer;

use crate::expression::{Expr, FunctionCall, Operator};
use log::trace;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A rewrite rule for one function identifier.
///
/// Rules restructure a call; they never evaluate it.
pub trait ExprTransformer: Send + Sync {
    fn transform(&self, call: &FunctionCall) -> Option<Expr>;
}

impl<F> ExprTransformer for F
where
    F: Fn(&FunctionCall) -> Option<Expr> + Send + Sync,
{
    fn transform(&self, call: &FunctionCall) -> Option<Expr> {
        self(call)
    }
}

/// Dispatch table from function identifier to rewrite rules
#[derive(Clone, Default)]
pub struct TransformTable {
    rules: HashMap<String, Vec<Arc<dyn ExprTransformer>>>,
}

impl TransformTable {
    /// Create an empty table; rewriting with it is the identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the rules that remove typed term constructors the
    /// relational backend cannot express
    pub fn standard() -> Self {
        Self::new()
            .with_rule(Operator::Str.as_str(), StrTransformer)
            .with_rule(Operator::Datatype.as_str(), DatatypeTransformer)
            .with_rule(Operator::Concat.as_str(), ConcatTransformer)
    }

    /// Register a rule for a function identifier. Rules registered earlier
    /// for the same identifier take precedence.
    pub fn register<T>(&mut self, name: impl Into<String>, rule: T) -> &mut Self
    where
        T: ExprTransformer + 'static,
    {
        self.rules.entry(name.into()).or_default().push(Arc::new(rule));
        self
    }

    pub fn with_rule<T>(mut self, name: impl Into<String>, rule: T) -> Self
    where
        T: ExprTransformer + 'static,
    {
        self.register(name, rule);
        self
    }

    /// Number of rules registered for an identifier
    pub fn rule_count(&self, name: &str) -> usize {
        self.rules.get(name).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite a node. Anything that is not a named function call, or that no
    /// rule accepts, is returned unchanged.
    pub fn rewrite(&self, expr: Expr) -> Expr {
        self.try_rewrite(&expr).unwrap_or(expr)
    }

    /// Rewrite a node, or `None` if no rule fired for it
    pub fn try_rewrite(&self, expr: &Expr) -> Option<Expr> {
        let rewritten = match expr {
            Expr::Function(call) => self.apply(call)?,
            _ => return None,
        };
        trace!("Rewrote {} to {}", expr, rewritten);
        Some(rewritten)
    }

    fn apply(&self, call: &FunctionCall) -> Option<Expr> {
        let rules = self.rules.get(call.name()?)?;
        rules.iter().find_map(|rule| rule.transform(call))
    }
}

impl fmt::Debug for TransformTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("TransformTable")
            .field("rules", &names)
            .finish()
    }
}
