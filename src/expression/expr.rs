//! Expression tree definitions.

use crate::expression::operator::Operator;
use crate::expression::term::NodeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Query variable, named without the leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Substitution of variables by expressions.
pub type Binding = HashMap<Var, Expr>;

/// Call of a named operator or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function identifier. `None` (or the empty string) marks a structural
    /// call without a function identity of its own.
    #[serde(default)]
    pub name: Option<String>,
    pub args: Vec<Expr>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: Some(name.into()),
            args,
        }
    }

    pub fn anonymous(args: Vec<Expr>) -> Self {
        Self { name: None, args }
    }

    /// The function identifier, treating the empty string as absent.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// Copy of this call with the same identifier and new arguments.
    pub fn with_args(&self, args: Vec<Expr>) -> Self {
        Self {
            name: self.name.clone(),
            args,
        }
    }
}

/// Constructor of a typed RDF literal from a lexical value and a datatype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdfTerm {
    pub lexical: Box<Expr>,
    pub datatype: Box<Expr>,
}

impl RdfTerm {
    pub fn new(lexical: Expr, datatype: Expr) -> Self {
        Self {
            lexical: Box::new(lexical),
            datatype: Box::new(datatype),
        }
    }

    /// Typed literal whose datatype slot is the given IRI as a string constant.
    pub fn typed_literal(lexical: Expr, datatype: &str) -> Self {
        Self::new(lexical, Expr::string(datatype))
    }

    /// Both slots, in argument order.
    pub fn args(&self) -> [&Expr; 2] {
        [&self.lexical, &self.datatype]
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Fully evaluated term
    Constant(NodeValue),

    /// Variable reference, resolved through a `Binding`
    Variable(Var),

    /// Operator or function call
    Function(FunctionCall),

    /// Typed term constructor
    RdfTerm(RdfTerm),
}

impl Expr {
    pub fn constant(value: NodeValue) -> Self {
        Expr::Constant(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(Var::new(name))
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function(FunctionCall::new(name, args))
    }

    pub fn rdf_term(lexical: Expr, datatype: Expr) -> Self {
        Expr::RdfTerm(RdfTerm::new(lexical, datatype))
    }

    /// The type-error sentinel.
    pub fn type_error() -> Self {
        Expr::Constant(NodeValue::TypeError)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Constant(NodeValue::string(value))
    }

    pub fn integer(value: i64) -> Self {
        Expr::Constant(NodeValue::Integer(value))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Constant(NodeValue::Boolean(value))
    }

    pub fn iri(value: impl Into<String>) -> Self {
        Expr::Constant(NodeValue::iri(value))
    }

    fn operator(op: Operator, args: Vec<Expr>) -> Self {
        Self::function(op.as_str(), args)
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Eq, vec![left, right])
    }

    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Ne, vec![left, right])
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Lt, vec![left, right])
    }

    pub fn le(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Le, vec![left, right])
    }

    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Gt, vec![left, right])
    }

    pub fn ge(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Ge, vec![left, right])
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::And, vec![left, right])
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Or, vec![left, right])
    }

    pub fn not_expr(operand: Expr) -> Self {
        Self::operator(Operator::Not, vec![operand])
    }

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Self::operator(Operator::Add, vec![left, right])
    }

    pub fn str(operand: Expr) -> Self {
        Self::operator(Operator::Str, vec![operand])
    }

    pub fn concat(args: Vec<Expr>) -> Self {
        Self::operator(Operator::Concat, args)
    }

    /// True only for the `Constant` variant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Constant(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Expr::Variable(_))
    }

    /// True for function calls and typed term constructors.
    pub fn is_function(&self) -> bool {
        matches!(self, Expr::Function(_) | Expr::RdfTerm(_))
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, Expr::Constant(NodeValue::TypeError))
    }

    pub fn as_constant(&self) -> Option<&NodeValue> {
        match self {
            Expr::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Check if no variable is reachable from this expression
    pub fn is_ground(&self) -> bool {
        match self {
            Expr::Constant(_) => true,
            Expr::Variable(_) => false,
            Expr::Function(call) => call.args.iter().all(Expr::is_ground),
            Expr::RdfTerm(term) => term.lexical.is_ground() && term.datatype.is_ground(),
        }
    }

    /// Arguments of a function-call shaped node, in order.
    pub fn args(&self) -> Vec<&Expr> {
        match self {
            Expr::Function(call) => call.args.iter().collect(),
            Expr::RdfTerm(term) => term.args().to_vec(),
            Expr::Constant(_) | Expr::Variable(_) => Vec::new(),
        }
    }

    /// Function identifier of a named call. Typed term constructors and
    /// structural calls have none.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Expr::Function(call) => call.name(),
            _ => None,
        }
    }
}

impl From<NodeValue> for Expr {
    fn from(value: NodeValue) -> Self {
        Expr::Constant(value)
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::Variable(var)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{}", value),
            Expr::Variable(var) => write!(f, "{}", var),
            Expr::Function(call) => {
                let infix = call
                    .name()
                    .and_then(Operator::from_name)
                    .filter(|op| op.is_infix());
                match (infix, call.args.as_slice()) {
                    (Some(op), [left, right]) => write!(f, "({} {} {})", left, op.as_str(), right),
                    _ => {
                        write!(f, "{}(", call.name().unwrap_or(""))?;
                        write_args(f, call.args.iter())?;
                        write!(f, ")")
                    }
                }
            }
            Expr::RdfTerm(term) => {
                write!(f, "rdfTerm(")?;
                write_args(f, term.args().into_iter())?;
                write!(f, ")")
            }
        }
    }
}

fn write_args<'a>(f: &mut fmt::Formatter<'_>, args: impl Iterator<Item = &'a Expr>) -> fmt::Result {
    for (i, arg) in args.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}
