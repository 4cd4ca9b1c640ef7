//! Expression model and constant evaluation.
//!
//! This module provides:
//! - The expression tree (constants, variables, function calls and typed
//!   term constructors)
//! - RDF term values, including the type-error sentinel
//! - The operators with built-in constant semantics
//! - The constant evaluation service used to fold ground calls

pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod term;

pub use error::{FoldError, FoldResult};
pub use eval::{evaluate_constant, BuiltinConstantEvaluator, ConstantEvaluator};
pub use expr::{Binding, Expr, FunctionCall, RdfTerm, Var};
pub use operator::Operator;
pub use term::{xsd, NodeValue, Numeric, RDF_LANG_STRING};
