//! String normalisation of typed terms.
//!
//! `str(rdfTerm(x, dt))` becomes `rdfTerm(str(x), xsd:string)`: the string
//! conversion moves onto the lexical value, where the relational backend can
//! express it as a plain cast.

use crate::expression::{xsd, Expr, FunctionCall, RdfTerm};
use crate::transform::ExprTransformer;

/// Rewrite rule for `str` applied to a typed term constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrTransformer;

impl ExprTransformer for StrTransformer {
    fn transform(&self, call: &FunctionCall) -> Option<Expr> {
        match call.args.as_slice() {
            [Expr::RdfTerm(term)] => {
                let lexical = Expr::str(term.lexical.as_ref().clone());
                Some(Expr::RdfTerm(RdfTerm::typed_literal(lexical, xsd::STRING)))
            }
            _ => None,
        }
    }
}
