//! `datatype(rdfTerm(x, dt))` becomes `dt`.

use crate::expression::{Expr, FunctionCall, NodeValue};
use crate::transform::ExprTransformer;

/// Rewrite rule for `datatype` applied to a typed term constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatatypeTransformer;

impl ExprTransformer for DatatypeTransformer {
    fn transform(&self, call: &FunctionCall) -> Option<Expr> {
        match call.args.as_slice() {
            [Expr::RdfTerm(term)] => match term.datatype.as_ref() {
                // Datatype slots commonly hold the IRI as a plain string
                Expr::Constant(NodeValue::String(iri)) => Some(Expr::iri(iri.as_str())),
                datatype => Some(datatype.clone()),
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::xsd;

    #[test]
    fn test_unwraps_datatype_slot() {
        let call = FunctionCall::new(
            "datatype",
            vec![Expr::rdf_term(Expr::var("x"), Expr::string(xsd::INT))],
        );
        assert_eq!(
            DatatypeTransformer.transform(&call),
            Some(Expr::iri(xsd::INT))
        );

        let call = FunctionCall::new(
            "datatype",
            vec![Expr::rdf_term(Expr::var("x"), Expr::var("dt"))],
        );
        assert_eq!(DatatypeTransformer.transform(&call), Some(Expr::var("dt")));
    }

    #[test]
    fn test_declines_plain_arguments() {
        let call = FunctionCall::new("datatype", vec![Expr::var("x")]);
        assert_eq!(DatatypeTransformer.transform(&call), None);
    }
}
