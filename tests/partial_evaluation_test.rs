use std::sync::Arc;
use termfold::config::EvaluatorConfig;
use termfold::evaluator::PartialEvaluator;
use termfold::expression::{xsd, Binding, Expr, NodeValue, Var};
use termfold::registry::FunctionRegistry;
use termfold::transform::TransformTable;

fn binding(entries: Vec<(&str, Expr)>) -> Binding {
    entries
        .into_iter()
        .map(|(name, expr)| (Var::new(name), expr))
        .collect()
}

fn sample_expressions() -> Vec<Expr> {
    vec![
        Expr::integer(1),
        Expr::var("x"),
        Expr::eq(Expr::var("x"), Expr::integer(3)),
        Expr::and(
            Expr::eq(Expr::integer(1), Expr::string("a")),
            Expr::boolean(true),
        ),
        Expr::concat(vec![
            Expr::string("a"),
            Expr::concat(vec![Expr::var("x"), Expr::string("b")]),
        ]),
        Expr::str(Expr::rdf_term(Expr::var("x"), Expr::iri(xsd::INT))),
        Expr::str(Expr::rdf_term(Expr::integer(5), Expr::iri(xsd::INT))),
        Expr::function("unknownFn", vec![Expr::integer(1), Expr::integer(2)]),
        Expr::function(
            "datatype",
            vec![Expr::rdf_term(Expr::var("y"), Expr::string(xsd::DATE))],
        ),
        Expr::rdf_term(Expr::string("abc"), Expr::iri(xsd::INTEGER)),
        Expr::rdf_term(Expr::string("NaN"), Expr::iri(xsd::DOUBLE)),
        Expr::str(Expr::rdf_term(Expr::string("5"), Expr::var("dt"))),
    ]
}

#[test]
fn test_constants_are_fixed_points() {
    let evaluator = PartialEvaluator::standard();
    let b = binding(vec![("x", Expr::integer(10))]);

    for constant in [
        Expr::integer(5),
        Expr::string("five"),
        Expr::iri("http://ex.org/five"),
        Expr::constant(NodeValue::typed("5", xsd::INT)),
        Expr::constant(NodeValue::Double(f64::NAN)),
    ] {
        assert_eq!(evaluator.evaluate(&constant, None), constant);
        assert_eq!(evaluator.evaluate(&constant, Some(&b)), constant);
    }
}

#[test]
fn test_one_level_substitution() {
    let evaluator = PartialEvaluator::standard();
    let b = binding(vec![("v", Expr::var("w"))]);

    assert_eq!(evaluator.evaluate(&Expr::var("v"), Some(&b)), Expr::var("w"));
    assert_eq!(evaluator.evaluate(&Expr::var("w"), Some(&b)), Expr::var("w"));
}

#[test]
fn test_type_error_propagation() {
    let evaluator = PartialEvaluator::standard();

    let error_call = Expr::eq(Expr::integer(1), Expr::string("one"));
    assert_eq!(evaluator.evaluate_unbound(&error_call), Expr::type_error());

    let wrapped = Expr::and(error_call.clone(), Expr::boolean(true));
    assert_eq!(evaluator.evaluate_unbound(&wrapped), Expr::type_error());

    // Propagates even when a sibling is still open
    let wrapped = Expr::or(error_call, Expr::var("x"));
    assert_eq!(evaluator.evaluate_unbound(&wrapped), Expr::type_error());
}

#[test]
fn test_type_error_through_binding() {
    let evaluator = PartialEvaluator::standard();
    let b = binding(vec![("age", Expr::string("old"))]);

    let expr = Expr::gt(Expr::var("age"), Expr::integer(18));
    assert_eq!(evaluator.evaluate(&expr, Some(&b)), Expr::type_error());
}

#[test]
fn test_unknown_function_is_not_folded() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::function("unknownFn", vec![Expr::integer(1), Expr::integer(2)]);
    assert_eq!(evaluator.evaluate_unbound(&expr), expr);

    // Its arguments are still evaluated
    let expr = Expr::function(
        "unknownFn",
        vec![Expr::add_expr(Expr::integer(1), Expr::integer(2))],
    );
    assert_eq!(
        evaluator.evaluate_unbound(&expr),
        Expr::function("unknownFn", vec![Expr::integer(3)])
    );
}

#[test]
fn test_partial_evaluation_preserves_open_subtrees() {
    let evaluator = PartialEvaluator::standard();
    let expr = Expr::concat(vec![Expr::string("Hello, "), Expr::var("name")]);

    let partial = evaluator.evaluate(&expr, Some(&Binding::new()));
    assert_eq!(partial, expr);

    let b = binding(vec![("name", Expr::string("world"))]);
    assert_eq!(
        evaluator.evaluate(&partial, Some(&b)),
        Expr::string("Hello, world")
    );
}

#[test]
fn test_partial_evaluation_of_mixed_tree() {
    let evaluator = PartialEvaluator::standard();

    // (?x = (1 + 2)) && (2 < 3)
    let expr = Expr::and(
        Expr::eq(
            Expr::var("x"),
            Expr::add_expr(Expr::integer(1), Expr::integer(2)),
        ),
        Expr::lt(Expr::integer(2), Expr::integer(3)),
    );

    assert_eq!(
        evaluator.evaluate_unbound(&expr),
        Expr::and(
            Expr::eq(Expr::var("x"), Expr::integer(3)),
            Expr::boolean(true)
        )
    );
}

#[test]
fn test_str_of_constant_typed_term_folds() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::str(Expr::rdf_term(Expr::integer(42), Expr::iri(xsd::INT)));
    let result = evaluator.evaluate_unbound(&expr);

    assert_eq!(result, Expr::string("42"));
    assert_eq!(
        result.as_constant().and_then(NodeValue::datatype),
        Some(xsd::STRING)
    );
}

#[test]
fn test_str_of_open_typed_term_is_normalised() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::str(Expr::rdf_term(Expr::var("x"), Expr::iri(xsd::INT)));
    let normalised = evaluator.evaluate_unbound(&expr);

    assert_eq!(
        normalised,
        Expr::rdf_term(Expr::str(Expr::var("x")), Expr::string(xsd::STRING))
    );

    // Binding the variable afterwards gives the same value as binding it up front
    let b = binding(vec![("x", Expr::integer(7))]);
    assert_eq!(evaluator.evaluate(&normalised, Some(&b)), Expr::string("7"));
    assert_eq!(evaluator.evaluate(&expr, Some(&b)), Expr::string("7"));
}

#[test]
fn test_str_of_constant_lexical_with_open_datatype_folds() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::str(Expr::rdf_term(Expr::string("5"), Expr::var("dt")));
    let once = evaluator.evaluate_unbound(&expr);

    assert_eq!(once, Expr::string("5"));
    assert_eq!(evaluator.evaluate(&once, None), once);
}

#[test]
fn test_datatype_of_open_typed_term() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::eq(
        Expr::function(
            "datatype",
            vec![Expr::rdf_term(Expr::var("d"), Expr::string(xsd::DATE))],
        ),
        Expr::iri(xsd::DATE),
    );

    // The rule exposes the datatype, which then folds the comparison
    assert_eq!(evaluator.evaluate_unbound(&expr), Expr::boolean(true));
}

#[test]
fn test_nested_concat_is_flattened() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::concat(vec![
        Expr::string("a"),
        Expr::concat(vec![Expr::var("x"), Expr::string("b")]),
    ]);

    assert_eq!(
        evaluator.evaluate_unbound(&expr),
        Expr::concat(vec![Expr::string("a"), Expr::var("x"), Expr::string("b")])
    );
}

#[test]
fn test_ill_typed_literal_is_kept() {
    let evaluator = PartialEvaluator::standard();

    let expr = Expr::rdf_term(Expr::string("abc"), Expr::iri(xsd::INTEGER));
    assert_eq!(
        evaluator.evaluate_unbound(&expr),
        Expr::constant(NodeValue::typed("abc", xsd::INTEGER))
    );
}

#[test]
fn test_folding_failure_falls_back() {
    let evaluator = PartialEvaluator::standard();

    // Registered, constant arguments, but division by zero cannot fold
    let expr = Expr::function("/", vec![Expr::integer(1), Expr::integer(0)]);
    assert_eq!(evaluator.evaluate_unbound(&expr), expr);

    // Custom registered function without constant semantics
    let registry = FunctionRegistry::with_builtins();
    registry.register("http://ex.org/fn#slug");
    let evaluator = PartialEvaluator::new(
        Arc::new(registry),
        Some(Arc::new(TransformTable::standard())),
    );

    let expr = Expr::function("http://ex.org/fn#slug", vec![Expr::string("A B")]);
    assert_eq!(evaluator.evaluate_unbound(&expr), expr);
}

#[test]
fn test_idempotence() {
    let evaluator = PartialEvaluator::standard();
    let bindings = [
        Binding::new(),
        binding(vec![("x", Expr::integer(3)), ("y", Expr::string("2024-01-01"))]),
        binding(vec![("x", Expr::var("y"))]),
    ];

    for b in &bindings {
        for expr in sample_expressions() {
            let once = evaluator.evaluate(&expr, Some(b));
            let twice = evaluator.evaluate(&once, None);
            assert_eq!(twice, once, "not idempotent for {}", expr);
        }
    }
}

#[test]
fn test_configured_evaluator() {
    let config =
        EvaluatorConfig::from_json(r#"{ "builtins": false, "functions": ["+"] }"#).unwrap();
    let evaluator = config.build();

    assert_eq!(
        evaluator.evaluate_unbound(&Expr::add_expr(Expr::integer(2), Expr::integer(2))),
        Expr::integer(4)
    );
    let concat = Expr::concat(vec![Expr::string("a"), Expr::string("b")]);
    assert_eq!(evaluator.evaluate_unbound(&concat), concat);
}

#[test]
fn test_json_round_trip_of_result() {
    let evaluator = PartialEvaluator::standard();
    let expr: Expr = serde_json::from_str(
        r#"{ "function": { "name": "str", "args": [
              { "rdf_term": { "lexical": { "variable": "x" },
                              "datatype": { "constant": { "iri": "http://www.w3.org/2001/XMLSchema#int" } } } }
           ] } }"#,
    )
    .unwrap();

    let result = evaluator.evaluate_unbound(&expr);
    let json = serde_json::to_string(&result).unwrap();
    let back: Expr = serde_json::from_str(&json).unwrap();

    assert_eq!(back, result);
    assert_eq!(
        result.to_string(),
        "rdfTerm(str(?x), \"http://www.w3.org/2001/XMLSchema#string\")"
    );
}
