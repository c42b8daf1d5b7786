use oxrdf::vocab::{rdf, xsd};
use oxrdf::{GraphName, Literal, NamedNode, Quad, Subject, Term};
use ramp::builder::{property, ShapeBuilder};
use ramp::value::Number;
use ramp::{frame, ErrorCode, FrameParams, PropertyPath, ShapeId, Value};

fn node(iri: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{}", iri))
}

fn quad(subject: NamedNode, predicate: NamedNode, object: impl Into<Term>) -> Quad {
    Quad::new(subject, predicate, object, GraphName::DefaultGraph)
}

#[test]
fn frames_constant_literal_into_number() {
    let mut b = ShapeBuilder::new("t");
    let answer = b.literal(ramp::builder::LiteralOptions {
        datatype: Some(xsd::INTEGER.into_owned()),
        value: Some(Literal::new_typed_literal("42", xsd::INTEGER)),
        ..Default::default()
    });
    let root = b.record(None, Vec::new(), vec![property("n", node("p"), answer)]);
    let shapes = b.build().unwrap();

    let dataset: ramp::Dataset = [quad(
        node("x"),
        node("p"),
        Term::Literal(Literal::new_typed_literal("42", xsd::INTEGER)),
    )]
    .into_iter()
    .collect();

    let mut params = FrameParams::new(&root, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("x"))]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions[0].value,
        Value::object([("n".to_string(), Value::Number(Number::Integer(42)))])
    );
}

fn selector_shapes() -> (ramp::ShapeSet, ShapeId, ShapeId) {
    let oa_xpath = NamedNode::new_unchecked("http://www.w3.org/ns/oa#XPathSelector");
    let oa_css = NamedNode::new_unchecked("http://www.w3.org/ns/oa#CssSelector");
    let mut b = ShapeBuilder::new("t");
    let string = b.literal_typed(xsd::STRING);
    let xpath_type = b.constant(Term::NamedNode(oa_xpath));
    let css_type = b.constant(Term::NamedNode(oa_css));
    let xpath = b.record(
        None,
        vec![property("type", rdf::TYPE, xpath_type)],
        vec![property("xpath", rdf::VALUE, string.clone())],
    );
    let css = b.record(
        None,
        vec![property("type", rdf::TYPE, css_type)],
        vec![property("css", rdf::VALUE, string)],
    );
    (b.build().unwrap(), xpath, css)
}

#[test]
fn union_discriminates_on_type_properties() {
    let (shapes, xpath, css) = selector_shapes();
    let dataset: ramp::Dataset = [
        quad(
            node("a"),
            rdf::TYPE.into_owned(),
            Term::NamedNode(NamedNode::new_unchecked("http://www.w3.org/ns/oa#XPathSelector")),
        ),
        quad(
            node("a"),
            rdf::VALUE.into_owned(),
            Term::Literal(Literal::new_simple_literal("//p")),
        ),
    ]
    .into_iter()
    .collect();

    let solutions = frame(FrameParams::new(&xpath, &shapes, &dataset)).unwrap();
    assert_eq!(solutions.len(), 1);
    let object = solutions[0].value.as_object().unwrap();
    assert_eq!(object.get("xpath"), Some(&Value::String("//p".into())));
    assert_eq!(
        object.get("type"),
        Some(&Value::Term(Term::NamedNode(NamedNode::new_unchecked(
            "http://www.w3.org/ns/oa#XPathSelector"
        ))))
    );

    // The other variant is rejected silently, not an error.
    let solutions = frame(FrameParams::new(&css, &shapes, &dataset)).unwrap();
    assert!(solutions.is_empty());
}

#[test]
fn frames_linked_list_in_order() {
    let mut b = ShapeBuilder::new("t");
    let string = b.literal_typed(xsd::STRING);
    let list = b.list(string);
    let shapes = b.build().unwrap();

    let cell = Subject::BlankNode(oxrdf::BlankNode::new_unchecked("c2"));
    let dataset: ramp::Dataset = [
        quad(
            node("l"),
            rdf::FIRST.into_owned(),
            Term::Literal(Literal::new_simple_literal("a")),
        ),
        Quad::new(
            node("l"),
            rdf::REST.into_owned(),
            Term::BlankNode(oxrdf::BlankNode::new_unchecked("c2")),
            GraphName::DefaultGraph,
        ),
        Quad::new(
            cell.clone(),
            rdf::FIRST.into_owned(),
            Term::Literal(Literal::new_simple_literal("b")),
            GraphName::DefaultGraph,
        ),
        Quad::new(
            cell,
            rdf::REST.into_owned(),
            Term::NamedNode(rdf::NIL.into_owned()),
            GraphName::DefaultGraph,
        ),
    ]
    .into_iter()
    .collect();

    let mut params = FrameParams::new(&list, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("l"))]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions[0].value,
        Value::Array(vec![Value::String("a".into()), Value::String("b".into())])
    );
}

#[test]
fn empty_list_candidate_is_the_terminator() {
    let mut b = ShapeBuilder::new("t");
    let string = b.literal_typed(xsd::STRING);
    let list = b.list(string);
    let shapes = b.build().unwrap();
    let dataset = ramp::Dataset::new();
    let mut params = FrameParams::new(&list, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(rdf::NIL.into_owned())]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].value, Value::Array(Vec::new()));
}

#[test]
fn malformed_lists_raise_specific_codes() {
    let mut b = ShapeBuilder::new("t");
    let string = b.literal_typed(xsd::STRING);
    let list = b.list(string);
    let shapes = b.build().unwrap();

    // Two heads on one cell.
    let dataset: ramp::Dataset = [
        quad(
            node("l"),
            rdf::FIRST.into_owned(),
            Term::Literal(Literal::new_simple_literal("a")),
        ),
        quad(
            node("l"),
            rdf::FIRST.into_owned(),
            Term::Literal(Literal::new_simple_literal("b")),
        ),
        quad(node("l"), rdf::REST.into_owned(), Term::NamedNode(rdf::NIL.into_owned())),
    ]
    .into_iter()
    .collect();
    let mut params = FrameParams::new(&list, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("l"))]);
    let error = frame(params).unwrap_err();
    assert_eq!(error.code(), ErrorCode::MultipleListHeadMatches);
    assert!(error.to_string().starts_with("RAMP104"));

    // A head without a tail.
    let dataset: ramp::Dataset = [quad(
        node("m"),
        rdf::FIRST.into_owned(),
        Term::Literal(Literal::new_simple_literal("a")),
    )]
    .into_iter()
    .collect();
    let mut params = FrameParams::new(&list, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("m"))]);
    let error = frame(params).unwrap_err();
    assert_eq!(error.code(), ErrorCode::NoListTailMatches);
}

#[test]
fn map_keyed_by_language() {
    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let map = b.map(
        ramp::ShapeReference::part(label.clone(), ramp::TermPart::Language),
        None,
        label,
    );
    let root = b.record(
        None,
        Vec::new(),
        vec![property(
            "labels",
            NamedNode::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label"),
            map,
        )],
    );
    let shapes = b.build().unwrap();

    let rdfs_label = NamedNode::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");
    let dataset: ramp::Dataset = [
        quad(
            node("s"),
            rdfs_label.clone(),
            Term::Literal(Literal::new_language_tagged_literal_unchecked("hi", "en")),
        ),
        quad(
            node("s"),
            rdfs_label,
            Term::Literal(Literal::new_language_tagged_literal_unchecked("bonjour", "fr")),
        ),
    ]
    .into_iter()
    .collect();

    let mut params = FrameParams::new(&root, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("s"))]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions[0].value,
        Value::object([(
            "labels".to_string(),
            Value::object([
                ("en".to_string(), Value::String("hi".into())),
                ("fr".to_string(), Value::String("bonjour".into())),
            ])
        )])
    );
}

#[test]
fn composite_map_keys_are_rejected() {
    let mut b = ShapeBuilder::new("t");
    let string = b.literal_typed(xsd::STRING);
    let item = b.record(None, Vec::new(), vec![property("k", node("k"), string)]);
    let map = b.map(ramp::ShapeReference::new(item.clone()), None, item);
    let shapes = b.build().unwrap();

    let dataset: ramp::Dataset = [quad(
        node("i"),
        node("k"),
        Term::Literal(Literal::new_simple_literal("x")),
    )]
    .into_iter()
    .collect();
    let error = frame(FrameParams::new(&map, &shapes, &dataset)).unwrap_err();
    assert_eq!(error.code(), ErrorCode::CompositeMapKey);
}

#[test]
fn cyclic_graph_framing_terminates() {
    let rec_id = ShapeId::named(node("Node"));
    let mut b = ShapeBuilder::new("t");
    let next = b.optional(rec_id.clone());
    b.record(
        Some(rec_id.clone()),
        Vec::new(),
        vec![property("next", node("next"), next)],
    );
    let shapes = b.build().unwrap();

    let dataset: ramp::Dataset = [quad(node("x"), node("next"), Term::NamedNode(node("x")))]
        .into_iter()
        .collect();
    let mut params = FrameParams::new(&rec_id, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("x"))]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions[0].value,
        Value::object([("next".to_string(), Value::Null)])
    );
}

#[test]
fn ambiguous_union_yields_one_solution_per_variant() {
    let mut b = ShapeBuilder::new("t");
    let first = b.literal_typed(xsd::STRING);
    let second = b.literal_typed(xsd::STRING);
    let both = b.any_of(None, vec![first, second]);
    let shapes = b.build().unwrap();

    let dataset = ramp::Dataset::new();
    let mut params = FrameParams::new(&both, &shapes, &dataset);
    params.candidates = Some(vec![Term::Literal(Literal::new_simple_literal("v"))]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 2);
    assert!(solutions.iter().all(|s| s.value == Value::String("v".into())));
}

#[test]
fn solutions_expose_intermediate_matches() {
    let mut b = ShapeBuilder::new("t");
    let name = b.literal_typed(xsd::STRING);
    let root = b.record(None, Vec::new(), vec![property("name", node("name"), name.clone())]);
    let shapes = b.build().unwrap();

    let dataset: ramp::Dataset = [quad(
        node("x"),
        node("name"),
        Term::Literal(Literal::new_simple_literal("alice")),
    )]
    .into_iter()
    .collect();
    let solutions = frame(FrameParams::new(&root, &shapes, &dataset)).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].vars.get(&name), Some(&Value::String("alice".into())));
    assert_eq!(solutions[0].vars.get(&root), Some(&solutions[0].value));
}

#[test]
fn required_property_mismatch_reports_term_codes() {
    let mut b = ShapeBuilder::new("t");
    let expected = b.literal_typed(xsd::INTEGER);
    let type_marker = b.constant(Term::NamedNode(node("Thing")));
    let root = b.record(
        None,
        vec![property("type", rdf::TYPE, type_marker)],
        vec![property("n", node("p"), expected)],
    );
    let shapes = b.build().unwrap();

    let dataset: ramp::Dataset = [
        quad(node("x"), rdf::TYPE.into_owned(), Term::NamedNode(node("Thing"))),
        quad(
            node("x"),
            node("p"),
            Term::Literal(Literal::new_simple_literal("not a number")),
        ),
    ]
    .into_iter()
    .collect();
    let error = frame(FrameParams::new(&root, &shapes, &dataset)).unwrap_err();
    assert_eq!(error.code(), ErrorCode::NonMatchingLiteralDatatype);
    assert!(!error.stack().is_empty());
}

#[test]
fn inverse_paths_navigate_backwards() {
    let mut b = ShapeBuilder::new("t");
    let string = b.literal_typed(xsd::STRING);
    let parent = b.record(
        None,
        Vec::new(),
        vec![ramp::builder::path_property(
            "label",
            PropertyPath::Sequence(vec![
                PropertyPath::inverse(PropertyPath::predicate(node("childOf"))),
                PropertyPath::predicate(node("label")),
            ]),
            string,
        )],
    );
    let shapes = b.build().unwrap();

    let dataset: ramp::Dataset = [
        quad(node("kid"), node("childOf"), Term::NamedNode(node("adult"))),
        quad(
            node("kid"),
            node("label"),
            Term::Literal(Literal::new_simple_literal("the kid")),
        ),
    ]
    .into_iter()
    .collect();
    let mut params = FrameParams::new(&parent, &shapes, &dataset);
    params.candidates = Some(vec![Term::NamedNode(node("adult"))]);
    let solutions = frame(params).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions[0].value,
        Value::object([("label".to_string(), Value::String("the kid".into()))])
    );
}
