use oxrdf::NamedNode;
use ramp::builder::{inverse_property, path_property, property, self_property, ShapeBuilder};
use ramp::query_generation::{PredicatePattern, QueryPattern, QueryTriple};
use ramp::{generate_query, PropertyPath, QueryParams, ShapeId};
use spargebra::algebra::{Expression, PropertyPathExpression};
use spargebra::term::{TermPattern, Variable};

fn node(iri: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{}", iri))
}

fn rdfs_label() -> NamedNode {
    NamedNode::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label")
}

fn var(name: &str) -> TermPattern {
    TermPattern::Variable(Variable::new_unchecked(name))
}

#[test]
fn simple_record_produces_matching_template_and_where() {
    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let root = b.record(
        None,
        Vec::new(),
        vec![property("label", rdfs_label(), label)],
    );
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();
    let expected = QueryTriple {
        subject: var("record_1"),
        predicate: PredicatePattern::NamedNode(rdfs_label()),
        object: var("literal_1"),
    };
    assert_eq!(query.template, vec![expected.clone()]);
    assert_eq!(query.where_patterns, vec![QueryPattern::Bgp(vec![expected])]);
}

#[test]
fn optional_property_wraps_where_but_not_template() {
    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let optional = b.optional(label);
    let root = b.record(
        None,
        Vec::new(),
        vec![property("label", rdfs_label(), optional)],
    );
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();
    let expected = QueryTriple {
        subject: var("record_1"),
        predicate: PredicatePattern::NamedNode(rdfs_label()),
        object: var("literal_1"),
    };
    assert_eq!(query.template, vec![expected.clone()]);
    assert_eq!(
        query.where_patterns,
        vec![QueryPattern::Optional(vec![QueryPattern::Bgp(vec![expected])])]
    );
}

#[test]
fn union_emits_one_group_per_variant() {
    let mut b = ShapeBuilder::new("t");
    let lit_a = b.literal(Default::default());
    let lit_b = b.literal(Default::default());
    let rec_a = b.record(None, Vec::new(), vec![property("a", node("p"), lit_a)]);
    let rec_b = b.record(None, Vec::new(), vec![property("b", node("q"), lit_b)]);
    let root = b.any_of(None, vec![rec_a, rec_b]);
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();
    assert_eq!(query.template.len(), 2);
    match &query.where_patterns[..] {
        [QueryPattern::Union(groups)] => {
            assert_eq!(groups.len(), 2);
            assert!(matches!(&groups[0][..], [QueryPattern::Bgp(_)]));
            assert!(matches!(&groups[1][..], [QueryPattern::Bgp(_)]));
        }
        other => panic!("expected a union, found {:?}", other),
    }
}

#[test]
fn fixed_self_resource_becomes_the_subject() {
    let mut b = ShapeBuilder::new("t");
    let id = b.constant(oxrdf::Term::NamedNode(node("s")));
    let label = b.literal(Default::default());
    let root = b.record(
        None,
        Vec::new(),
        vec![
            self_property("id", id),
            property("label", rdfs_label(), label),
        ],
    );
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();
    assert_eq!(query.template.len(), 1);
    assert_eq!(query.template[0].subject, TermPattern::NamedNode(node("s")));
}

#[test]
fn sequence_paths_flatten_into_template_blanks() {
    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let root = b.record(
        None,
        Vec::new(),
        vec![path_property(
            "deep",
            PropertyPath::Sequence(vec![
                PropertyPath::predicate(node("p")),
                PropertyPath::predicate(node("q")),
            ]),
            label,
        )],
    );
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();
    // Two atomic template triples chained through a fresh blank node.
    assert_eq!(query.template.len(), 2);
    assert_eq!(
        query.template[0].predicate,
        PredicatePattern::NamedNode(node("p"))
    );
    assert_eq!(
        query.template[1].predicate,
        PredicatePattern::NamedNode(node("q"))
    );
    assert_eq!(query.template[0].object, query.template[1].subject);
    assert!(matches!(query.template[0].object, TermPattern::BlankNode(_)));
    // The WHERE side keeps the whole path on one triple.
    match &query.where_patterns[..] {
        [QueryPattern::Bgp(triples)] => {
            assert_eq!(triples.len(), 1);
            assert!(matches!(
                triples[0].predicate,
                PredicatePattern::Path(PropertyPathExpression::Sequence(_, _))
            ));
        }
        other => panic!("expected a bgp, found {:?}", other),
    }
}

#[test]
fn inverse_edges_reverse_subject_and_object_in_template() {
    let mut b = ShapeBuilder::new("t");
    let child = b.resource_term();
    let root = b.record(
        None,
        Vec::new(),
        vec![inverse_property("children", node("childOf"), child)],
    );
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();
    assert_eq!(query.template.len(), 1);
    assert_eq!(query.template[0].subject, var("resource_1"));
    assert_eq!(query.template[0].object, var("record_1"));
    assert_eq!(
        query.template[0].predicate,
        PredicatePattern::NamedNode(node("childOf"))
    );
}

#[test]
fn recursive_record_expands_into_transitive_path() {
    let rec_id = ShapeId::named(node("Node"));
    let mut b = ShapeBuilder::new("t");
    b.record(
        Some(rec_id.clone()),
        Vec::new(),
        vec![property("next", node("next"), rec_id.clone())],
    );
    let shapes = b.build().unwrap();

    let query = generate_query(QueryParams::new(&rec_id, &shapes)).unwrap();
    let transitive = PropertyPathExpression::ZeroOrMore(Box::new(
        PropertyPathExpression::NamedNode(node("next")),
    ));
    match &query.where_patterns[..] {
        [QueryPattern::Bgp(triples)] => {
            assert_eq!(triples.len(), 1);
            assert_eq!(triples[0].predicate, PredicatePattern::Path(transitive));
            assert_eq!(triples[0].subject, var("record_1"));
            assert_eq!(triples[0].object, var("record_2"));
        }
        other => panic!("expected a single bgp, found {:?}", other),
    }
}

#[test]
fn emit_hook_can_append_filters() {
    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let root = b.record(
        None,
        Vec::new(),
        vec![property("label", rdfs_label(), label)],
    );
    let shapes = b.build().unwrap();

    let mut filters = 0usize;
    let mut hook = |shape: &ramp::Shape, subject: &TermPattern, out: &mut Vec<QueryPattern>| {
        if matches!(shape, ramp::Shape::Literal(_)) {
            if let TermPattern::Variable(v) = subject {
                out.push(QueryPattern::Filter(Expression::Bound(v.clone())));
                filters += 1;
            }
        }
    };
    let mut params = QueryParams::new(&root, &shapes);
    params.on_emit = Some(&mut hook);
    let query = generate_query(params).unwrap();
    assert_eq!(filters, 1);
    assert!(query
        .where_patterns
        .iter()
        .any(|p| matches!(p, QueryPattern::Filter(_))));
}

#[test]
fn template_covers_flattened_quads() {
    use ramp::{flatten, FlattenParams, Value};

    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let tag = b.literal(Default::default());
    let tags = b.set(tag);
    let root = b.record(
        None,
        Vec::new(),
        vec![
            property("label", rdfs_label(), label),
            property("tags", node("tag"), tags),
        ],
    );
    let shapes = b.build().unwrap();

    let value = Value::object([
        ("label".to_string(), Value::String("l".into())),
        (
            "tags".to_string(),
            Value::Array(vec![Value::String("a".into()), Value::String("b".into())]),
        ),
    ]);
    let quads = flatten(FlattenParams::new(&root, &shapes, &value)).unwrap();
    let query = generate_query(QueryParams::new(&root, &shapes)).unwrap();

    // Every emitted quad must be coverable by some template triple.
    for quad in &quads {
        assert!(query.template.iter().any(
            |triple| triple.predicate == PredicatePattern::NamedNode(quad.predicate.clone())
        ));
    }
}

#[test]
fn prefixes_and_base_are_carried_through() {
    let mut b = ShapeBuilder::new("t");
    let label = b.literal(Default::default());
    let root = b.record(
        None,
        Vec::new(),
        vec![property("label", rdfs_label(), label)],
    );
    let shapes = b.build().unwrap();

    let mut params = QueryParams::new(&root, &shapes);
    params.base = Some("http://example.com/".into());
    params.prefixes = vec![("rdfs".into(), "http://www.w3.org/2000/01/rdf-schema#".into())];
    let query = generate_query(params).unwrap();
    assert_eq!(query.base.as_deref(), Some("http://example.com/"));
    assert_eq!(query.prefixes.len(), 1);
}
