use oxrdf::vocab::xsd;
use oxrdf::NamedNode;
use ramp::builder::{property, self_property, ListOptions, ShapeBuilder};
use ramp::shapes_for_shapes::{
    shape_from_value, shape_to_value, shapes_for_shapes, shapes_from_dataset, shapes_to_dataset,
};
use ramp::test_utils::isomorphic;
use ramp::{frame, FrameParams, PropertyPath, ShapeReference, TermPart, Vocabulary};

#[test]
fn schema_describes_itself() {
    let (schema, root) = shapes_for_shapes().unwrap();
    assert!(schema.find(&root).is_some());

    let encoded = shapes_to_dataset(&schema).unwrap();
    let decoded = shapes_from_dataset(&encoded).unwrap();
    assert_eq!(decoded.len(), schema.len());
    for shape in schema.iter() {
        assert_eq!(decoded.find(shape.id()), Some(shape));
    }

    // Re-encoding the decoded schema reproduces the same graph modulo blank
    // node renaming.
    let re_encoded = shapes_to_dataset(&decoded).unwrap();
    assert!(isomorphic(&encoded, &re_encoded));
}

#[test]
fn decoded_schema_can_frame_its_own_encoding() {
    let (schema, root) = shapes_for_shapes().unwrap();
    let encoded = shapes_to_dataset(&schema).unwrap();
    let decoded = shapes_from_dataset(&encoded).unwrap();

    // Use the decoded schema, not the built-in one, to frame the encoding
    // again: the structures must agree.
    let solutions = frame(FrameParams::new(&root, &decoded, &encoded)).unwrap();
    let mut ids = std::collections::BTreeSet::new();
    for solution in &solutions {
        let shape = shape_from_value(&solution.value).unwrap();
        assert_eq!(decoded.find(shape.id()), Some(&shape));
        ids.insert(shape.id().to_string());
    }
    assert_eq!(ids.len(), schema.len());
}

#[test]
fn user_schema_round_trips_through_rdf() {
    let ex = |local: &str| NamedNode::new_unchecked(format!("http://example.com/{}", local));
    let mut b = ShapeBuilder::new("user");
    let name = b.literal_typed(xsd::STRING);
    let id = b.resource_term();
    let status = b.resource(ramp::builder::ResourceOptions {
        only_named: true,
        vocabulary: Some(Vocabulary::from_iter([
            ("open", ex("Open")),
            ("closed", ex("Closed")),
        ])),
        ..Default::default()
    });
    let tags = b.set_with_counts(name.clone(), Some(1), Some(16));
    let steps = b.list_with(
        name.clone(),
        ListOptions {
            head: Some(PropertyPath::predicate(ex("stepValue"))),
            tail: Some(PropertyPath::predicate(ex("nextStep"))),
            ..Default::default()
        },
    );
    let label = b.literal(Default::default());
    let labels = b.map(
        ShapeReference::part(label.clone(), TermPart::Language),
        None,
        label,
    );
    let marker = b.constant(oxrdf::Term::NamedNode(ex("Issue")));
    let related = b.resource_term();
    let issue = b.record(
        None,
        vec![property("type", oxrdf::vocab::rdf::TYPE, marker).transient()],
        vec![
            self_property("id", id),
            property("name", ex("name"), name.clone()),
            property("status", ex("status"), status),
            property("tags", ex("tag"), tags),
            property("steps", ex("steps"), steps),
            property("labels", ex("label"), labels),
            ramp::builder::path_property(
                "related",
                PropertyPath::ZeroOrMore(Box::new(PropertyPath::Alternative(vec![
                    PropertyPath::predicate(ex("relatesTo")),
                    PropertyPath::inverse(PropertyPath::predicate(ex("relatedFrom"))),
                ]))),
                related,
            ),
        ],
    );
    let shapes = b.build().unwrap();

    let encoded = shapes_to_dataset(&shapes).unwrap();
    let decoded = shapes_from_dataset(&encoded).unwrap();
    assert_eq!(decoded.len(), shapes.len());
    for shape in shapes.iter() {
        assert_eq!(decoded.find(shape.id()), Some(shape));
    }
    assert!(decoded.find(&issue).is_some());
}

#[test]
fn shape_values_encode_and_decode_directly() {
    let (schema, _) = shapes_for_shapes().unwrap();
    for shape in schema.iter() {
        let value = shape_to_value(shape);
        let decoded = shape_from_value(&value).unwrap();
        assert_eq!(&decoded, shape);
    }
}
