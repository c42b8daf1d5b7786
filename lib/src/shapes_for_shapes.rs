//! The schema that describes the shape algebra in terms of itself, and the
//! conversions it enables between shape sets and their RDF encoding.

use crate::builder::{
    property, self_property, LiteralOptions, ResourceOptions, ShapeBuilder,
};
use crate::dataset::Dataset;
use crate::error::{ErrorCode, RampError};
use crate::flattening::{flatten, FlattenParams};
use crate::framing::{frame, FrameParams};
use crate::shape::{
    AnyOfShape, ListShape, LiteralShape, MapShape, ObjectProperty, OptionalShape, RecordShape,
    ResourceShape, SetShape, Shape, ShapeSet,
};
use crate::types::{PropertyPath, ShapeId, ShapeReference, TermPart, Vocabulary};
use crate::value::{Number, Value};
use crate::vocab::ramp;
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{NamedNode, Term};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// Builds the self-describing schema; returns it with its root shape id.
pub fn shapes_for_shapes() -> Result<(ShapeSet, ShapeId), RampError> {
    let mut b = ShapeBuilder::new("ramp");
    let path_id = ShapeId::named(NamedNode::new_unchecked(
        "http://ramp-shapes.github.io/schema#PropertyPath",
    ));

    // Shared terminals.
    let term = b.resource_term();
    let string = b.literal_typed(xsd::STRING);
    let boolean = b.literal_typed(xsd::BOOLEAN);
    let count = b.literal_typed(xsd::NON_NEGATIVE_INTEGER);
    let fixed_literal = b.literal(LiteralOptions {
        keep_as_term: true,
        ..LiteralOptions::default()
    });
    let opt_bool = b.optional(boolean);
    let opt_term = b.optional(term.clone());
    let opt_string = b.optional(string.clone());
    let opt_count = b.optional(count);
    let opt_fixed_literal = b.optional(fixed_literal);

    // Property paths: a predicate wrapper, a sequence list, and one record
    // per operator, disambiguated purely by structure.
    let pred_rec = b.record(
        None,
        Vec::new(),
        vec![property("predicate", ramp::PREDICATE, term.clone())],
    );
    let seq_list = b.list(path_id.clone());
    let inv_rec = b.record(
        None,
        Vec::new(),
        vec![property("inverse", ramp::INVERSE_PATH, path_id.clone())],
    );
    let alt_rec = b.record(
        None,
        Vec::new(),
        vec![property("alternatives", ramp::ALTERNATIVE_PATH, seq_list.clone())],
    );
    let zom_rec = b.record(
        None,
        Vec::new(),
        vec![property("zeroOrMore", ramp::ZERO_OR_MORE_PATH, path_id.clone())],
    );
    let zoo_rec = b.record(
        None,
        Vec::new(),
        vec![property("zeroOrOne", ramp::ZERO_OR_ONE_PATH, path_id.clone())],
    );
    let oom_rec = b.record(
        None,
        Vec::new(),
        vec![property("oneOrMore", ramp::ONE_OR_MORE_PATH, path_id.clone())],
    );
    let path = b.any_of(
        Some(path_id),
        vec![pred_rec, seq_list, inv_rec, alt_rec, zom_rec, zoo_rec, oom_rec],
    );
    let opt_path = b.optional(path.clone());

    // Object properties.
    let prop_rec = b.record(
        Some(ShapeId::named(NamedNode::new_unchecked(
            "http://ramp-shapes.github.io/schema#Property",
        ))),
        Vec::new(),
        vec![
            property("name", ramp::NAME, string.clone()),
            property("path", ramp::PATH, path),
            property("shape", ramp::SHAPE_REF, term.clone()),
            property("transient", ramp::TRANSIENT, opt_bool.clone()),
        ],
    );
    let prop_list = b.list(prop_rec);

    // Term-part references.
    let part = b.resource(ResourceOptions {
        vocabulary: Some(Vocabulary::from_iter([
            ("value", ramp::TERM_VALUE),
            ("datatype", ramp::TERM_DATATYPE),
            ("language", ramp::TERM_LANGUAGE),
        ])),
        ..ResourceOptions::default()
    });
    let opt_part = b.optional(part);
    let ref_rec = b.record(
        Some(ShapeId::named(NamedNode::new_unchecked(
            "http://ramp-shapes.github.io/schema#Reference",
        ))),
        Vec::new(),
        vec![
            property("shape", ramp::SHAPE_REF, term.clone()),
            property("part", ramp::TERM_PART, opt_part),
        ],
    );
    let opt_ref = b.optional(ref_rec.clone());

    // Vocabularies, encoded as a map keyed by the item key literal.
    let vocab_key = b.literal_typed(xsd::STRING);
    let vocab_term = b.resource_term();
    let vocab_item = b.record(
        None,
        Vec::new(),
        vec![
            property("key", ramp::VOCAB_KEY, vocab_key.clone()),
            property("term", ramp::TERM_VALUE, vocab_term.clone()),
        ],
    );
    let vocab_map = b.map(
        ShapeReference::new(vocab_key),
        Some(ShapeReference::new(vocab_term)),
        vocab_item,
    );
    let opt_vocab = b.optional(vocab_map);

    let variant_list = b.list(term.clone());

    // One discriminated record per shape kind.
    let resource_type = b.constant(Term::NamedNode(ramp::RESOURCE.into_owned()));
    let literal_type = b.constant(Term::NamedNode(ramp::LITERAL.into_owned()));
    let record_type = b.constant(Term::NamedNode(ramp::RECORD.into_owned()));
    let any_of_type = b.constant(Term::NamedNode(ramp::ANY_OF.into_owned()));
    let set_type = b.constant(Term::NamedNode(ramp::SET.into_owned()));
    let optional_type = b.constant(Term::NamedNode(ramp::OPTIONAL.into_owned()));
    let list_type = b.constant(Term::NamedNode(ramp::LIST.into_owned()));
    let map_type = b.constant(Term::NamedNode(ramp::MAP.into_owned()));

    let resource_shape = b.record(
        Some(ramp::RESOURCE.into()),
        vec![property("type", rdf::TYPE, resource_type)],
        vec![
            self_property("id", term.clone()),
            property("onlyNamed", ramp::ONLY_NAMED, opt_bool.clone()),
            property("value", ramp::TERM_VALUE, opt_term.clone()),
            property("keepAsTerm", ramp::KEEP_AS_TERM, opt_bool.clone()),
            property("vocabulary", ramp::VOCABULARY, opt_vocab),
        ],
    );
    let literal_shape = b.record(
        Some(ramp::LITERAL.into()),
        vec![property("type", rdf::TYPE, literal_type)],
        vec![
            self_property("id", term.clone()),
            property("datatype", ramp::TERM_DATATYPE, opt_term.clone()),
            property("language", ramp::TERM_LANGUAGE, opt_string),
            property("value", ramp::TERM_VALUE, opt_fixed_literal),
            property("keepAsTerm", ramp::KEEP_AS_TERM, opt_bool.clone()),
        ],
    );
    let record_shape = b.record(
        Some(ramp::RECORD.into()),
        vec![property("type", rdf::TYPE, record_type)],
        vec![
            self_property("id", term.clone()),
            property("typeProperties", ramp::TYPE_PROPERTY, prop_list.clone()),
            property("properties", ramp::PROPERTY, prop_list),
        ],
    );
    let any_of_shape = b.record(
        Some(ramp::ANY_OF.into()),
        vec![property("type", rdf::TYPE, any_of_type)],
        vec![
            self_property("id", term.clone()),
            property("variants", ramp::VARIANT, variant_list),
        ],
    );
    let set_shape = b.record(
        Some(ramp::SET.into()),
        vec![property("type", rdf::TYPE, set_type)],
        vec![
            self_property("id", term.clone()),
            property("item", ramp::ITEM, term.clone()),
            property("minCount", ramp::MIN_COUNT, opt_count.clone()),
            property("maxCount", ramp::MAX_COUNT, opt_count),
        ],
    );
    let optional_shape = b.record(
        Some(ramp::OPTIONAL.into()),
        vec![property("type", rdf::TYPE, optional_type)],
        vec![
            self_property("id", term.clone()),
            property("item", ramp::ITEM, term.clone()),
        ],
    );
    let list_shape = b.record(
        Some(ramp::LIST.into()),
        vec![property("type", rdf::TYPE, list_type)],
        vec![
            self_property("id", term.clone()),
            property("item", ramp::ITEM, term.clone()),
            property("headPath", ramp::HEAD_PATH, opt_path.clone()),
            property("tailPath", ramp::TAIL_PATH, opt_path),
            property("nil", ramp::NIL, opt_term),
        ],
    );
    let map_shape = b.record(
        Some(ramp::MAP.into()),
        vec![property("type", rdf::TYPE, map_type)],
        vec![
            self_property("id", term.clone()),
            property("key", ramp::MAP_KEY, ref_rec),
            property("value", ramp::MAP_VALUE, opt_ref),
            property("item", ramp::ITEM, term),
        ],
    );
    let root = b.any_of(
        Some(ramp::SHAPE.into()),
        vec![
            resource_shape,
            literal_shape,
            record_shape,
            any_of_shape,
            set_shape,
            optional_shape,
            list_shape,
            map_shape,
        ],
    );
    Ok((b.build()?, root))
}

/// Flattens every shape of a set into its RDF encoding.
pub fn shapes_to_dataset(shapes: &ShapeSet) -> Result<Dataset, RampError> {
    let (schema, root) = shapes_for_shapes()?;
    let mut dataset = Dataset::new();
    for shape in shapes.iter() {
        let value = shape_to_value(shape);
        let quads = flatten(FlattenParams::new(&root, &schema, &value))?;
        dataset.extend(quads);
    }
    Ok(dataset)
}

/// Frames a shape set back out of its RDF encoding.
pub fn shapes_from_dataset(dataset: &Dataset) -> Result<ShapeSet, RampError> {
    let (schema, root) = shapes_for_shapes()?;
    let solutions = frame(FrameParams::new(&root, &schema, dataset))?;
    let mut seen = FxHashSet::default();
    let mut shapes = Vec::new();
    for solution in solutions {
        let shape = shape_from_value(&solution.value)?;
        if seen.insert(shape.id().clone()) {
            shapes.push(shape);
        }
    }
    ShapeSet::new(shapes)
}

/// Encodes one shape as the value the schema frames it to.
pub fn shape_to_value(shape: &Shape) -> Value {
    let mut object = BTreeMap::new();
    object.insert("id".to_string(), Value::Term(shape.id().as_term()));
    match shape {
        Shape::Resource(resource) => {
            object.insert("type".into(), class_term(ramp::RESOURCE));
            if resource.only_named {
                object.insert("onlyNamed".into(), Value::Bool(true));
            }
            if let Some(value) = &resource.value {
                object.insert("value".into(), Value::Term(value.clone()));
            }
            if resource.keep_as_term {
                object.insert("keepAsTerm".into(), Value::Bool(true));
            }
            if let Some(vocabulary) = &resource.vocabulary {
                object.insert(
                    "vocabulary".into(),
                    Value::Object(
                        vocabulary
                            .iter()
                            .map(|(key, term)| {
                                (key.to_string(), Value::Term(Term::NamedNode(term.clone())))
                            })
                            .collect(),
                    ),
                );
            }
        }
        Shape::Literal(literal) => {
            object.insert("type".into(), class_term(ramp::LITERAL));
            if let Some(datatype) = &literal.datatype {
                object.insert("datatype".into(), Value::Term(Term::NamedNode(datatype.clone())));
            }
            if let Some(language) = &literal.language {
                object.insert("language".into(), Value::String(language.clone()));
            }
            if let Some(value) = &literal.value {
                object.insert("value".into(), Value::Term(Term::Literal(value.clone())));
            }
            if literal.keep_as_term {
                object.insert("keepAsTerm".into(), Value::Bool(true));
            }
        }
        Shape::Record(record) => {
            object.insert("type".into(), class_term(ramp::RECORD));
            object.insert(
                "typeProperties".into(),
                Value::Array(record.type_properties.iter().map(property_to_value).collect()),
            );
            object.insert(
                "properties".into(),
                Value::Array(record.properties.iter().map(property_to_value).collect()),
            );
        }
        Shape::AnyOf(any_of) => {
            object.insert("type".into(), class_term(ramp::ANY_OF));
            object.insert(
                "variants".into(),
                Value::Array(
                    any_of
                        .variants
                        .iter()
                        .map(|id| Value::Term(id.as_term()))
                        .collect(),
                ),
            );
        }
        Shape::Set(set) => {
            object.insert("type".into(), class_term(ramp::SET));
            object.insert("item".into(), Value::Term(set.item.as_term()));
            if let Some(min) = set.min_count {
                object.insert("minCount".into(), Value::Number(Number::Integer(min as i64)));
            }
            if let Some(max) = set.max_count {
                object.insert("maxCount".into(), Value::Number(Number::Integer(max as i64)));
            }
        }
        Shape::Optional(optional) => {
            object.insert("type".into(), class_term(ramp::OPTIONAL));
            object.insert("item".into(), Value::Term(optional.item.as_term()));
        }
        Shape::List(list) => {
            object.insert("type".into(), class_term(ramp::LIST));
            object.insert("item".into(), Value::Term(list.item.as_term()));
            if let Some(head) = &list.head {
                object.insert("headPath".into(), path_to_value(head));
            }
            if let Some(tail) = &list.tail {
                object.insert("tailPath".into(), path_to_value(tail));
            }
            if let Some(nil) = &list.nil {
                object.insert("nil".into(), Value::Term(nil.clone()));
            }
        }
        Shape::Map(map) => {
            object.insert("type".into(), class_term(ramp::MAP));
            object.insert("key".into(), reference_to_value(&map.key));
            if let Some(value) = &map.value {
                object.insert("value".into(), reference_to_value(value));
            }
            object.insert("item".into(), Value::Term(map.item.as_term()));
        }
    }
    Value::Object(object)
}

/// Decodes one framed value back into a shape.
pub fn shape_from_value(value: &Value) -> Result<Shape, RampError> {
    let object = expect_object(value)?;
    let id = decode_id(object, "id")?;
    let kind = decode_named(object, "type")?;
    if kind == ramp::RESOURCE {
        Ok(Shape::Resource(ResourceShape {
            id,
            only_named: decode_flag(object, "onlyNamed"),
            keep_as_term: decode_flag(object, "keepAsTerm"),
            value: decode_optional_term(object, "value"),
            vocabulary: decode_vocabulary(object)?,
        }))
    } else if kind == ramp::LITERAL {
        let datatype = match decode_optional_term(object, "datatype") {
            Some(Term::NamedNode(node)) => Some(node),
            Some(other) => {
                return Err(decode_error(format!("literal datatype must be an IRI, found {}", other)))
            }
            None => None,
        };
        let fixed = match decode_optional_term(object, "value") {
            Some(Term::Literal(literal)) => Some(literal),
            Some(other) => {
                return Err(decode_error(format!("fixed literal value must be a literal, found {}", other)))
            }
            None => None,
        };
        Ok(Shape::Literal(LiteralShape {
            id,
            datatype,
            language: decode_optional_string(object, "language"),
            value: fixed,
            keep_as_term: decode_flag(object, "keepAsTerm"),
        }))
    } else if kind == ramp::RECORD {
        Ok(Shape::Record(RecordShape {
            id,
            type_properties: decode_properties(object.get("typeProperties"))?,
            properties: decode_properties(object.get("properties"))?,
        }))
    } else if kind == ramp::ANY_OF {
        let mut variants = Vec::new();
        if let Some(Value::Array(items)) = object.get("variants") {
            for item in items {
                variants.push(decode_id_value(item)?);
            }
        }
        Ok(Shape::AnyOf(AnyOfShape { id, variants }))
    } else if kind == ramp::SET {
        Ok(Shape::Set(SetShape {
            id,
            item: decode_id(object, "item")?,
            min_count: decode_count(object, "minCount")?,
            max_count: decode_count(object, "maxCount")?,
        }))
    } else if kind == ramp::OPTIONAL {
        Ok(Shape::Optional(OptionalShape {
            id,
            item: decode_id(object, "item")?,
            empty_value: Value::Null,
        }))
    } else if kind == ramp::LIST {
        Ok(Shape::List(ListShape {
            id,
            item: decode_id(object, "item")?,
            head: decode_optional_path(object.get("headPath"))?,
            tail: decode_optional_path(object.get("tailPath"))?,
            nil: decode_optional_term(object, "nil"),
        }))
    } else if kind == ramp::MAP {
        let key = match object.get("key") {
            Some(value) => reference_from_value(value)?,
            None => return Err(decode_error("map shape without a key reference")),
        };
        let value_ref = match object.get("value") {
            Some(Value::Null) | None => None,
            Some(value) => Some(reference_from_value(value)?),
        };
        Ok(Shape::Map(MapShape {
            id,
            key,
            value: value_ref,
            item: decode_id(object, "item")?,
        }))
    } else {
        Err(decode_error(format!("unknown shape kind {}", kind)))
    }
}

fn property_to_value(property: &ObjectProperty) -> Value {
    let mut object = BTreeMap::new();
    object.insert("name".to_string(), Value::String(property.name.clone()));
    object.insert("path".to_string(), path_to_value(&property.path));
    object.insert(
        "shape".to_string(),
        Value::Term(property.value_shape.as_term()),
    );
    if property.transient {
        object.insert("transient".to_string(), Value::Bool(true));
    }
    Value::Object(object)
}

fn path_to_value(path: &PropertyPath) -> Value {
    match path {
        PropertyPath::Predicate(predicate) => Value::object([(
            "predicate".to_string(),
            Value::Term(Term::NamedNode(predicate.clone())),
        )]),
        PropertyPath::Sequence(parts) => {
            Value::Array(parts.iter().map(path_to_value).collect())
        }
        PropertyPath::Inverse(inner) => {
            Value::object([("inverse".to_string(), path_to_value(inner))])
        }
        PropertyPath::Alternative(parts) => Value::object([(
            "alternatives".to_string(),
            Value::Array(parts.iter().map(path_to_value).collect()),
        )]),
        PropertyPath::ZeroOrMore(inner) => {
            Value::object([("zeroOrMore".to_string(), path_to_value(inner))])
        }
        PropertyPath::ZeroOrOne(inner) => {
            Value::object([("zeroOrOne".to_string(), path_to_value(inner))])
        }
        PropertyPath::OneOrMore(inner) => {
            Value::object([("oneOrMore".to_string(), path_to_value(inner))])
        }
    }
}

fn path_from_value(value: &Value) -> Result<PropertyPath, RampError> {
    match value {
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(path_from_value(item)?);
            }
            Ok(PropertyPath::Sequence(parts))
        }
        Value::Object(object) => {
            if let Some(Value::Term(Term::NamedNode(node))) = object.get("predicate") {
                return Ok(PropertyPath::Predicate(node.clone()));
            }
            if let Some(inner) = object.get("inverse") {
                return Ok(PropertyPath::Inverse(Box::new(path_from_value(inner)?)));
            }
            if let Some(Value::Array(items)) = object.get("alternatives") {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(path_from_value(item)?);
                }
                return Ok(PropertyPath::Alternative(parts));
            }
            if let Some(inner) = object.get("zeroOrMore") {
                return Ok(PropertyPath::ZeroOrMore(Box::new(path_from_value(inner)?)));
            }
            if let Some(inner) = object.get("zeroOrOne") {
                return Ok(PropertyPath::ZeroOrOne(Box::new(path_from_value(inner)?)));
            }
            if let Some(inner) = object.get("oneOrMore") {
                return Ok(PropertyPath::OneOrMore(Box::new(path_from_value(inner)?)));
            }
            Err(decode_error("unrecognised property path encoding"))
        }
        other => Err(decode_error(format!(
            "unrecognised property path encoding: {}",
            other.kind_name()
        ))),
    }
}

fn reference_to_value(reference: &ShapeReference) -> Value {
    let mut object = BTreeMap::new();
    object.insert(
        "shape".to_string(),
        Value::Term(reference.target.as_term()),
    );
    if let Some(part) = reference.part {
        let key = match part {
            TermPart::Value => "value",
            TermPart::Datatype => "datatype",
            TermPart::Language => "language",
        };
        object.insert("part".to_string(), Value::String(key.into()));
    }
    Value::Object(object)
}

fn reference_from_value(value: &Value) -> Result<ShapeReference, RampError> {
    let object = expect_object(value)?;
    let target = decode_id(object, "shape")?;
    let part = match object.get("part") {
        Some(Value::String(key)) => Some(match key.as_str() {
            "value" => TermPart::Value,
            "datatype" => TermPart::Datatype,
            "language" => TermPart::Language,
            other => return Err(decode_error(format!("unknown term part \"{}\"", other))),
        }),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(decode_error(format!(
                "term part must be a string, found a {}",
                other.kind_name()
            )))
        }
    };
    Ok(ShapeReference { target, part })
}

fn decode_properties(value: Option<&Value>) -> Result<Vec<ObjectProperty>, RampError> {
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    let mut properties = Vec::with_capacity(items.len());
    for item in items {
        let object = expect_object(item)?;
        let name = match object.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => return Err(decode_error("property without a name")),
        };
        let path = match object.get("path") {
            Some(path) => path_from_value(path)?,
            None => return Err(decode_error("property without a path")),
        };
        let mut property = ObjectProperty::new(name, path, decode_id(object, "shape")?);
        if decode_flag(object, "transient") {
            property = property.transient();
        }
        properties.push(property);
    }
    Ok(properties)
}

fn decode_vocabulary(
    object: &BTreeMap<String, Value>,
) -> Result<Option<Vocabulary>, RampError> {
    let Some(Value::Object(entries)) = object.get("vocabulary") else {
        return Ok(None);
    };
    if entries.is_empty() {
        return Ok(None);
    }
    let mut vocabulary = Vocabulary::new();
    for (key, value) in entries {
        match value {
            Value::Term(Term::NamedNode(node)) => vocabulary.insert(key.clone(), node.clone()),
            other => {
                return Err(decode_error(format!(
                    "vocabulary term for \"{}\" must be an IRI, found a {}",
                    key,
                    other.kind_name()
                )))
            }
        }
    }
    Ok(Some(vocabulary))
}

fn class_term(class: oxrdf::NamedNodeRef<'_>) -> Value {
    Value::Term(Term::NamedNode(class.into_owned()))
}

fn expect_object(value: &Value) -> Result<&BTreeMap<String, Value>, RampError> {
    value
        .as_object()
        .ok_or_else(|| decode_error(format!("expected an object, found a {}", value.kind_name())))
}

fn decode_error(message: impl Into<String>) -> RampError {
    RampError::new(ErrorCode::ShapeMismatch, message)
}

fn decode_id(object: &BTreeMap<String, Value>, key: &str) -> Result<ShapeId, RampError> {
    match object.get(key) {
        Some(value) => decode_id_value(value),
        None => Err(decode_error(format!("missing shape reference \"{}\"", key))),
    }
}

fn decode_id_value(value: &Value) -> Result<ShapeId, RampError> {
    value
        .as_term()
        .and_then(ShapeId::from_term)
        .ok_or_else(|| decode_error("shape references must be named or blank terms"))
}

fn decode_named(
    object: &BTreeMap<String, Value>,
    key: &str,
) -> Result<NamedNode, RampError> {
    match object.get(key) {
        Some(Value::Term(Term::NamedNode(node))) => Ok(node.clone()),
        _ => Err(decode_error(format!("missing IRI field \"{}\"", key))),
    }
}

fn decode_flag(object: &BTreeMap<String, Value>, key: &str) -> bool {
    matches!(object.get(key), Some(Value::Bool(true)))
}

fn decode_optional_term(object: &BTreeMap<String, Value>, key: &str) -> Option<Term> {
    match object.get(key) {
        Some(Value::Term(term)) => Some(term.clone()),
        _ => None,
    }
}

fn decode_optional_string(object: &BTreeMap<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(text)) => Some(text.clone()),
        _ => None,
    }
}

fn decode_count(
    object: &BTreeMap<String, Value>,
    key: &str,
) -> Result<Option<usize>, RampError> {
    match object.get(key) {
        Some(Value::Number(Number::Integer(count))) => {
            usize::try_from(*count).map(Some).map_err(|_| {
                decode_error(format!("count \"{}\" must be non-negative", key))
            })
        }
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(decode_error(format!(
            "count \"{}\" must be an integer, found a {}",
            key,
            other.kind_name()
        ))),
    }
}

fn decode_optional_path(value: Option<&Value>) -> Result<Option<PropertyPath>, RampError> {
    match value {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(path_from_value(value)?)),
    }
}
