//! Bidirectional conversion between RDF terms and native scalars.
//!
//! `from_rdf` maps through the native type table first and then through
//! vocabulary resolution; `to_rdf` composes the same steps the other way
//! around. Terminal shapes marked `keep_as_term` bypass both.

use crate::error::{ErrorCode, RampError};
use crate::shape::{LiteralShape, ResourceShape, Shape};
use crate::value::{Number, Value};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, Literal, NamedNode, Term};
use oxsdatatypes::{Decimal, Double, Integer};
use std::str::FromStr;

/// Converts a matched term to its native value under a terminal shape.
pub fn from_rdf(term: &Term, shape: &Shape) -> Result<Value, RampError> {
    match shape {
        Shape::Resource(resource) => resource_from_rdf(term, resource),
        Shape::Literal(literal) => literal_from_rdf(term, literal),
        _ => Err(RampError::new(
            ErrorCode::ShapeMismatch,
            format!("shape {} is not a terminal shape", shape.id()),
        )),
    }
}

/// Converts a native value back to an RDF term under a terminal shape.
pub fn to_rdf(value: &Value, shape: &Shape) -> Result<Term, RampError> {
    match shape {
        Shape::Resource(resource) => resource_to_rdf(value, resource),
        Shape::Literal(literal) => literal_to_rdf(value, literal),
        _ => Err(RampError::new(
            ErrorCode::ShapeMismatch,
            format!("shape {} is not a terminal shape", shape.id()),
        )),
    }
}

pub(crate) fn resource_from_rdf(
    term: &Term,
    shape: &ResourceShape,
) -> Result<Value, RampError> {
    if shape.keep_as_term {
        return Ok(Value::Term(term.clone()));
    }
    if let Some(vocabulary) = &shape.vocabulary {
        let Term::NamedNode(node) = term else {
            return Err(RampError::new(
                ErrorCode::NonMatchingTermType,
                format!("vocabulary shapes match named nodes only, found {}", term),
            ));
        };
        return match vocabulary.key_of(node) {
            Some(key) => Ok(Value::String(key.into())),
            None => Err(RampError::new(
                ErrorCode::NonMatchingTermValue,
                format!("term {} is not part of the vocabulary", node),
            )),
        };
    }
    match term {
        Term::NamedNode(node) => Ok(Value::String(node.as_str().into())),
        Term::BlankNode(node) => Ok(Value::String(format!("_:{}", node.as_str()))),
        _ => Err(RampError::new(
            ErrorCode::NonMatchingTermType,
            format!("expected a resource, found {}", term),
        )),
    }
}

pub(crate) fn resource_to_rdf(
    value: &Value,
    shape: &ResourceShape,
) -> Result<Term, RampError> {
    if let Value::Term(term) = value {
        return Ok(term.clone());
    }
    let Value::String(text) = value else {
        return Err(RampError::new(
            ErrorCode::ShapeMismatch,
            format!("cannot make a resource out of a {}", value.kind_name()),
        ));
    };
    if let Some(vocabulary) = &shape.vocabulary {
        return match vocabulary.term_of(text) {
            Some(term) => Ok(Term::NamedNode(term.clone())),
            None => Err(RampError::new(
                ErrorCode::NonMatchingTermValue,
                format!("key \"{}\" is not part of the vocabulary", text),
            )),
        };
    }
    if let Some(id) = text.strip_prefix("_:") {
        let node = BlankNode::new(id).map_err(|e| {
            RampError::new(
                ErrorCode::ShapeMismatch,
                format!("invalid blank node id \"{}\": {}", id, e),
            )
        })?;
        return Ok(Term::BlankNode(node));
    }
    let node = NamedNode::new(text).map_err(|e| {
        RampError::new(
            ErrorCode::ShapeMismatch,
            format!("invalid IRI \"{}\": {}", text, e),
        )
    })?;
    Ok(Term::NamedNode(node))
}

pub(crate) fn literal_from_rdf(term: &Term, shape: &LiteralShape) -> Result<Value, RampError> {
    let Term::Literal(literal) = term else {
        return Err(RampError::new(
            ErrorCode::NonMatchingTermType,
            format!("expected a literal, found {}", term),
        ));
    };
    if shape.keep_as_term {
        return Ok(Value::Term(term.clone()));
    }
    let datatype = literal.datatype();
    if literal.language().is_some() || datatype == xsd::STRING {
        return Ok(Value::String(literal.value().into()));
    }
    if datatype == xsd::BOOLEAN {
        // The lexical form "false" maps to false, everything else to true.
        return Ok(Value::Bool(literal.value() != "false"));
    }
    if datatype == xsd::INTEGER || datatype == xsd::NON_NEGATIVE_INTEGER {
        let parsed = Integer::from_str(literal.value()).map_err(|e| {
            RampError::new(
                ErrorCode::ShapeMismatch,
                format!("invalid integer literal \"{}\": {}", literal.value(), e),
            )
        })?;
        return Ok(Value::Number(Number::Integer(i64::from(parsed))));
    }
    if datatype == xsd::DECIMAL {
        let parsed = Decimal::from_str(literal.value()).map_err(|e| {
            RampError::new(
                ErrorCode::ShapeMismatch,
                format!("invalid decimal literal \"{}\": {}", literal.value(), e),
            )
        })?;
        return Ok(Value::Number(Number::Float(f64::from(Double::from(parsed)))));
    }
    if datatype == xsd::DOUBLE {
        let parsed = Double::from_str(literal.value()).map_err(|e| {
            RampError::new(
                ErrorCode::ShapeMismatch,
                format!("invalid double literal \"{}\": {}", literal.value(), e),
            )
        })?;
        return Ok(Value::Number(Number::Float(f64::from(parsed))));
    }
    // Literals of other datatypes stay opaque so they survive round trips.
    Ok(Value::Term(term.clone()))
}

pub(crate) fn literal_to_rdf(value: &Value, shape: &LiteralShape) -> Result<Term, RampError> {
    if let Value::Term(term) = value {
        return match term {
            Term::Literal(_) => Ok(term.clone()),
            _ => Err(RampError::new(
                ErrorCode::NonMatchingTermType,
                format!("expected a literal term, found {}", term),
            )),
        };
    }
    let lexical = match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(Number::Integer(i)) => i.to_string(),
        Value::Number(Number::Float(d)) => float_lexical(*d),
        _ => {
            return Err(RampError::new(
                ErrorCode::ShapeMismatch,
                format!("cannot make a literal out of a {}", value.kind_name()),
            ))
        }
    };
    if let Some(language) = &shape.language {
        return Ok(Term::Literal(Literal::new_language_tagged_literal_unchecked(
            lexical,
            language.clone(),
        )));
    }
    let datatype = shape.datatype.clone().unwrap_or_else(|| match value {
        Value::Bool(_) => xsd::BOOLEAN.into_owned(),
        Value::Number(Number::Integer(_)) => xsd::INTEGER.into_owned(),
        Value::Number(Number::Float(_)) => xsd::DOUBLE.into_owned(),
        _ => xsd::STRING.into_owned(),
    });
    Ok(Term::Literal(Literal::new_typed_literal(lexical, datatype)))
}

fn float_lexical(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value == f64::INFINITY {
        "INF".into()
    } else if value == f64::NEG_INFINITY {
        "-INF".into()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShapeId, Vocabulary};

    fn literal_shape() -> LiteralShape {
        LiteralShape {
            id: ShapeId::blank(BlankNode::new_unchecked("l")),
            datatype: None,
            language: None,
            value: None,
            keep_as_term: false,
        }
    }

    fn resource_shape() -> ResourceShape {
        ResourceShape {
            id: ShapeId::blank(BlankNode::new_unchecked("r")),
            only_named: false,
            keep_as_term: false,
            value: None,
            vocabulary: None,
        }
    }

    #[test]
    fn scalar_table() {
        let shape = literal_shape();
        let cases = [
            (Literal::new_simple_literal("hi"), Value::String("hi".into())),
            (
                Literal::new_typed_literal("+42", xsd::INTEGER),
                Value::Number(Number::Integer(42)),
            ),
            (
                Literal::new_typed_literal("1.5", xsd::DECIMAL),
                Value::Number(Number::Float(1.5)),
            ),
            (
                Literal::new_typed_literal("INF", xsd::DOUBLE),
                Value::Number(Number::Float(f64::INFINITY)),
            ),
            (
                Literal::new_typed_literal("false", xsd::BOOLEAN),
                Value::Bool(false),
            ),
            (
                Literal::new_typed_literal("1", xsd::BOOLEAN),
                Value::Bool(true),
            ),
        ];
        for (literal, expected) in cases {
            assert_eq!(
                literal_from_rdf(&Term::Literal(literal), &shape).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn unknown_datatypes_stay_opaque() {
        let shape = literal_shape();
        let term = Term::Literal(Literal::new_typed_literal(
            "2001",
            NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#gYear"),
        ));
        assert_eq!(
            literal_from_rdf(&term, &shape).unwrap(),
            Value::Term(term.clone())
        );
        assert_eq!(literal_to_rdf(&Value::Term(term.clone()), &shape).unwrap(), term);
    }

    #[test]
    fn resources_round_trip_through_strings() {
        let shape = resource_shape();
        let named = Term::NamedNode(NamedNode::new_unchecked("http://example.com/x"));
        let as_value = resource_from_rdf(&named, &shape).unwrap();
        assert_eq!(as_value, Value::String("http://example.com/x".into()));
        assert_eq!(resource_to_rdf(&as_value, &shape).unwrap(), named);

        let blank = Term::BlankNode(BlankNode::new_unchecked("b0"));
        let as_value = resource_from_rdf(&blank, &shape).unwrap();
        assert_eq!(as_value, Value::String("_:b0".into()));
        assert_eq!(resource_to_rdf(&as_value, &shape).unwrap(), blank);
    }

    #[test]
    fn vocabulary_maps_terms_to_keys() {
        let mut shape = resource_shape();
        shape.vocabulary = Some(Vocabulary::from_iter([(
            "value",
            NamedNode::new_unchecked("http://example.com/Value"),
        )]));
        let term = Term::NamedNode(NamedNode::new_unchecked("http://example.com/Value"));
        assert_eq!(
            resource_from_rdf(&term, &shape).unwrap(),
            Value::String("value".into())
        );
        assert_eq!(
            resource_to_rdf(&Value::String("value".into()), &shape).unwrap(),
            term
        );
        let unknown = Term::NamedNode(NamedNode::new_unchecked("http://example.com/Other"));
        assert_eq!(
            resource_from_rdf(&unknown, &shape).unwrap_err().code(),
            ErrorCode::NonMatchingTermValue
        );
        assert_eq!(
            resource_to_rdf(&Value::String("other".into()), &shape)
                .unwrap_err()
                .code(),
            ErrorCode::NonMatchingTermValue
        );
    }

    #[test]
    fn floats_use_xsd_lexical_forms() {
        let shape = literal_shape();
        let term = literal_to_rdf(&Value::Number(Number::Float(f64::NEG_INFINITY)), &shape)
            .unwrap();
        assert_eq!(
            term,
            Term::Literal(Literal::new_typed_literal("-INF", xsd::DOUBLE))
        );
    }
}
