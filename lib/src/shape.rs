//! The shape algebra: the declarative description of how a fragment of RDF
//! corresponds to a piece of structured data.

use crate::error::{ErrorCode, RampError};
use crate::types::{PropertyPath, ShapeId, ShapeReference, Vocabulary};
use crate::value::Value;
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNode, Term};
use rustc_hash::FxHashMap;

/// Describes a named or blank node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceShape {
    pub id: ShapeId,
    /// Reject blank nodes.
    pub only_named: bool,
    /// Present matches as RDF terms instead of strings.
    pub keep_as_term: bool,
    /// The matched term must equal this one.
    pub value: Option<Term>,
    /// Present matches as vocabulary keys.
    pub vocabulary: Option<Vocabulary>,
}

impl ResourceShape {
    /// Checks the term against this shape, reporting the first violation.
    pub fn check_term(&self, term: &Term) -> Result<(), RampError> {
        match term {
            Term::NamedNode(_) => {}
            Term::BlankNode(_) => {
                if self.only_named {
                    return Err(RampError::new(
                        ErrorCode::NonMatchingTermType,
                        format!("expected a named node, found blank node {}", term),
                    ));
                }
            }
            _ => {
                return Err(RampError::new(
                    ErrorCode::NonMatchingTermType,
                    format!("expected a resource, found {}", term),
                ))
            }
        }
        if let Some(expected) = &self.value {
            if expected != term {
                return Err(RampError::new(
                    ErrorCode::NonMatchingTermValue,
                    format!("expected {}, found {}", expected, term),
                ));
            }
        }
        Ok(())
    }

    /// Whether the term satisfies this shape.
    pub fn matches_term(&self, term: &Term) -> bool {
        self.check_term(term).is_ok()
    }
}

/// Describes a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralShape {
    pub id: ShapeId,
    pub datatype: Option<NamedNode>,
    pub language: Option<String>,
    /// The matched literal must equal this one.
    pub value: Option<Literal>,
    /// Present matches as RDF terms instead of native scalars.
    pub keep_as_term: bool,
}

impl LiteralShape {
    /// Checks the term against this shape, reporting the first violation.
    pub fn check_term(&self, term: &Term) -> Result<(), RampError> {
        let literal = match term {
            Term::Literal(literal) => literal,
            _ => {
                return Err(RampError::new(
                    ErrorCode::NonMatchingTermType,
                    format!("expected a literal, found {}", term),
                ))
            }
        };
        if let Some(datatype) = &self.datatype {
            if literal.datatype() != datatype.as_ref() {
                return Err(RampError::new(
                    ErrorCode::NonMatchingLiteralDatatype,
                    format!(
                        "expected datatype {}, found {}",
                        datatype,
                        literal.datatype()
                    ),
                ));
            }
        }
        if let Some(language) = &self.language {
            if literal.language() != Some(language.as_str()) {
                return Err(RampError::new(
                    ErrorCode::NonMatchingLiteralLanguage,
                    format!(
                        "expected language \"{}\", found {}",
                        language,
                        literal
                            .language()
                            .map(|l| format!("\"{}\"", l))
                            .unwrap_or_else(|| "none".into())
                    ),
                ));
            }
        }
        if let Some(expected) = &self.value {
            if expected != literal {
                return Err(RampError::new(
                    ErrorCode::NonMatchingTermValue,
                    format!("expected {}, found {}", expected, literal),
                ));
            }
        }
        Ok(())
    }

    /// Whether the term satisfies this shape.
    pub fn matches_term(&self, term: &Term) -> bool {
        self.check_term(term).is_ok()
    }
}

/// A named edge of a record: where to navigate and what to expect there.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    pub name: String,
    pub path: PropertyPath,
    pub value_shape: ShapeId,
    /// Synthesised from sibling matches on flatten instead of being read
    /// from the value, and omitted from framed objects.
    pub transient: bool,
}

impl ObjectProperty {
    pub fn new(name: impl Into<String>, path: PropertyPath, value_shape: impl Into<ShapeId>) -> Self {
        ObjectProperty {
            name: name.into(),
            path,
            value_shape: value_shape.into(),
            transient: false,
        }
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// Describes an object with named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    pub id: ShapeId,
    /// Discriminators: a candidate failing one is silently rejected, while a
    /// candidate passing all of them must satisfy every remaining property.
    pub type_properties: Vec<ObjectProperty>,
    pub properties: Vec<ObjectProperty>,
}

impl RecordShape {
    /// Type properties first, then plain properties, in declared order.
    pub fn all_properties(&self) -> impl Iterator<Item = &ObjectProperty> {
        self.type_properties.iter().chain(self.properties.iter())
    }
}

/// Describes a value matching any of several shapes, tried in order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyOfShape {
    pub id: ShapeId,
    pub variants: Vec<ShapeId>,
}

/// Describes an unordered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SetShape {
    pub id: ShapeId,
    pub item: ShapeId,
    pub min_count: Option<usize>,
    pub max_count: Option<usize>,
}

/// Describes zero-or-one value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalShape {
    pub id: ShapeId,
    pub item: ShapeId,
    /// The value standing for "absent"; `Null` unless overridden.
    pub empty_value: Value,
}

/// Describes an RDF linked list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListShape {
    pub id: ShapeId,
    pub item: ShapeId,
    /// Path from a cell to its item; `rdf:first` unless overridden.
    pub head: Option<PropertyPath>,
    /// Path from a cell to the next cell; `rdf:rest` unless overridden.
    pub tail: Option<PropertyPath>,
    /// List terminator; `rdf:nil` unless overridden.
    pub nil: Option<Term>,
}

impl ListShape {
    pub fn head_path(&self) -> PropertyPath {
        self.head
            .clone()
            .unwrap_or_else(|| PropertyPath::predicate(rdf::FIRST))
    }

    pub fn tail_path(&self) -> PropertyPath {
        self.tail
            .clone()
            .unwrap_or_else(|| PropertyPath::predicate(rdf::REST))
    }

    pub fn nil_term(&self) -> Term {
        self.nil
            .clone()
            .unwrap_or_else(|| Term::NamedNode(rdf::NIL.into_owned()))
    }
}

/// Describes a keyed collection derived from the matches of its item shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MapShape {
    pub id: ShapeId,
    /// Where the key of each entry comes from.
    pub key: ShapeReference,
    /// Where the stored value of each entry comes from; the whole item value
    /// when absent.
    pub value: Option<ShapeReference>,
    pub item: ShapeId,
}

/// A shape: the declarative description of one layer of the mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Resource(ResourceShape),
    Literal(LiteralShape),
    Record(RecordShape),
    AnyOf(AnyOfShape),
    Set(SetShape),
    Optional(OptionalShape),
    List(ListShape),
    Map(MapShape),
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        match self {
            Shape::Resource(s) => &s.id,
            Shape::Literal(s) => &s.id,
            Shape::Record(s) => &s.id,
            Shape::AnyOf(s) => &s.id,
            Shape::Set(s) => &s.id,
            Shape::Optional(s) => &s.id,
            Shape::List(s) => &s.id,
            Shape::Map(s) => &s.id,
        }
    }

    /// The kind of the shape, used in messages and query variable names.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Resource(_) => "resource",
            Shape::Literal(_) => "literal",
            Shape::Record(_) => "record",
            Shape::AnyOf(_) => "union",
            Shape::Set(_) => "set",
            Shape::Optional(_) => "optional",
            Shape::List(_) => "list",
            Shape::Map(_) => "map",
        }
    }

    /// Ids of the shapes this shape refers to.
    fn referenced_ids(&self) -> Vec<&ShapeId> {
        match self {
            Shape::Resource(_) | Shape::Literal(_) => Vec::new(),
            Shape::Record(record) => record
                .all_properties()
                .map(|p| &p.value_shape)
                .collect(),
            Shape::AnyOf(any_of) => any_of.variants.iter().collect(),
            Shape::Set(set) => vec![&set.item],
            Shape::Optional(optional) => vec![&optional.item],
            Shape::List(list) => vec![&list.item],
            Shape::Map(map) => {
                let mut ids = vec![&map.item, &map.key.target];
                if let Some(value) = &map.value {
                    ids.push(&value.target);
                }
                ids
            }
        }
    }
}

/// An immutable arena of shapes addressed by [`ShapeId`].
#[derive(Debug, Clone, Default)]
pub struct ShapeSet {
    shapes: Vec<Shape>,
    index: FxHashMap<ShapeId, usize>,
}

impl ShapeSet {
    /// Builds a shape set, checking the structural invariants: every id is
    /// unique, every reference resolves, and record property names do not
    /// repeat within one record.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, RampError> {
        let mut index = FxHashMap::default();
        for (position, shape) in shapes.iter().enumerate() {
            if index.insert(shape.id().clone(), position).is_some() {
                return Err(RampError::new(
                    ErrorCode::ShapeMismatch,
                    format!("duplicate shape id {}", shape.id()),
                ));
            }
        }
        let set = ShapeSet { shapes, index };
        for shape in &set.shapes {
            for id in shape.referenced_ids() {
                if !set.index.contains_key(id) {
                    return Err(RampError::new(
                        ErrorCode::MissingShape,
                        format!("shape {} references unknown shape {}", shape.id(), id),
                    ));
                }
            }
            if let Shape::Record(record) = shape {
                let mut names = Vec::new();
                for property in record.all_properties() {
                    if names.contains(&property.name.as_str()) {
                        return Err(RampError::new(
                            ErrorCode::ShapeMismatch,
                            format!(
                                "duplicate property \"{}\" in record {}",
                                property.name,
                                record.id
                            ),
                        ));
                    }
                    names.push(property.name.as_str());
                }
            }
        }
        Ok(set)
    }

    /// Resolves an id or fails with [`ErrorCode::MissingShape`].
    pub fn get(&self, id: &ShapeId) -> Result<&Shape, RampError> {
        self.find(id).ok_or_else(|| {
            RampError::new(ErrorCode::MissingShape, format!("unknown shape {}", id))
        })
    }

    pub fn find(&self, id: &ShapeId) -> Option<&Shape> {
        self.index.get(id).map(|position| &self.shapes[*position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::xsd;
    use oxrdf::BlankNode;

    fn resource(id: ShapeId) -> Shape {
        Shape::Resource(ResourceShape {
            id,
            only_named: false,
            keep_as_term: false,
            value: None,
            vocabulary: None,
        })
    }

    #[test]
    fn rejects_unresolved_references() {
        let id = ShapeId::blank(BlankNode::new_unchecked("s1"));
        let missing = ShapeId::blank(BlankNode::new_unchecked("nowhere"));
        let shape = Shape::Set(SetShape {
            id: id.clone(),
            item: missing,
            min_count: None,
            max_count: None,
        });
        let error = ShapeSet::new(vec![shape]).unwrap_err();
        assert_eq!(error.code(), ErrorCode::MissingShape);
    }

    #[test]
    fn rejects_duplicate_property_names() {
        let item = ShapeId::blank(BlankNode::new_unchecked("i"));
        let record = ShapeId::blank(BlankNode::new_unchecked("r"));
        let shape = Shape::Record(RecordShape {
            id: record,
            type_properties: Vec::new(),
            properties: vec![
                ObjectProperty::new("a", PropertyPath::self_path(), item.clone()),
                ObjectProperty::new("a", PropertyPath::self_path(), item.clone()),
            ],
        });
        let error = ShapeSet::new(vec![shape, resource(item)]).unwrap_err();
        assert_eq!(error.code(), ErrorCode::ShapeMismatch);
    }

    #[test]
    fn literal_match_reports_specific_codes() {
        let shape = LiteralShape {
            id: ShapeId::blank(BlankNode::new_unchecked("l")),
            datatype: Some(xsd::INTEGER.into_owned()),
            language: None,
            value: None,
            keep_as_term: false,
        };
        let named = Term::NamedNode(oxrdf::NamedNode::new_unchecked("http://example.com/x"));
        assert_eq!(
            shape.check_term(&named).unwrap_err().code(),
            ErrorCode::NonMatchingTermType
        );
        let string = Term::Literal(Literal::new_simple_literal("a"));
        assert_eq!(
            shape.check_term(&string).unwrap_err().code(),
            ErrorCode::NonMatchingLiteralDatatype
        );
        let number = Term::Literal(Literal::new_typed_literal("42", xsd::INTEGER));
        assert!(shape.matches_term(&number));
    }
}
