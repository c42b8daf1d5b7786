//! Convenience construction of shape sets.

use crate::error::RampError;
use crate::shape::{
    AnyOfShape, ListShape, LiteralShape, MapShape, ObjectProperty, OptionalShape, RecordShape,
    ResourceShape, SetShape, Shape, ShapeSet,
};
use crate::types::{PropertyPath, ShapeId, ShapeReference, Vocabulary};
use crate::value::Value;
use oxrdf::{BlankNode, Literal, NamedNode, Term};

/// Optional attributes of a resource shape.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    pub id: Option<ShapeId>,
    pub only_named: bool,
    pub keep_as_term: bool,
    pub value: Option<Term>,
    pub vocabulary: Option<Vocabulary>,
}

/// Optional attributes of a literal shape.
#[derive(Debug, Clone, Default)]
pub struct LiteralOptions {
    pub id: Option<ShapeId>,
    pub datatype: Option<NamedNode>,
    pub language: Option<String>,
    pub value: Option<Literal>,
    pub keep_as_term: bool,
}

/// Optional attributes of a list shape.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub id: Option<ShapeId>,
    pub head: Option<PropertyPath>,
    pub tail: Option<PropertyPath>,
    pub nil: Option<Term>,
}

/// Builds shapes, assigning fresh blank ids where the caller supplies none.
///
/// The ids are sequence-keyed by the prefix given at construction, so two
/// builders seeded with different random prefixes never collide.
#[derive(Debug)]
pub struct ShapeBuilder {
    shapes: Vec<Shape>,
    prefix: String,
    counter: u64,
}

impl Default for ShapeBuilder {
    fn default() -> Self {
        ShapeBuilder::new(BlankNode::default().as_str())
    }
}

impl ShapeBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        ShapeBuilder {
            shapes: Vec::new(),
            prefix: prefix.into(),
            counter: 0,
        }
    }

    fn fresh_id(&mut self) -> ShapeId {
        self.counter += 1;
        ShapeId::Blank(BlankNode::new_unchecked(format!(
            "{}_{}",
            self.prefix, self.counter
        )))
    }

    fn push(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id().clone();
        self.shapes.push(shape);
        id
    }

    pub fn resource(&mut self, options: ResourceOptions) -> ShapeId {
        let id = options.id.unwrap_or_else(|| self.fresh_id());
        self.push(Shape::Resource(ResourceShape {
            id,
            only_named: options.only_named,
            keep_as_term: options.keep_as_term,
            value: options.value,
            vocabulary: options.vocabulary,
        }))
    }

    /// A resource shape whose matches stay RDF terms.
    pub fn resource_term(&mut self) -> ShapeId {
        self.resource(ResourceOptions {
            keep_as_term: true,
            ..ResourceOptions::default()
        })
    }

    pub fn literal(&mut self, options: LiteralOptions) -> ShapeId {
        let id = options.id.unwrap_or_else(|| self.fresh_id());
        self.push(Shape::Literal(LiteralShape {
            id,
            datatype: options.datatype,
            language: options.language,
            value: options.value,
            keep_as_term: options.keep_as_term,
        }))
    }

    /// A literal shape constrained to one datatype.
    pub fn literal_typed(&mut self, datatype: impl Into<NamedNode>) -> ShapeId {
        self.literal(LiteralOptions {
            datatype: Some(datatype.into()),
            ..LiteralOptions::default()
        })
    }

    /// A terminal shape matching exactly the given term, kept as a term.
    pub fn constant(&mut self, term: impl Into<Term>) -> ShapeId {
        let term = term.into();
        match term {
            Term::Literal(literal) => self.literal(LiteralOptions {
                value: Some(literal),
                keep_as_term: true,
                ..LiteralOptions::default()
            }),
            term => self.resource(ResourceOptions {
                value: Some(term),
                keep_as_term: true,
                ..ResourceOptions::default()
            }),
        }
    }

    pub fn record(
        &mut self,
        id: Option<ShapeId>,
        type_properties: Vec<ObjectProperty>,
        properties: Vec<ObjectProperty>,
    ) -> ShapeId {
        let id = id.unwrap_or_else(|| self.fresh_id());
        self.push(Shape::Record(RecordShape {
            id,
            type_properties,
            properties,
        }))
    }

    pub fn any_of(&mut self, id: Option<ShapeId>, variants: Vec<ShapeId>) -> ShapeId {
        let id = id.unwrap_or_else(|| self.fresh_id());
        self.push(Shape::AnyOf(AnyOfShape { id, variants }))
    }

    pub fn set(&mut self, item: impl Into<ShapeId>) -> ShapeId {
        self.set_with_counts(item, None, None)
    }

    pub fn set_with_counts(
        &mut self,
        item: impl Into<ShapeId>,
        min_count: Option<usize>,
        max_count: Option<usize>,
    ) -> ShapeId {
        let id = self.fresh_id();
        self.push(Shape::Set(SetShape {
            id,
            item: item.into(),
            min_count,
            max_count,
        }))
    }

    pub fn optional(&mut self, item: impl Into<ShapeId>) -> ShapeId {
        let id = self.fresh_id();
        self.push(Shape::Optional(OptionalShape {
            id,
            item: item.into(),
            empty_value: Value::Null,
        }))
    }

    pub fn list(&mut self, item: impl Into<ShapeId>) -> ShapeId {
        self.list_with(item, ListOptions::default())
    }

    pub fn list_with(&mut self, item: impl Into<ShapeId>, options: ListOptions) -> ShapeId {
        let id = options.id.unwrap_or_else(|| self.fresh_id());
        self.push(Shape::List(ListShape {
            id,
            item: item.into(),
            head: options.head,
            tail: options.tail,
            nil: options.nil,
        }))
    }

    pub fn map(
        &mut self,
        key: ShapeReference,
        value: Option<ShapeReference>,
        item: impl Into<ShapeId>,
    ) -> ShapeId {
        let id = self.fresh_id();
        self.push(Shape::Map(MapShape {
            id,
            key,
            value,
            item: item.into(),
        }))
    }

    /// Finishes the builder, validating the shape set invariants.
    pub fn build(self) -> Result<ShapeSet, RampError> {
        ShapeSet::new(self.shapes)
    }
}

/// A property edge navigating a single predicate.
pub fn property(
    name: impl Into<String>,
    predicate: impl Into<NamedNode>,
    value_shape: impl Into<ShapeId>,
) -> ObjectProperty {
    ObjectProperty::new(name, PropertyPath::predicate(predicate), value_shape)
}

/// A property edge navigating a predicate backwards.
pub fn inverse_property(
    name: impl Into<String>,
    predicate: impl Into<NamedNode>,
    value_shape: impl Into<ShapeId>,
) -> ObjectProperty {
    ObjectProperty::new(
        name,
        PropertyPath::inverse(PropertyPath::predicate(predicate)),
        value_shape,
    )
}

/// A property edge navigating an arbitrary property path.
pub fn path_property(
    name: impl Into<String>,
    path: PropertyPath,
    value_shape: impl Into<ShapeId>,
) -> ObjectProperty {
    ObjectProperty::new(name, path, value_shape)
}

/// A property edge matching the focus term itself.
pub fn self_property(
    name: impl Into<String>,
    value_shape: impl Into<ShapeId>,
) -> ObjectProperty {
    ObjectProperty::new(name, PropertyPath::self_path(), value_shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_sequential_blank_ids() {
        let mut builder = ShapeBuilder::new("t0");
        let first = builder.resource_term();
        let second = builder.optional(first.clone());
        assert_eq!(first, ShapeId::blank(BlankNode::new_unchecked("t0_1")));
        assert_eq!(second, ShapeId::blank(BlankNode::new_unchecked("t0_2")));
        let shapes = builder.build().unwrap();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn distinct_prefixes_do_not_collide() {
        let mut left = ShapeBuilder::new("a");
        let mut right = ShapeBuilder::new("b");
        assert_ne!(left.resource_term(), right.resource_term());
    }
}
