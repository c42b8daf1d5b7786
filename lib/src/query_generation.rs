//! Query generation: a CONSTRUCT-style graph-pattern query retrieving
//! exactly the quads a shape is concerned with.
//!
//! The output stays abstract: pattern and path nodes reuse the
//! [`spargebra`] algebra so a downstream SPARQL emitter can print them.

use crate::error::{ErrorCode, RampError};
use crate::shape::{ListShape, ObjectProperty, RecordShape, Shape, ShapeSet};
use crate::types::{PropertyPath, ShapeId};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use spargebra::algebra::{Expression, PropertyPathExpression};
use spargebra::term::{BlankNode, NamedNode, TermPattern, Variable};

/// The predicate position of an abstract triple: a plain IRI, a property
/// path, or a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicatePattern {
    NamedNode(NamedNode),
    Path(PropertyPathExpression),
    Variable(Variable),
}

/// One abstract triple of the template or of a basic graph pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTriple {
    pub subject: TermPattern,
    pub predicate: PredicatePattern,
    pub object: TermPattern,
}

/// A node of the WHERE tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPattern {
    Bgp(Vec<QueryTriple>),
    Optional(Vec<QueryPattern>),
    Union(Vec<Vec<QueryPattern>>),
    Group(Vec<QueryPattern>),
    Filter(Expression),
}

/// An abstract CONSTRUCT query.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructQuery {
    pub base: Option<String>,
    pub prefixes: Vec<(String, String)>,
    pub template: Vec<QueryTriple>,
    pub where_patterns: Vec<QueryPattern>,
}

/// Callback invoked after the patterns of a shape were emitted, so callers
/// can append FILTERs scoped to that shape's subject.
pub type EmitHook<'a> = &'a mut dyn FnMut(&Shape, &TermPattern, &mut Vec<QueryPattern>);

/// Input of [`generate_query`].
pub struct QueryParams<'a> {
    pub root: &'a ShapeId,
    pub shapes: &'a ShapeSet,
    pub base: Option<String>,
    pub prefixes: Vec<(String, String)>,
    pub on_emit: Option<EmitHook<'a>>,
}

impl<'a> QueryParams<'a> {
    pub fn new(root: &'a ShapeId, shapes: &'a ShapeSet) -> Self {
        QueryParams {
            root,
            shapes,
            base: None,
            prefixes: Vec::new(),
            on_emit: None,
        }
    }
}

/// Produces the CONSTRUCT query that retrieves the quads relevant to the
/// root shape from a remote endpoint.
pub fn generate_query(params: QueryParams<'_>) -> Result<ConstructQuery, RampError> {
    debug!("generating a query for {}", params.root);
    let mut generator = QueryGenerator {
        shapes: params.shapes,
        counters: FxHashMap::default(),
        blank_counter: 0,
        template: Vec::new(),
        visiting: Vec::new(),
        on_emit: params.on_emit,
    };
    let subject = generator.object_pattern(params.root)?;
    let mut where_patterns = Vec::new();
    generator.generate_for_shape(params.root, &subject, &mut where_patterns)?;
    Ok(ConstructQuery {
        base: params.base,
        prefixes: params.prefixes,
        template: generator.template,
        where_patterns,
    })
}

/// One level of the walk, remembering the edge it was entered through.
struct VisitFrame {
    shape: ShapeId,
    entered_via: Option<PropertyPath>,
    breaking: bool,
}

struct QueryGenerator<'a> {
    shapes: &'a ShapeSet,
    counters: FxHashMap<&'static str, usize>,
    blank_counter: usize,
    template: Vec<QueryTriple>,
    visiting: Vec<VisitFrame>,
    on_emit: Option<EmitHook<'a>>,
}

impl QueryGenerator<'_> {
    fn fresh_variable(&mut self, kind: &'static str) -> Variable {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        Variable::new_unchecked(format!("{}_{}", kind, counter))
    }

    fn fresh_blank(&mut self) -> TermPattern {
        self.blank_counter += 1;
        TermPattern::BlankNode(BlankNode::new_unchecked(format!(
            "path_{}",
            self.blank_counter
        )))
    }

    /// The pattern standing for a shape: its unique fixed named subject when
    /// one can be derived through self paths, a fresh variable otherwise.
    fn object_pattern(&mut self, id: &ShapeId) -> Result<TermPattern, RampError> {
        let mut found = FxHashSet::default();
        let mut seen = FxHashSet::default();
        self.find_subject(id, &mut found, &mut seen)?;
        if found.len() == 1 {
            if let Some(node) = found.into_iter().next() {
                return Ok(TermPattern::NamedNode(node));
            }
        }
        let kind = self.variable_kind(id)?;
        Ok(TermPattern::Variable(self.fresh_variable(kind)))
    }

    /// Collects the fixed named-node subjects reachable through self paths.
    fn find_subject(
        &self,
        id: &ShapeId,
        found: &mut FxHashSet<NamedNode>,
        seen: &mut FxHashSet<ShapeId>,
    ) -> Result<(), RampError> {
        if !seen.insert(id.clone()) {
            return Ok(());
        }
        match self.shapes.get(id)? {
            Shape::Resource(resource) => {
                if let Some(oxrdf::Term::NamedNode(node)) = &resource.value {
                    found.insert(node.clone());
                }
            }
            Shape::Record(record) => {
                for property in record.all_properties() {
                    if property.path.is_self() {
                        self.find_subject(&property.value_shape, found, seen)?;
                    }
                }
            }
            Shape::AnyOf(any_of) => {
                for variant in &any_of.variants {
                    self.find_subject(variant, found, seen)?;
                }
            }
            Shape::Set(set) => self.find_subject(&set.item, found, seen)?,
            Shape::Optional(optional) => self.find_subject(&optional.item, found, seen)?,
            Shape::Map(map) => self.find_subject(&map.item, found, seen)?,
            Shape::Literal(_) | Shape::List(_) => {}
        }
        Ok(())
    }

    /// The variable name stem for a shape, looking through wrappers so an
    /// `optional(literal)` still binds a `literal_n` variable.
    fn variable_kind(&self, id: &ShapeId) -> Result<&'static str, RampError> {
        let mut current = id.clone();
        let mut hops = 0usize;
        loop {
            let shape = self.shapes.get(&current)?;
            match shape {
                Shape::Set(set) => current = set.item.clone(),
                Shape::Optional(optional) => current = optional.item.clone(),
                Shape::Map(map) => current = map.item.clone(),
                _ => return Ok(shape.kind_name()),
            }
            hops += 1;
            if hops > self.shapes.len() {
                return Ok("shape");
            }
        }
    }

    fn generate_for_shape(
        &mut self,
        id: &ShapeId,
        subject: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        if self.visiting.iter().any(|frame| frame.shape == *id) {
            // Re-entered without an edge in between; leave the subject
            // unresolved instead of recursing forever.
            return Ok(());
        }
        let shape = self.shapes.get(id)?;
        self.visiting.push(VisitFrame {
            shape: id.clone(),
            entered_via: None,
            breaking: is_breaking_point(shape),
        });
        let result = self.generate_dispatch(shape, subject, out);
        self.visiting.pop();
        result?;
        if let Some(hook) = self.on_emit.as_mut() {
            hook(shape, subject, out);
        }
        Ok(())
    }

    fn generate_dispatch(
        &mut self,
        shape: &Shape,
        subject: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        match shape {
            Shape::Resource(_) | Shape::Literal(_) => Ok(()),
            Shape::Record(record) => self.generate_record(record, subject, out),
            Shape::AnyOf(any_of) => {
                let mut groups = Vec::with_capacity(any_of.variants.len());
                for variant in &any_of.variants {
                    let mut group = Vec::new();
                    self.generate_for_shape(variant, subject, &mut group)?;
                    groups.push(group);
                }
                if groups.len() == 1 {
                    if let Some(group) = groups.into_iter().next() {
                        out.extend(group);
                    }
                } else {
                    out.push(QueryPattern::Union(groups));
                }
                Ok(())
            }
            Shape::Set(set) => self.generate_for_shape(&set.item, subject, out),
            Shape::Optional(optional) => self.generate_for_shape(&optional.item, subject, out),
            Shape::Map(map) => self.generate_for_shape(&map.item, subject, out),
            Shape::List(list) => self.generate_list(list, subject, out),
        }
    }

    fn generate_record(
        &mut self,
        record: &RecordShape,
        subject: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        for property in record.all_properties() {
            self.generate_property(record, property, subject, out)?;
        }
        Ok(())
    }

    fn generate_property(
        &mut self,
        _record: &RecordShape,
        property: &ObjectProperty,
        subject: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        if property.path.is_self() {
            // The child shares the record's subject; no edge is emitted.
            return self.generate_for_shape(&property.value_shape, subject, out);
        }
        let mut sub = Vec::new();
        if let Some(position) = self
            .visiting
            .iter()
            .position(|frame| frame.shape == property.value_shape)
        {
            // Recursion: replace the edge by a transitive traversal when the
            // cycle crosses a breaking point, otherwise leave the object
            // variable unresolved.
            let through_breaking = self.visiting[position..].iter().any(|frame| frame.breaking);
            let kind = self.variable_kind(&property.value_shape)?;
            let object = TermPattern::Variable(self.fresh_variable(kind));
            if through_breaking {
                let mut paths = self.recursive_paths(position);
                if !paths.contains(&property.path) {
                    paths.push(property.path.clone());
                }
                let transitive =
                    PropertyPath::ZeroOrMore(Box::new(PropertyPath::Alternative(paths)));
                self.add_edge(subject, &transitive, &object, &mut sub)?;
            } else {
                self.add_edge(subject, &property.path, &object, &mut sub)?;
            }
            out.extend(sub);
            return Ok(());
        }
        let object = self.object_pattern(&property.value_shape)?;
        self.add_edge(subject, &property.path, &object, &mut sub)?;
        self.descend(property, &object, &mut sub)?;
        if wraps_in_optional(self.shapes.get(&property.value_shape)?) {
            out.push(QueryPattern::Optional(sub));
        } else {
            out.extend(sub);
        }
        Ok(())
    }

    /// Recurses into a property's value shape, recording the edge path on
    /// the child frame for `recursive_paths`.
    fn descend(
        &mut self,
        property: &ObjectProperty,
        object: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        let id = &property.value_shape;
        let shape = self.shapes.get(id)?;
        self.visiting.push(VisitFrame {
            shape: id.clone(),
            entered_via: Some(property.path.clone()),
            breaking: is_breaking_point(shape),
        });
        let result = self.generate_dispatch(shape, object, out);
        self.visiting.pop();
        result?;
        if let Some(hook) = self.on_emit.as_mut() {
            hook(shape, object, out);
        }
        Ok(())
    }

    /// The edge paths traversed since the prior occurrence of a re-entered
    /// shape; together they span one pass around the cycle.
    fn recursive_paths(&self, position: usize) -> Vec<PropertyPath> {
        let mut paths = Vec::new();
        for frame in &self.visiting[position + 1..] {
            if let Some(path) = &frame.entered_via {
                if !path.is_self() && !paths.contains(path) {
                    paths.push(path.clone());
                }
            }
        }
        paths
    }

    fn generate_list(
        &mut self,
        list: &ListShape,
        subject: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        let head = list.head_path();
        let tail = list.tail_path();
        let cell = TermPattern::Variable(self.fresh_variable("list"));
        // Reach every cell, fetch its item, and keep the tail edges so the
        // template can rebuild the chain.
        let reach = PropertyPath::ZeroOrMore(Box::new(tail.clone()));
        out.push(QueryPattern::Bgp(vec![QueryTriple {
            subject: subject.clone(),
            predicate: predicate_pattern(&reach)?,
            object: cell.clone(),
        }]));
        let item_object = self.object_pattern(&list.item)?;
        let mut sub = Vec::new();
        self.add_edge(&cell, &head, &item_object, &mut sub)?;
        let next = TermPattern::Variable(self.fresh_variable("list"));
        self.add_edge(&cell, &tail, &next, &mut sub)?;
        self.generate_for_shape(&list.item, &item_object, &mut sub)?;
        out.push(QueryPattern::Optional(sub));
        Ok(())
    }

    /// Emits one edge into the WHERE tree and mirrors it in the template.
    fn add_edge(
        &mut self,
        subject: &TermPattern,
        path: &PropertyPath,
        object: &TermPattern,
        out: &mut Vec<QueryPattern>,
    ) -> Result<(), RampError> {
        out.push(QueryPattern::Bgp(vec![QueryTriple {
            subject: subject.clone(),
            predicate: predicate_pattern(path)?,
            object: object.clone(),
        }]));
        self.add_template_edge(subject, path, object)?;
        Ok(())
    }

    /// Adds the template triples of one edge, flattening sequences through
    /// fresh blank nodes and reversing inverse steps so only atomic triples
    /// survive where possible.
    fn add_template_edge(
        &mut self,
        subject: &TermPattern,
        path: &PropertyPath,
        object: &TermPattern,
    ) -> Result<(), RampError> {
        match path {
            PropertyPath::Predicate(predicate) => {
                self.template.push(QueryTriple {
                    subject: subject.clone(),
                    predicate: PredicatePattern::NamedNode(predicate.clone()),
                    object: object.clone(),
                });
                Ok(())
            }
            PropertyPath::Inverse(inner) => self.add_template_edge(object, inner, subject),
            PropertyPath::Sequence(parts) => {
                if parts.is_empty() {
                    return Ok(());
                }
                let mut previous = subject.clone();
                for (position, part) in parts.iter().enumerate() {
                    let next = if position + 1 == parts.len() {
                        object.clone()
                    } else {
                        self.fresh_blank()
                    };
                    self.add_template_edge(&previous, part, &next)?;
                    previous = next;
                }
                Ok(())
            }
            other => {
                self.template.push(QueryTriple {
                    subject: subject.clone(),
                    predicate: PredicatePattern::Path(convert_path(other)?),
                    object: object.clone(),
                });
                Ok(())
            }
        }
    }
}

/// Whether an edge to this shape is wrapped in `OPTIONAL { … }`.
fn wraps_in_optional(shape: &Shape) -> bool {
    match shape {
        Shape::Optional(_) | Shape::Map(_) => true,
        Shape::Set(set) => set.min_count.unwrap_or(0) == 0,
        _ => false,
    }
}

/// Recursion pauses at records and at lists that actually navigate.
fn is_breaking_point(shape: &Shape) -> bool {
    match shape {
        Shape::Record(_) => true,
        Shape::List(list) => !list.head_path().is_self(),
        _ => false,
    }
}

fn predicate_pattern(path: &PropertyPath) -> Result<PredicatePattern, RampError> {
    match path {
        PropertyPath::Predicate(predicate) => Ok(PredicatePattern::NamedNode(predicate.clone())),
        other => Ok(PredicatePattern::Path(convert_path(other)?)),
    }
}

/// Maps the shape path algebra onto the SPARQL path algebra: `sequence` to
/// `/`, `inverse` to `^`, `alternative` to `|`, and the quantifiers to `*`,
/// `+` and `?`.
fn convert_path(path: &PropertyPath) -> Result<PropertyPathExpression, RampError> {
    match path {
        PropertyPath::Predicate(predicate) => {
            Ok(PropertyPathExpression::NamedNode(predicate.clone()))
        }
        PropertyPath::Inverse(inner) => Ok(PropertyPathExpression::Reverse(Box::new(
            convert_path(inner)?,
        ))),
        PropertyPath::Sequence(parts) => fold_binary(parts, PropertyPathExpression::Sequence),
        PropertyPath::Alternative(parts) => {
            fold_binary(parts, PropertyPathExpression::Alternative)
        }
        PropertyPath::ZeroOrMore(inner) => Ok(PropertyPathExpression::ZeroOrMore(Box::new(
            convert_path(inner)?,
        ))),
        PropertyPath::ZeroOrOne(inner) => Ok(PropertyPathExpression::ZeroOrOne(Box::new(
            convert_path(inner)?,
        ))),
        PropertyPath::OneOrMore(inner) => Ok(PropertyPathExpression::OneOrMore(Box::new(
            convert_path(inner)?,
        ))),
    }
}

fn fold_binary(
    parts: &[PropertyPath],
    combine: fn(
        Box<PropertyPathExpression>,
        Box<PropertyPathExpression>,
    ) -> PropertyPathExpression,
) -> Result<PropertyPathExpression, RampError> {
    let mut converted = Vec::with_capacity(parts.len());
    for part in parts {
        converted.push(convert_path(part)?);
    }
    let Some(last) = converted.pop() else {
        return Err(RampError::new(
            ErrorCode::ShapeMismatch,
            "cannot express an empty path in a query",
        ));
    };
    Ok(converted
        .into_iter()
        .rev()
        .fold(last, |acc, part| combine(Box::new(part), Box::new(acc))))
}
