//! Flattening: emitting the quads that materialise a structured value as per
//! a shape.

use crate::dataset::term_to_subject;
use crate::error::{ErrorCode, RampError, StackEdge, StackFrame};
use crate::mapper;
use crate::shape::{
    ListShape, LiteralShape, MapShape, ObjectProperty, RecordShape, ResourceShape, SetShape,
    Shape, ShapeSet,
};
use crate::types::{PropertyPath, ShapeId, TermPart};
use crate::value::Value;
use log::debug;
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad, Term};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// Supplies globally fresh blank nodes for one flatten call.
pub trait BlankNodeGenerator {
    /// Returns a fresh blank node; `hint` names the shape kind asking.
    fn generate(&mut self, hint: &str) -> BlankNode;
}

/// The default generator: a counter seeded with a random prefix per call.
#[derive(Debug)]
pub struct RandomBlankNodeGenerator {
    prefix: String,
    counter: u64,
}

impl Default for RandomBlankNodeGenerator {
    fn default() -> Self {
        RandomBlankNodeGenerator {
            prefix: BlankNode::default().as_str().into(),
            counter: 0,
        }
    }
}

impl BlankNodeGenerator for RandomBlankNodeGenerator {
    fn generate(&mut self, hint: &str) -> BlankNode {
        self.counter += 1;
        BlankNode::new_unchecked(format!("{}_{}_{}", hint, self.prefix, self.counter))
    }
}

/// Input of [`flatten`].
pub struct FlattenParams<'a> {
    pub root: &'a ShapeId,
    pub shapes: &'a ShapeSet,
    pub value: &'a Value,
    /// Source of fresh blank nodes; a randomly seeded counter when absent.
    pub generator: Option<&'a mut dyn BlankNodeGenerator>,
    /// Graph the quads are emitted into; the default graph when absent.
    pub graph: Option<GraphName>,
}

impl<'a> FlattenParams<'a> {
    pub fn new(root: &'a ShapeId, shapes: &'a ShapeSet, value: &'a Value) -> Self {
        FlattenParams {
            root,
            shapes,
            value,
            generator: None,
            graph: None,
        }
    }
}

/// Emits the quads that reconstruct `value` under the root shape.
pub fn flatten(params: FlattenParams<'_>) -> Result<Vec<Quad>, RampError> {
    debug!("flattening a value against {}", params.root);
    let mut default_generator = RandomBlankNodeGenerator::default();
    let generator: &mut dyn BlankNodeGenerator = match params.generator {
        Some(generator) => generator,
        None => &mut default_generator,
    };
    let mut flattener = Flattener {
        shapes: params.shapes,
        generator,
        graph: params.graph.unwrap_or(GraphName::DefaultGraph),
        stack: Vec::new(),
        in_progress: FxHashSet::default(),
        synthesizing: FxHashSet::default(),
        bindings: Vec::new(),
    };
    match flattener.flatten_shape(params.root, params.value, true)? {
        Some(matched) => {
            debug!(
                "flattening against {} produced {} quads",
                params.root,
                matched.quads.len()
            );
            Ok(matched.quads)
        }
        None => Err(RampError::new(
            ErrorCode::ShapeMismatch,
            format!("value does not match shape {}", params.root),
        )),
    }
}

/// The outcome of matching one shape against one value: the terms the match
/// can stand at, the quads it already produced, and whether its node was
/// made up by the generator (and so may be unified with a subject above).
struct FlattenMatch {
    nodes: Vec<Term>,
    quads: Vec<Quad>,
    synthesized: Option<BlankNode>,
}

impl FlattenMatch {
    fn leaf(term: Term) -> Self {
        FlattenMatch {
            nodes: vec![term],
            quads: Vec::new(),
            synthesized: None,
        }
    }
}

/// A reference value injected by a surrounding map entry or synthesis.
struct RefBinding {
    shape: ShapeId,
    part: Option<TermPart>,
    value: Value,
}

/// The bound parts applying to one terminal shape.
#[derive(Default)]
struct BoundParts {
    whole: Option<Value>,
    value: Option<Value>,
    language: Option<String>,
    datatype: Option<NamedNode>,
}

struct Flattener<'a> {
    shapes: &'a ShapeSet,
    generator: &'a mut dyn BlankNodeGenerator,
    graph: GraphName,
    stack: Vec<StackFrame>,
    /// (shape, value address) pairs currently being matched; re-entering one
    /// means the shape graph loops without consuming input.
    in_progress: FxHashSet<(ShapeId, usize)>,
    /// Shapes currently being synthesised; synthesis consumes no input, so
    /// any re-entry is a cycle.
    synthesizing: FxHashSet<ShapeId>,
    bindings: Vec<RefBinding>,
}

impl Flattener<'_> {
    fn error(&self, code: ErrorCode, message: impl Into<String>) -> RampError {
        RampError::with_stack(code, message, self.stack.clone())
    }

    fn fail(
        &self,
        required: bool,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Option<FlattenMatch>, RampError> {
        if required {
            Err(self.error(code, message))
        } else {
            Ok(None)
        }
    }

    fn fail_with(
        &self,
        required: bool,
        error: RampError,
    ) -> Result<Option<FlattenMatch>, RampError> {
        if required {
            Err(error.set_stack(self.stack.clone()))
        } else {
            Ok(None)
        }
    }

    fn flatten_shape(
        &mut self,
        id: &ShapeId,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let shape = self
            .shapes
            .get(id)
            .map_err(|e| e.set_stack(self.stack.clone()))?;
        let key = (id.clone(), value as *const Value as usize);
        if !self.in_progress.insert(key.clone()) {
            return Err(self.error(
                ErrorCode::CyclicMatch,
                format!("shape {} re-entered while matching the same value", id),
            ));
        }
        let result = self.flatten_dispatch(shape, value, required);
        self.in_progress.remove(&key);
        result
    }

    fn flatten_dispatch(
        &mut self,
        shape: &Shape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        match shape {
            Shape::Resource(resource) => self.flatten_resource(resource, value, required),
            Shape::Literal(literal) => self.flatten_literal(literal, value, required),
            Shape::Record(record) => self.flatten_record(record, value, required),
            Shape::AnyOf(any_of) => self.flatten_any_of(&any_of.variants, value, required),
            Shape::Set(set) => self.flatten_set(set, value, required),
            Shape::Optional(optional) => {
                if *value == optional.empty_value {
                    return Ok(Some(FlattenMatch {
                        nodes: Vec::new(),
                        quads: Vec::new(),
                        synthesized: None,
                    }));
                }
                self.flatten_shape(&optional.item, value, required)
            }
            Shape::List(list) => self.flatten_list(list, value, required),
            Shape::Map(map) => self.flatten_map(map, value, required),
        }
    }

    fn flatten_resource(
        &mut self,
        shape: &ResourceShape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let bound = self.bound_parts(&shape.id);
        let effective = bound.whole.as_ref().or(bound.value.as_ref()).unwrap_or(value);
        let term = match mapper::resource_to_rdf(effective, shape) {
            Ok(term) => term,
            Err(e) => return self.fail_with(required, e),
        };
        if let Err(e) = shape.check_term(&term) {
            return self.fail_with(required, e);
        }
        Ok(Some(FlattenMatch::leaf(term)))
    }

    fn flatten_literal(
        &mut self,
        shape: &LiteralShape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let bound = self.bound_parts(&shape.id);
        let effective = bound.whole.as_ref().or(bound.value.as_ref()).unwrap_or(value);
        let term = match mapper::literal_to_rdf(effective, shape) {
            Ok(term) => term,
            Err(e) => return self.fail_with(required, e),
        };
        let term = apply_literal_overrides(term, &bound);
        if let Err(e) = shape.check_term(&term) {
            return self.fail_with(required, e);
        }
        Ok(Some(FlattenMatch::leaf(term)))
    }

    fn flatten_record(
        &mut self,
        shape: &RecordShape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let Value::Object(object) = value else {
            return self.fail(
                required,
                ErrorCode::ShapeMismatch,
                format!("record value must be an object, found a {}", value.kind_name()),
            );
        };
        let mut matched: Vec<(&ObjectProperty, FlattenMatch)> = Vec::new();
        for property in shape.all_properties() {
            match self.flatten_record_property(shape, property, object, required)? {
                Some(m) => matched.push((property, m)),
                None => {
                    if required {
                        return Err(self.error(
                            ErrorCode::FailedToMatchProperty,
                            format!("failed to match property \"{}\"", property.name),
                        ));
                    }
                    return Ok(None);
                }
            }
        }

        let (subject, own_synthesized) = self.resolve_subject(shape, &matched)?;
        let mut quads = Vec::new();
        for (property, m) in matched {
            if property.path.is_self() {
                let m = unify_synthesized_node(m, &subject);
                quads.extend(m.quads);
            } else {
                for node in &m.nodes {
                    self.emit_path(&subject, &property.path, node.clone(), &mut quads)?;
                }
                quads.extend(m.quads);
            }
        }
        Ok(Some(FlattenMatch {
            nodes: vec![subject],
            quads,
            synthesized: own_synthesized,
        }))
    }

    fn flatten_record_property(
        &mut self,
        shape: &RecordShape,
        property: &ObjectProperty,
        object: &BTreeMap<String, Value>,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        self.stack.push(StackFrame {
            shape: shape.id.clone(),
            edge: Some(StackEdge::Property(property.name.clone())),
            focus: None,
        });
        let absent = Value::Null;
        let result = if property.transient {
            // Synthesised from bound references, never read from the value.
            match self.synthesize_value(&property.value_shape) {
                Ok(synthesized) => self.flatten_shape(&property.value_shape, &synthesized, required),
                Err(e) => {
                    if required || e.code() == ErrorCode::CyclicMatch {
                        Err(e)
                    } else {
                        Ok(None)
                    }
                }
            }
        } else {
            match object.get(&property.name) {
                Some(value) => self.flatten_shape(&property.value_shape, value, required),
                // A missing field only matches shapes with an empty form.
                None => self.flatten_shape(&property.value_shape, &absent, false),
            }
        };
        self.stack.pop();
        result
    }

    /// Elects the record subject from its self-path matches: a unique named
    /// node first, then the last value-supplied blank node, then the last
    /// adopted blank node, then a fresh one.
    fn resolve_subject(
        &mut self,
        shape: &RecordShape,
        matched: &[(&ObjectProperty, FlattenMatch)],
    ) -> Result<(Term, Option<BlankNode>), RampError> {
        let mut named: Vec<NamedNode> = Vec::new();
        let mut hard_blank: Option<BlankNode> = None;
        let mut soft_blank: Option<BlankNode> = None;
        for (property, m) in matched {
            if !property.path.is_self() {
                continue;
            }
            for node in &m.nodes {
                match node {
                    Term::NamedNode(n) => {
                        if !named.contains(n) {
                            named.push(n.clone());
                        }
                    }
                    Term::BlankNode(b) => {
                        if m.synthesized.as_ref() == Some(b) {
                            soft_blank = Some(b.clone());
                        } else {
                            hard_blank = Some(b.clone());
                        }
                    }
                    _ => {
                        return Err(self.error(
                            ErrorCode::CannotUseLiteralAsSubject,
                            format!("cannot use {} as the subject of record {}", node, shape.id),
                        ))
                    }
                }
            }
        }
        if named.len() > 1 {
            return Err(self.error(
                ErrorCode::ShapeMismatch,
                format!(
                    "conflicting subjects {} and {} for record {}",
                    named[0], named[1], shape.id
                ),
            ));
        }
        if let Some(n) = named.into_iter().next() {
            return Ok((Term::NamedNode(n), None));
        }
        if let Some(b) = hard_blank {
            return Ok((Term::BlankNode(b), None));
        }
        if let Some(b) = soft_blank {
            return Ok((Term::BlankNode(b.clone()), Some(b)));
        }
        let fresh = self.generator.generate("record");
        Ok((Term::BlankNode(fresh.clone()), Some(fresh)))
    }

    fn flatten_any_of(
        &mut self,
        variants: &[ShapeId],
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        for variant in variants {
            if let Some(m) = self.flatten_shape(variant, value, false)? {
                return Ok(Some(m));
            }
        }
        if !required {
            return Ok(None);
        }
        // Re-run in required mode and surface the deepest failure.
        let mut best: Option<RampError> = None;
        for variant in variants {
            match self.flatten_shape(variant, value, true) {
                Ok(Some(m)) => return Ok(Some(m)),
                Ok(None) => {}
                Err(e) => {
                    let deeper = best
                        .as_ref()
                        .map_or(true, |b| e.stack().len() > b.stack().len());
                    if deeper {
                        best = Some(e);
                    }
                }
            }
        }
        Err(best.unwrap_or_else(|| {
            self.error(ErrorCode::ShapeMismatch, "no union variant matched the value")
        }))
    }

    fn flatten_set(
        &mut self,
        shape: &SetShape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let Value::Array(items) = value else {
            return self.fail(
                required,
                ErrorCode::ShapeMismatch,
                format!("set value must be an array, found a {}", value.kind_name()),
            );
        };
        if let Some(min) = shape.min_count {
            if items.len() < min {
                return self.fail(
                    required,
                    ErrorCode::MinCountMismatch,
                    format!("found {} items, expected at least {}", items.len(), min),
                );
            }
        }
        if let Some(max) = shape.max_count {
            if items.len() > max {
                return self.fail(
                    required,
                    ErrorCode::MaxCountMismatch,
                    format!("found {} items, expected at most {}", items.len(), max),
                );
            }
        }
        let mut nodes = Vec::new();
        let mut quads = Vec::new();
        for (index, item) in items.iter().enumerate() {
            self.stack.push(StackFrame {
                shape: shape.id.clone(),
                edge: Some(StackEdge::Index(index)),
                focus: None,
            });
            let result = self.flatten_shape(&shape.item, item, required);
            self.stack.pop();
            match result? {
                Some(m) => {
                    nodes.extend(m.nodes);
                    quads.extend(m.quads);
                }
                None => return Ok(None),
            }
        }
        Ok(Some(FlattenMatch {
            nodes,
            quads,
            synthesized: None,
        }))
    }

    fn flatten_list(
        &mut self,
        shape: &ListShape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let Value::Array(items) = value else {
            return self.fail(
                required,
                ErrorCode::ShapeMismatch,
                format!("list value must be an array, found a {}", value.kind_name()),
            );
        };
        let nil = shape.nil_term();
        if items.is_empty() {
            // The empty list collapses to the terminator.
            return Ok(Some(FlattenMatch::leaf(nil)));
        }
        let head = shape.head_path();
        let tail = shape.tail_path();
        let cells: Vec<BlankNode> = items
            .iter()
            .map(|_| self.generator.generate("list"))
            .collect();
        let mut quads = Vec::new();
        for (index, item) in items.iter().enumerate() {
            self.stack.push(StackFrame {
                shape: shape.id.clone(),
                edge: Some(StackEdge::Index(index)),
                focus: None,
            });
            let result = self.flatten_shape(&shape.item, item, required);
            self.stack.pop();
            let m = match result? {
                Some(m) => m,
                None => return Ok(None),
            };
            if m.nodes.is_empty() {
                return self.fail(
                    required,
                    ErrorCode::NoListItemMatches,
                    format!("no item matches at list index {}", index),
                );
            }
            if m.nodes.len() > 1 {
                return self.fail(
                    required,
                    ErrorCode::MultipleListItemMatches,
                    format!("{} item matches at list index {}", m.nodes.len(), index),
                );
            }
            let cell = Term::BlankNode(cells[index].clone());
            self.emit_path(&cell, &head, m.nodes[0].clone(), &mut quads)?;
            quads.extend(m.quads);
            let next = if index + 1 < items.len() {
                Term::BlankNode(cells[index + 1].clone())
            } else {
                nil.clone()
            };
            self.emit_path(&cell, &tail, next, &mut quads)?;
        }
        Ok(Some(FlattenMatch {
            nodes: vec![Term::BlankNode(cells[0].clone())],
            quads,
            synthesized: None,
        }))
    }

    fn flatten_map(
        &mut self,
        shape: &MapShape,
        value: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let Value::Object(entries) = value else {
            return self.fail(
                required,
                ErrorCode::ShapeMismatch,
                format!("map value must be an object, found a {}", value.kind_name()),
            );
        };
        let mut nodes = Vec::new();
        let mut quads = Vec::new();
        for (key, stored) in entries {
            self.stack.push(StackFrame {
                shape: shape.id.clone(),
                edge: Some(StackEdge::Property(key.clone())),
                focus: None,
            });
            let result = self.flatten_map_entry(shape, key, stored, required);
            self.stack.pop();
            match result? {
                Some(m) => {
                    nodes.extend(m.nodes);
                    quads.extend(m.quads);
                }
                None => return Ok(None),
            }
        }
        Ok(Some(FlattenMatch {
            nodes,
            quads,
            synthesized: None,
        }))
    }

    fn flatten_map_entry(
        &mut self,
        shape: &MapShape,
        key: &str,
        stored: &Value,
        required: bool,
    ) -> Result<Option<FlattenMatch>, RampError> {
        let saved = self.bindings.len();
        self.bindings.push(RefBinding {
            shape: shape.key.target.clone(),
            part: shape.key.part,
            value: Value::String(key.into()),
        });
        let synthesized;
        let item_value = match &shape.value {
            Some(reference) => {
                self.bindings.push(RefBinding {
                    shape: reference.target.clone(),
                    part: reference.part,
                    value: stored.clone(),
                });
                match self.synthesize_value(&shape.item) {
                    Ok(value) => {
                        synthesized = value;
                        &synthesized
                    }
                    Err(e) => {
                        self.bindings.truncate(saved);
                        return if required || e.code() == ErrorCode::CyclicMatch {
                            Err(e)
                        } else {
                            Ok(None)
                        };
                    }
                }
            }
            None => stored,
        };
        let result = self.flatten_shape(&shape.item, item_value, required);
        self.bindings.truncate(saved);
        result
    }

    /// Builds a value for a shape out of fixed values, empty values and the
    /// currently bound references.
    fn synthesize_value(&mut self, id: &ShapeId) -> Result<Value, RampError> {
        if !self.synthesizing.insert(id.clone()) {
            return Err(self.error(
                ErrorCode::CyclicMatch,
                format!("shape {} re-entered while synthesising a value", id),
            ));
        }
        let result = self.synthesize_value_inner(id);
        self.synthesizing.remove(id);
        result
    }

    fn synthesize_value_inner(&mut self, id: &ShapeId) -> Result<Value, RampError> {
        let bound = self.bound_parts(id);
        if let Some(whole) = bound.whole {
            return Ok(whole);
        }
        if let Some(value) = bound.value {
            return Ok(value);
        }
        let shape = self
            .shapes
            .get(id)
            .map_err(|e| e.set_stack(self.stack.clone()))?;
        match shape {
            Shape::Resource(resource) => match &resource.value {
                Some(term) => mapper::resource_from_rdf(term, resource)
                    .map_err(|e| e.set_stack(self.stack.clone())),
                None => Err(self.error(
                    ErrorCode::CannotSynthesizeValue,
                    format!("resource shape {} has no fixed value", id),
                )),
            },
            Shape::Literal(literal) => match &literal.value {
                Some(fixed) => mapper::literal_from_rdf(&Term::Literal(fixed.clone()), literal)
                    .map_err(|e| e.set_stack(self.stack.clone())),
                None => Err(self.error(
                    ErrorCode::CannotSynthesizeValue,
                    format!("literal shape {} has no fixed value", id),
                )),
            },
            Shape::Optional(optional) => Ok(optional.empty_value.clone()),
            Shape::AnyOf(any_of) => {
                for variant in &any_of.variants {
                    match self.synthesize_value(variant) {
                        Ok(value) => return Ok(value),
                        Err(e) if e.code() == ErrorCode::CyclicMatch => return Err(e),
                        Err(_) => {}
                    }
                }
                Err(self.error(
                    ErrorCode::CannotSynthesizeShape,
                    format!("no variant of {} can be synthesised", id),
                ))
            }
            Shape::Record(record) => {
                let mut object = BTreeMap::new();
                for property in record.all_properties() {
                    if property.transient {
                        continue;
                    }
                    object.insert(
                        property.name.clone(),
                        self.synthesize_value(&property.value_shape)?,
                    );
                }
                Ok(Value::Object(object))
            }
            _ => Err(self.error(
                ErrorCode::CannotSynthesizeShape,
                format!("cannot synthesise a {} value", shape.kind_name()),
            )),
        }
    }

    /// Emits the quads of one edge traversal. Sequences chain through fresh
    /// blank nodes, inverses swap the endpoints, alternatives emit through
    /// their first branch, and quantified paths emit one traversal of the
    /// inner path.
    fn emit_path(
        &mut self,
        subject: &Term,
        path: &PropertyPath,
        object: Term,
        out: &mut Vec<Quad>,
    ) -> Result<(), RampError> {
        match path {
            PropertyPath::Predicate(predicate) => {
                let Some(s) = term_to_subject(subject) else {
                    return Err(self.error(
                        ErrorCode::CannotUseLiteralAsSubject,
                        format!("cannot use {} as a subject", subject),
                    ));
                };
                out.push(Quad::new(s, predicate.clone(), object, self.graph.clone()));
                Ok(())
            }
            PropertyPath::Sequence(parts) => {
                if parts.is_empty() {
                    return Ok(());
                }
                let mut previous = subject.clone();
                for (position, part) in parts.iter().enumerate() {
                    let next = if position + 1 == parts.len() {
                        object.clone()
                    } else {
                        Term::BlankNode(self.generator.generate("path"))
                    };
                    self.emit_path(&previous, part, next.clone(), out)?;
                    previous = next;
                }
                Ok(())
            }
            PropertyPath::Inverse(inner) => self.emit_path(&object, inner, subject.clone(), out),
            PropertyPath::Alternative(parts) => match parts.first() {
                Some(first) => self.emit_path(subject, first, object, out),
                None => Err(self.error(
                    ErrorCode::ShapeMismatch,
                    "cannot flatten through an empty alternative path",
                )),
            },
            PropertyPath::ZeroOrMore(inner)
            | PropertyPath::ZeroOrOne(inner)
            | PropertyPath::OneOrMore(inner) => self.emit_path(subject, inner, object, out),
        }
    }

    /// The reference parts currently bound for a terminal shape, innermost
    /// binding winning.
    fn bound_parts(&self, id: &ShapeId) -> BoundParts {
        let mut bound = BoundParts::default();
        for binding in self.bindings.iter().rev() {
            if binding.shape != *id {
                continue;
            }
            match binding.part {
                None => {
                    if bound.whole.is_none() {
                        bound.whole = Some(binding.value.clone());
                    }
                }
                Some(TermPart::Value) => {
                    if bound.value.is_none() {
                        bound.value = Some(binding.value.clone());
                    }
                }
                Some(TermPart::Language) => {
                    if bound.language.is_none() {
                        bound.language = binding.value.as_str().map(Into::into);
                    }
                }
                Some(TermPart::Datatype) => {
                    if bound.datatype.is_none() {
                        bound.datatype = binding
                            .value
                            .as_str()
                            .and_then(|iri| NamedNode::new(iri).ok());
                    }
                }
            }
        }
        bound
    }
}

/// Rewrites a self-path child whose node was generator-made so it shares the
/// subject elected by the surrounding record.
fn unify_synthesized_node(m: FlattenMatch, subject: &Term) -> FlattenMatch {
    let Some(original) = &m.synthesized else {
        return m;
    };
    let original = Term::BlankNode(original.clone());
    if original == *subject || !m.nodes.contains(&original) {
        return m;
    }
    let substitute = |term: &Term| -> Term {
        if *term == original {
            subject.clone()
        } else {
            term.clone()
        }
    };
    FlattenMatch {
        nodes: m.nodes.iter().map(&substitute).collect(),
        quads: m
            .quads
            .iter()
            .map(|quad| {
                let subject_term = crate::dataset::subject_to_term(&quad.subject);
                let new_subject = substitute(&subject_term);
                let new_object = substitute(&quad.object);
                match term_to_subject(&new_subject) {
                    Some(s) => Quad::new(s, quad.predicate.clone(), new_object, quad.graph_name.clone()),
                    None => quad.clone(),
                }
            })
            .collect(),
        synthesized: None,
    }
}

fn apply_literal_overrides(term: Term, bound: &BoundParts) -> Term {
    let Term::Literal(literal) = &term else {
        return term;
    };
    if let Some(language) = &bound.language {
        return Term::Literal(Literal::new_language_tagged_literal_unchecked(
            literal.value(),
            language.clone(),
        ));
    }
    if let Some(datatype) = &bound.datatype {
        return Term::Literal(Literal::new_typed_literal(
            literal.value(),
            datatype.clone(),
        ));
    }
    term
}
