//! Framing: materialising structured values from a graph through a shape.

use crate::dataset::Dataset;
use crate::error::{ErrorCode, RampError, StackEdge, StackFrame};
use crate::mapper;
use crate::paths::eval_path;
use crate::shape::{
    AnyOfShape, ListShape, LiteralShape, MapShape, ObjectProperty, OptionalShape, RecordShape,
    ResourceShape, SetShape, Shape, ShapeSet,
};
use crate::types::{PropertyPath, ShapeId, ShapeReference, TermPart};
use crate::value::Value;
use log::debug;
use oxrdf::{GraphName, Term};
use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, HashMap};
use std::slice;

/// Input of [`frame`].
pub struct FrameParams<'a> {
    pub root: &'a ShapeId,
    pub shapes: &'a ShapeSet,
    pub dataset: &'a Dataset,
    /// Candidate terms for the root shape; every term occurring in the
    /// dataset when absent.
    pub candidates: Option<Vec<Term>>,
    /// Restricts matching to one graph of the dataset.
    pub graph: Option<GraphName>,
}

impl<'a> FrameParams<'a> {
    pub fn new(root: &'a ShapeId, shapes: &'a ShapeSet, dataset: &'a Dataset) -> Self {
        FrameParams {
            root,
            shapes,
            dataset,
            candidates: None,
            graph: None,
        }
    }
}

/// One value satisfying the root shape, together with the value every shape
/// produced on the way.
#[derive(Debug, Clone)]
pub struct FrameSolution {
    pub value: Value,
    pub vars: HashMap<ShapeId, Value>,
}

/// Enumerates all structured values that satisfy the shape against the
/// dataset.
///
/// Each solution corresponds to one set of candidate bindings; ambiguous
/// unions yield one solution per accepting variant.
pub fn frame(params: FrameParams<'_>) -> Result<Vec<FrameSolution>, RampError> {
    let candidates = params
        .candidates
        .unwrap_or_else(|| params.dataset.collect_terms());
    debug!(
        "framing {} over {} candidates",
        params.root,
        candidates.len()
    );
    let mut framer = Framer {
        shapes: params.shapes,
        dataset: params.dataset,
        graph: params.graph,
        stack: Vec::new(),
        visiting: FxHashSet::default(),
    };
    let framed = framer.frame_shape(params.root, &candidates, false)?;
    debug!("framing {} produced {} solutions", params.root, framed.len());
    Ok(framed
        .into_iter()
        .map(|framed| FrameSolution {
            value: framed.value,
            vars: framed
                .vars
                .into_iter()
                .map(|binding| (binding.shape, binding.value))
                .collect(),
        })
        .collect())
}

/// The value a shape produced for one solution, with the term it matched
/// when the shape is term-backed.
#[derive(Debug, Clone)]
pub(crate) struct VarBinding {
    pub(crate) shape: ShapeId,
    pub(crate) term: Option<Term>,
    pub(crate) value: Value,
}

/// One alternative produced by framing a shape over a candidate slice.
#[derive(Debug, Clone)]
struct Framed {
    value: Value,
    term: Option<Term>,
    vars: Vec<VarBinding>,
}

struct Framer<'a> {
    shapes: &'a ShapeSet,
    dataset: &'a Dataset,
    graph: Option<GraphName>,
    stack: Vec<StackFrame>,
    /// (shape, first candidate) pairs currently being framed; re-entering
    /// one yields nothing, which breaks recursion over cyclic graphs.
    visiting: FxHashSet<(ShapeId, Option<Term>)>,
}

impl Framer<'_> {
    fn error(&self, code: ErrorCode, message: impl Into<String>) -> RampError {
        RampError::with_stack(code, message, self.stack.clone())
    }

    fn frame_shape(
        &mut self,
        id: &ShapeId,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let shape = self
            .shapes
            .get(id)
            .map_err(|e| e.set_stack(self.stack.clone()))?;
        let key = (id.clone(), candidates.first().cloned());
        if !self.visiting.insert(key.clone()) {
            return Ok(Vec::new());
        }
        let result = self.frame_dispatch(shape, candidates, required);
        self.visiting.remove(&key);
        result
    }

    fn frame_dispatch(
        &mut self,
        shape: &Shape,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        match shape {
            Shape::Resource(resource) => self.frame_resource(resource, candidates, required),
            Shape::Literal(literal) => self.frame_literal(literal, candidates, required),
            Shape::Record(record) => self.frame_record(record, candidates, required),
            Shape::AnyOf(any_of) => self.frame_any_of(any_of, candidates, required),
            Shape::Set(set) => self.frame_set(set, candidates, required),
            Shape::Optional(optional) => self.frame_optional(optional, candidates),
            Shape::List(list) => self.frame_list(list, candidates),
            Shape::Map(map) => self.frame_map(map, candidates),
        }
    }

    fn frame_resource(
        &mut self,
        shape: &ResourceShape,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let mut out = Vec::new();
        let mut first_mismatch = None;
        for term in candidates {
            match shape.check_term(term) {
                Ok(()) => {
                    let value = mapper::resource_from_rdf(term, shape)
                        .map_err(|e| e.set_stack(self.stack.clone()))?;
                    out.push(leaf_framed(shape.id.clone(), term.clone(), value));
                }
                Err(e) => {
                    if first_mismatch.is_none() {
                        first_mismatch = Some(e.set_stack(self.stack.clone()));
                    }
                }
            }
        }
        if out.is_empty() && required {
            if let Some(e) = first_mismatch {
                return Err(e);
            }
        }
        Ok(out)
    }

    fn frame_literal(
        &mut self,
        shape: &LiteralShape,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let mut out = Vec::new();
        let mut first_mismatch = None;
        for term in candidates {
            match shape.check_term(term) {
                Ok(()) => {
                    let value = mapper::literal_from_rdf(term, shape)
                        .map_err(|e| e.set_stack(self.stack.clone()))?;
                    out.push(leaf_framed(shape.id.clone(), term.clone(), value));
                }
                Err(e) => {
                    if first_mismatch.is_none() {
                        first_mismatch = Some(e.set_stack(self.stack.clone()));
                    }
                }
            }
        }
        if out.is_empty() && required {
            if let Some(e) = first_mismatch {
                return Err(e);
            }
        }
        Ok(out)
    }

    fn frame_record(
        &mut self,
        shape: &RecordShape,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let mut out = Vec::new();
        for candidate in candidates {
            if !matches!(candidate, Term::NamedNode(_) | Term::BlankNode(_)) {
                continue;
            }
            self.stack.push(StackFrame {
                shape: shape.id.clone(),
                edge: None,
                focus: Some(candidate.clone()),
            });
            let solutions = self.frame_record_candidate(shape, candidate, required);
            self.stack.pop();
            out.extend(solutions?);
        }
        Ok(out)
    }

    fn frame_record_candidate(
        &mut self,
        shape: &RecordShape,
        candidate: &Term,
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let mut alternatives: Vec<(&ObjectProperty, Vec<Framed>)> = Vec::new();
        for property in &shape.type_properties {
            let matches = self.frame_property(shape, property, candidate, false)?;
            if matches.is_empty() {
                // A failed discriminator silently rejects the candidate.
                return Ok(Vec::new());
            }
            alternatives.push((property, matches));
        }
        let discriminated = !shape.type_properties.is_empty();
        for property in &shape.properties {
            let matches = self.frame_property(shape, property, candidate, false)?;
            if matches.is_empty() {
                if discriminated || required {
                    // Re-run in required mode to surface the specific cause.
                    return Err(match self.frame_property(shape, property, candidate, true) {
                        Err(e) => e,
                        Ok(_) => {
                            self.stack.push(StackFrame {
                                shape: shape.id.clone(),
                                edge: Some(StackEdge::Property(property.name.clone())),
                                focus: Some(candidate.clone()),
                            });
                            let e = self.error(
                                ErrorCode::NoPropertyMatches,
                                format!("no matches for property \"{}\"", property.name),
                            );
                            self.stack.pop();
                            e
                        }
                    });
                }
                return Ok(Vec::new());
            }
            alternatives.push((property, matches));
        }

        // Backtracking join: one solution per combination of alternatives.
        let mut combos: Vec<(BTreeMap<String, Value>, Vec<VarBinding>)> =
            vec![(BTreeMap::new(), Vec::new())];
        for (property, matches) in &alternatives {
            let mut next = Vec::with_capacity(combos.len() * matches.len());
            for (object, vars) in &combos {
                for alternative in matches {
                    let mut object = object.clone();
                    let mut vars = vars.clone();
                    if !property.transient {
                        object.insert(property.name.clone(), alternative.value.clone());
                    }
                    vars.extend(alternative.vars.iter().cloned());
                    next.push((object, vars));
                }
            }
            combos = next;
        }
        Ok(combos
            .into_iter()
            .map(|(object, mut vars)| {
                let value = Value::Object(object);
                vars.push(VarBinding {
                    shape: shape.id.clone(),
                    term: Some(candidate.clone()),
                    value: value.clone(),
                });
                Framed {
                    value,
                    term: Some(candidate.clone()),
                    vars,
                }
            })
            .collect())
    }

    fn frame_property(
        &mut self,
        record: &RecordShape,
        property: &ObjectProperty,
        candidate: &Term,
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        self.stack.push(StackFrame {
            shape: record.id.clone(),
            edge: Some(StackEdge::Property(property.name.clone())),
            focus: Some(candidate.clone()),
        });
        let terms = eval_path(
            self.dataset,
            &property.path,
            slice::from_ref(candidate),
            self.graph.as_ref(),
        );
        let result = self.frame_shape(&property.value_shape, &terms, required);
        self.stack.pop();
        result
    }

    fn frame_any_of(
        &mut self,
        shape: &AnyOfShape,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let mut out = Vec::new();
        for variant in &shape.variants {
            for framed in self.frame_shape(variant, candidates, false)? {
                out.push(wrap_framed(shape.id.clone(), framed));
            }
        }
        if out.is_empty() && required {
            // Re-run the variants in required mode and surface the deepest
            // failure, which names the most specific mismatch.
            let mut best: Option<RampError> = None;
            for variant in &shape.variants {
                if let Err(e) = self.frame_shape(variant, candidates, true) {
                    let deeper = best
                        .as_ref()
                        .map_or(true, |b| e.stack().len() > b.stack().len());
                    if deeper {
                        best = Some(e);
                    }
                }
            }
            if let Some(e) = best {
                return Err(e);
            }
        }
        Ok(out)
    }

    fn frame_set(
        &mut self,
        shape: &SetShape,
        candidates: &[Term],
        required: bool,
    ) -> Result<Vec<Framed>, RampError> {
        let items = self.frame_shape(&shape.item, candidates, false)?;
        if let Some(min) = shape.min_count {
            if items.len() < min {
                if required {
                    return Err(self.error(
                        ErrorCode::MinCountMismatch,
                        format!("found {} items, expected at least {}", items.len(), min),
                    ));
                }
                return Ok(Vec::new());
            }
        }
        if let Some(max) = shape.max_count {
            if items.len() > max {
                if required {
                    return Err(self.error(
                        ErrorCode::MaxCountMismatch,
                        format!("found {} items, expected at most {}", items.len(), max),
                    ));
                }
                return Ok(Vec::new());
            }
        }
        let mut vars = Vec::new();
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            vars.extend(item.vars);
            values.push(item.value);
        }
        let value = Value::Array(values);
        vars.push(VarBinding {
            shape: shape.id.clone(),
            term: None,
            value: value.clone(),
        });
        Ok(vec![Framed {
            value,
            term: None,
            vars,
        }])
    }

    fn frame_optional(
        &mut self,
        shape: &OptionalShape,
        candidates: &[Term],
    ) -> Result<Vec<Framed>, RampError> {
        let items = self.frame_shape(&shape.item, candidates, false)?;
        if items.is_empty() {
            let value = shape.empty_value.clone();
            return Ok(vec![Framed {
                value: value.clone(),
                term: None,
                vars: vec![VarBinding {
                    shape: shape.id.clone(),
                    term: None,
                    value,
                }],
            }]);
        }
        Ok(items
            .into_iter()
            .map(|framed| wrap_framed(shape.id.clone(), framed))
            .collect())
    }

    fn frame_list(
        &mut self,
        shape: &ListShape,
        candidates: &[Term],
    ) -> Result<Vec<Framed>, RampError> {
        let head = shape.head_path();
        let tail = shape.tail_path();
        let nil = shape.nil_term();
        let mut out = Vec::new();
        for candidate in candidates {
            if !matches!(candidate, Term::NamedNode(_) | Term::BlankNode(_)) {
                continue;
            }
            self.stack.push(StackFrame {
                shape: shape.id.clone(),
                edge: None,
                focus: Some(candidate.clone()),
            });
            let walked = self.walk_list(shape, &head, &tail, &nil, candidate);
            self.stack.pop();
            if let Some(framed) = walked? {
                out.push(framed);
            }
        }
        Ok(out)
    }

    /// Follows one linked list to its end, or rejects the candidate when it
    /// does not start a list at all.
    fn walk_list(
        &mut self,
        shape: &ListShape,
        head: &PropertyPath,
        tail: &PropertyPath,
        nil: &Term,
        candidate: &Term,
    ) -> Result<Option<Framed>, RampError> {
        let mut values = Vec::new();
        let mut vars = Vec::new();
        let mut current = candidate.clone();
        let mut index = 0usize;
        let mut walked = FxHashSet::default();
        walked.insert(current.clone());
        while current != *nil {
            self.stack.push(StackFrame {
                shape: shape.id.clone(),
                edge: Some(StackEdge::Index(index)),
                focus: Some(current.clone()),
            });
            let result = self.walk_list_cell(shape, head, tail, &current, index);
            self.stack.pop();
            let Some((item, next)) = result? else {
                return Ok(None);
            };
            values.push(item.value);
            vars.extend(item.vars);
            if !walked.insert(next.clone()) {
                return Err(self.error(
                    ErrorCode::ShapeMismatch,
                    format!("list tail cycles back to {}", next),
                ));
            }
            current = next;
            index += 1;
        }
        let value = Value::Array(values);
        vars.push(VarBinding {
            shape: shape.id.clone(),
            term: Some(candidate.clone()),
            value: value.clone(),
        });
        Ok(Some(Framed {
            value,
            term: Some(candidate.clone()),
            vars,
        }))
    }

    /// Frames one list cell: exactly one item through the head path and
    /// exactly one successor through the tail path.
    fn walk_list_cell(
        &mut self,
        shape: &ListShape,
        head: &PropertyPath,
        tail: &PropertyPath,
        current: &Term,
        index: usize,
    ) -> Result<Option<(Framed, Term)>, RampError> {
        let head_terms = eval_path(
            self.dataset,
            head,
            slice::from_ref(current),
            self.graph.as_ref(),
        );
        if head_terms.is_empty() {
            if index == 0 {
                // Not a list head; reject the candidate silently.
                return Ok(None);
            }
            return Err(self.error(
                ErrorCode::NoListHeadMatches,
                format!("no head matches at list index {}", index),
            ));
        }
        if head_terms.len() > 1 {
            return Err(self.error(
                ErrorCode::MultipleListHeadMatches,
                format!(
                    "{} head matches at list index {}",
                    head_terms.len(),
                    index
                ),
            ));
        }
        let mut items = self.frame_shape(&shape.item, &head_terms, true)?;
        if items.is_empty() {
            return Err(self.error(
                ErrorCode::NoListItemMatches,
                format!("no item matches at list index {}", index),
            ));
        }
        if items.len() > 1 {
            return Err(self.error(
                ErrorCode::MultipleListItemMatches,
                format!("{} item matches at list index {}", items.len(), index),
            ));
        }
        let tail_terms = eval_path(
            self.dataset,
            tail,
            slice::from_ref(current),
            self.graph.as_ref(),
        );
        if tail_terms.len() > 1 {
            return Err(self.error(
                ErrorCode::MultipleListTailMatches,
                format!("{} tail matches at list index {}", tail_terms.len(), index),
            ));
        }
        let Some(next) = tail_terms.into_iter().next() else {
            return Err(self.error(
                ErrorCode::NoListTailMatches,
                format!("no tail matches at list index {}", index),
            ));
        };
        if !matches!(next, Term::NamedNode(_) | Term::BlankNode(_)) {
            return Err(self.error(
                ErrorCode::NoListTailMatches,
                format!("list tail at index {} is not a resource: {}", index, next),
            ));
        }
        Ok(Some((items.remove(0), next)))
    }

    fn frame_map(
        &mut self,
        shape: &MapShape,
        candidates: &[Term],
    ) -> Result<Vec<Framed>, RampError> {
        let items = self.frame_shape(&shape.item, candidates, false)?;
        let mut entries = BTreeMap::new();
        let mut vars = Vec::new();
        for item in items {
            let Some(key_binding) = find_binding(&item.vars, &shape.key.target) else {
                return Err(self.error(
                    ErrorCode::ShapeMismatch,
                    format!("no match for map key shape {} inside the item", shape.key.target),
                ));
            };
            let Some(key) = self.extract_key(&shape.key, key_binding)? else {
                // The key part is absent on this item; skip the entry.
                continue;
            };
            let stored = match &shape.value {
                Some(reference) => {
                    let Some(binding) = find_binding(&item.vars, &reference.target) else {
                        return Err(self.error(
                            ErrorCode::ShapeMismatch,
                            format!(
                                "no match for map value shape {} inside the item",
                                reference.target
                            ),
                        ));
                    };
                    let Some(value) = self.extract_part(reference, binding)? else {
                        continue;
                    };
                    value
                }
                None => item.value.clone(),
            };
            entries.insert(key, stored);
            vars.extend(item.vars);
        }
        let value = Value::Object(entries);
        vars.push(VarBinding {
            shape: shape.id.clone(),
            term: None,
            value: value.clone(),
        });
        Ok(vec![Framed {
            value,
            term: None,
            vars,
        }])
    }

    /// The scalar key a reference selects from a binding, or `None` when the
    /// selected part is absent.
    fn extract_key(
        &self,
        reference: &ShapeReference,
        binding: &VarBinding,
    ) -> Result<Option<String>, RampError> {
        let Some(part) = self.extract_part(reference, binding)? else {
            return Ok(None);
        };
        match part.scalar_key() {
            Some(key) => Ok(Some(key)),
            None => Err(self.error(
                ErrorCode::CompositeMapKey,
                format!("map key must be a scalar, found a {}", part.kind_name()),
            )),
        }
    }

    /// The part of a binding a reference selects.
    fn extract_part(
        &self,
        reference: &ShapeReference,
        binding: &VarBinding,
    ) -> Result<Option<Value>, RampError> {
        let Some(part) = reference.part else {
            return Ok(Some(binding.value.clone()));
        };
        let Some(term) = &binding.term else {
            return Err(self.error(
                ErrorCode::ShapeMismatch,
                format!("shape {} did not match a term", reference.target),
            ));
        };
        match (part, term) {
            (TermPart::Value, Term::Literal(literal)) => {
                Ok(Some(Value::String(literal.value().into())))
            }
            (TermPart::Value, Term::NamedNode(node)) => {
                Ok(Some(Value::String(node.as_str().into())))
            }
            (TermPart::Value, Term::BlankNode(node)) => {
                Ok(Some(Value::String(format!("_:{}", node.as_str()))))
            }
            (TermPart::Datatype, Term::Literal(literal)) => {
                Ok(Some(Value::String(literal.datatype().as_str().into())))
            }
            (TermPart::Language, Term::Literal(literal)) => {
                Ok(literal.language().map(|l| Value::String(l.into())))
            }
            (TermPart::Datatype | TermPart::Language, _) => Err(self.error(
                ErrorCode::ShapeMismatch,
                format!("term {} has no {} part", term, part_name(part)),
            )),
            #[allow(unreachable_patterns)]
            (TermPart::Value, _) => Err(self.error(
                ErrorCode::ShapeMismatch,
                format!("term {} has no value part", term),
            )),
        }
    }
}

fn part_name(part: TermPart) -> &'static str {
    match part {
        TermPart::Value => "value",
        TermPart::Datatype => "datatype",
        TermPart::Language => "language",
    }
}

fn leaf_framed(shape: ShapeId, term: Term, value: Value) -> Framed {
    Framed {
        value: value.clone(),
        term: Some(term.clone()),
        vars: vec![VarBinding {
            shape,
            term: Some(term),
            value,
        }],
    }
}

/// Re-labels an inner alternative with the wrapping shape's own binding.
fn wrap_framed(shape: ShapeId, mut framed: Framed) -> Framed {
    framed.vars.push(VarBinding {
        shape,
        term: framed.term.clone(),
        value: framed.value.clone(),
    });
    framed
}

/// The innermost binding of a shape within one item's variables.
fn find_binding<'a>(vars: &'a [VarBinding], target: &ShapeId) -> Option<&'a VarBinding> {
    vars.iter().rev().find(|binding| binding.shape == *target)
}
