//! An in-memory quad set with the lookup indices property-path traversal
//! needs.

use log::trace;
use oxrdf::{GraphName, NamedNode, Quad, Subject, Term};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;

/// A logical set of quads.
///
/// Iteration follows insertion order, so traversals over the same dataset
/// are deterministic. Two secondary indices, (subject, predicate) → quads
/// and (object, predicate) → quads, are built lazily on the first constrained
/// lookup and invalidated by mutation; they exist because property-path
/// traversal dominates lookup cost.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    quads: Vec<Quad>,
    present: FxHashSet<Quad>,
    indices: RefCell<Option<Indices>>,
}

#[derive(Debug, Clone, Default)]
struct Indices {
    by_subject_predicate: FxHashMap<(Subject, NamedNode), Vec<usize>>,
    by_object_predicate: FxHashMap<(Term, NamedNode), Vec<usize>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quad; returns whether it was not present before.
    pub fn insert(&mut self, quad: Quad) -> bool {
        if !self.present.insert(quad.clone()) {
            return false;
        }
        self.quads.push(quad);
        *self.indices.borrow_mut() = None;
        true
    }

    /// Removes a quad; returns whether it was present.
    pub fn remove(&mut self, quad: &Quad) -> bool {
        if !self.present.remove(quad) {
            return false;
        }
        self.quads.retain(|q| q != quad);
        *self.indices.borrow_mut() = None;
        true
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.present.contains(quad)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Quads in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Every term occurring in subject or object position, first-seen order.
    pub fn collect_terms(&self) -> Vec<Term> {
        let mut seen = FxHashSet::default();
        let mut terms = Vec::new();
        for quad in &self.quads {
            let subject = subject_to_term(&quad.subject);
            if seen.insert(subject.clone()) {
                terms.push(subject);
            }
            if seen.insert(quad.object.clone()) {
                terms.push(quad.object.clone());
            }
        }
        terms
    }

    /// Quads matching the given constraints, in insertion order.
    ///
    /// Uses the (subject, predicate) index when both are given, the
    /// (object, predicate) index when those two are, and linear filtering
    /// otherwise. The graph constraint is applied last.
    pub fn match_pattern(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
        graph: Option<&GraphName>,
    ) -> Vec<Quad> {
        let positions: Option<Vec<usize>> = match (subject, predicate, object) {
            (Some(s), Some(p), _) => Some(self.with_indices(|indices| {
                indices
                    .by_subject_predicate
                    .get(&(s.clone(), p.clone()))
                    .cloned()
                    .unwrap_or_default()
            })),
            (None, Some(p), Some(o)) => Some(self.with_indices(|indices| {
                indices
                    .by_object_predicate
                    .get(&(o.clone(), p.clone()))
                    .cloned()
                    .unwrap_or_default()
            })),
            _ => None,
        };
        let candidates: Box<dyn Iterator<Item = &Quad>> = match &positions {
            Some(positions) => Box::new(positions.iter().map(|i| &self.quads[*i])),
            None => Box::new(self.quads.iter()),
        };
        candidates
            .filter(|quad| {
                subject.map_or(true, |s| quad.subject == *s)
                    && predicate.map_or(true, |p| quad.predicate == *p)
                    && object.map_or(true, |o| quad.object == *o)
                    && graph.map_or(true, |g| quad.graph_name == *g)
            })
            .cloned()
            .collect()
    }

    fn with_indices<R>(&self, f: impl FnOnce(&Indices) -> R) -> R {
        let mut slot = self.indices.borrow_mut();
        let indices = slot.get_or_insert_with(|| {
            trace!("building dataset indices over {} quads", self.quads.len());
            let mut indices = Indices::default();
            for (position, quad) in self.quads.iter().enumerate() {
                indices
                    .by_subject_predicate
                    .entry((quad.subject.clone(), quad.predicate.clone()))
                    .or_default()
                    .push(position);
                indices
                    .by_object_predicate
                    .entry((quad.object.clone(), quad.predicate.clone()))
                    .or_default()
                    .push(position);
            }
            indices
        });
        f(indices)
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for quad in iter {
            dataset.insert(quad);
        }
        dataset
    }
}

impl Extend<Quad> for Dataset {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        for quad in iter {
            self.insert(quad);
        }
    }
}

pub(crate) fn subject_to_term(subject: &Subject) -> Term {
    match subject {
        Subject::NamedNode(n) => Term::NamedNode(n.clone()),
        Subject::BlankNode(b) => Term::BlankNode(b.clone()),
        #[allow(unreachable_patterns)]
        _ => unreachable!("data quads only use named and blank subjects"),
    }
}

pub(crate) fn term_to_subject(term: &Term) -> Option<Subject> {
    match term {
        Term::NamedNode(n) => Some(Subject::NamedNode(n.clone())),
        Term::BlankNode(b) => Some(Subject::BlankNode(b.clone())),
        _ => None,
    }
}
