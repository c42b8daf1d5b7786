//! Helpers shared by the test suites.

use crate::dataset::{subject_to_term, Dataset};
use crate::flattening::BlankNodeGenerator;
use oxrdf::{BlankNode, Quad, Term};
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A blank node generator producing `b1`, `b2`, … so tests can predict the
/// emitted quads.
#[derive(Debug, Default)]
pub struct SequentialBlankNodeGenerator {
    counter: u64,
}

impl SequentialBlankNodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlankNodeGenerator for SequentialBlankNodeGenerator {
    fn generate(&mut self, _hint: &str) -> BlankNode {
        self.counter += 1;
        BlankNode::new_unchecked(format!("b{}", self.counter))
    }
}

/// Node label used for isomorphism checks: blank nodes compare as wildcards,
/// every other term structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeLabel {
    Blank,
    Term(Term),
}

fn label(term: &Term) -> NodeLabel {
    match term {
        Term::BlankNode(_) => NodeLabel::Blank,
        other => NodeLabel::Term(other.clone()),
    }
}

/// Converts a dataset to a directed graph: one node per distinct subject or
/// object term, one edge per (subject, object) pair weighted by the sorted
/// predicate/graph labels of the quads connecting them. Collapsing parallel
/// quads into a single weighted edge keeps the isomorphism check exact.
fn dataset_to_graph(dataset: &Dataset) -> DiGraph<NodeLabel, Vec<(String, String)>> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::<Term, NodeIndex>::new();
    let mut edges = HashMap::<(NodeIndex, NodeIndex), Vec<(String, String)>>::new();
    for quad in dataset.iter() {
        let subject = subject_to_term(&quad.subject);
        let object = quad.object.clone();
        let s = *nodes
            .entry(subject.clone())
            .or_insert_with(|| graph.add_node(label(&subject)));
        let o = *nodes
            .entry(object.clone())
            .or_insert_with(|| graph.add_node(label(&object)));
        edges
            .entry((s, o))
            .or_default()
            .push((quad.predicate.as_str().to_string(), quad.graph_name.to_string()));
    }
    for ((s, o), mut labels) in edges {
        labels.sort();
        graph.add_edge(s, o, labels);
    }
    graph
}

/// Whether two datasets contain the same quads modulo blank-node renaming.
pub fn isomorphic(left: &Dataset, right: &Dataset) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let lg = dataset_to_graph(left);
    let rg = dataset_to_graph(right);
    is_isomorphic_matching(&lg, &rg, |a, b| a == b, |a, b| a == b)
}

/// Collects quads into a dataset.
pub fn dataset_of(quads: impl IntoIterator<Item = Quad>) -> Dataset {
    quads.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{GraphName, NamedNode, Subject};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{}", iri))
    }

    #[test]
    fn renamed_blanks_are_isomorphic() {
        let left = dataset_of([Quad::new(
            Subject::BlankNode(BlankNode::new_unchecked("a")),
            node("p"),
            Term::NamedNode(node("x")),
            GraphName::DefaultGraph,
        )]);
        let right = dataset_of([Quad::new(
            Subject::BlankNode(BlankNode::new_unchecked("zz")),
            node("p"),
            Term::NamedNode(node("x")),
            GraphName::DefaultGraph,
        )]);
        assert!(isomorphic(&left, &right));
    }

    #[test]
    fn different_predicates_are_not_isomorphic() {
        let left = dataset_of([Quad::new(
            node("s"),
            node("p"),
            Term::NamedNode(node("x")),
            GraphName::DefaultGraph,
        )]);
        let right = dataset_of([Quad::new(
            node("s"),
            node("q"),
            Term::NamedNode(node("x")),
            GraphName::DefaultGraph,
        )]);
        assert!(!isomorphic(&left, &right));
    }
}
