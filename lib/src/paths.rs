//! SPARQL-semantic evaluation of property paths over a dataset.

use crate::dataset::{subject_to_term, term_to_subject, Dataset};
use crate::types::PropertyPath;
use oxrdf::{GraphName, NamedNode, Term};
use rustc_hash::FxHashSet;

/// Direction a path is being traversed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Terms reachable from `sources` through `path`, deduplicated and in
/// first-reached order.
pub(crate) fn eval_path(
    dataset: &Dataset,
    path: &PropertyPath,
    sources: &[Term],
    graph: Option<&GraphName>,
) -> Vec<Term> {
    eval(dataset, path, sources, graph, Direction::Forward)
}

fn eval(
    dataset: &Dataset,
    path: &PropertyPath,
    sources: &[Term],
    graph: Option<&GraphName>,
    direction: Direction,
) -> Vec<Term> {
    match path {
        PropertyPath::Predicate(predicate) => {
            step(dataset, predicate, sources, graph, direction)
        }
        PropertyPath::Inverse(inner) => eval(dataset, inner, sources, graph, direction.flip()),
        PropertyPath::Sequence(parts) => {
            let mut current = dedup(sources.iter().cloned());
            // A backward traversal applies the parts in reverse.
            let apply = |current: Vec<Term>, part: &PropertyPath| {
                eval(dataset, part, &current, graph, direction)
            };
            match direction {
                Direction::Forward => {
                    for part in parts {
                        current = apply(current, part);
                    }
                }
                Direction::Backward => {
                    for part in parts.iter().rev() {
                        current = apply(current, part);
                    }
                }
            }
            current
        }
        PropertyPath::Alternative(parts) => {
            let mut seen = FxHashSet::default();
            let mut out = Vec::new();
            for part in parts {
                for term in eval(dataset, part, sources, graph, direction) {
                    if seen.insert(term.clone()) {
                        out.push(term);
                    }
                }
            }
            out
        }
        PropertyPath::ZeroOrOne(inner) => {
            let mut seen = FxHashSet::default();
            let mut out = Vec::new();
            for term in sources {
                if seen.insert(term.clone()) {
                    out.push(term.clone());
                }
            }
            for term in eval(dataset, inner, sources, graph, direction) {
                if seen.insert(term.clone()) {
                    out.push(term);
                }
            }
            out
        }
        PropertyPath::ZeroOrMore(inner) => {
            closure(dataset, inner, sources, graph, direction, true)
        }
        PropertyPath::OneOrMore(inner) => {
            closure(dataset, inner, sources, graph, direction, false)
        }
    }
}

/// One predicate step over the dataset indices.
fn step(
    dataset: &Dataset,
    predicate: &NamedNode,
    sources: &[Term],
    graph: Option<&GraphName>,
    direction: Direction,
) -> Vec<Term> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for source in sources {
        match direction {
            Direction::Forward => {
                let Some(subject) = term_to_subject(source) else {
                    continue;
                };
                for quad in dataset.match_pattern(Some(&subject), Some(predicate), None, graph) {
                    if seen.insert(quad.object.clone()) {
                        out.push(quad.object);
                    }
                }
            }
            Direction::Backward => {
                for quad in dataset.match_pattern(None, Some(predicate), Some(source), graph) {
                    let term = subject_to_term(&quad.subject);
                    if seen.insert(term.clone()) {
                        out.push(term);
                    }
                }
            }
        }
    }
    out
}

/// Fixed point of repeated traversal of `inner`.
fn closure(
    dataset: &Dataset,
    inner: &PropertyPath,
    sources: &[Term],
    graph: Option<&GraphName>,
    direction: Direction,
    include_start: bool,
) -> Vec<Term> {
    let mut emitted = FxHashSet::default();
    let mut out = Vec::new();
    let start = dedup(sources.iter().cloned());
    if include_start {
        for term in &start {
            if emitted.insert(term.clone()) {
                out.push(term.clone());
            }
        }
    }
    let mut frontier = start;
    while !frontier.is_empty() {
        let stepped = eval(dataset, inner, &frontier, graph, direction);
        frontier = stepped
            .into_iter()
            .filter(|term| emitted.insert(term.clone()))
            .collect();
        out.extend(frontier.iter().cloned());
    }
    out
}

fn dedup(terms: impl Iterator<Item = Term>) -> Vec<Term> {
    let mut seen = FxHashSet::default();
    terms.filter(|term| seen.insert(term.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::Quad;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{}", iri))
    }

    fn term(iri: &str) -> Term {
        Term::NamedNode(node(iri))
    }

    fn quad(s: &str, p: &str, o: &str) -> Quad {
        Quad::new(node(s), node(p), node(o), GraphName::DefaultGraph)
    }

    fn dataset() -> Dataset {
        // a -p-> b -p-> c, plus a -q-> d and b <-r- e
        [
            quad("a", "p", "b"),
            quad("b", "p", "c"),
            quad("a", "q", "d"),
            quad("e", "r", "b"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn predicate_and_sequence() {
        let d = dataset();
        let p = PropertyPath::predicate(node("p"));
        assert_eq!(eval_path(&d, &p, &[term("a")], None), vec![term("b")]);
        let seq = PropertyPath::Sequence(vec![p.clone(), p]);
        assert_eq!(eval_path(&d, &seq, &[term("a")], None), vec![term("c")]);
    }

    #[test]
    fn self_path_returns_sources() {
        let d = dataset();
        let path = PropertyPath::self_path();
        assert_eq!(
            eval_path(&d, &path, &[term("a"), term("a")], None),
            vec![term("a")]
        );
    }

    #[test]
    fn inverse_follows_edges_backwards() {
        let d = dataset();
        let path = PropertyPath::inverse(PropertyPath::predicate(node("r")));
        assert_eq!(eval_path(&d, &path, &[term("b")], None), vec![term("e")]);
    }

    #[test]
    fn alternative_unions_in_order() {
        let d = dataset();
        let path = PropertyPath::Alternative(vec![
            PropertyPath::predicate(node("q")),
            PropertyPath::predicate(node("p")),
        ]);
        assert_eq!(
            eval_path(&d, &path, &[term("a")], None),
            vec![term("d"), term("b")]
        );
    }

    #[test]
    fn zero_or_more_reaches_fixed_point_on_cycles() {
        let d: Dataset = [quad("a", "p", "b"), quad("b", "p", "a")].into_iter().collect();
        let path = PropertyPath::ZeroOrMore(Box::new(PropertyPath::predicate(node("p"))));
        assert_eq!(
            eval_path(&d, &path, &[term("a")], None),
            vec![term("a"), term("b")]
        );
        let plus = PropertyPath::OneOrMore(Box::new(PropertyPath::predicate(node("p"))));
        assert_eq!(
            eval_path(&d, &plus, &[term("a")], None),
            vec![term("b"), term("a")]
        );
    }

    #[test]
    fn literal_sources_have_no_forward_edges() {
        let d = dataset();
        let path = PropertyPath::predicate(node("p"));
        let literal = Term::Literal(oxrdf::Literal::new_simple_literal("x"));
        assert!(eval_path(&d, &path, &[literal], None).is_empty());
    }

    #[test]
    fn graph_scope_restricts_matches() {
        let g = GraphName::NamedNode(node("g"));
        let mut d = Dataset::new();
        d.insert(quad("a", "p", "b"));
        d.insert(Quad::new(node("a"), node("p"), node("c"), g.clone()));
        let path = PropertyPath::predicate(node("p"));
        assert_eq!(eval_path(&d, &path, &[term("a")], Some(&g)), vec![term("c")]);
    }

    #[test]
    fn zero_or_one_includes_sources() {
        let d = dataset();
        let path = PropertyPath::ZeroOrOne(Box::new(PropertyPath::predicate(node("p"))));
        assert_eq!(
            eval_path(&d, &path, &[term("a")], None),
            vec![term("a"), term("b")]
        );
    }
}
