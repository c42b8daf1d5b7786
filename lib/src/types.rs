//! Identifiers, property paths, references and vocabularies shared by the
//! shape algebra and the traversal engines.

use oxrdf::{BlankNode, NamedNode, NamedNodeRef, Term};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;

/// The stable identity of a shape, either a named node or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Named(NamedNode),
    Blank(BlankNode),
}

impl ShapeId {
    pub fn named(iri: impl Into<NamedNode>) -> Self {
        ShapeId::Named(iri.into())
    }

    pub fn blank(id: impl Into<BlankNode>) -> Self {
        ShapeId::Blank(id.into())
    }

    /// The identifier as an RDF term.
    pub fn as_term(&self) -> Term {
        match self {
            ShapeId::Named(n) => Term::NamedNode(n.clone()),
            ShapeId::Blank(b) => Term::BlankNode(b.clone()),
        }
    }

    /// Reads an identifier back from a term, if the term can carry one.
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::NamedNode(n) => Some(ShapeId::Named(n.clone())),
            Term::BlankNode(b) => Some(ShapeId::Blank(b.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeId::Named(n) => n.fmt(f),
            ShapeId::Blank(b) => b.fmt(f),
        }
    }
}

impl From<NamedNode> for ShapeId {
    fn from(node: NamedNode) -> Self {
        ShapeId::Named(node)
    }
}

impl From<NamedNodeRef<'_>> for ShapeId {
    fn from(node: NamedNodeRef<'_>) -> Self {
        ShapeId::Named(node.into_owned())
    }
}

impl From<BlankNode> for ShapeId {
    fn from(node: BlankNode) -> Self {
        ShapeId::Blank(node)
    }
}

/// A SPARQL 1.1 property path expression over named predicates.
///
/// The empty sequence is the *self path*: it navigates nowhere and makes the
/// focus term itself the match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    /// A single predicate step.
    Predicate(NamedNode),
    /// Paths applied one after the other. Empty means the self path.
    Sequence(Vec<PropertyPath>),
    /// A path traversed from object to subject.
    Inverse(Box<PropertyPath>),
    /// Any of several paths.
    Alternative(Vec<PropertyPath>),
    /// A path traversed zero or more times.
    ZeroOrMore(Box<PropertyPath>),
    /// A path traversed zero or one time.
    ZeroOrOne(Box<PropertyPath>),
    /// A path traversed one or more times.
    OneOrMore(Box<PropertyPath>),
}

impl PropertyPath {
    /// The empty sequence.
    pub fn self_path() -> Self {
        PropertyPath::Sequence(Vec::new())
    }

    pub fn predicate(predicate: impl Into<NamedNode>) -> Self {
        PropertyPath::Predicate(predicate.into())
    }

    pub fn inverse(path: PropertyPath) -> Self {
        PropertyPath::Inverse(Box::new(path))
    }

    /// Whether this path is the self path.
    pub fn is_self(&self) -> bool {
        matches!(self, PropertyPath::Sequence(parts) if parts.is_empty())
    }
}

/// The part of a matched term a [`ShapeReference`] extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermPart {
    /// The lexical value of a literal, or the IRI or blank id of a resource.
    Value,
    /// The datatype IRI of a literal.
    Datatype,
    /// The language tag of a literal.
    Language,
}

/// A pointer to another shape, optionally selecting a part of the term it
/// matched. Used by map keys/values and by transient property synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeReference {
    pub target: ShapeId,
    pub part: Option<TermPart>,
}

impl ShapeReference {
    pub fn new(target: impl Into<ShapeId>) -> Self {
        ShapeReference {
            target: target.into(),
            part: None,
        }
    }

    pub fn part(target: impl Into<ShapeId>, part: TermPart) -> Self {
        ShapeReference {
            target: target.into(),
            part: Some(part),
        }
    }
}

/// A bijection between string keys and named terms.
///
/// A resource shape carrying a vocabulary presents its matches to callers as
/// enum-like strings instead of IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    by_key: BTreeMap<String, NamedNode>,
    by_term: FxHashMap<NamedNode, String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key/term pair. The mapping is a bijection: an earlier
    /// mapping of either the key or the term is dropped from both sides.
    pub fn insert(&mut self, key: impl Into<String>, term: impl Into<NamedNode>) {
        let key = key.into();
        let term = term.into();
        if let Some(old_term) = self.by_key.insert(key.clone(), term.clone()) {
            self.by_term.remove(&old_term);
        }
        if let Some(old_key) = self.by_term.insert(term, key) {
            self.by_key.remove(&old_key);
        }
    }

    pub fn term_of(&self, key: &str) -> Option<&NamedNode> {
        self.by_key.get(key)
    }

    pub fn key_of(&self, term: &NamedNode) -> Option<&str> {
        self.by_term.get(term).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Key/term pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedNode)> {
        self.by_key.iter().map(|(k, t)| (k.as_str(), t))
    }
}

impl<K: Into<String>, T: Into<NamedNode>> FromIterator<(K, T)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut vocabulary = Vocabulary::new();
        for (key, term) in iter {
            vocabulary.insert(key, term);
        }
        vocabulary
    }
}
