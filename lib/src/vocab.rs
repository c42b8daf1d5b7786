//! Ready to use [`NamedNodeRef`](oxrdf::NamedNodeRef)s for the shape schema vocabulary.
//!
//! The `rdf:` and `xsd:` vocabularies come from [`oxrdf::vocab`].

pub mod ramp {
    //! Vocabulary of the shape schema itself, used by the self-describing
    //! schema in [`crate::shapes_for_shapes`].

    use oxrdf::NamedNodeRef;

    /// The union of all shape kinds.
    pub const SHAPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Shape");
    /// The class of resource shapes.
    pub const RESOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Resource");
    /// The class of literal shapes.
    pub const LITERAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Literal");
    /// The class of record shapes.
    pub const RECORD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Record");
    /// The class of union shapes.
    pub const ANY_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#AnyOf");
    /// The class of set shapes.
    pub const SET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Set");
    /// The class of optional shapes.
    pub const OPTIONAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Optional");
    /// The class of list shapes.
    pub const LIST: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#List");
    /// The class of map shapes.
    pub const MAP: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#Map");

    /// Links a record shape to its ordered property list.
    pub const PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#property");
    /// Links a record shape to its ordered discriminator property list.
    pub const TYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#typeProperty");
    /// The name of a property.
    pub const NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#name");
    /// The property path of a property.
    pub const PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#path");
    /// Links a property or reference to the shape it points at.
    pub const SHAPE_REF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#shape");
    /// Marks a property as synthesised rather than read from the value.
    pub const TRANSIENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#transient");
    /// The item shape of a set, optional, list or map.
    pub const ITEM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#item");
    /// Minimum cardinality of a set.
    pub const MIN_COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#minCount");
    /// Maximum cardinality of a set.
    pub const MAX_COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#maxCount");
    /// Head path override of a list shape.
    pub const HEAD_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#headPath");
    /// Tail path override of a list shape.
    pub const TAIL_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#tailPath");
    /// Terminator override of a list shape.
    pub const NIL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#nil");
    /// Links a union shape to its ordered variant list.
    pub const VARIANT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#variant");
    /// Key reference of a map shape.
    pub const MAP_KEY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#mapKey");
    /// Value reference of a map shape.
    pub const MAP_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#mapValue");
    /// A fixed term value, a vocabulary item term, or the `value` term part.
    pub const TERM_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#termValue");
    /// A fixed datatype, or the `datatype` term part.
    pub const TERM_DATATYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#termDatatype");
    /// A fixed language, or the `language` term part.
    pub const TERM_LANGUAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#termLanguage");
    /// Selects which part of a matched term a reference extracts.
    pub const TERM_PART: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#termPart");
    /// Links a resource shape to its vocabulary items.
    pub const VOCABULARY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#vocabulary");
    /// The string key of a vocabulary item.
    pub const VOCAB_KEY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#vocabKey");
    /// Marks a terminal shape whose matches stay RDF terms.
    pub const KEEP_AS_TERM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#keepAsTerm");
    /// Restricts a resource shape to named nodes.
    pub const ONLY_NAMED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#onlyNamed");
    /// The predicate of an atomic property path.
    pub const PREDICATE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#predicate");
    /// An inverted property path.
    pub const INVERSE_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#inversePath");
    /// A list of alternative property paths.
    pub const ALTERNATIVE_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#alternativePath");
    /// A path traversed zero or more times.
    pub const ZERO_OR_MORE_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#zeroOrMorePath");
    /// A path traversed zero or one time.
    pub const ZERO_OR_ONE_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#zeroOrOnePath");
    /// A path traversed one or more times.
    pub const ONE_OR_MORE_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://ramp-shapes.github.io/schema#oneOrMorePath");
}
