//! Declarative bidirectional mapping between RDF graphs and structured,
//! tree-shaped values.
//!
//! A [`Shape`] describes how a fragment of RDF corresponds to a piece of
//! structured data. Three operations share the shape algebra:
//!
//! - [`frame`]: enumerate the values that satisfy a shape against a
//!   [`Dataset`];
//! - [`flatten`]: emit the quads that materialise a value under a shape;
//! - [`generate_query`]: produce the CONSTRUCT query that would retrieve
//!   the quads a shape is concerned with from a remote endpoint.
//!
//! Shapes are built with [`ShapeBuilder`] and addressed by [`ShapeId`];
//! framing yields [`Value`] trees. The crate also ships the self-describing
//! schema in [`shapes_for_shapes`], which frames and flattens the shape
//! algebra itself.
#![deny(clippy::all)]

pub mod builder;
pub mod dataset;
pub mod error;
pub mod flattening;
pub mod framing;
pub mod mapper;
mod paths;
pub mod query_generation;
pub mod shape;
pub mod shapes_for_shapes;
pub mod test_utils;
pub mod types;
pub mod value;
pub mod vocab;

pub use builder::ShapeBuilder;
pub use dataset::Dataset;
pub use error::{ErrorCode, RampError};
pub use flattening::{flatten, BlankNodeGenerator, FlattenParams};
pub use framing::{frame, FrameParams, FrameSolution};
pub use query_generation::{generate_query, ConstructQuery, QueryParams};
pub use shape::{Shape, ShapeSet};
pub use types::{PropertyPath, ShapeId, ShapeReference, TermPart, Vocabulary};
pub use value::{Number, Value};
