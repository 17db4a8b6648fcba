//! RDF data model for the repository facade
//!
//! This module holds everything that exists independently of a connection:
//! - RDF terms and triples (subject-predicate-object)
//! - Owned graphs (sets of triples)
//! - The fixed vocabulary the repository relies on
//! - An indexed in-memory triple store
//! - Document ingest (Turtle, N-Triples, RDF/XML)
//!
//! # Example
//!
//! ```rust
//! use samyama_rdf::rdf::{Graph, RdfStore, Triple, NamedNode, Literal, RdfPredicate, TriplePattern};
//!
//! let subject = NamedNode::new("http://example.org/alice").unwrap();
//! let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let object = Literal::new_simple_literal("Alice");
//!
//! let graph: Graph = vec![Triple::new(subject.clone().into(), predicate, object.into())]
//!     .into_iter()
//!     .collect();
//!
//! let mut store = RdfStore::new();
//! store.insert_graph(&graph);
//!
//! let results = store.query(&TriplePattern::new(Some(subject.into()), None, None));
//! assert_eq!(results.len(), 1);
//! ```

mod graph;
mod serialization;
mod store;
mod types;
pub mod vocab;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    RdfTerm, Triple, TriplePattern,
};

pub use graph::Graph;

pub use store::RdfStore;

pub use serialization::{ParseError, ParseResult, RdfFormat, RdfParser};
