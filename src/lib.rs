//! Samyama RDF Repository
//!
//! A connection-scoped facade over RDF triple stores. Callers ask for
//! statements, values, subjects or query results and never see a connection:
//! the [`repository::Repository`] acquires one per call and guarantees it is
//! released, either before returning or when the lazy cursor it hands back is
//! closed.
//!
//! # Modules
//!
//! - [`rdf`]: terms, triples, patterns, graphs, an indexed in-memory store and
//!   document parsing (Turtle, N-Triples, RDF/XML)
//! - [`sparql`]: query language tokens and the basic graph pattern evaluator
//!   used by the in-memory store
//! - [`repository`]: the facade, its cursors, error policy and the
//!   connection interface a store implements
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_rdf::{MemoryStore, Repository, QueryLanguage};
//! use samyama_rdf::rdf::RdfFormat;
//!
//! let repo = Repository::new(MemoryStore::new());
//! let doc = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice ex:knows ex:bob .
//!     ex:bob ex:knows ex:carol .
//! "#;
//! repo.read(doc.as_bytes(), RdfFormat::Turtle).unwrap();
//!
//! let rows = repo
//!     .select_query(QueryLanguage::Sparql, "SELECT ?who WHERE { ?who <http://example.org/knows> ?x }")
//!     .unwrap();
//! assert_eq!(rows.count(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod rdf;
pub mod repository;
pub mod sparql;

// Re-export main types for convenience
pub use rdf::{
    BlankNode, Graph, Literal, NamedNode, RdfFormat, RdfObject, RdfPredicate, RdfStore,
    RdfSubject, RdfTerm, Triple, TriplePattern,
};

pub use repository::{
    Connection, ConnectionSource, Cursor, DiagnosticsSink, ErrorPolicy, MemoryStore, Operation,
    Repository, RepositoryConfig, RepositoryError, RepositoryQuery, RepositoryResult,
};

pub use sparql::{QueryLanguage, QuerySolution, SparqlEngine, SparqlError, SparqlResults};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
