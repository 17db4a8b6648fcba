//! Store-side interface the repository consumes
//!
//! A store hands out [`Connection`]s through a [`ConnectionSource`]. Results
//! come back as [`RowStream`]s that stay valid only while their connection is
//! open; the repository wraps them in [`super::Cursor`]s that own the
//! connection for as long as the stream is alive.

use super::error::RepositoryResult;
use crate::rdf::{Graph, Triple, TriplePattern};
use crate::sparql::{QueryLanguage, QuerySolution};

/// Single-pass stream of results tied to an open connection.
/// Advancing may fail with a store error.
pub type RowStream<T> = Box<dyn Iterator<Item = RepositoryResult<T>> + Send>;

/// A handle to the store's current view of the data
pub trait Connection: Send {
    /// Statements matching a pattern; unbound positions match anything
    fn statements(&mut self, pattern: &TriplePattern) -> RepositoryResult<RowStream<Triple>>;

    /// Evaluate a tabular (SELECT) query
    fn evaluate_tabular(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<RowStream<QuerySolution>>;

    /// Evaluate a graph (CONSTRUCT) query
    fn evaluate_graph(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<RowStream<Triple>>;

    /// Add every statement of the graph as one store-level operation
    fn add(&mut self, graph: &Graph) -> RepositoryResult<()>;

    /// Remove every statement of the graph as one store-level operation
    fn remove(&mut self, graph: &Graph) -> RepositoryResult<()>;

    /// Release the connection. Streams obtained from it stop yielding rows.
    fn close(&mut self) -> RepositoryResult<()>;
}

/// Something that can open connections, i.e. the store itself
pub trait ConnectionSource: Send + Sync {
    fn open(&self) -> RepositoryResult<Box<dyn Connection>>;
}
