//! Writes: add, remove and bulk load

use super::error::{Operation, RepositoryResult};
use super::Repository;
use crate::rdf::{Graph, RdfFormat, RdfParser, Triple};
use std::io::BufRead;
use tracing::info;

impl Repository {
    /// Add every statement of `graph` to the store.
    ///
    /// Must-succeed: acquisition and store failures are returned. The
    /// connection is released before returning either way.
    pub fn add_graph(&self, graph: &Graph) -> RepositoryResult<()> {
        let result = self
            .scope(Operation::AddGraph)
            .with_connection(|conn| conn.add(graph));
        self.must_succeed(Operation::AddGraph, result)
    }

    /// Remove every statement of `graph` from the store. Statements that are
    /// not present are ignored.
    pub fn remove_graph(&self, graph: &Graph) -> RepositoryResult<()> {
        let result = self
            .scope(Operation::RemoveGraph)
            .with_connection(|conn| conn.remove(graph));
        self.must_succeed(Operation::RemoveGraph, result)
    }

    pub fn add(&self, statements: impl IntoIterator<Item = Triple>) -> RepositoryResult<()> {
        self.add_graph(&statements.into_iter().collect())
    }

    pub fn remove(&self, statements: impl IntoIterator<Item = Triple>) -> RepositoryResult<()> {
        self.remove_graph(&statements.into_iter().collect())
    }

    /// Parse an RDF document and add its statements, resolving relative IRIs
    /// against the configured base IRI. Returns the number of statements
    /// parsed.
    ///
    /// Nothing is written if the document fails to parse.
    pub fn read<R: BufRead>(&self, reader: R, format: RdfFormat) -> RepositoryResult<usize> {
        let graph = match RdfParser::parse(reader, format, self.config.base_iri.as_deref()) {
            Ok(graph) => graph,
            Err(e) => return self.must_succeed(Operation::Read, Err(e.into())),
        };

        let count = graph.len();
        let result = self
            .scope(Operation::Read)
            .with_connection(|conn| conn.add(&graph))
            .map(|()| count);
        if result.is_ok() {
            info!("Loaded {} statements from {:?} document", count, format);
        }
        self.must_succeed(Operation::Read, result)
    }
}
