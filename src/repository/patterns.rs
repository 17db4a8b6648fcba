//! Pattern matching and describe

use super::cursor::Cursor;
use super::error::{Operation, RepositoryResult};
use super::Repository;
use crate::rdf::{Graph, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};

impl Repository {
    /// Statements matching the pattern; `None` matches anything.
    ///
    /// Best-effort: if the store fails, the error goes to the diagnostics
    /// sink and an empty, already-closed cursor is returned. The caller must
    /// drain, close or drop the cursor to release its connection.
    pub fn statements(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&RdfPredicate>,
        object: Option<&RdfObject>,
    ) -> Cursor<Triple> {
        let pattern = TriplePattern::new(subject.cloned(), predicate.cloned(), object.cloned());
        self.match_pattern(&pattern)
    }

    /// [`Self::statements`] taking a prebuilt pattern
    pub fn match_pattern(&self, pattern: &TriplePattern) -> Cursor<Triple> {
        self.best_effort(Operation::Match, self.open_statements(Operation::Match, pattern), Cursor::empty)
    }

    pub(super) fn open_statements(
        &self,
        operation: Operation,
        pattern: &TriplePattern,
    ) -> RepositoryResult<Cursor<Triple>> {
        self.scope(operation)
            .with_cursor(|conn| conn.statements(pattern))
    }

    /// Every statement with `uri` as subject, copied into an owned graph.
    /// Best-effort: failures yield an empty graph.
    pub fn describe(&self, uri: &NamedNode) -> Graph {
        let pattern = TriplePattern::new(Some(uri.clone().into()), None, None);
        let result = self
            .scope(Operation::Describe)
            .with_connection(|conn| conn.statements(&pattern)?.collect::<RepositoryResult<Graph>>());
        self.best_effort(Operation::Describe, result, Graph::new)
    }
}
