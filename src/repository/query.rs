//! Explicit query execution

use super::cursor::Cursor;
use super::error::{Operation, RepositoryResult};
use super::Repository;
use crate::rdf::Graph;
use crate::sparql::{QueryLanguage, QuerySolution};

/// A query string tagged with the language it is written in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryQuery {
    pub language: QueryLanguage,
    pub text: String,
}

impl RepositoryQuery {
    pub fn new(language: QueryLanguage, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }

    pub fn sparql(text: impl Into<String>) -> Self {
        Self::new(QueryLanguage::Sparql, text)
    }
}

impl Repository {
    /// A query in the repository's default language
    pub fn query(&self, text: impl Into<String>) -> RepositoryQuery {
        RepositoryQuery::new(self.config.default_language, text)
    }

    /// Evaluate a tabular query and return a lazy cursor over its rows.
    ///
    /// Acquisition, parse and evaluation failures are returned; the
    /// connection is released before the error is. On success the cursor
    /// owns the connection.
    pub fn select_query(
        &self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<Cursor<QuerySolution>> {
        let result = self.open_select(Operation::SelectQuery, language, query);
        self.must_succeed(Operation::SelectQuery, result)
    }

    pub fn select(&self, query: &RepositoryQuery) -> RepositoryResult<Cursor<QuerySolution>> {
        self.select_query(query.language, &query.text)
    }

    pub(super) fn open_select(
        &self,
        operation: Operation,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<Cursor<QuerySolution>> {
        self.scope(operation)
            .with_cursor(|conn| conn.evaluate_tabular(language, query))
    }

    /// Evaluate a graph query, drain it into an owned graph and release the
    /// connection before returning.
    pub fn construct_query(&self, language: QueryLanguage, query: &str) -> RepositoryResult<Graph> {
        let result = self
            .scope(Operation::ConstructQuery)
            .with_connection(|conn| conn.evaluate_graph(language, query)?.collect::<RepositoryResult<Graph>>());
        self.must_succeed(Operation::ConstructQuery, result)
    }

    pub fn construct(&self, query: &RepositoryQuery) -> RepositoryResult<Graph> {
        self.construct_query(query.language, &query.text)
    }
}
