//! Repository error taxonomy and per-operation error policy

use crate::rdf::ParseError;
use crate::sparql::{QueryLanguage, SparqlError};
use std::fmt;
use thiserror::Error;

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No connection could be obtained from the store
    #[error("Failed to acquire connection: {0}")]
    Acquisition(String),

    /// Query text is malformed
    #[error("Malformed query: {0}")]
    Parse(String),

    /// The store failed while evaluating or streaming results
    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    /// An add or remove did not happen
    #[error("Mutation failed: {0}")]
    Mutation(String),

    /// The store does not speak this query language
    #[error("Unsupported query language: {0}")]
    UnsupportedLanguage(QueryLanguage),

    /// A cursor was advanced after its connection closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// A value expected to be a resource was a literal
    #[error("Expected a resource, found {0}")]
    UnexpectedTerm(String),

    /// Closing a connection failed
    #[error("Failed to release connection: {0}")]
    Release(String),

    /// A document could not be parsed
    #[error("Ingest failed: {0}")]
    Ingest(#[from] ParseError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<SparqlError> for RepositoryError {
    fn from(err: SparqlError) -> Self {
        match err {
            SparqlError::Parse(e) => RepositoryError::Parse(e.to_string()),
            SparqlError::Execution(e) => RepositoryError::Evaluation(e.to_string()),
        }
    }
}

/// How an operation reacts to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log through the diagnostics sink and return an empty result
    BestEffort,
    /// Return the error to the caller
    MustSucceed,
}

/// Public repository operations, each with a fixed error policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Match,
    Describe,
    GetValues,
    GetSubjects,
    IsList,
    SelectQuery,
    ConstructQuery,
    AddGraph,
    RemoveGraph,
    Read,
}

impl Operation {
    pub fn policy(self) -> ErrorPolicy {
        match self {
            Operation::Match
            | Operation::Describe
            | Operation::GetValues
            | Operation::GetSubjects
            | Operation::IsList => ErrorPolicy::BestEffort,
            Operation::SelectQuery
            | Operation::ConstructQuery
            | Operation::AddGraph
            | Operation::RemoveGraph
            | Operation::Read => ErrorPolicy::MustSucceed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Match => "match",
            Operation::Describe => "describe",
            Operation::GetValues => "get_values",
            Operation::GetSubjects => "get_subjects",
            Operation::IsList => "is_list",
            Operation::SelectQuery => "select_query",
            Operation::ConstructQuery => "construct_query",
            Operation::AddGraph => "add_graph",
            Operation::RemoveGraph => "remove_graph",
            Operation::Read => "read",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::{SparqlEngine, SparqlError};
    use crate::rdf::RdfStore;

    #[test]
    fn test_reads_are_best_effort() {
        for op in [
            Operation::Match,
            Operation::Describe,
            Operation::GetValues,
            Operation::GetSubjects,
            Operation::IsList,
        ] {
            assert_eq!(op.policy(), ErrorPolicy::BestEffort, "{}", op);
        }
    }

    #[test]
    fn test_queries_and_writes_must_succeed() {
        for op in [
            Operation::SelectQuery,
            Operation::ConstructQuery,
            Operation::AddGraph,
            Operation::RemoveGraph,
            Operation::Read,
        ] {
            assert_eq!(op.policy(), ErrorPolicy::MustSucceed, "{}", op);
        }
    }

    #[test]
    fn test_sparql_errors_map_to_taxonomy() {
        let store = RdfStore::new();
        let engine = SparqlEngine::new(&store);

        let err: SparqlError = engine.select("not sparql").unwrap_err();
        assert!(matches!(RepositoryError::from(err), RepositoryError::Parse(_)));

        let err = engine
            .select("SELECT ?s WHERE { ?s ?p ?o } ORDER BY ?s")
            .unwrap_err();
        assert!(matches!(RepositoryError::from(err), RepositoryError::Evaluation(_)));
    }
}
