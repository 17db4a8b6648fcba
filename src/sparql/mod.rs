//! Query languages and the SPARQL engine behind the in-memory store
//!
//! The repository facade treats query text as opaque: it forwards a
//! [`QueryLanguage`] token plus the text to whatever store it fronts. This
//! module supplies the evaluator the bundled in-memory store uses.
//!
//! # Example
//!
//! ```rust
//! use samyama_rdf::rdf::RdfStore;
//! use samyama_rdf::sparql::{SparqlEngine, SparqlResults};
//!
//! let store = RdfStore::new();
//! let engine = SparqlEngine::new(&store);
//!
//! let results = engine.select("SELECT ?s WHERE { ?s ?p ?o }").unwrap();
//! assert!(matches!(results, SparqlResults::Bindings { .. }));
//! ```

mod executor;
mod parser;
mod results;

pub use executor::{ExecutionError, SparqlExecutor};
pub use parser::{ParseError as SparqlParseError, SparqlParser};
pub use results::{QuerySolution, SparqlResults};

use crate::rdf::{RdfObject, RdfPredicate, RdfStore, RdfSubject};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which grammar a query string is written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    /// SPARQL 1.1
    #[default]
    Sparql,
    /// SeRQL, accepted as a token for stores that speak it
    Serql,
}

impl fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryLanguage::Sparql => write!(f, "SPARQL"),
            QueryLanguage::Serql => write!(f, "SeRQL"),
        }
    }
}

/// SPARQL errors
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] SparqlParseError),

    /// Execution error
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

pub type SparqlResult<T> = Result<T, SparqlError>;

/// SPARQL query engine over a store snapshot
pub struct SparqlEngine<'a> {
    executor: SparqlExecutor<'a>,
}

impl<'a> SparqlEngine<'a> {
    /// Create a new SPARQL engine
    pub fn new(store: &'a RdfStore) -> Self {
        Self {
            executor: SparqlExecutor::new(store),
        }
    }

    /// Parse and run a SELECT query
    pub fn select(&self, query_str: &str) -> SparqlResult<SparqlResults> {
        let query = SparqlParser::parse(query_str)?;
        Ok(self.executor.execute_select(&query)?)
    }

    /// Parse and run a CONSTRUCT query
    pub fn construct(&self, query_str: &str) -> SparqlResult<SparqlResults> {
        let query = SparqlParser::parse(query_str)?;
        Ok(self.executor.execute_construct(&query)?)
    }
}

/// SELECT for the objects of `subject predicate ?value`.
/// Blank nodes cannot be named from SPARQL text, so they yield `None`.
pub fn values_query(subject: &RdfSubject, predicate: &RdfPredicate) -> Option<String> {
    let RdfSubject::NamedNode(subject) = subject else {
        return None;
    };
    Some(format!("SELECT ?value WHERE {{ {} {} ?value }}", subject, predicate))
}

/// SELECT DISTINCT for subjects of `?uri predicate object`; either side may be open.
pub fn subjects_query(predicate: Option<&RdfPredicate>, object: Option<&RdfObject>) -> Option<String> {
    let predicate = predicate.map_or_else(|| "?p".to_string(), ToString::to_string);
    let object = match object {
        None => "?o".to_string(),
        Some(RdfObject::BlankNode(_)) => return None,
        Some(o) => o.to_string(),
    };
    Some(format!("SELECT DISTINCT ?uri WHERE {{ ?uri {} {} }}", predicate, object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{BlankNode, Literal, NamedNode, Triple};

    #[test]
    fn test_engine_select() {
        let mut store = RdfStore::new();
        store.insert(Triple::new(
            NamedNode::new("http://example.org/alice").unwrap().into(),
            RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap(),
            Literal::new_simple_literal("Alice").into(),
        ));
        let engine = SparqlEngine::new(&store);

        match engine.select("SELECT * WHERE { ?s ?p ?o }").unwrap() {
            SparqlResults::Bindings { solutions, .. } => assert_eq!(solutions.len(), 1),
            _ => panic!("Expected bindings"),
        }
    }

    #[test]
    fn test_engine_parse_error() {
        let store = RdfStore::new();
        let engine = SparqlEngine::new(&store);
        assert!(matches!(engine.select("SELEKT"), Err(SparqlError::Parse(_))));
    }

    #[test]
    fn test_generated_queries_parse() {
        let subject: RdfSubject = NamedNode::new("http://example.org/alice").unwrap().into();
        let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
        let object: RdfObject = Literal::new_simple_literal("A \"quoted\" name").into();

        let values = values_query(&subject, &predicate).unwrap();
        assert!(SparqlParser::parse(&values).is_ok());

        let subjects = subjects_query(Some(&predicate), Some(&object)).unwrap();
        assert!(SparqlParser::parse(&subjects).is_ok());

        let open = subjects_query(None, None).unwrap();
        assert_eq!(open, "SELECT DISTINCT ?uri WHERE { ?uri ?p ?o }");
    }

    #[test]
    fn test_blank_nodes_are_not_rendered() {
        let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
        let blank = BlankNode::new();
        assert!(values_query(&blank.clone().into(), &predicate).is_none());
        assert!(subjects_query(Some(&predicate), Some(&blank.into())).is_none());
    }

    #[test]
    fn test_language_tokens() {
        assert_eq!(QueryLanguage::default(), QueryLanguage::Sparql);
        assert_eq!(QueryLanguage::Serql.to_string(), "SeRQL");
    }
}
