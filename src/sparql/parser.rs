//! SPARQL parser using spargebra library

use spargebra::Query;
use thiserror::Error;

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Syntax error
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

/// SPARQL parser
pub struct SparqlParser;

impl SparqlParser {
    /// Parse a SPARQL query string
    pub fn parse(query: &str) -> Result<Query, ParseError> {
        let parsed =
            Query::parse(query, None).map_err(|e| ParseError::Syntax(e.to_string()))?;

        match &parsed {
            Query::Select { dataset: Some(_), .. }
            | Query::Construct { dataset: Some(_), .. } => {
                Err(ParseError::Unsupported("FROM / FROM NAMED dataset clauses".to_string()))
            }
            Query::Ask { .. } => Err(ParseError::Unsupported("ASK queries".to_string())),
            Query::Describe { .. } => {
                Err(ParseError::Unsupported("DESCRIBE queries".to_string()))
            }
            _ => Ok(parsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select() {
        let query = SparqlParser::parse("SELECT ?s WHERE { ?s ?p ?o }").unwrap();
        assert!(matches!(query, Query::Select { .. }));
    }

    #[test]
    fn test_parse_construct() {
        let query =
            SparqlParser::parse("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }").unwrap();
        assert!(matches!(query, Query::Construct { .. }));
    }

    #[test]
    fn test_parse_with_prefix() {
        let query = SparqlParser::parse(
            "PREFIX ex: <http://example.org/> SELECT ?who WHERE { ?who ex:knows ex:bob }",
        )
        .unwrap();
        assert!(matches!(query, Query::Select { dataset: None, .. }));
    }

    #[test]
    fn test_syntax_error() {
        let result = SparqlParser::parse("SELECT WHERE {");
        assert!(matches!(result, Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_ask_is_unsupported() {
        let result = SparqlParser::parse("ASK { ?s ?p ?o }");
        assert!(matches!(result, Err(ParseError::Unsupported(_))));
    }
}
