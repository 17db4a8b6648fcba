//! SPARQL query results

use crate::rdf::{RdfObject, RdfTerm, Triple};
use std::collections::HashMap;

/// Query solution (variable bindings), one row of a tabular result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySolution {
    /// Variable name → RDF term bindings
    pub bindings: HashMap<String, RdfTerm>,
}

impl QuerySolution {
    /// Create a new query solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&RdfTerm> {
        self.bindings.get(variable)
    }

    /// Take a binding out of the row as a value
    pub fn take_value(&mut self, variable: &str) -> Option<RdfObject> {
        self.bindings.remove(variable).map(RdfObject::from)
    }

    /// Add a binding
    pub fn bind(&mut self, variable: impl Into<String>, term: RdfTerm) {
        self.bindings.insert(variable.into(), term);
    }

    /// Names of the variables bound in this row
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

impl FromIterator<(String, RdfTerm)> for QuerySolution {
    fn from_iter<I: IntoIterator<Item = (String, RdfTerm)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// SPARQL query results
#[derive(Debug, Clone)]
pub enum SparqlResults {
    /// Bindings from SELECT query
    Bindings {
        /// Projected variables, in query order
        variables: Vec<String>,
        /// Solutions
        solutions: Vec<QuerySolution>,
    },

    /// Graph from CONSTRUCT query
    Graph(Vec<Triple>),
}
