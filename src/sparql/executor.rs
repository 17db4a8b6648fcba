//! SPARQL query executor
//!
//! Evaluates the algebra spargebra produces directly against an [`RdfStore`].
//! Covered: basic graph patterns, joins, unions, projection, DISTINCT/REDUCED
//! and OFFSET/LIMIT. Anything else is reported as unsupported rather than
//! answered incorrectly.

use super::results::{QuerySolution, SparqlResults};
use crate::rdf::{
    BlankNode, NamedNode, RdfObject, RdfPredicate, RdfStore, RdfTerm, Triple, TriplePattern,
};
use spargebra::algebra::GraphPattern;
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern as SparqlTriplePattern};
use spargebra::Query;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Algebra the executor does not evaluate
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Query form does not match the requested result shape
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
}

type ExecutionResult<T> = Result<T, ExecutionError>;

/// Blank nodes in a pattern behave like variables that are never projected.
/// Their keys carry the `_:` prefix, which no SPARQL variable name can have.
type Row = BTreeMap<String, RdfTerm>;

enum Slot<T> {
    Fixed(T),
    Var(String),
    Never,
}

/// SPARQL query executor
pub struct SparqlExecutor<'a> {
    store: &'a RdfStore,
}

impl<'a> SparqlExecutor<'a> {
    /// Create a new executor over a store snapshot
    pub fn new(store: &'a RdfStore) -> Self {
        Self { store }
    }

    /// Execute a SELECT query
    pub fn execute_select(&self, query: &Query) -> ExecutionResult<SparqlResults> {
        let Query::Select { pattern, .. } = query else {
            return Err(ExecutionError::TypeMismatch(
                "expected a SELECT query".to_string(),
            ));
        };

        let variables = projection(pattern).ok_or_else(|| {
            ExecutionError::TypeMismatch("SELECT without a projection".to_string())
        })?;
        let solutions = self
            .evaluate(pattern)?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .filter(|(key, _)| !key.starts_with("_:"))
                    .collect::<QuerySolution>()
            })
            .collect();

        Ok(SparqlResults::Bindings {
            variables,
            solutions,
        })
    }

    /// Execute a CONSTRUCT query
    pub fn execute_construct(&self, query: &Query) -> ExecutionResult<SparqlResults> {
        let Query::Construct {
            template, pattern, ..
        } = query
        else {
            return Err(ExecutionError::TypeMismatch(
                "expected a CONSTRUCT query".to_string(),
            ));
        };

        let mut triples = Vec::new();
        for row in self.evaluate(pattern)? {
            let mut fresh: HashMap<String, BlankNode> = HashMap::new();
            for tp in template {
                if let Some(triple) = instantiate(tp, &row, &mut fresh) {
                    triples.push(triple);
                }
            }
        }
        Ok(SparqlResults::Graph(triples))
    }

    fn evaluate(&self, pattern: &GraphPattern) -> ExecutionResult<Vec<Row>> {
        match pattern {
            GraphPattern::Bgp { patterns } => {
                let mut rows = vec![Row::new()];
                for tp in patterns {
                    let mut next = Vec::new();
                    for row in &rows {
                        next.extend(self.match_triple(tp, row)?);
                    }
                    rows = next;
                }
                Ok(rows)
            }
            GraphPattern::Join { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(left
                    .iter()
                    .flat_map(|l| right.iter().filter_map(move |r| merge(l, r)))
                    .collect())
            }
            GraphPattern::Union { left, right } => {
                let mut rows = self.evaluate(left)?;
                rows.extend(self.evaluate(right)?);
                Ok(rows)
            }
            GraphPattern::Project { inner, variables } => {
                let keep: HashSet<&str> = variables.iter().map(|v| v.as_str()).collect();
                Ok(self
                    .evaluate(inner)?
                    .into_iter()
                    .map(|row| {
                        row.into_iter()
                            .filter(|(key, _)| keep.contains(key.as_str()))
                            .collect::<Row>()
                    })
                    .collect())
            }
            GraphPattern::Distinct { inner } | GraphPattern::Reduced { inner } => {
                let mut seen = HashSet::new();
                Ok(self
                    .evaluate(inner)?
                    .into_iter()
                    .filter(|row| seen.insert(row.clone()))
                    .collect())
            }
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => {
                let rows = self.evaluate(inner)?.into_iter().skip(*start);
                Ok(match length {
                    Some(length) => rows.take(*length).collect(),
                    None => rows.collect(),
                })
            }
            other => Err(ExecutionError::Unsupported(
                unsupported_name(other).to_string(),
            )),
        }
    }

    fn match_triple(&self, tp: &SparqlTriplePattern, row: &Row) -> ExecutionResult<Vec<Row>> {
        let subject = term_slot(&tp.subject, row, RdfTerm::as_subject)?;
        let predicate = match &tp.predicate {
            NamedNodePattern::NamedNode(n) => Slot::Fixed(NamedNode::from(n.clone()).into()),
            NamedNodePattern::Variable(v) => var_slot(v.as_str().to_string(), row, |t| match t {
                RdfTerm::NamedNode(n) => Some(RdfPredicate::from(n.clone())),
                _ => None,
            }),
        };
        let object = term_slot(&tp.object, row, |t| Some(RdfObject::from(t.clone())))?;

        let (subject, s_var) = match subject {
            Slot::Fixed(s) => (Some(s), None),
            Slot::Var(key) => (None, Some(key)),
            Slot::Never => return Ok(Vec::new()),
        };
        let (predicate, p_var) = match predicate {
            Slot::Fixed(p) => (Some(p), None),
            Slot::Var(key) => (None, Some(key)),
            Slot::Never => return Ok(Vec::new()),
        };
        let (object, o_var) = match object {
            Slot::Fixed(o) => (Some(o), None),
            Slot::Var(key) => (None, Some(key)),
            Slot::Never => return Ok(Vec::new()),
        };

        let lookup = TriplePattern::new(subject, predicate, object);
        Ok(self
            .store
            .query(&lookup)
            .into_iter()
            .filter_map(|triple| {
                let mut extended = row.clone();
                let bound = bind(&mut extended, s_var.as_ref(), triple.subject.into())
                    && bind(&mut extended, p_var.as_ref(), triple.predicate.into())
                    && bind(&mut extended, o_var.as_ref(), triple.object.into());
                bound.then_some(extended)
            })
            .collect())
    }
}

fn projection(pattern: &GraphPattern) -> Option<Vec<String>> {
    match pattern {
        GraphPattern::Project { variables, .. } => {
            Some(variables.iter().map(|v| v.as_str().to_string()).collect())
        }
        GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. } => projection(inner),
        _ => None,
    }
}

fn term_slot<T>(
    pattern: &TermPattern,
    row: &Row,
    narrow: impl Fn(&RdfTerm) -> Option<T>,
) -> ExecutionResult<Slot<T>> {
    #[allow(unreachable_patterns)]
    let term = match pattern {
        TermPattern::Variable(v) => return Ok(var_slot(v.as_str().to_string(), row, narrow)),
        TermPattern::BlankNode(b) => return Ok(var_slot(format!("_:{}", b.as_str()), row, narrow)),
        TermPattern::NamedNode(n) => RdfTerm::NamedNode(n.clone().into()),
        TermPattern::Literal(l) => RdfTerm::Literal(l.clone().into()),
        _ => {
            return Err(ExecutionError::Unsupported(
                "RDF-star triple patterns".to_string(),
            ))
        }
    };
    Ok(narrow(&term).map_or(Slot::Never, Slot::Fixed))
}

fn var_slot<T>(key: String, row: &Row, narrow: impl Fn(&RdfTerm) -> Option<T>) -> Slot<T> {
    match row.get(&key) {
        Some(term) => narrow(term).map_or(Slot::Never, Slot::Fixed),
        None => Slot::Var(key),
    }
}

/// Binds `key` to `term`; false if the key is already bound to something else.
fn bind(row: &mut Row, key: Option<&String>, term: RdfTerm) -> bool {
    let Some(key) = key else {
        return true;
    };
    match row.get(key) {
        Some(existing) => existing == &term,
        None => {
            row.insert(key.clone(), term);
            true
        }
    }
}

fn merge(left: &Row, right: &Row) -> Option<Row> {
    let mut merged = left.clone();
    for (key, term) in right {
        if !bind(&mut merged, Some(key), term.clone()) {
            return None;
        }
    }
    Some(merged)
}

fn instantiate(
    tp: &SparqlTriplePattern,
    row: &Row,
    fresh: &mut HashMap<String, BlankNode>,
) -> Option<Triple> {
    let subject = template_term(&tp.subject, row, fresh)?.as_subject()?;
    let predicate = match &tp.predicate {
        NamedNodePattern::NamedNode(n) => RdfPredicate::from(NamedNode::from(n.clone())),
        NamedNodePattern::Variable(v) => match row.get(v.as_str())? {
            RdfTerm::NamedNode(n) => RdfPredicate::from(n.clone()),
            _ => return None,
        },
    };
    let object = RdfObject::from(template_term(&tp.object, row, fresh)?);
    Some(Triple::new(subject, predicate, object))
}

fn template_term(
    pattern: &TermPattern,
    row: &Row,
    fresh: &mut HashMap<String, BlankNode>,
) -> Option<RdfTerm> {
    #[allow(unreachable_patterns)]
    match pattern {
        TermPattern::NamedNode(n) => Some(RdfTerm::NamedNode(n.clone().into())),
        TermPattern::Literal(l) => Some(RdfTerm::Literal(l.clone().into())),
        TermPattern::Variable(v) => row.get(v.as_str()).cloned(),
        TermPattern::BlankNode(b) => Some(RdfTerm::BlankNode(
            fresh.entry(b.as_str().to_string()).or_default().clone(),
        )),
        _ => None,
    }
}

fn unsupported_name(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Filter { .. } => "FILTER",
        GraphPattern::LeftJoin { .. } => "OPTIONAL",
        GraphPattern::Minus { .. } => "MINUS",
        GraphPattern::Extend { .. } => "BIND",
        GraphPattern::Values { .. } => "VALUES",
        GraphPattern::OrderBy { .. } => "ORDER BY",
        GraphPattern::Group { .. } => "GROUP BY / aggregates",
        GraphPattern::Path { .. } => "property paths",
        GraphPattern::Graph { .. } => "GRAPH",
        GraphPattern::Service { .. } => "SERVICE",
        _ => "graph pattern",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Literal;
    use crate::sparql::SparqlParser;

    const EX: &str = "http://example.org/";

    fn node(local: &str) -> NamedNode {
        NamedNode::new(&format!("{EX}{local}")).unwrap()
    }

    fn pred(local: &str) -> RdfPredicate {
        node(local).into()
    }

    fn sample_store() -> RdfStore {
        let mut store = RdfStore::new();
        store.insert(Triple::new(node("alice").into(), pred("knows"), node("bob").into()));
        store.insert(Triple::new(node("bob").into(), pred("knows"), node("carol").into()));
        store.insert(Triple::new(
            node("alice").into(),
            pred("name"),
            Literal::new_simple_literal("Alice").into(),
        ));
        store
    }

    fn select(store: &RdfStore, query: &str) -> (Vec<String>, Vec<QuerySolution>) {
        let query = SparqlParser::parse(query).unwrap();
        match SparqlExecutor::new(store).execute_select(&query).unwrap() {
            SparqlResults::Bindings { variables, solutions } => (variables, solutions),
            _ => panic!("Expected bindings"),
        }
    }

    #[test]
    fn test_select_single_pattern() {
        let store = sample_store();
        let (vars, rows) = select(
            &store,
            "SELECT ?value WHERE { <http://example.org/alice> <http://example.org/name> ?value }",
        );

        assert_eq!(vars, vec!["value"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("value"),
            Some(&RdfTerm::Literal(Literal::new_simple_literal("Alice")))
        );
    }

    #[test]
    fn test_select_join_chain() {
        let store = sample_store();
        let (_, rows) = select(
            &store,
            "PREFIX ex: <http://example.org/> SELECT ?a ?c WHERE { ?a ex:knows ?b . ?b ex:knows ?c }",
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some(&RdfTerm::NamedNode(node("alice"))));
        assert_eq!(rows[0].get("c"), Some(&RdfTerm::NamedNode(node("carol"))));
        assert!(rows[0].get("b").is_none());
    }

    #[test]
    fn test_select_distinct_and_limit() {
        let store = sample_store();
        let (_, rows) = select(
            &store,
            "SELECT DISTINCT ?p WHERE { ?s ?p ?o }",
        );
        assert_eq!(rows.len(), 2);

        let (_, rows) = select(&store, "SELECT ?s WHERE { ?s ?p ?o } LIMIT 1");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_select_union() {
        let store = sample_store();
        let (_, rows) = select(
            &store,
            "PREFIX ex: <http://example.org/> SELECT ?x WHERE { { ex:alice ex:knows ?x } UNION { ex:bob ex:knows ?x } }",
        );
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_repeated_variable_must_agree() {
        let mut store = sample_store();
        store.insert(Triple::new(node("dan").into(), pred("knows"), node("dan").into()));

        let (_, rows) = select(&store, "SELECT ?x WHERE { ?x <http://example.org/knows> ?x }");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("x"), Some(&RdfTerm::NamedNode(node("dan"))));
    }

    #[test]
    fn test_construct_with_blank_nodes() {
        let store = sample_store();
        let query = SparqlParser::parse(
            "PREFIX ex: <http://example.org/> CONSTRUCT { ?b ex:knownBy ?a . _:n ex:about ?a } WHERE { ?a ex:knows ?b }",
        )
        .unwrap();

        let SparqlResults::Graph(triples) = SparqlExecutor::new(&store).execute_construct(&query).unwrap() else {
            panic!("Expected graph");
        };
        assert_eq!(triples.len(), 4);
        let blanks: HashSet<_> = triples
            .iter()
            .filter(|t| t.subject.is_blank_node())
            .map(|t| t.subject.clone())
            .collect();
        assert_eq!(blanks.len(), 2);
    }

    #[test]
    fn test_unsupported_algebra() {
        let store = sample_store();
        let query = SparqlParser::parse("SELECT ?s WHERE { ?s ?p ?o FILTER(?o = 1) }").unwrap();
        let result = SparqlExecutor::new(&store).execute_select(&query);
        assert!(matches!(result, Err(ExecutionError::Unsupported(_))));
    }

    #[test]
    fn test_wrong_query_form() {
        let store = sample_store();
        let query = SparqlParser::parse("SELECT ?s WHERE { ?s ?p ?o }").unwrap();
        let result = SparqlExecutor::new(&store).execute_construct(&query);
        assert!(matches!(result, Err(ExecutionError::TypeMismatch(_))));
    }

    #[test]
    fn test_select_without_projection() {
        let store = sample_store();
        let query = Query::Select {
            dataset: None,
            pattern: GraphPattern::Bgp { patterns: Vec::new() },
            base_iri: None,
        };
        let result = SparqlExecutor::new(&store).execute_select(&query);
        assert!(matches!(result, Err(ExecutionError::TypeMismatch(_))));
    }

    #[test]
    fn test_select_star_lists_variables() {
        let store = sample_store();
        let (vars, rows) = select(
            &store,
            "SELECT * WHERE { <http://example.org/alice> ?p ?o }",
        );
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&"p".to_string()) && vars.contains(&"o".to_string()));
        assert_eq!(rows.len(), 2);
    }
}
