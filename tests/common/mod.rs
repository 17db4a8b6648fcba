#![allow(dead_code)]

use samyama_rdf::rdf::{Graph, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use samyama_rdf::repository::{
    Connection, ConnectionSource, DiagnosticsSink, MemoryStore, Operation, RepositoryError,
    RepositoryResult, RowStream,
};
use samyama_rdf::sparql::{QueryLanguage, QuerySolution};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const EX: &str = "http://example.org/";

pub fn iri(local: &str) -> NamedNode {
    NamedNode::new(&format!("{}{}", EX, local)).unwrap()
}

pub fn subject(local: &str) -> RdfSubject {
    iri(local).into()
}

pub fn predicate(local: &str) -> RdfPredicate {
    RdfPredicate::new(&format!("{}{}", EX, local)).unwrap()
}

pub fn object(local: &str) -> RdfObject {
    iri(local).into()
}

pub fn literal(value: &str) -> RdfObject {
    Literal::new_simple_literal(value).into()
}

pub fn triple(s: &str, p: &str, o: &str) -> Triple {
    Triple::new(subject(s), predicate(p), object(o))
}

/// Collects every error a best-effort operation swallows
#[derive(Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<(Operation, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Operation, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.entries().into_iter().map(|(op, _)| op).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn error(&self, operation: Operation, error: &RepositoryError) {
        self.entries
            .lock()
            .unwrap()
            .push((operation, error.to_string()));
    }
}

/// Where a [`FaultySource`] breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Open,
    Evaluate,
    /// Streams yield this many rows, then an error
    MidStream(usize),
    Mutate,
    Close,
}

/// A memory store wrapper that fails at a chosen point and counts
/// connection lifecycle events
#[derive(Clone)]
pub struct FaultySource {
    inner: MemoryStore,
    fault: Fault,
    opened: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl FaultySource {
    pub fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            opened: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Calls to `close`, successful or not
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl ConnectionSource for FaultySource {
    fn open(&self) -> RepositoryResult<Box<dyn Connection>> {
        if self.fault == Fault::Open {
            return Err(RepositoryError::Acquisition("store unreachable".to_string()));
        }
        let inner = self.inner.open()?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FaultyConnection {
            inner,
            fault: self.fault,
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct FaultyConnection {
    inner: Box<dyn Connection>,
    fault: Fault,
    closes: Arc<AtomicUsize>,
}

impl FaultyConnection {
    fn check_evaluate(&self) -> RepositoryResult<()> {
        if self.fault == Fault::Evaluate {
            return Err(RepositoryError::Evaluation("index corrupted".to_string()));
        }
        Ok(())
    }

    fn wrap<T: Send + 'static>(&self, rows: RowStream<T>) -> RowStream<T> {
        match self.fault {
            Fault::MidStream(after) => Box::new(
                rows.take(after)
                    .chain(std::iter::once(Err(RepositoryError::Evaluation(
                        "stream interrupted".to_string(),
                    )))),
            ),
            _ => rows,
        }
    }

    fn check_mutate(&self) -> RepositoryResult<()> {
        if self.fault == Fault::Mutate {
            return Err(RepositoryError::Mutation("read-only store".to_string()));
        }
        Ok(())
    }
}

impl Connection for FaultyConnection {
    fn statements(&mut self, pattern: &TriplePattern) -> RepositoryResult<RowStream<Triple>> {
        self.check_evaluate()?;
        let rows = self.inner.statements(pattern)?;
        Ok(self.wrap(rows))
    }

    fn evaluate_tabular(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<RowStream<QuerySolution>> {
        self.check_evaluate()?;
        let rows = self.inner.evaluate_tabular(language, query)?;
        Ok(self.wrap(rows))
    }

    fn evaluate_graph(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<RowStream<Triple>> {
        self.check_evaluate()?;
        let rows = self.inner.evaluate_graph(language, query)?;
        Ok(self.wrap(rows))
    }

    fn add(&mut self, graph: &Graph) -> RepositoryResult<()> {
        self.check_mutate()?;
        self.inner.add(graph)
    }

    fn remove(&mut self, graph: &Graph) -> RepositoryResult<()> {
        self.check_mutate()?;
        self.inner.remove(graph)
    }

    fn close(&mut self) -> RepositoryResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()?;
        if self.fault == Fault::Close {
            return Err(RepositoryError::Evaluation("socket reset".to_string()));
        }
        Ok(())
    }
}
