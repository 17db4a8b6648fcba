//! In-memory store behind the repository facade
//!
//! Wraps an [`RdfStore`] behind the [`ConnectionSource`] interface. Each
//! connection answers reads from a snapshot taken when the call is made, and
//! streams stop yielding rows once their connection is closed.

use super::config::RepositoryConfig;
use super::connection::{Connection, ConnectionSource, RowStream};
use super::error::{RepositoryError, RepositoryResult};
use crate::rdf::{Graph, RdfStore, Triple, TriplePattern};
use crate::sparql::{QueryLanguage, QuerySolution, SparqlEngine, SparqlResults};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Shared, thread-safe in-memory triple store
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<RdfStore>>,
    max_connections: Option<usize>,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store with no connection limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store honouring the config's connection limit
    pub fn with_config(config: &RepositoryConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            ..Self::default()
        }
    }

    /// Connections currently open
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Connections opened over the store's lifetime
    pub fn total_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of triples stored
    pub fn len(&self) -> usize {
        self.data.read().map(|store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reserve_slot(&self) -> RepositoryResult<()> {
        let mut current = self.open.load(Ordering::SeqCst);
        loop {
            if let Some(max) = self.max_connections {
                if current >= max {
                    return Err(RepositoryError::Acquisition(format!(
                        "connection limit of {} reached",
                        max
                    )));
                }
            }
            match self
                .open
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }
}

impl ConnectionSource for MemoryStore {
    fn open(&self) -> RepositoryResult<Box<dyn Connection>> {
        self.reserve_slot()?;
        let id = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Opened in-memory connection #{}", id);

        Ok(Box::new(MemoryConnection {
            data: Arc::clone(&self.data),
            open: Arc::clone(&self.open),
            closed: Arc::new(AtomicBool::new(false)),
        }))
    }
}

struct MemoryConnection {
    data: Arc<RwLock<RdfStore>>,
    open: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl MemoryConnection {
    fn ensure_open(&self) -> RepositoryResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RepositoryError::ConnectionClosed);
        }
        Ok(())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, RdfStore>> {
        self.ensure_open()?;
        self.data
            .read()
            .map_err(|e| RepositoryError::Evaluation(e.to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, RdfStore>> {
        self.ensure_open()?;
        self.data
            .write()
            .map_err(|e| RepositoryError::Mutation(e.to_string()))
    }

    fn stream<T: Send + 'static>(&self, items: Vec<T>) -> RowStream<T> {
        Box::new(Snapshot {
            items: items.into_iter(),
            closed: Arc::clone(&self.closed),
            reported: false,
        })
    }

    fn sparql(language: QueryLanguage) -> RepositoryResult<()> {
        match language {
            QueryLanguage::Sparql => Ok(()),
            other => Err(RepositoryError::UnsupportedLanguage(other)),
        }
    }
}

impl Connection for MemoryConnection {
    fn statements(&mut self, pattern: &TriplePattern) -> RepositoryResult<RowStream<Triple>> {
        let triples = self.read()?.query(pattern);
        Ok(self.stream(triples))
    }

    fn evaluate_tabular(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<RowStream<QuerySolution>> {
        Self::sparql(language)?;
        let results = SparqlEngine::new(&*self.read()?).select(query)?;
        match results {
            SparqlResults::Bindings { solutions, .. } => Ok(self.stream(solutions)),
            SparqlResults::Graph(_) => Err(RepositoryError::Evaluation(
                "SELECT produced a graph".to_string(),
            )),
        }
    }

    fn evaluate_graph(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> RepositoryResult<RowStream<Triple>> {
        Self::sparql(language)?;
        let results = SparqlEngine::new(&*self.read()?).construct(query)?;
        match results {
            SparqlResults::Graph(triples) => Ok(self.stream(triples)),
            SparqlResults::Bindings { .. } => Err(RepositoryError::Evaluation(
                "CONSTRUCT produced bindings".to_string(),
            )),
        }
    }

    fn add(&mut self, graph: &Graph) -> RepositoryResult<()> {
        let added = self.write()?.insert_graph(graph);
        debug!("Added {} of {} statements", added, graph.len());
        Ok(())
    }

    fn remove(&mut self, graph: &Graph) -> RepositoryResult<()> {
        let removed = self.write()?.remove_graph(graph);
        debug!("Removed {} of {} statements", removed, graph.len());
        Ok(())
    }

    fn close(&mut self) -> RepositoryResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Rows read under one lock acquisition, invalidated by connection close
struct Snapshot<T> {
    items: std::vec::IntoIter<T>,
    closed: Arc<AtomicBool>,
    reported: bool,
}

impl<T> Iterator for Snapshot<T> {
    type Item = RepositoryResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed.load(Ordering::SeqCst) {
            if self.reported {
                return None;
            }
            self.reported = true;
            return Some(Err(RepositoryError::ConnectionClosed));
        }
        self.items.next().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{NamedNode, RdfPredicate};

    fn triple() -> Triple {
        Triple::new(
            NamedNode::new("http://example.org/alice").unwrap().into(),
            RdfPredicate::new("http://example.org/knows").unwrap(),
            NamedNode::new("http://example.org/bob").unwrap().into(),
        )
    }

    #[test]
    fn test_connection_accounting() {
        let store = MemoryStore::new();
        let mut conn = store.open().unwrap();
        assert_eq!(store.open_connections(), 1);

        conn.close().unwrap();
        conn.close().unwrap();
        assert_eq!(store.open_connections(), 0);
        assert_eq!(store.total_opened(), 1);
    }

    #[test]
    fn test_dropped_connection_is_released() {
        let store = MemoryStore::new();
        drop(store.open().unwrap());
        assert_eq!(store.open_connections(), 0);
    }

    #[test]
    fn test_connection_limit() {
        let store = MemoryStore::with_config(&RepositoryConfig {
            max_connections: Some(1),
            ..RepositoryConfig::default()
        });
        let _first = store.open().unwrap();
        assert!(matches!(store.open(), Err(RepositoryError::Acquisition(_))));
    }

    #[test]
    fn test_stream_invalidated_by_close() {
        let store = MemoryStore::new();
        let mut conn = store.open().unwrap();
        conn.add(&vec![triple()].into_iter().collect::<Graph>()).unwrap();

        let mut rows = conn.statements(&TriplePattern::any()).unwrap();
        conn.close().unwrap();

        assert!(matches!(rows.next(), Some(Err(RepositoryError::ConnectionClosed))));
        assert!(rows.next().is_none());
        assert!(matches!(
            conn.statements(&TriplePattern::any()),
            Err(RepositoryError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_serql_is_unsupported() {
        let store = MemoryStore::new();
        let mut conn = store.open().unwrap();
        let result = conn.evaluate_tabular(QueryLanguage::Serql, "select x from {x} p {y}");
        assert!(matches!(
            result,
            Err(RepositoryError::UnsupportedLanguage(QueryLanguage::Serql))
        ));
    }
}
