//! Connection-scoped repository facade
//!
//! [`Repository`] fronts any [`ConnectionSource`] and takes care of the
//! connection lifecycle: each call acquires its own connection, performs one
//! unit of work and releases the connection on every exit path.
//!
//! Results come in two shapes:
//! - eager values (`Graph`, `HashSet`, `bool`, `Option`), produced after the
//!   connection has already been released;
//! - lazy [`Cursor`]s, which own their connection until they are closed,
//!   exhausted or dropped.
//!
//! Failures follow a fixed [`ErrorPolicy`] per [`Operation`]. Structural reads
//! (`statements`, `describe`, `get_values`, `get_value`, `get_subjects`,
//! `get_superclasses`, `is_list`) are best-effort: errors are reported to the
//! [`DiagnosticsSink`] and the result is empty. Explicit queries
//! (`select_query`, `construct_query`) and writes (`add`, `add_graph`,
//! `remove_graph`, `read`) return their errors.
//!
//! # Example
//!
//! ```rust
//! use samyama_rdf::repository::{MemoryStore, Repository};
//! use samyama_rdf::rdf::{NamedNode, RdfPredicate, Triple};
//! use samyama_rdf::rdf::vocab::rdf_type;
//!
//! let repo = Repository::new(MemoryStore::new());
//!
//! let alice = NamedNode::new("http://example.org/Alice").unwrap();
//! let person = NamedNode::new("http://example.org/Person").unwrap();
//! repo.add([Triple::new(alice.clone().into(), rdf_type(), person.clone().into())]).unwrap();
//!
//! let subjects = repo.get_subjects(Some(&rdf_type()), Some(&person.into()));
//! assert!(subjects.contains(&alice.into()));
//! ```

mod config;
mod connection;
mod cursor;
mod diagnostics;
mod error;
mod memory;
mod mutation;
mod patterns;
mod query;
mod scope;
mod values;

pub use config::{ConfigError, ConfigResult, RepositoryConfig};
pub use connection::{Connection, ConnectionSource, RowStream};
pub use cursor::Cursor;
pub use diagnostics::{DiagnosticsSink, TracingSink};
pub use error::{ErrorPolicy, Operation, RepositoryError, RepositoryResult};
pub use memory::MemoryStore;
pub use query::RepositoryQuery;
pub use scope::{ConnectionLease, ConnectionScope};

use std::sync::Arc;
use tracing::debug;

/// Facade over a triple store that owns the connection discipline
#[derive(Clone)]
pub struct Repository {
    source: Arc<dyn ConnectionSource>,
    sink: Arc<dyn DiagnosticsSink>,
    config: RepositoryConfig,
}

impl Repository {
    /// Front a store with the default configuration and a tracing sink
    pub fn new(source: impl ConnectionSource + 'static) -> Self {
        Self::with_config(source, RepositoryConfig::default())
    }

    pub fn with_config(source: impl ConnectionSource + 'static, config: RepositoryConfig) -> Self {
        Self {
            source: Arc::new(source),
            sink: Arc::new(TracingSink),
            config,
        }
    }

    /// An in-memory repository built from a config
    pub fn in_memory(config: RepositoryConfig) -> (Self, MemoryStore) {
        let store = MemoryStore::with_config(&config);
        (Self::with_config(store.clone(), config), store)
    }

    /// Replace the diagnostics sink
    pub fn with_sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn scope(&self, operation: Operation) -> ConnectionScope<'_> {
        ConnectionScope::new(self.source.as_ref(), &self.sink, operation)
    }

    /// Hand a must-succeed operation's error back to the caller. The sink
    /// is not told; the caller owns the failure.
    fn must_succeed<T>(&self, operation: Operation, result: RepositoryResult<T>) -> RepositoryResult<T> {
        debug_assert_eq!(operation.policy(), ErrorPolicy::MustSucceed);
        if let Err(e) = &result {
            debug!("{} failed: {}", operation, e);
        }
        result
    }

    /// Report a best-effort operation's error to the sink and fall back
    fn best_effort<T>(
        &self,
        operation: Operation,
        result: RepositoryResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        debug_assert_eq!(operation.policy(), ErrorPolicy::BestEffort);
        match result {
            Ok(value) => value,
            Err(e) => {
                self.sink.error(operation, &e);
                fallback()
            }
        }
    }
}
