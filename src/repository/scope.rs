//! Connection-scoped execution
//!
//! Every repository operation runs inside a [`ConnectionScope`]: one
//! connection, one unit of work, one release. The two release disciplines
//! are separate entry points so they cannot be mixed up:
//!
//! - [`ConnectionScope::with_connection`] is eager. The connection is released
//!   before the call returns, whatever the outcome.
//! - [`ConnectionScope::with_cursor`] is lazy. On success the connection moves
//!   into the returned [`Cursor`] and is released when the cursor is closed,
//!   exhausted or dropped. On failure it is released before the error returns.

use super::connection::{Connection, ConnectionSource, RowStream};
use super::cursor::Cursor;
use super::diagnostics::DiagnosticsSink;
use super::error::{Operation, RepositoryError, RepositoryResult};
use std::sync::Arc;
use tracing::debug;

/// A connection checked out for one operation. Released at most once.
pub struct ConnectionLease {
    connection: Box<dyn Connection>,
    operation: Operation,
    sink: Arc<dyn DiagnosticsSink>,
    released: bool,
}

impl ConnectionLease {
    fn connection(&mut self) -> &mut dyn Connection {
        self.connection.as_mut()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Close the connection. Later calls do nothing. A failing close is
    /// reported to the sink and not returned, so it cannot mask the
    /// operation's own result.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        debug!("Releasing connection for {}", self.operation);
        if let Err(e) = self.connection.close() {
            self.sink
                .error(self.operation, &RepositoryError::Release(e.to_string()));
        }
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        self.release();
    }
}

/// Acquires a connection for exactly one unit of work
pub struct ConnectionScope<'a> {
    source: &'a dyn ConnectionSource,
    sink: &'a Arc<dyn DiagnosticsSink>,
    operation: Operation,
}

impl<'a> ConnectionScope<'a> {
    pub fn new(
        source: &'a dyn ConnectionSource,
        sink: &'a Arc<dyn DiagnosticsSink>,
        operation: Operation,
    ) -> Self {
        Self {
            source,
            sink,
            operation,
        }
    }

    fn acquire(&self) -> RepositoryResult<ConnectionLease> {
        let connection = self.source.open()?;
        debug!("Acquired connection for {}", self.operation);
        Ok(ConnectionLease {
            connection,
            operation: self.operation,
            sink: Arc::clone(self.sink),
            released: false,
        })
    }

    /// Run `op` and release the connection before returning.
    pub fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut dyn Connection) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut lease = self.acquire()?;
        let result = op(lease.connection());
        lease.release();
        result
    }

    /// Run `op` and hand the connection to the cursor wrapping its stream.
    pub fn with_cursor<T: Send + 'static>(
        &self,
        op: impl FnOnce(&mut dyn Connection) -> RepositoryResult<RowStream<T>>,
    ) -> RepositoryResult<Cursor<T>> {
        let mut lease = self.acquire()?;
        match op(lease.connection()) {
            Ok(rows) => Ok(Cursor::leased(rows, lease)),
            Err(e) => {
                lease.release();
                Err(e)
            }
        }
    }
}
