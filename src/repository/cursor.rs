//! Lazy, single-pass result cursors
//!
//! A [`Cursor`] pulls one row at a time from a store stream. Adapters such as
//! [`Cursor::map`] wrap the stream instead of draining it, so a chain of
//! transforms still advances the underlying stream exactly once per element.
//! The cursor owns the connection that produced the stream; closing,
//! exhausting or dropping it releases that connection once.

use super::connection::RowStream;
use super::error::RepositoryResult;
use super::scope::ConnectionLease;
use crate::rdf::{Graph, Triple};
use std::fmt;
use tracing::debug;

pub struct Cursor<T> {
    rows: RowStream<T>,
    lease: Option<ConnectionLease>,
    closed: bool,
}

impl<T> Cursor<T> {
    /// Close the cursor and release its connection. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(mut lease) = self.lease.take() {
            debug!("Cursor closed");
            lease.release();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T: Send + 'static> Cursor<T> {
    pub(crate) fn leased(rows: RowStream<T>, lease: ConnectionLease) -> Self {
        Self {
            rows,
            lease: Some(lease),
            closed: false,
        }
    }

    /// A cursor over a stream with no connection behind it
    pub fn from_stream(rows: RowStream<T>) -> Self {
        Self {
            rows,
            lease: None,
            closed: false,
        }
    }

    /// An empty, already-closed cursor
    pub fn empty() -> Self {
        Self {
            rows: Box::new(std::iter::empty()),
            lease: None,
            closed: true,
        }
    }

    fn into_parts(mut self) -> (RowStream<T>, Option<ConnectionLease>, bool) {
        let rows = std::mem::replace(&mut self.rows, Box::new(std::iter::empty()));
        let lease = self.lease.take();
        let closed = self.closed;
        self.closed = true;
        (rows, lease, closed)
    }

    fn adapt<U: Send + 'static>(
        self,
        wrap: impl FnOnce(RowStream<T>) -> RowStream<U>,
    ) -> Cursor<U> {
        let (rows, lease, closed) = self.into_parts();
        Cursor {
            rows: wrap(rows),
            lease,
            closed,
        }
    }

    /// Project every element through `f`
    pub fn map<U, F>(self, mut f: F) -> Cursor<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        self.adapt(|rows| Box::new(rows.map(move |row| row.map(&mut f))))
    }

    /// Project every element through a fallible `f`; a failure becomes an
    /// error element of the sequence.
    pub fn try_map<U, F>(self, mut f: F) -> Cursor<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> RepositoryResult<U> + Send + 'static,
    {
        self.adapt(|rows| Box::new(rows.map(move |row| row.and_then(&mut f))))
    }

    /// Project and discard; store errors are kept
    pub fn filter_map<U, F>(self, mut f: F) -> Cursor<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Option<U> + Send + 'static,
    {
        self.adapt(|rows| {
            Box::new(rows.filter_map(move |row| match row {
                Ok(value) => f(value).map(Ok),
                Err(e) => Some(Err(e)),
            }))
        })
    }

    /// The first element, closing the cursor afterwards
    pub fn first(mut self) -> RepositoryResult<Option<T>> {
        let first = self.next().transpose();
        self.close();
        first
    }
}

impl Cursor<Triple> {
    /// Drain into an owned graph; the cursor is closed afterwards
    pub fn into_graph(self) -> RepositoryResult<Graph> {
        self.collect()
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = RepositoryResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        match self.rows.next() {
            Some(row) => Some(row),
            None => {
                self.close();
                None
            }
        }
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("closed", &self.closed)
            .field("leased", &self.lease.is_some())
            .finish()
    }
}
