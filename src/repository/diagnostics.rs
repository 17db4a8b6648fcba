//! Diagnostics sink for errors that best-effort operations swallow

use super::error::{Operation, RepositoryError};
use tracing::error;

/// Receives errors the repository degrades instead of returning.
///
/// Calls are fire-and-forget; a sink never changes what the operation returns.
pub trait DiagnosticsSink: Send + Sync {
    fn error(&self, operation: Operation, error: &RepositoryError);
}

/// Default sink, forwarding to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn error(&self, operation: Operation, err: &RepositoryError) {
        error!("{} failed: {}", operation, err);
    }
}
