//! Storage port for the append-only audit log.

use crate::audit::domain::{AuditEvent, AuditQuery, AuditShapeError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit log operations.
pub type AuditLogResult<T> = Result<T, AuditLogError>;

/// Append-only, capacity-bounded store of audit events.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends an event.
    ///
    /// Bounded implementations may evict their oldest events to make room.
    async fn append(&self, event: AuditEvent) -> AuditLogResult<()>;

    /// Returns matching events, newest first.
    async fn query(&self, query: &AuditQuery) -> AuditLogResult<Vec<AuditEvent>>;

    /// Removes every event recorded before `cutoff` and returns how many were
    /// removed.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> AuditLogResult<usize>;

    /// Returns the number of stored events.
    async fn len(&self) -> AuditLogResult<usize>;

    /// Returns `true` when no event is stored.
    async fn is_empty(&self) -> AuditLogResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Drops the oldest events beyond the configured capacity and returns how
    /// many were removed.
    async fn compact(&self) -> AuditLogResult<usize>;
}

/// Errors returned by audit log implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditLogError {
    /// The event is missing required fields.
    #[error("invalid audit event: {0}")]
    InvalidEvent(#[from] AuditShapeError),

    /// Persistence-layer failure.
    #[error("audit persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
