//! In-memory ring buffer for audit events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::{
    audit::{
        domain::{AuditEvent, AuditQuery},
        ports::{AuditLog, AuditLogError, AuditLogResult},
    },
    config::DEFAULT_AUDIT_CAPACITY,
};

/// Thread-safe, capacity-bounded audit log.
///
/// Events are kept in append order. Once the buffer is full each append
/// evicts the oldest event.
#[derive(Debug, Clone)]
pub struct InMemoryAuditLog {
    events: Arc<RwLock<VecDeque<AuditEvent>>>,
    capacity: usize,
}

impl InMemoryAuditLog {
    /// Creates an empty log with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Creates an empty log holding at most `capacity` events.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let bounded = capacity.max(1);
        Self {
            events: Arc::new(RwLock::new(VecDeque::with_capacity(bounded.min(1_024)))),
            capacity: bounded,
        }
    }

    /// Returns the maximum number of retained events.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(err: impl std::fmt::Display) -> AuditLogError {
    AuditLogError::persistence(std::io::Error::other(err.to_string()))
}

fn evict_overflow(events: &mut VecDeque<AuditEvent>, capacity: usize) -> usize {
    let overflow = events.len().saturating_sub(capacity);
    events.drain(..overflow);
    overflow
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, event: AuditEvent) -> AuditLogResult<()> {
        let mut events = self.events.write().map_err(poisoned)?;
        events.push_back(event);
        evict_overflow(&mut events, self.capacity);
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> AuditLogResult<Vec<AuditEvent>> {
        let events = self.events.read().map_err(poisoned)?;
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(events
            .iter()
            .rev()
            .filter(|event| query.matches(event))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> AuditLogResult<usize> {
        let mut events = self.events.write().map_err(poisoned)?;
        let before = events.len();
        events.retain(|event| event.recorded_at() >= cutoff);
        Ok(before - events.len())
    }

    async fn len(&self) -> AuditLogResult<usize> {
        let events = self.events.read().map_err(poisoned)?;
        Ok(events.len())
    }

    async fn compact(&self) -> AuditLogResult<usize> {
        let mut events = self.events.write().map_err(poisoned)?;
        Ok(evict_overflow(&mut events, self.capacity))
    }
}
