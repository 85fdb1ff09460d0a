//! Best-effort audit trail over an [`AuditLog`].

use crate::{
    audit::{
        domain::{AuditEntityType, AuditEvent, AuditQuery},
        ports::{AuditLog, AuditLogResult},
    },
    config::AuditConfig,
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

/// Outcome of a retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Events removed for being older than the retention window.
    pub expired: usize,
    /// Events removed for exceeding the capacity.
    pub compacted: usize,
}

impl RetentionReport {
    /// Returns the total number of removed events.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.expired.saturating_add(self.compacted)
    }
}

/// Records and queries audit events.
///
/// Recording never fails the caller: invalid events and storage failures are
/// logged and reported as `false`. Every `compact_every` stored events the
/// log is trimmed back to its capacity. Clones share the append counter.
pub struct AuditTrail<C>
where
    C: Clock + Send + Sync,
{
    log: Arc<dyn AuditLog>,
    clock: Arc<C>,
    retention_days: u32,
    compact_every: usize,
    appended: Arc<AtomicUsize>,
}

impl<C> Clone for AuditTrail<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
            retention_days: self.retention_days,
            compact_every: self.compact_every,
            appended: Arc::clone(&self.appended),
        }
    }
}

impl<C> AuditTrail<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a trail over a log using the configured retention window.
    #[must_use]
    pub fn new(log: Arc<dyn AuditLog>, clock: Arc<C>, config: &AuditConfig) -> Self {
        Self {
            log,
            clock,
            retention_days: config.retention_days,
            compact_every: config.compact_every.max(1),
            appended: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the retention window in days.
    #[must_use]
    pub const fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Validates and stores an event, returning whether it was stored.
    pub async fn record(&self, event: AuditEvent) -> bool {
        if let Err(err) = event.validate_shape() {
            tracing::warn!(
                entity_type = %event.entity_type(),
                entity_id = %event.entity_id(),
                error = %err,
                "discarding malformed audit event"
            );
            return false;
        }

        let entity_type = event.entity_type();
        let entity_id = event.entity_id();
        let event_type = event.event_type();
        match self.log.append(event).await {
            Ok(()) => {
                self.compact_periodically().await;
                true
            }
            Err(err) => {
                tracing::warn!(
                    %entity_type,
                    %entity_id,
                    %event_type,
                    error = %err,
                    "failed to record audit event"
                );
                false
            }
        }
    }

    async fn compact_periodically(&self) {
        let appended = self.appended.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if !appended.is_multiple_of(self.compact_every) {
            return;
        }
        match self.log.compact().await {
            Ok(0) => {}
            Ok(compacted) => tracing::debug!(compacted, "compacted audit log to capacity"),
            Err(err) => tracing::warn!(error = %err, "failed to compact audit log"),
        }
    }

    /// Returns events matching the query, newest first.
    ///
    /// # Errors
    ///
    /// Returns the underlying log error.
    pub async fn query(&self, query: &AuditQuery) -> AuditLogResult<Vec<AuditEvent>> {
        self.log.query(query).await
    }

    /// Returns every stored event for one record, newest first.
    ///
    /// # Errors
    ///
    /// Returns the underlying log error.
    pub async fn history(
        &self,
        entity_type: AuditEntityType,
        entity_id: impl Into<Uuid>,
    ) -> AuditLogResult<Vec<AuditEvent>> {
        self.log
            .query(&AuditQuery::for_entity(entity_type, entity_id))
            .await
    }

    /// Returns the number of stored events.
    ///
    /// # Errors
    ///
    /// Returns the underlying log error.
    pub async fn len(&self) -> AuditLogResult<usize> {
        self.log.len().await
    }

    /// Returns `true` when no event is stored.
    ///
    /// # Errors
    ///
    /// Returns the underlying log error.
    pub async fn is_empty(&self) -> AuditLogResult<bool> {
        self.log.is_empty().await
    }

    /// Returns the oldest record time still inside the retention window.
    #[must_use]
    pub fn retention_cutoff(&self) -> DateTime<Utc> {
        let window = TimeDelta::days(i64::from(self.retention_days));
        self.clock
            .utc()
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Removes events older than the retention window.
    ///
    /// # Errors
    ///
    /// Returns the underlying log error.
    pub async fn purge_expired(&self) -> AuditLogResult<usize> {
        let cutoff = self.retention_cutoff();
        let removed = self.log.purge_before(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, %cutoff, "purged expired audit events");
        }
        Ok(removed)
    }

    /// Purges expired events and trims the log to its capacity.
    ///
    /// # Errors
    ///
    /// Returns the first underlying log error.
    pub async fn enforce_retention(&self) -> AuditLogResult<RetentionReport> {
        let expired = self.purge_expired().await?;
        let compacted = self.log.compact().await?;
        if compacted > 0 {
            tracing::info!(compacted, "compacted audit log to capacity");
        }
        Ok(RetentionReport { expired, compacted })
    }
}
