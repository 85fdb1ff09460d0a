//! Audit event filters.

use super::{AuditEntityType, AuditEvent, AuditEventType};
use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Filter over stored audit events.
///
/// Every populated criterion must match. Results are returned newest first
/// and truncated to `limit` when one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    /// Kind of audited record.
    pub entity_type: Option<AuditEntityType>,
    /// Audited record identifier.
    pub entity_id: Option<Uuid>,
    /// Actor who made the change.
    pub actor: Option<ActorId>,
    /// Site the record belongs to.
    pub site_id: Option<Uuid>,
    /// Kind of change.
    pub event_type: Option<AuditEventType>,
    /// Inclusive lower bound on the record time.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the record time.
    pub until: Option<DateTime<Utc>>,
    /// Maximum number of events to return.
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Creates a query that matches every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to one audited record.
    #[must_use]
    pub fn for_entity(entity_type: AuditEntityType, entity_id: impl Into<Uuid>) -> Self {
        Self {
            entity_type: Some(entity_type),
            entity_id: Some(entity_id.into()),
            ..Self::default()
        }
    }

    /// Restricts the query to one kind of record.
    #[must_use]
    pub const fn with_entity_type(mut self, entity_type: AuditEntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    /// Restricts the query to one actor.
    #[must_use]
    pub fn by_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Restricts the query to one site.
    #[must_use]
    pub fn for_site(mut self, site_id: impl Into<Uuid>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Restricts the query to one kind of change.
    #[must_use]
    pub const fn with_event_type(mut self, event_type: AuditEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Restricts the query to `from <= recorded_at < until`.
    #[must_use]
    pub const fn between(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }

    /// Caps the number of returned events.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` when the event satisfies every populated criterion.
    #[must_use]
    pub fn matches(&self, event: &AuditEvent) -> bool {
        self.entity_type.is_none_or(|kind| kind == event.entity_type())
            && self.entity_id.is_none_or(|id| id == event.entity_id())
            && self.actor.as_ref().is_none_or(|actor| actor == event.actor())
            && self
                .site_id
                .is_none_or(|site| event.site_id() == Some(site))
            && self
                .event_type
                .is_none_or(|kind| kind == event.event_type())
            && self.from.is_none_or(|from| event.recorded_at() >= from)
            && self.until.is_none_or(|until| event.recorded_at() < until)
    }
}
