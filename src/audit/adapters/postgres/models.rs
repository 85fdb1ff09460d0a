//! Diesel row models for audit event storage.

use super::schema::audit_events;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for audit events.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditEventRow {
    /// Full serialized event.
    pub document: Value,
}

/// Insert model for audit events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Kind of audited record.
    pub entity_type: String,
    /// Audited record identifier.
    pub entity_id: uuid::Uuid,
    /// Actor who made the change.
    pub actor: String,
    /// Site the audited record belongs to.
    pub site_id: Option<uuid::Uuid>,
    /// Kind of change.
    pub event_type: String,
    /// Full serialized event.
    pub document: Value,
    /// Record time.
    pub recorded_at: DateTime<Utc>,
}
