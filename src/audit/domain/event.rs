//! Audit event records.

use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::AuditShapeError;

/// Unique identifier for an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditEventId(Uuid);

impl AuditEventId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AuditEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuditEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of record an audit event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    /// A site task.
    Task,
    /// A progress update.
    TaskUpdate,
    /// A per-level approval.
    TaskApproval,
    /// A task-to-invoice link.
    TaskInvoiceLink,
}

impl AuditEntityType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::TaskUpdate => "task_update",
            Self::TaskApproval => "task_approval",
            Self::TaskInvoiceLink => "task_invoice_link",
        }
    }
}

impl TryFrom<&str> for AuditEntityType {
    type Error = AuditShapeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "task" => Ok(Self::Task),
            "task_update" => Ok(Self::TaskUpdate),
            "task_approval" => Ok(Self::TaskApproval),
            "task_invoice_link" => Ok(Self::TaskInvoiceLink),
            other => Err(AuditShapeError::UnknownEntityType(other.to_owned())),
        }
    }
}

impl fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the audited record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// The record was created.
    Create,
    /// The record was modified.
    Update,
    /// An approval was granted.
    Approved,
    /// An approval was refused.
    Rejected,
    /// The record was archived.
    Archive,
    /// The record was restored from the archive.
    Restore,
}

impl AuditEventType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archive => "archive",
            Self::Restore => "restore",
        }
    }
}

impl TryFrom<&str> for AuditEventType {
    type Error = AuditShapeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "archive" => Ok(Self::Archive),
            "restore" => Ok(Self::Restore),
            other => Err(AuditShapeError::UnknownEventType(other.to_owned())),
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a change made by the workflow engine.
///
/// # Examples
///
/// ```
/// use foreman::actor::ActorId;
/// use foreman::audit::domain::{AuditEntityType, AuditEvent, AuditEventType};
/// use mockable::DefaultClock;
/// use serde_json::json;
/// use uuid::Uuid;
///
/// let actor = ActorId::new("site-engineer-7").expect("valid actor");
/// let event = AuditEvent::new(
///     AuditEntityType::Task,
///     Uuid::new_v4(),
///     actor,
///     AuditEventType::Create,
///     "Created task HVT-TASK-0001",
///     &DefaultClock,
/// )
/// .with_new_value(json!({ "progress": 0 }));
///
/// assert!(event.validate_shape().is_ok());
/// assert!(event.old_value().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    id: AuditEventId,
    entity_type: AuditEntityType,
    entity_id: Uuid,
    actor: ActorId,
    site_id: Option<Uuid>,
    event_type: AuditEventType,
    action: String,
    old_value: Option<Value>,
    new_value: Option<Value>,
    metadata: Map<String, Value>,
    recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event stamped with the current clock time.
    #[must_use]
    pub fn new(
        entity_type: AuditEntityType,
        entity_id: impl Into<Uuid>,
        actor: ActorId,
        event_type: AuditEventType,
        action: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AuditEventId::new(),
            entity_type,
            entity_id: entity_id.into(),
            actor,
            site_id: None,
            event_type,
            action: action.into(),
            old_value: None,
            new_value: None,
            metadata: Map::new(),
            recorded_at: clock.utc(),
        }
    }

    /// Attaches the site the audited record belongs to.
    #[must_use]
    pub fn with_site(mut self, site_id: impl Into<Uuid>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Attaches the state before the change.
    #[must_use]
    pub fn with_old_value(mut self, value: Value) -> Self {
        self.old_value = Some(value);
        self
    }

    /// Attaches the state after the change.
    #[must_use]
    pub fn with_new_value(mut self, value: Value) -> Self {
        self.new_value = Some(value);
        self
    }

    /// Adds a metadata entry, replacing any previous value for the key.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Checks the fields every stored event must carry.
    ///
    /// # Errors
    ///
    /// Returns [`AuditShapeError::EmptyAction`] for a blank action and
    /// [`AuditShapeError::NilEntityId`] for a nil entity identifier.
    pub fn validate_shape(&self) -> Result<(), AuditShapeError> {
        if self.action.trim().is_empty() {
            return Err(AuditShapeError::EmptyAction);
        }
        if self.entity_id.is_nil() {
            return Err(AuditShapeError::NilEntityId);
        }
        Ok(())
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> AuditEventId {
        self.id
    }

    /// Returns the kind of the audited record.
    #[must_use]
    pub const fn entity_type(&self) -> AuditEntityType {
        self.entity_type
    }

    /// Returns the audited record's identifier.
    #[must_use]
    pub const fn entity_id(&self) -> Uuid {
        self.entity_id
    }

    /// Returns the actor who made the change.
    #[must_use]
    pub const fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// Returns the site the audited record belongs to, when known.
    #[must_use]
    pub const fn site_id(&self) -> Option<Uuid> {
        self.site_id
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn event_type(&self) -> AuditEventType {
        self.event_type
    }

    /// Returns the human-readable action.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the state before the change.
    #[must_use]
    pub const fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    /// Returns the state after the change.
    #[must_use]
    pub const fn new_value(&self) -> Option<&Value> {
        self.new_value.as_ref()
    }

    /// Returns the metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns when the event was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Returns the top-level keys whose values differ between two JSON objects.
///
/// Keys present on only one side count as changed. Non-object inputs are
/// compared as a whole and reported under the empty key.
#[must_use]
pub fn changed_fields(old: &Value, new: &Value) -> Vec<String> {
    match (old, new) {
        (Value::Object(before), Value::Object(after)) => {
            let mut keys: Vec<String> = before
                .keys()
                .chain(after.keys())
                .filter(|key| before.get(*key) != after.get(*key))
                .cloned()
                .collect();
            keys.sort();
            keys.dedup();
            keys
        }
        _ if old == new => Vec::new(),
        _ => vec![String::new()],
    }
}
