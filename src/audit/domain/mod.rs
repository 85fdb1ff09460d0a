//! Domain model for the audit trail.

mod event;
mod query;

pub use event::{AuditEntityType, AuditEvent, AuditEventId, AuditEventType, changed_fields};
pub use query::AuditQuery;

use thiserror::Error;

/// Reasons an audit event cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditShapeError {
    /// The action text is blank.
    #[error("audit action cannot be empty")]
    EmptyAction,

    /// The entity identifier is the nil UUID.
    #[error("audit entity id cannot be nil")]
    NilEntityId,

    /// A stored entity type is not recognised.
    #[error("unknown audit entity type: {0}")]
    UnknownEntityType(String),

    /// A stored event type is not recognised.
    #[error("unknown audit event type: {0}")]
    UnknownEventType(String),
}
