//! Port contracts for audit event storage.

pub mod log;

pub use log::{AuditLog, AuditLogError, AuditLogResult};
