//! Adapter implementations of the audit log port.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAuditLog;
pub use postgres::{AuditPgPool, PostgresAuditLog};
