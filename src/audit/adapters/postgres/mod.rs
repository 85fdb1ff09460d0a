//! `PostgreSQL` adapter for audit event storage.

mod models;
mod repository;
mod schema;

pub use repository::{AuditPgPool, PostgresAuditLog};
