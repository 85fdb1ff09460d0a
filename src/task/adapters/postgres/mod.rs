//! `PostgreSQL` adapters for site task workflow persistence.

mod connection;
mod models;
mod records;
mod reference;
mod schema;
mod task;

pub use connection::TaskPgPool;
pub use records::{
    PostgresTaskApprovalRepository, PostgresTaskInvoiceLinkRepository,
    PostgresTaskUpdateRepository,
};
pub use reference::{PostgresInvoiceRepository, PostgresSiteRepository, PostgresTaskCodeSequence};
pub use task::PostgresTaskRepository;

use crate::{audit::adapters::PostgresAuditLog, config::AuditConfig, task::services::WorkflowPorts};
use std::sync::Arc;

/// Builds workflow ports backed by one `PostgreSQL` pool.
#[must_use]
pub fn postgres_ports(pool: &TaskPgPool, audit: &AuditConfig) -> WorkflowPorts {
    WorkflowPorts {
        tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
        updates: Arc::new(PostgresTaskUpdateRepository::new(pool.clone())),
        approvals: Arc::new(PostgresTaskApprovalRepository::new(pool.clone())),
        invoice_links: Arc::new(PostgresTaskInvoiceLinkRepository::new(pool.clone())),
        invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        sites: Arc::new(PostgresSiteRepository::new(pool.clone())),
        sequence: Arc::new(PostgresTaskCodeSequence::new(pool.clone())),
        audit_log: Arc::new(PostgresAuditLog::new(pool.clone(), audit.capacity)),
    }
}
