//! In-memory adapters for site task workflow tests and embedding.

mod records;
mod reference;
mod task;

pub use records::{
    InMemoryTaskApprovalRepository, InMemoryTaskInvoiceLinkRepository,
    InMemoryTaskUpdateRepository,
};
pub use reference::{InMemoryInvoiceRepository, InMemorySiteRepository, InMemoryTaskCodeSequence};
pub use task::InMemoryTaskRepository;

use crate::{
    audit::adapters::InMemoryAuditLog,
    config::AuditConfig,
    task::{ports::RepositoryError, services::WorkflowPorts},
};
use std::sync::Arc;

/// Maps a poisoned lock into a persistence error.
fn poisoned(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Every in-memory store needed by the workflow service.
///
/// The handles share state with the ports returned by
/// [`InMemoryWorkflowStore::ports`], so seeding a site or invoice here makes
/// it visible to the service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStore {
    /// Task store.
    pub tasks: InMemoryTaskRepository,
    /// Progress update store.
    pub updates: InMemoryTaskUpdateRepository,
    /// Approval store.
    pub approvals: InMemoryTaskApprovalRepository,
    /// Invoice link store.
    pub invoice_links: InMemoryTaskInvoiceLinkRepository,
    /// Invoice directory.
    pub invoices: InMemoryInvoiceRepository,
    /// Site directory.
    pub sites: InMemorySiteRepository,
    /// Task-code sequence.
    pub sequence: InMemoryTaskCodeSequence,
    /// Audit ring buffer.
    pub audit_log: InMemoryAuditLog,
}

impl InMemoryWorkflowStore {
    /// Creates empty stores with the default audit capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty stores with a custom audit capacity.
    #[must_use]
    pub fn with_audit_capacity(capacity: usize) -> Self {
        Self {
            audit_log: InMemoryAuditLog::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Creates empty stores whose audit log honours the configured capacity.
    #[must_use]
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::with_audit_capacity(config.capacity)
    }

    /// Returns port handles sharing state with this store.
    #[must_use]
    pub fn ports(&self) -> WorkflowPorts {
        WorkflowPorts {
            tasks: Arc::new(self.tasks.clone()),
            updates: Arc::new(self.updates.clone()),
            approvals: Arc::new(self.approvals.clone()),
            invoice_links: Arc::new(self.invoice_links.clone()),
            invoices: Arc::new(self.invoices.clone()),
            sites: Arc::new(self.sites.clone()),
            sequence: Arc::new(self.sequence.clone()),
            audit_log: Arc::new(self.audit_log.clone()),
        }
    }
}
