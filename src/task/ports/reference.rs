//! Ports onto collaborator-owned records and the task-code sequence.

use super::RepositoryResult;
use crate::task::domain::{Invoice, InvoiceId, Site, SiteId};
use async_trait::async_trait;

/// Read access to construction sites.
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Finds a site by identifier.
    async fn find_by_id(&self, id: SiteId) -> RepositoryResult<Option<Site>>;
}

/// Read access to invoices.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Finds an invoice by identifier.
    async fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
}

/// Atomic per-site counter backing task codes.
///
/// Implementations must hand out each value at most once per site, even under
/// concurrent callers.
#[async_trait]
pub trait TaskCodeSequence: Send + Sync {
    /// Reserves and returns the next sequence value for a site, starting at 1.
    async fn next_value(&self, site_id: SiteId) -> RepositoryResult<u32>;
}
