//! In-memory site and invoice directories and task-code sequence.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use super::poisoned;
use crate::task::{
    domain::{Invoice, InvoiceId, Site, SiteId},
    ports::{InvoiceRepository, RepositoryResult, SiteRepository, TaskCodeSequence},
};

/// Thread-safe in-memory site directory.
///
/// Sites are owned by a collaborator; tests seed them with
/// [`InMemorySiteRepository::insert`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySiteRepository {
    sites: Arc<RwLock<HashMap<SiteId, Site>>>,
}

impl InMemorySiteRepository {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a site.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn insert(&self, site: Site) -> RepositoryResult<()> {
        let mut sites = self.sites.write().map_err(poisoned)?;
        sites.insert(site.id(), site);
        Ok(())
    }
}

#[async_trait]
impl SiteRepository for InMemorySiteRepository {
    async fn find_by_id(&self, id: SiteId) -> RepositoryResult<Option<Site>> {
        let sites = self.sites.read().map_err(poisoned)?;
        Ok(sites.get(&id).cloned())
    }
}

/// Thread-safe in-memory invoice directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
}

impl InMemoryInvoiceRepository {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an invoice.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn insert(&self, invoice: Invoice) -> RepositoryResult<()> {
        let mut invoices = self.invoices.write().map_err(poisoned)?;
        invoices.insert(invoice.id(), invoice);
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        let invoices = self.invoices.read().map_err(poisoned)?;
        Ok(invoices.get(&id).cloned())
    }
}

/// Per-site counter guarded by a mutex.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskCodeSequence {
    counters: Arc<Mutex<HashMap<SiteId, u32>>>,
}

impl InMemoryTaskCodeSequence {
    /// Creates a sequence with every site at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskCodeSequence for InMemoryTaskCodeSequence {
    async fn next_value(&self, site_id: SiteId) -> RepositoryResult<u32> {
        let mut counters = self.counters.lock().map_err(poisoned)?;
        let counter = counters.entry(site_id).or_insert(0);
        *counter = counter.saturating_add(1);
        Ok(*counter)
    }
}
