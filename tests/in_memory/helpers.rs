//! Shared test helpers for in-memory workflow integration tests.

use std::sync::Arc;

use foreman::{
    actor::ActorId,
    config::WorkflowConfig,
    task::{
        adapters::memory::InMemoryWorkflowStore,
        domain::{Invoice, InvoiceId, Money, Site, SiteId},
        services::TaskWorkflowService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the integration tests.
pub type TestService = TaskWorkflowService<DefaultClock>;

/// In-memory stores, a service over them and one seeded site.
pub struct Harness {
    pub store: InMemoryWorkflowStore,
    pub service: TestService,
    pub site: Site,
}

impl Harness {
    /// Builds a harness with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be seeded.
    pub fn with_config(config: &WorkflowConfig) -> Result<Self, eyre::Report> {
        let store = InMemoryWorkflowStore::from_config(&config.audit);
        let site = Site::new(SiteId::new(), "Riverside Medical Centre")?;
        store.sites.insert(site.clone())?;
        let service = TaskWorkflowService::new(store.ports(), Arc::new(DefaultClock), config);
        Ok(Self {
            store,
            service,
            site,
        })
    }

    /// Seeds an invoice against the harness site.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is malformed or cannot be stored.
    pub fn seed_invoice(
        &self,
        number: &str,
        total: Money,
        paid: Money,
    ) -> Result<Invoice, eyre::Report> {
        let invoice = Invoice::new(InvoiceId::new(), self.site.id(), number, total, paid)?;
        self.store.invoices.insert(invoice.clone())?;
        Ok(invoice)
    }
}

/// Provides a harness with the default configuration.
#[fixture]
pub fn harness() -> Harness {
    Harness::with_config(&WorkflowConfig::default()).expect("harness setup")
}

/// Creates an actor identifier.
///
/// # Errors
///
/// Returns an error if the identifier is blank.
pub fn actor(name: &str) -> Result<ActorId, eyre::Report> {
    Ok(ActorId::new(name)?)
}
