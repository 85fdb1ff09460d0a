//! Shared fixtures for task workflow unit tests.

use std::sync::Arc;

use crate::{
    actor::ActorId,
    config::WorkflowConfig,
    task::{
        adapters::memory::InMemoryWorkflowStore,
        domain::{Invoice, InvoiceId, Money, Site, SiteId},
        services::TaskWorkflowService,
    },
    testing::FixedClock,
};
use rstest::fixture;

pub type TestService = TaskWorkflowService<FixedClock>;

/// A service over in-memory stores seeded with the Harbor View Tower site.
pub struct World {
    pub store: InMemoryWorkflowStore,
    pub clock: Arc<FixedClock>,
    pub service: TestService,
    pub site: Site,
}

impl World {
    pub fn actor(&self) -> ActorId {
        actor("site-engineer")
    }

    pub fn seed_invoice(&self, number: &str, total: i64, paid: i64) -> Invoice {
        let invoice = Invoice::new(
            InvoiceId::new(),
            self.site.id(),
            number,
            Money::from_major_units(total),
            Money::from_major_units(paid),
        )
        .expect("valid invoice");
        self.store
            .invoices
            .insert(invoice.clone())
            .expect("seed invoice");
        invoice
    }

    pub async fn audit_len(&self) -> usize {
        self.service
            .audit_trail()
            .len()
            .await
            .expect("audit length")
    }
}

pub fn actor(name: &str) -> ActorId {
    ActorId::new(name).expect("valid actor")
}

#[fixture]
pub fn world() -> World {
    let store = InMemoryWorkflowStore::new();
    let site = Site::new(SiteId::new(), "Harbor View Tower").expect("valid site");
    store.sites.insert(site.clone()).expect("seed site");
    let clock = Arc::new(FixedClock::default());
    let service = TaskWorkflowService::new(
        store.ports(),
        Arc::clone(&clock),
        &WorkflowConfig::default(),
    );
    World {
        store,
        clock,
        service,
        site,
    }
}
