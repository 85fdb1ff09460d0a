//! Shared world state for site task BDD scenarios.

use std::sync::Arc;

use foreman::{
    config::WorkflowConfig,
    task::{
        adapters::memory::InMemoryWorkflowStore,
        domain::{Invoice, Site, Task, TaskInvoiceLink},
        services::{TaskWorkflowError, TaskWorkflowService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestWorkflowService = TaskWorkflowService<DefaultClock>;

/// Scenario world for site task behaviour tests.
pub struct SiteTaskWorld {
    pub store: InMemoryWorkflowStore,
    pub service: TestWorkflowService,
    pub site: Option<Site>,
    pub task: Option<Task>,
    pub invoice: Option<Invoice>,
    pub last_link: Option<TaskInvoiceLink>,
    pub last_error: Option<TaskWorkflowError>,
}

impl SiteTaskWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryWorkflowStore::new();
        let service = TaskWorkflowService::new(
            store.ports(),
            Arc::new(DefaultClock),
            &WorkflowConfig::default(),
        );
        Self {
            store,
            service,
            site: None,
            task: None,
            invoice: None,
            last_link: None,
            last_error: None,
        }
    }

    /// Returns the scenario site.
    ///
    /// # Errors
    ///
    /// Returns an error when no site was set up.
    pub fn site(&self) -> Result<&Site, eyre::Report> {
        self.site
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing site in scenario world"))
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Reloads the scenario task from the service.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created or the lookup fails.
    pub fn reload_task(&self) -> Result<Task, eyre::Report> {
        let task_id = self.task()?.id();
        Ok(run_async(self.service.get_task(task_id))?)
    }
}

impl Default for SiteTaskWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SiteTaskWorld {
    SiteTaskWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
