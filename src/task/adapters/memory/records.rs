//! In-memory stores for progress updates, approvals and invoice links.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::task::{
    domain::{
        ApprovalLevel, EntityKind, InvoiceId, TaskApproval, TaskApprovalId, TaskId,
        TaskInvoiceLink, TaskUpdate,
    },
    ports::{
        RepositoryError, RepositoryResult, TaskApprovalRepository, TaskInvoiceLinkRepository,
        TaskUpdateRepository,
    },
};

/// Thread-safe in-memory progress update store.
///
/// Updates are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskUpdateRepository {
    updates: Arc<RwLock<Vec<TaskUpdate>>>,
}

impl InMemoryTaskUpdateRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskUpdateRepository for InMemoryTaskUpdateRepository {
    async fn store(&self, update: &TaskUpdate) -> RepositoryResult<()> {
        let mut updates = self.updates.write().map_err(poisoned)?;
        if updates.iter().any(|existing| existing.id() == update.id()) {
            return Err(RepositoryError::duplicate(
                EntityKind::TaskUpdate,
                update.id(),
            ));
        }
        updates.push(update.clone());
        Ok(())
    }

    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskUpdate>> {
        let updates = self.updates.read().map_err(poisoned)?;
        Ok(updates
            .iter()
            .filter(|update| update.task_id() == task_id)
            .cloned()
            .collect())
    }
}

/// Thread-safe in-memory approval store keyed by (task, level).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskApprovalRepository {
    state: Arc<RwLock<HashMap<(TaskId, ApprovalLevel), TaskApproval>>>,
}

impl InMemoryTaskApprovalRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_key_by_id(
    state: &HashMap<(TaskId, ApprovalLevel), TaskApproval>,
    id: TaskApprovalId,
) -> Option<(TaskId, ApprovalLevel)> {
    state
        .iter()
        .find(|(_, approval)| approval.id() == id)
        .map(|(key, _)| *key)
}

#[async_trait]
impl TaskApprovalRepository for InMemoryTaskApprovalRepository {
    async fn store(&self, approval: &TaskApproval) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if find_key_by_id(&state, approval.id()).is_some() {
            return Err(RepositoryError::duplicate(
                EntityKind::TaskApproval,
                approval.id(),
            ));
        }
        let key = (approval.task_id(), approval.level());
        if state.contains_key(&key) {
            return Err(RepositoryError::DuplicateApprovalLevel {
                task_id: approval.task_id(),
                level: approval.level(),
            });
        }
        state.insert(key, approval.clone());
        Ok(())
    }

    async fn update(&self, approval: &TaskApproval) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let key = find_key_by_id(&state, approval.id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::TaskApproval, approval.id()))?;
        state.insert(key, approval.clone());
        Ok(())
    }

    async fn find_by_task_and_level(
        &self,
        task_id: TaskId,
        level: ApprovalLevel,
    ) -> RepositoryResult<Option<TaskApproval>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&(task_id, level)).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskApproval>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut approvals: Vec<TaskApproval> = state
            .values()
            .filter(|approval| approval.task_id() == task_id)
            .cloned()
            .collect();
        approvals.sort_by_key(TaskApproval::level);
        Ok(approvals)
    }
}

/// Thread-safe in-memory invoice link store.
///
/// Links are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskInvoiceLinkRepository {
    links: Arc<RwLock<Vec<TaskInvoiceLink>>>,
}

impl InMemoryTaskInvoiceLinkRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskInvoiceLinkRepository for InMemoryTaskInvoiceLinkRepository {
    async fn store(&self, link: &TaskInvoiceLink) -> RepositoryResult<()> {
        let mut links = self.links.write().map_err(poisoned)?;
        if links.iter().any(|existing| existing.id() == link.id()) {
            return Err(RepositoryError::duplicate(
                EntityKind::TaskInvoiceLink,
                link.id(),
            ));
        }
        links.push(link.clone());
        Ok(())
    }

    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskInvoiceLink>> {
        let links = self.links.read().map_err(poisoned)?;
        Ok(links
            .iter()
            .filter(|link| link.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn find_by_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> RepositoryResult<Vec<TaskInvoiceLink>> {
        let links = self.links.read().map_err(poisoned)?;
        Ok(links
            .iter()
            .filter(|link| link.invoice_id() == invoice_id)
            .cloned()
            .collect())
    }
}
