//! Repository ports for records owned by a task: progress updates,
//! approvals and invoice links.

use super::RepositoryResult;
use crate::task::domain::{
    ApprovalLevel, InvoiceId, TaskApproval, TaskId, TaskInvoiceLink, TaskUpdate,
};
use async_trait::async_trait;

/// Append-only store of progress updates.
#[async_trait]
pub trait TaskUpdateRepository: Send + Sync {
    /// Stores a new update.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepositoryError::Duplicate`] when the update ID
    /// already exists.
    async fn store(&self, update: &TaskUpdate) -> RepositoryResult<()>;

    /// Returns a task's updates, oldest first.
    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskUpdate>>;
}

/// Store of per-level approval records.
#[async_trait]
pub trait TaskApprovalRepository: Send + Sync {
    /// Stores a new approval.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepositoryError::DuplicateApprovalLevel`] when the
    /// task already has a record for the level.
    async fn store(&self, approval: &TaskApproval) -> RepositoryResult<()>;

    /// Persists a decision on an existing approval.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepositoryError::NotFound`] when the approval does
    /// not exist.
    async fn update(&self, approval: &TaskApproval) -> RepositoryResult<()>;

    /// Finds the approval for a (task, level) pair.
    async fn find_by_task_and_level(
        &self,
        task_id: TaskId,
        level: ApprovalLevel,
    ) -> RepositoryResult<Option<TaskApproval>>;

    /// Returns a task's approvals in level order.
    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskApproval>>;
}

/// Store of task-to-invoice links.
#[async_trait]
pub trait TaskInvoiceLinkRepository: Send + Sync {
    /// Stores a new link.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepositoryError::Duplicate`] when the link ID already
    /// exists.
    async fn store(&self, link: &TaskInvoiceLink) -> RepositoryResult<()>;

    /// Returns a task's links, oldest first.
    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskInvoiceLink>>;

    /// Returns the links that bill against an invoice, oldest first.
    async fn find_by_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> RepositoryResult<Vec<TaskInvoiceLink>>;
}
