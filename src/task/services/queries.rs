//! Read-side task queries.

use super::{TaskWorkflowResult, TaskWorkflowService};
use crate::task::domain::{
    ApprovalSummary, SiteId, Task, TaskDetails, TaskId, TaskQuery, TaskStatistics, TimelineEntry,
};
use mockable::Clock;

impl<C> TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Loads a task, including archived ones.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskWorkflowError::NotFound`] when the task does not
    /// exist, or a repository error when the lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskWorkflowResult<Task> {
        self.load_task(task_id).await
    }

    /// Loads a task with its updates (newest first), approvals and invoice
    /// links.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskWorkflowError::NotFound`] when the task does not
    /// exist, or a repository error when a lookup fails.
    pub async fn get_task_with_details(&self, task_id: TaskId) -> TaskWorkflowResult<TaskDetails> {
        let task = self.load_task(task_id).await?;
        let mut updates = self.ports.updates.find_by_task(task_id).await?;
        updates.reverse();
        let approvals = self.ports.approvals.find_by_task(task_id).await?;
        let invoice_links = self.ports.invoice_links.find_by_task(task_id).await?;
        let approval_summary = ApprovalSummary::from_approvals(&approvals);
        Ok(TaskDetails {
            task,
            updates,
            approvals,
            invoice_links,
            approval_summary,
        })
    }

    /// Lists a site's tasks ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the search fails.
    pub async fn get_tasks_by_site(
        &self,
        site_id: SiteId,
        include_archived: bool,
    ) -> TaskWorkflowResult<Vec<Task>> {
        let mut query = TaskQuery::for_site(site_id);
        query.include_archived = include_archived;
        self.search_tasks(&query).await
    }

    /// Lists tasks matching the criteria.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the search fails.
    pub async fn search_tasks(&self, query: &TaskQuery) -> TaskWorkflowResult<Vec<Task>> {
        Ok(self.ports.tasks.search(query).await?)
    }

    /// Lists open, non-archived tasks whose expected completion has passed.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the search fails.
    pub async fn get_overdue_tasks(
        &self,
        site_id: Option<SiteId>,
    ) -> TaskWorkflowResult<Vec<Task>> {
        let now = self.clock.utc();
        let mut tasks = self.search_tasks(&scope(site_id)).await?;
        tasks.retain(|task| task.is_overdue(now));
        Ok(tasks)
    }

    /// Computes statistics over non-archived tasks.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the search fails.
    pub async fn get_task_statistics(
        &self,
        site_id: Option<SiteId>,
    ) -> TaskWorkflowResult<TaskStatistics> {
        let tasks = self.search_tasks(&scope(site_id)).await?;
        Ok(TaskStatistics::from_tasks(&tasks, self.clock.utc()))
    }

    /// Returns a task's creation, updates, decisions and invoice links in
    /// chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskWorkflowError::NotFound`] when the task does not
    /// exist, or a repository error when a lookup fails.
    pub async fn get_task_timeline(
        &self,
        task_id: TaskId,
    ) -> TaskWorkflowResult<Vec<TimelineEntry>> {
        let details = self.get_task_with_details(task_id).await?;
        Ok(TimelineEntry::collect(&details))
    }
}

fn scope(site_id: Option<SiteId>) -> TaskQuery {
    site_id.map_or_else(TaskQuery::new, TaskQuery::for_site)
}
