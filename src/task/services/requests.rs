//! Request and response payloads for the task workflow service.

use crate::task::domain::{
    EmployeeId, Money, SiteId, Task, TaskCategory, TaskFields, TaskPriority, TaskStatus,
    TaskUpdate,
};
use chrono::{DateTime, Utc};

/// Request payload for creating a site task.
///
/// # Examples
///
/// ```
/// use foreman::task::domain::{Money, SiteId, TaskCategory, TaskPriority};
/// use foreman::task::services::CreateTaskRequest;
///
/// let request = CreateTaskRequest::new(SiteId::new(), "Pour slab", TaskCategory::Foundation)
///     .with_priority(TaskPriority::High)
///     .billable_with_budget(Money::from_major_units(12_000));
///
/// assert!(request.fields().requires_approval());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    site_id: SiteId,
    fields: TaskFields,
}

impl CreateTaskRequest {
    /// Creates a request for a planned, medium-priority task.
    #[must_use]
    pub fn new(site_id: SiteId, name: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            site_id,
            fields: TaskFields::new(name, category),
        }
    }

    /// Creates a request from fully specified fields.
    #[must_use]
    pub const fn from_fields(site_id: SiteId, fields: TaskFields) -> Self {
        Self { site_id, fields }
    }

    /// Returns the target site.
    #[must_use]
    pub const fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// Returns the requested attributes.
    #[must_use]
    pub const fn fields(&self) -> &TaskFields {
        &self.fields
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.fields.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.fields.status = status;
        self
    }

    /// Sets the initial progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: i32) -> Self {
        self.fields.progress = progress;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.fields.priority = priority;
        self
    }

    /// Sets the planned start.
    #[must_use]
    pub const fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.fields.start_date = Some(date);
        self
    }

    /// Sets the planned completion.
    #[must_use]
    pub const fn with_expected_completion_date(mut self, date: DateTime<Utc>) -> Self {
        self.fields.expected_completion_date = Some(date);
        self
    }

    /// Sets the actual completion.
    #[must_use]
    pub const fn with_actual_completion_date(mut self, date: DateTime<Utc>) -> Self {
        self.fields.actual_completion_date = Some(date);
        self
    }

    /// Sets the headcount.
    #[must_use]
    pub const fn with_manpower(mut self, manpower: u32) -> Self {
        self.fields.manpower = manpower;
        self
    }

    /// Assigns the executing employee.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: EmployeeId) -> Self {
        self.fields.executor_id = Some(executor_id);
        self
    }

    /// Assigns the supervising employee.
    #[must_use]
    pub const fn with_supervisor(mut self, supervisor_id: EmployeeId) -> Self {
        self.fields.supervisor_id = Some(supervisor_id);
        self
    }

    /// Assigns the signing-off employee.
    #[must_use]
    pub const fn with_approver(mut self, approver_id: EmployeeId) -> Self {
        self.fields.approver_id = Some(approver_id);
        self
    }

    /// Sets the location on site.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.fields.location = Some(location.into());
        self
    }

    /// Sets the attachment URLs.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.fields.attachments = attachments.into_iter().collect();
        self
    }

    /// Sets the billable flag without touching the budget.
    #[must_use]
    pub const fn with_billable(mut self, billable: bool) -> Self {
        self.fields.billable = billable;
        self
    }

    /// Sets the budget without touching the billable flag.
    #[must_use]
    pub const fn with_budget_amount(mut self, amount: Money) -> Self {
        self.fields.budget_amount = Some(amount);
        self
    }

    /// Marks the task billable with a budget.
    #[must_use]
    pub const fn billable_with_budget(mut self, amount: Money) -> Self {
        self.fields.billable = true;
        self.fields.budget_amount = Some(amount);
        self
    }

    pub(super) fn into_parts(self) -> (SiteId, TaskFields) {
        (self.site_id, self.fields)
    }
}

/// Outcome of recording a progress update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecorded {
    /// The stored update.
    pub update: TaskUpdate,
    /// The task after the update was applied.
    pub task: Task,
}
