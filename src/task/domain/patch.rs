//! Typed partial updates for tasks.

use super::{EmployeeId, Money, TaskCategory, TaskFields, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};

/// Partial update for a task's editable attributes.
///
/// `None` leaves a field unchanged. Nullable attributes use a nested option:
/// `Some(None)` clears the value and `Some(Some(v))` sets it. The running cost
/// is not patchable; it only moves through invoice linking.
///
/// # Examples
///
/// ```
/// use foreman::task::domain::{TaskCategory, TaskFields, TaskPatch};
///
/// let mut fields = TaskFields::new("Pour slab", TaskCategory::Foundation);
/// fields.location = Some("Block A".to_owned());
///
/// let patch = TaskPatch::new().with_progress(40).clear_location();
/// patch.apply_to(&mut fields);
///
/// assert_eq!(fields.progress, 40);
/// assert_eq!(fields.location, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New name.
    pub name: Option<String>,
    /// New or cleared description.
    pub description: Option<Option<String>>,
    /// New category.
    pub category: Option<TaskCategory>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New absolute progress.
    pub progress: Option<i32>,
    /// New or cleared start date.
    pub start_date: Option<Option<DateTime<Utc>>>,
    /// New or cleared expected completion date.
    pub expected_completion_date: Option<Option<DateTime<Utc>>>,
    /// New or cleared actual completion date.
    pub actual_completion_date: Option<Option<DateTime<Utc>>>,
    /// New headcount.
    pub manpower: Option<u32>,
    /// New or cleared executor.
    pub executor_id: Option<Option<EmployeeId>>,
    /// New or cleared supervisor.
    pub supervisor_id: Option<Option<EmployeeId>>,
    /// New or cleared approver.
    pub approver_id: Option<Option<EmployeeId>>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New or cleared location.
    pub location: Option<Option<String>>,
    /// Replacement attachment list.
    pub attachments: Option<Vec<String>>,
    /// New billable flag.
    pub billable: Option<bool>,
    /// New or cleared budget.
    pub budget_amount: Option<Option<Money>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the absolute progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the planned start.
    #[must_use]
    pub const fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(Some(date));
        self
    }

    /// Sets the planned completion.
    #[must_use]
    pub const fn with_expected_completion_date(mut self, date: DateTime<Utc>) -> Self {
        self.expected_completion_date = Some(Some(date));
        self
    }

    /// Sets the actual completion.
    #[must_use]
    pub const fn with_actual_completion_date(mut self, date: DateTime<Utc>) -> Self {
        self.actual_completion_date = Some(Some(date));
        self
    }

    /// Sets the headcount.
    #[must_use]
    pub const fn with_manpower(mut self, manpower: u32) -> Self {
        self.manpower = Some(manpower);
        self
    }

    /// Sets the executor.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: EmployeeId) -> Self {
        self.executor_id = Some(Some(executor_id));
        self
    }

    /// Sets the billable flag.
    #[must_use]
    pub const fn with_billable(mut self, billable: bool) -> Self {
        self.billable = Some(billable);
        self
    }

    /// Sets the budget.
    #[must_use]
    pub const fn with_budget_amount(mut self, amount: Money) -> Self {
        self.budget_amount = Some(Some(amount));
        self
    }

    /// Clears the budget.
    #[must_use]
    pub const fn clear_budget_amount(mut self) -> Self {
        self.budget_amount = Some(None);
        self
    }

    /// Clears the location.
    #[must_use]
    pub fn clear_location(mut self) -> Self {
        self.location = Some(None);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into a set of task fields.
    pub fn apply_to(&self, fields: &mut TaskFields) {
        set(&mut fields.name, self.name.as_ref());
        set(&mut fields.description, self.description.as_ref());
        set(&mut fields.category, self.category.as_ref());
        set(&mut fields.status, self.status.as_ref());
        set(&mut fields.progress, self.progress.as_ref());
        set(&mut fields.start_date, self.start_date.as_ref());
        set(
            &mut fields.expected_completion_date,
            self.expected_completion_date.as_ref(),
        );
        set(
            &mut fields.actual_completion_date,
            self.actual_completion_date.as_ref(),
        );
        set(&mut fields.manpower, self.manpower.as_ref());
        set(&mut fields.executor_id, self.executor_id.as_ref());
        set(&mut fields.supervisor_id, self.supervisor_id.as_ref());
        set(&mut fields.approver_id, self.approver_id.as_ref());
        set(&mut fields.priority, self.priority.as_ref());
        set(&mut fields.location, self.location.as_ref());
        set(&mut fields.attachments, self.attachments.as_ref());
        set(&mut fields.billable, self.billable.as_ref());
        set(&mut fields.budget_amount, self.budget_amount.as_ref());
    }
}

fn set<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(new_value) = value {
        target.clone_from(new_value);
    }
}
