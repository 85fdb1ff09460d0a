//! Task search criteria.

use super::{EmployeeId, SiteId, Task, TaskCategory, TaskPriority, TaskStatus};

/// Search criteria for task listings.
///
/// Empty criteria match everything except archived tasks. List criteria match
/// when the task's value is any of the listed values.
///
/// # Examples
///
/// ```
/// use foreman::task::domain::{SiteId, TaskPriority, TaskQuery, TaskStatus};
///
/// let query = TaskQuery::for_site(SiteId::new())
///     .with_status(TaskStatus::InProgress)
///     .with_priority(TaskPriority::Critical)
///     .matching("slab");
/// assert!(!query.include_archived);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to one site.
    pub site_id: Option<SiteId>,
    /// Accepted statuses.
    pub statuses: Vec<TaskStatus>,
    /// Accepted priorities.
    pub priorities: Vec<TaskPriority>,
    /// Accepted categories.
    pub categories: Vec<TaskCategory>,
    /// Restrict to one executing employee.
    pub executor_id: Option<EmployeeId>,
    /// Case-insensitive text matched against code, name and description.
    pub text: Option<String>,
    /// Whether archived tasks are returned.
    pub include_archived: bool,
}

impl TaskQuery {
    /// Creates criteria matching every non-archived task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates criteria restricted to one site.
    #[must_use]
    pub fn for_site(site_id: SiteId) -> Self {
        Self {
            site_id: Some(site_id),
            ..Self::default()
        }
    }

    /// Adds an accepted status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Adds an accepted priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priorities.push(priority);
        self
    }

    /// Adds an accepted category.
    #[must_use]
    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.categories.push(category);
        self
    }

    /// Restricts to an executing employee.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: EmployeeId) -> Self {
        self.executor_id = Some(executor_id);
        self
    }

    /// Sets the free-text filter.
    #[must_use]
    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Includes archived tasks.
    #[must_use]
    pub const fn including_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Returns `true` when the task satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if task.is_archived() && !self.include_archived {
            return false;
        }
        if self.site_id.is_some_and(|site_id| site_id != task.site_id()) {
            return false;
        }
        if !accepts(&self.statuses, &task.status())
            || !accepts(&self.priorities, &task.priority())
            || !accepts(&self.categories, &task.category())
        {
            return false;
        }
        if self
            .executor_id
            .is_some_and(|executor| task.executor_id() != Some(executor))
        {
            return false;
        }
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .is_none_or(|text| matches_text(task, text))
    }
}

fn accepts<T: PartialEq>(accepted: &[T], value: &T) -> bool {
    accepted.is_empty() || accepted.contains(value)
}

fn matches_text(task: &Task, text: &str) -> bool {
    let needle = text.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
    contains(task.code().as_str())
        || contains(task.name())
        || task.description().is_some_and(contains)
}
