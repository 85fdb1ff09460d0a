//! Progress update records.

use super::{EmployeeId, Progress, TaskId, TaskStatus, TaskUpdateId};
use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input for recording a progress delta against a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdateDraft {
    /// Task the update belongs to.
    pub task_id: TaskId,
    /// Signed change in progress percentage points.
    pub delta: i32,
    /// Free-text description of the work done.
    pub note: String,
    /// Headcount on the day, if reported.
    pub manpower: Option<u32>,
    /// Where on site the work happened.
    pub location: Option<String>,
    /// Employee who performed the work.
    pub executor_id: Option<EmployeeId>,
    /// Actor entering the update.
    pub entered_by: ActorId,
    /// Explicit status to apply alongside the progress change.
    pub status_change: Option<TaskStatus>,
    /// URLs of already-uploaded files.
    pub attachments: Vec<String>,
    /// Problems encountered.
    pub issues: Vec<String>,
}

impl TaskUpdateDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(task_id: TaskId, delta: i32, note: impl Into<String>, entered_by: ActorId) -> Self {
        Self {
            task_id,
            delta,
            note: note.into(),
            manpower: None,
            location: None,
            executor_id: None,
            entered_by,
            status_change: None,
            attachments: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Sets the reported headcount.
    #[must_use]
    pub const fn with_manpower(mut self, manpower: u32) -> Self {
        self.manpower = Some(manpower);
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the executing employee.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: EmployeeId) -> Self {
        self.executor_id = Some(executor_id);
        self
    }

    /// Requests an explicit status change.
    #[must_use]
    pub const fn with_status_change(mut self, status: TaskStatus) -> Self {
        self.status_change = Some(status);
        self
    }

    /// Sets attachment URLs.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    /// Sets reported issues.
    #[must_use]
    pub fn with_issues(mut self, issues: impl IntoIterator<Item = String>) -> Self {
        self.issues = issues.into_iter().collect();
        self
    }
}

/// Immutable record of a progress delta applied to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    id: TaskUpdateId,
    task_id: TaskId,
    recorded_at: DateTime<Utc>,
    delta: i32,
    progress_before: Progress,
    progress_after: Progress,
    note: String,
    manpower: Option<u32>,
    location: Option<String>,
    executor_id: Option<EmployeeId>,
    entered_by: ActorId,
    status_change: Option<TaskStatus>,
    attachments: Vec<String>,
    issues: Vec<String>,
}

impl TaskUpdate {
    /// Records a draft against the task's current progress.
    ///
    /// The resulting progress is clamped to `0..=100`; validation rejects
    /// out-of-range deltas before this point.
    #[must_use]
    pub fn record(previous: Progress, draft: TaskUpdateDraft, clock: &impl Clock) -> Self {
        Self {
            id: TaskUpdateId::new(),
            task_id: draft.task_id,
            recorded_at: clock.utc(),
            delta: draft.delta,
            progress_before: previous,
            progress_after: previous.saturating_add_delta(draft.delta),
            note: draft.note,
            manpower: draft.manpower,
            location: draft.location,
            executor_id: draft.executor_id,
            entered_by: draft.entered_by,
            status_change: draft.status_change,
            attachments: draft.attachments,
            issues: draft.issues,
        }
    }

    /// Returns the update identifier.
    #[must_use]
    pub const fn id(&self) -> TaskUpdateId {
        self.id
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns when the update was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Returns the signed delta.
    #[must_use]
    pub const fn delta(&self) -> i32 {
        self.delta
    }

    /// Returns the progress before the update.
    #[must_use]
    pub const fn progress_before(&self) -> Progress {
        self.progress_before
    }

    /// Returns the progress after the update.
    #[must_use]
    pub const fn progress_after(&self) -> Progress {
        self.progress_after
    }

    /// Returns the note.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Returns the reported headcount.
    #[must_use]
    pub const fn manpower(&self) -> Option<u32> {
        self.manpower
    }

    /// Returns the location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the executing employee.
    #[must_use]
    pub const fn executor_id(&self) -> Option<EmployeeId> {
        self.executor_id
    }

    /// Returns the actor who entered the update.
    #[must_use]
    pub const fn entered_by(&self) -> &ActorId {
        &self.entered_by
    }

    /// Returns the explicit status change, if any.
    #[must_use]
    pub const fn status_change(&self) -> Option<TaskStatus> {
        self.status_change
    }

    /// Returns attachment URLs.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns reported issues.
    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}
