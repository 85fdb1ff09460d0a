//! Task aggregate root and related lifecycle types.

use super::{
    EmployeeId, Money, ParseTaskEnumError, Progress, SiteId, TaskCode, TaskDomainError, TaskId,
};
use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Scheduled but not started.
    Planned,
    /// Work is under way.
    InProgress,
    /// Work is paused.
    OnHold,
    /// Work is finished.
    Completed,
    /// Work was called off.
    Cancelled,
}

impl TaskStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Planned,
        Self::InProgress,
        Self::OnHold,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for statuses that end the task's lifecycle.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planned" => Ok(Self::Planned),
            "in_progress" => Ok(Self::InProgress),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskEnumError::new("task status", value)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal scheduling.
    Medium,
    /// Needs attention soon.
    High,
    /// Blocks other work.
    Critical,
}

impl TaskPriority {
    /// Every priority from lowest to highest.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Returns `true` for priorities that put a task through approvals.
    #[must_use]
    pub const fn requires_approval(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseTaskEnumError::new("task priority", value)),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade or phase a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Clearing, fencing and setting out.
    SitePreparation,
    /// Digging and earthworks.
    Excavation,
    /// Footings, piles and slabs.
    Foundation,
    /// Frame, columns and beams.
    Structural,
    /// Brick and block work.
    Masonry,
    /// Roof structure and covering.
    Roofing,
    /// Electrical installation.
    Electrical,
    /// Water supply and drainage.
    Plumbing,
    /// Heating, ventilation and air conditioning.
    Hvac,
    /// Plastering, painting and fit-out.
    Finishing,
    /// Quality and safety inspections.
    Inspection,
    /// Anything else.
    Other,
}

impl TaskCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SitePreparation => "site_preparation",
            Self::Excavation => "excavation",
            Self::Foundation => "foundation",
            Self::Structural => "structural",
            Self::Masonry => "masonry",
            Self::Roofing => "roofing",
            Self::Electrical => "electrical",
            Self::Plumbing => "plumbing",
            Self::Hvac => "hvac",
            Self::Finishing => "finishing",
            Self::Inspection => "inspection",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "site_preparation" => Ok(Self::SitePreparation),
            "excavation" => Ok(Self::Excavation),
            "foundation" => Ok(Self::Foundation),
            "structural" => Ok(Self::Structural),
            "masonry" => Ok(Self::Masonry),
            "roofing" => Ok(Self::Roofing),
            "electrical" => Ok(Self::Electrical),
            "plumbing" => Ok(Self::Plumbing),
            "hvac" => Ok(Self::Hvac),
            "finishing" => Ok(Self::Finishing),
            "inspection" => Ok(Self::Inspection),
            "other" => Ok(Self::Other),
            _ => Err(ParseTaskEnumError::new("task category", value)),
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editable task attributes in their unvalidated form.
///
/// Used as the candidate value for validation on creation and as the merge
/// target for [`super::TaskPatch`]. Progress is kept as a raw integer so
/// out-of-range input can be reported rather than rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    /// Task name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Trade or phase.
    pub category: TaskCategory,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Completion percentage.
    pub progress: i32,
    /// Planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Planned completion.
    pub expected_completion_date: Option<DateTime<Utc>>,
    /// Actual completion.
    pub actual_completion_date: Option<DateTime<Utc>>,
    /// Number of workers assigned.
    pub manpower: u32,
    /// Employee carrying out the work.
    pub executor_id: Option<EmployeeId>,
    /// Employee supervising the work.
    pub supervisor_id: Option<EmployeeId>,
    /// Employee signing the work off.
    pub approver_id: Option<EmployeeId>,
    /// Urgency.
    pub priority: TaskPriority,
    /// Location on site.
    pub location: Option<String>,
    /// URLs of already-uploaded files.
    pub attachments: Vec<String>,
    /// Whether the work is billed to the client.
    pub billable: bool,
    /// Budget for billable work.
    pub budget_amount: Option<Money>,
    /// Running cost billed against the task.
    pub cost_to_date: Money,
}

impl TaskFields {
    /// Creates a planned, medium-priority task description with no progress.
    #[must_use]
    pub fn new(name: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            name: name.into(),
            description: None,
            category,
            status: TaskStatus::Planned,
            progress: 0,
            start_date: None,
            expected_completion_date: None,
            actual_completion_date: None,
            manpower: 0,
            executor_id: None,
            supervisor_id: None,
            approver_id: None,
            priority: TaskPriority::Medium,
            location: None,
            attachments: Vec::new(),
            billable: false,
            budget_amount: None,
            cost_to_date: Money::ZERO,
        }
    }

    /// Returns `true` when a task with these fields enters the approval
    /// workflow.
    #[must_use]
    pub const fn requires_approval(&self) -> bool {
        self.billable || self.priority.requires_approval()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    site_id: SiteId,
    code: TaskCode,
    name: String,
    description: Option<String>,
    category: TaskCategory,
    status: TaskStatus,
    progress: Progress,
    start_date: Option<DateTime<Utc>>,
    expected_completion_date: Option<DateTime<Utc>>,
    actual_completion_date: Option<DateTime<Utc>>,
    manpower: u32,
    executor_id: Option<EmployeeId>,
    supervisor_id: Option<EmployeeId>,
    approver_id: Option<EmployeeId>,
    priority: TaskPriority,
    location: Option<String>,
    attachments: Vec<String>,
    billable: bool,
    budget_amount: Option<Money>,
    cost_to_date: Money,
    archived: bool,
    created_by: ActorId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from validated fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidProgress`] when progress is out of
    /// range, or [`TaskDomainError::IncompleteCompletion`] when full progress
    /// is not paired with a completed status and completion date.
    pub fn new(
        site_id: SiteId,
        code: TaskCode,
        fields: TaskFields,
        created_by: ActorId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let id = TaskId::new();
        let progress = Progress::new(fields.progress)?;
        guard_completion(id, progress, fields.status, fields.actual_completion_date)?;

        Ok(Self {
            id,
            site_id,
            code,
            name: fields.name,
            description: fields.description,
            category: fields.category,
            status: fields.status,
            progress,
            start_date: fields.start_date,
            expected_completion_date: fields.expected_completion_date,
            actual_completion_date: fields.actual_completion_date,
            manpower: fields.manpower,
            executor_id: fields.executor_id,
            supervisor_id: fields.supervisor_id,
            approver_id: fields.approver_id,
            priority: fields.priority,
            location: fields.location,
            attachments: fields.attachments,
            billable: fields.billable,
            budget_amount: fields.budget_amount,
            cost_to_date: fields.cost_to_date,
            archived: false,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning site.
    #[must_use]
    pub const fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// Returns the per-site task code.
    #[must_use]
    pub const fn code(&self) -> &TaskCode {
        &self.code
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the completion percentage.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the planned start.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the planned completion.
    #[must_use]
    pub const fn expected_completion_date(&self) -> Option<DateTime<Utc>> {
        self.expected_completion_date
    }

    /// Returns the actual completion.
    #[must_use]
    pub const fn actual_completion_date(&self) -> Option<DateTime<Utc>> {
        self.actual_completion_date
    }

    /// Returns the assigned headcount.
    #[must_use]
    pub const fn manpower(&self) -> u32 {
        self.manpower
    }

    /// Returns the executing employee.
    #[must_use]
    pub const fn executor_id(&self) -> Option<EmployeeId> {
        self.executor_id
    }

    /// Returns the supervising employee.
    #[must_use]
    pub const fn supervisor_id(&self) -> Option<EmployeeId> {
        self.supervisor_id
    }

    /// Returns the approving employee.
    #[must_use]
    pub const fn approver_id(&self) -> Option<EmployeeId> {
        self.approver_id
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the location on site.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the attachment URLs.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns `true` for billable work.
    #[must_use]
    pub const fn is_billable(&self) -> bool {
        self.billable
    }

    /// Returns the budget.
    #[must_use]
    pub const fn budget_amount(&self) -> Option<Money> {
        self.budget_amount
    }

    /// Returns the amount billed so far.
    #[must_use]
    pub const fn cost_to_date(&self) -> Money {
        self.cost_to_date
    }

    /// Returns `true` when the task is hidden from default listings.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns the actor who created the task.
    #[must_use]
    pub const fn created_by(&self) -> &ActorId {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task enters the approval workflow.
    #[must_use]
    pub const fn requires_approval(&self) -> bool {
        self.billable || self.priority.requires_approval()
    }

    /// Returns `true` when the expected completion has passed without the
    /// task being completed or cancelled.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_closed()
            && self
                .expected_completion_date
                .is_some_and(|expected| expected < now)
    }

    /// Returns the editable attributes as a mergeable value.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            status: self.status,
            progress: i32::from(self.progress),
            start_date: self.start_date,
            expected_completion_date: self.expected_completion_date,
            actual_completion_date: self.actual_completion_date,
            manpower: self.manpower,
            executor_id: self.executor_id,
            supervisor_id: self.supervisor_id,
            approver_id: self.approver_id,
            priority: self.priority,
            location: self.location.clone(),
            attachments: self.attachments.clone(),
            billable: self.billable,
            budget_amount: self.budget_amount,
            cost_to_date: self.cost_to_date,
        }
    }

    /// Replaces the editable attributes with validated fields.
    ///
    /// The cost-to-date is owned by invoice linking and is left untouched.
    pub(crate) fn apply_fields(
        &mut self,
        fields: TaskFields,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let progress = Progress::new(fields.progress)?;
        guard_completion(
            self.id,
            progress,
            fields.status,
            fields.actual_completion_date,
        )?;

        self.name = fields.name;
        self.description = fields.description;
        self.category = fields.category;
        self.status = fields.status;
        self.progress = progress;
        self.start_date = fields.start_date;
        self.expected_completion_date = fields.expected_completion_date;
        self.actual_completion_date = fields.actual_completion_date;
        self.manpower = fields.manpower;
        self.executor_id = fields.executor_id;
        self.supervisor_id = fields.supervisor_id;
        self.approver_id = fields.approver_id;
        self.priority = fields.priority;
        self.location = fields.location;
        self.attachments = fields.attachments;
        self.billable = fields.billable;
        self.budget_amount = fields.budget_amount;
        self.touch(clock);
        Ok(())
    }

    /// Applies the outcome of a progress update.
    ///
    /// An explicit status change is applied first; reaching 100% then forces
    /// [`TaskStatus::Completed`] and stamps the completion date, overriding
    /// the explicit status.
    pub(crate) fn record_progress(
        &mut self,
        progress: Progress,
        status_change: Option<TaskStatus>,
        manpower: Option<u32>,
        clock: &impl Clock,
    ) {
        let now = clock.utc();
        self.progress = progress;
        if let Some(status) = status_change {
            self.status = status;
        }
        if let Some(headcount) = manpower {
            self.manpower = headcount;
        }
        if progress.is_complete() {
            self.status = TaskStatus::Completed;
            self.actual_completion_date = Some(now);
        }
        self.updated_at = now;
    }

    /// Adds billed work to the running cost.
    pub(crate) fn add_cost(&mut self, amount: Money, clock: &impl Clock) {
        self.cost_to_date = self.cost_to_date.saturating_add(amount);
        self.touch(clock);
    }

    /// Sets the archived flag.
    pub(crate) fn set_archived(&mut self, archived: bool, clock: &impl Clock) {
        self.archived = archived;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Enforces that full progress implies a completed task with a completion
/// date.
const fn guard_completion(
    id: TaskId,
    progress: Progress,
    status: TaskStatus,
    actual_completion_date: Option<DateTime<Utc>>,
) -> Result<(), TaskDomainError> {
    if progress.is_complete()
        && (!matches!(status, TaskStatus::Completed) || actual_completion_date.is_none())
    {
        return Err(TaskDomainError::IncompleteCompletion(id));
    }
    Ok(())
}
