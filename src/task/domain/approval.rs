//! Per-level approval records.

use super::{ParseTaskEnumError, TaskApprovalId, TaskId};
use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign-off level in the approval workflow.
///
/// Levels are ordered as presented to users, but each level is decided
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    /// Site engineer sign-off.
    Engineer,
    /// Site manager sign-off.
    SiteManager,
    /// Project manager sign-off.
    ProjectManager,
}

impl ApprovalLevel {
    /// Every level in creation order.
    pub const ALL: [Self; 3] = [Self::Engineer, Self::SiteManager, Self::ProjectManager];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Engineer => "engineer",
            Self::SiteManager => "site_manager",
            Self::ProjectManager => "project_manager",
        }
    }
}

impl TryFrom<&str> for ApprovalLevel {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "engineer" => Ok(Self::Engineer),
            "site_manager" => Ok(Self::SiteManager),
            "project_manager" => Ok(Self::ProjectManager),
            _ => Err(ParseTaskEnumError::new("approval level", value)),
        }
    }
}

impl fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single approval level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    Pending,
    /// Signed off.
    Approved,
    /// Turned down.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for ApprovalStatus {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseTaskEnumError::new("approval status", value)),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome chosen by an approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Sign the level off.
    Approved,
    /// Turn the level down.
    Rejected,
}

impl ApprovalDecision {
    /// Returns the status a decision leaves the level in.
    #[must_use]
    pub const fn status(self) -> ApprovalStatus {
        match self {
            Self::Approved => ApprovalStatus::Approved,
            Self::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// Approval record for one (task, level) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskApproval {
    id: TaskApprovalId,
    task_id: TaskId,
    level: ApprovalLevel,
    status: ApprovalStatus,
    approver: Option<ActorId>,
    decided_at: Option<DateTime<Utc>>,
    remark: Option<String>,
    created_at: DateTime<Utc>,
}

impl TaskApproval {
    /// Creates a pending approval for a level.
    #[must_use]
    pub fn pending(task_id: TaskId, level: ApprovalLevel, clock: &impl Clock) -> Self {
        Self {
            id: TaskApprovalId::new(),
            task_id,
            level,
            status: ApprovalStatus::Pending,
            approver: None,
            decided_at: None,
            remark: None,
            created_at: clock.utc(),
        }
    }

    /// Returns the approval identifier.
    #[must_use]
    pub const fn id(&self) -> TaskApprovalId {
        self.id
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the level.
    #[must_use]
    pub const fn level(&self) -> ApprovalLevel {
        self.level
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ApprovalStatus {
        self.status
    }

    /// Returns the deciding actor.
    #[must_use]
    pub const fn approver(&self) -> Option<&ActorId> {
        self.approver.as_ref()
    }

    /// Returns when the decision was made.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Returns the approver's remark.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Records a decision for this level.
    ///
    /// Decisions overwrite earlier ones and ignore the state of other levels.
    pub(crate) fn decide(
        &mut self,
        decision: ApprovalDecision,
        approver: ActorId,
        remark: Option<String>,
        clock: &impl Clock,
    ) {
        self.status = decision.status();
        self.approver = Some(approver);
        self.remark = remark;
        self.decided_at = Some(clock.utc());
    }
}

/// Aggregate approval state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalSummary {
    /// The task never entered the approval workflow.
    NotRequired,
    /// At least one level is pending and none is rejected.
    Pending,
    /// Every level is approved.
    Approved,
    /// At least one level is rejected.
    Rejected,
}

impl ApprovalSummary {
    /// Summarises a task's approval records.
    #[must_use]
    pub fn from_approvals(approvals: &[TaskApproval]) -> Self {
        if approvals.is_empty() {
            return Self::NotRequired;
        }
        if approvals
            .iter()
            .any(|approval| approval.status() == ApprovalStatus::Rejected)
        {
            return Self::Rejected;
        }
        if approvals
            .iter()
            .all(|approval| approval.status() == ApprovalStatus::Approved)
        {
            return Self::Approved;
        }
        Self::Pending
    }
}
