//! Read projections over tasks and their child records.

use super::{
    ApprovalLevel, ApprovalStatus, ApprovalSummary, InvoiceId, Money, Progress, Task,
    TaskApproval, TaskCode, TaskInvoiceLink, TaskPriority, TaskStatus, TaskUpdate, TaskUpdateId,
};
use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A task together with its updates, approvals and invoice links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    /// The task.
    pub task: Task,
    /// Progress updates, newest first.
    pub updates: Vec<TaskUpdate>,
    /// Approvals in level order.
    pub approvals: Vec<TaskApproval>,
    /// Invoice links, oldest first.
    pub invoice_links: Vec<TaskInvoiceLink>,
    /// Aggregate approval state.
    pub approval_summary: ApprovalSummary,
}

/// Aggregate figures over a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    /// Number of tasks counted.
    pub total: usize,
    /// Task count per status; every status is present.
    pub by_status: BTreeMap<TaskStatus, usize>,
    /// Task count per priority; every priority is present.
    pub by_priority: BTreeMap<TaskPriority, usize>,
    /// Tasks past their expected completion and still open.
    pub overdue: usize,
    /// Billable tasks.
    pub billable: usize,
    /// Mean progress, rounded down; zero for an empty set.
    pub average_progress: u8,
    /// Sum of billable budgets.
    pub total_budget: Money,
    /// Sum of costs to date.
    pub total_cost: Money,
}

impl TaskStatistics {
    /// Computes statistics for the given tasks at `now`.
    #[must_use]
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut by_status: BTreeMap<TaskStatus, usize> =
            TaskStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        let mut by_priority: BTreeMap<TaskPriority, usize> = TaskPriority::ALL
            .into_iter()
            .map(|priority| (priority, 0))
            .collect();
        let mut progress_sum: u64 = 0;

        for task in tasks {
            *by_status.entry(task.status()).or_default() += 1;
            *by_priority.entry(task.priority()).or_default() += 1;
            progress_sum += u64::from(task.progress().value());
        }

        let count = u64::try_from(tasks.len()).unwrap_or(u64::MAX);
        let average_progress = progress_sum
            .checked_div(count)
            .and_then(|average| u8::try_from(average).ok())
            .unwrap_or_default();

        Self {
            total: tasks.len(),
            by_status,
            by_priority,
            overdue: tasks.iter().filter(|task| task.is_overdue(now)).count(),
            billable: tasks.iter().filter(|task| task.is_billable()).count(),
            average_progress,
            total_budget: tasks
                .iter()
                .filter(|task| task.is_billable())
                .filter_map(Task::budget_amount)
                .sum(),
            total_cost: tasks.iter().map(Task::cost_to_date).sum(),
        }
    }
}

/// What happened at a point on a task's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEvent {
    /// The task was created.
    Created {
        /// Code assigned at creation.
        code: TaskCode,
    },
    /// A progress update was recorded.
    ProgressRecorded {
        /// The update.
        update_id: TaskUpdateId,
        /// Signed delta.
        delta: i32,
        /// Resulting progress.
        progress_after: Progress,
        /// Update note.
        note: String,
        /// Explicit status change, if any.
        status_change: Option<TaskStatus>,
    },
    /// An approval level was decided.
    ApprovalDecided {
        /// Decided level.
        level: ApprovalLevel,
        /// Resulting status.
        status: ApprovalStatus,
        /// Approver's remark.
        remark: Option<String>,
    },
    /// Work was linked to an invoice.
    InvoiceLinked {
        /// Linked invoice.
        invoice_id: InvoiceId,
        /// Amount billed.
        amount_billed: Money,
        /// Outstanding balance at link time.
        balance: Money,
    },
}

/// A dated entry on a task's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// When it happened.
    pub at: DateTime<Utc>,
    /// Who did it.
    pub actor: Option<ActorId>,
    /// What happened.
    pub event: TimelineEvent,
}

impl TimelineEntry {
    /// Builds a chronological timeline from a task's details.
    ///
    /// Pending approvals have no decision and do not appear.
    #[must_use]
    pub fn collect(details: &TaskDetails) -> Vec<Self> {
        let task = &details.task;
        let mut entries = vec![Self {
            at: task.created_at(),
            actor: Some(task.created_by().clone()),
            event: TimelineEvent::Created {
                code: task.code().clone(),
            },
        }];

        entries.extend(details.updates.iter().map(|update| Self {
            at: update.recorded_at(),
            actor: Some(update.entered_by().clone()),
            event: TimelineEvent::ProgressRecorded {
                update_id: update.id(),
                delta: update.delta(),
                progress_after: update.progress_after(),
                note: update.note().to_owned(),
                status_change: update.status_change(),
            },
        }));

        entries.extend(details.approvals.iter().filter_map(|approval| {
            approval.decided_at().map(|decided_at| Self {
                at: decided_at,
                actor: approval.approver().cloned(),
                event: TimelineEvent::ApprovalDecided {
                    level: approval.level(),
                    status: approval.status(),
                    remark: approval.remark().map(str::to_owned),
                },
            })
        }));

        entries.extend(details.invoice_links.iter().map(|link| Self {
            at: link.linked_at(),
            actor: Some(link.linked_by().clone()),
            event: TimelineEvent::InvoiceLinked {
                invoice_id: link.invoice_id(),
                amount_billed: link.amount_billed(),
                balance: link.balance(),
            },
        }));

        entries.sort_by_key(|entry| entry.at);
        entries
    }
}
