//! Diesel row models for site task workflow persistence.

use super::schema::{
    invoices, sites, task_approvals, task_code_sequences, task_invoice_links, task_updates, tasks,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for sites.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SiteRow {
    /// Site identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
}

/// Query result row for invoices.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    /// Invoice identifier.
    pub id: uuid::Uuid,
    /// Owning site.
    pub site_id: uuid::Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Total in minor units.
    pub total_amount: i64,
    /// Amount paid so far in minor units.
    pub paid_amount: i64,
}

/// Insert and update model for tasks.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning site.
    pub site_id: uuid::Uuid,
    /// Per-site task code.
    pub code: String,
    /// Lifecycle status.
    pub status: String,
    /// Urgency.
    pub priority: String,
    /// Trade or phase.
    pub category: String,
    /// Assigned executor.
    #[diesel(treat_none_as_null = true)]
    pub executor_id: Option<uuid::Uuid>,
    /// Planned completion.
    #[diesel(treat_none_as_null = true)]
    pub expected_completion_date: Option<DateTime<Utc>>,
    /// Archived flag.
    pub archived: bool,
    /// Full serialized task.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for progress updates.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_updates)]
pub struct NewTaskUpdateRow {
    /// Update identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Full serialized update.
    pub document: Value,
    /// Record time.
    pub recorded_at: DateTime<Utc>,
}

/// Insert and update model for approvals.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = task_approvals)]
pub struct TaskApprovalRow {
    /// Approval identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Approval level.
    pub level: String,
    /// Decision status.
    pub status: String,
    /// Full serialized approval.
    pub document: Value,
}

/// Insert model for invoice links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_invoice_links)]
pub struct NewTaskInvoiceLinkRow {
    /// Link identifier.
    pub id: uuid::Uuid,
    /// Linked task.
    pub task_id: uuid::Uuid,
    /// Linked invoice.
    pub invoice_id: uuid::Uuid,
    /// Full serialized link.
    pub document: Value,
    /// Link time.
    pub linked_at: DateTime<Utc>,
}

/// Insert model for the first value of a site's task-code sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_code_sequences)]
pub struct NewTaskCodeSequenceRow {
    /// Site the counter belongs to.
    pub site_id: uuid::Uuid,
    /// Initial value.
    pub last_value: i32,
}
