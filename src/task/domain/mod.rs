//! Domain model for site task workflow management.
//!
//! The task domain models task lifecycle, progress updates, per-level
//! approvals and invoice links while keeping all infrastructure concerns
//! outside of the domain boundary.

mod approval;
mod error;
mod ids;
mod invoice;
mod money;
mod patch;
mod progress;
mod projection;
mod query;
mod site;
mod task;
mod update;

pub use approval::{
    ApprovalDecision, ApprovalLevel, ApprovalStatus, ApprovalSummary, TaskApproval,
};
pub use error::{ParseTaskEnumError, TaskDomainError};
pub use ids::{
    EmployeeId, EntityKind, InvoiceId, SiteId, TaskApprovalId, TaskId, TaskInvoiceLinkId,
    TaskUpdateId,
};
pub use invoice::{Invoice, TaskInvoiceLink};
pub use money::Money;
pub use patch::TaskPatch;
pub use progress::Progress;
pub use projection::{TaskDetails, TaskStatistics, TimelineEntry, TimelineEvent};
pub use query::TaskQuery;
pub use site::{Site, TaskCode};
pub use task::{Task, TaskCategory, TaskFields, TaskPriority, TaskStatus};
pub use update::{TaskUpdate, TaskUpdateDraft};
