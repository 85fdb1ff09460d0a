//! Service-level errors for the task workflow.

use crate::task::{
    domain::{ApprovalLevel, InvoiceId, SiteId, TaskDomainError, TaskId},
    error::ValidationErrors,
    ports::RepositoryError,
};
use std::fmt;
use thiserror::Error;

/// Record a workflow operation referred to but could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A task.
    Task(TaskId),
    /// A construction site.
    Site(SiteId),
    /// An invoice.
    Invoice(InvoiceId),
    /// The approval record for one level of a task.
    Approval {
        /// Owning task.
        task_id: TaskId,
        /// Approval level.
        level: ApprovalLevel,
    },
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task {id}"),
            Self::Site(id) => write!(f, "site {id}"),
            Self::Invoice(id) => write!(f, "invoice {id}"),
            Self::Approval { task_id, level } => {
                write!(f, "{level} approval for task {task_id}")
            }
        }
    }
}

/// Errors returned by [`super::TaskWorkflowService`] operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// A referenced record does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// Input failed schema or business-rule validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The task is not in a state that allows the operation.
    #[error("task {task_id} {reason}")]
    StateConflict {
        /// Affected task.
        task_id: TaskId,
        /// Why the operation was refused.
        reason: String,
    },

    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A persistence collaborator failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TaskWorkflowError {
    /// Returns the missing record for [`TaskWorkflowError::NotFound`].
    #[must_use]
    pub const fn missing(&self) -> Option<EntityRef> {
        match self {
            Self::NotFound(entity) => Some(*entity),
            _ => None,
        }
    }

    /// Returns the field errors for [`TaskWorkflowError::Validation`].
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for task workflow operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;
