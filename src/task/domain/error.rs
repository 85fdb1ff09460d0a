//! Error types for task domain construction and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// Progress lies outside `0..=100`.
    #[error("invalid progress {0}, expected a value between 0 and 100")]
    InvalidProgress(i32),

    /// A task code does not follow `<INITIALS>-TASK-NNNN`.
    #[error("invalid task code '{0}'")]
    InvalidTaskCode(String),

    /// A site name is blank.
    #[error("site name must not be empty")]
    EmptySiteName,

    /// An invoice number is blank.
    #[error("invoice number must not be empty")]
    EmptyInvoiceNumber,

    /// A task was moved into a state that breaks the completion invariant.
    #[error("task {0} reports full progress but is not completed")]
    IncompleteCompletion(TaskId),
}

/// Error returned while parsing a stored enumeration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseTaskEnumError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

impl ParseTaskEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
