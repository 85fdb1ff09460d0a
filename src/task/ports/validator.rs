//! Validator port for task workflow input.
//!
//! Validation is pure and collects every failure before returning, so callers
//! see all problems with a submission at once.

use crate::task::{
    domain::{Money, Progress, TaskFields, TaskUpdateDraft},
    error::ValidationErrors,
};

/// Result type for validation operations.
pub type ValidationResult = Result<(), ValidationErrors>;

/// Port for task validation.
///
/// Implementations must be stateless, thread-safe and must not mutate their
/// input.
pub trait TaskValidator: Send + Sync {
    /// Validates a complete set of task attributes.
    ///
    /// # Errors
    ///
    /// Returns every field-level failure in one [`ValidationErrors`] value.
    fn validate_task(&self, fields: &TaskFields) -> ValidationResult;

    /// Validates a progress update against the task's current progress.
    ///
    /// # Errors
    ///
    /// Returns every field-level failure in one [`ValidationErrors`] value.
    /// An out-of-range result is reported against the `delta` field.
    fn validate_update(&self, current: Progress, draft: &TaskUpdateDraft) -> ValidationResult;

    /// Validates the billed amount of an invoice link.
    ///
    /// # Errors
    ///
    /// Returns a failure on `amount_billed` when the amount is not positive.
    fn validate_invoice_link(&self, amount_billed: Money) -> ValidationResult;
}
