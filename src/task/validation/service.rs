//! Validation service implementation.
//!
//! Provides the default implementation of the [`TaskValidator`] port,
//! running every rule and combining the failures.

use crate::{
    config::TaskValidationConfig,
    task::{
        domain::{Money, Progress, TaskFields, TaskUpdateDraft},
        error::ValidationErrors,
        ports::validator::{TaskValidator, ValidationResult},
        validation::rules,
    },
};

/// Default implementation of the task validator.
///
/// # Examples
///
/// ```
/// use foreman::task::domain::{TaskCategory, TaskFields};
/// use foreman::task::ports::TaskValidator;
/// use foreman::task::validation::DefaultTaskValidator;
///
/// let validator = DefaultTaskValidator::new();
/// let fields = TaskFields::new("Pour slab", TaskCategory::Foundation);
/// assert!(validator.validate_task(&fields).is_ok());
///
/// let mut billable = fields.clone();
/// billable.billable = true;
/// let errors = validator.validate_task(&billable).expect_err("budget missing");
/// assert!(errors.has_field("budget_amount"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultTaskValidator {
    config: TaskValidationConfig,
}

impl DefaultTaskValidator {
    /// Creates a validator with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with custom limits.
    #[must_use]
    pub const fn with_config(config: TaskValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the active limits.
    #[must_use]
    pub const fn config(&self) -> &TaskValidationConfig {
        &self.config
    }
}

impl TaskValidator for DefaultTaskValidator {
    fn validate_task(&self, fields: &TaskFields) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        rules::check_name(&fields.name, &self.config, &mut errors);
        rules::check_description(fields.description.as_deref(), &self.config, &mut errors);
        rules::check_progress(fields, &mut errors);
        rules::check_dates(fields, &mut errors);
        rules::check_billing(fields, &mut errors);
        rules::check_entries(
            "attachments",
            &fields.attachments,
            Some(self.config.max_attachments),
            &mut errors,
        );
        errors.into_result()
    }

    fn validate_update(&self, current: Progress, draft: &TaskUpdateDraft) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        rules::check_note(&draft.note, &self.config, &mut errors);
        rules::check_delta(current, draft, &mut errors);
        rules::check_entries(
            "attachments",
            &draft.attachments,
            Some(self.config.max_attachments),
            &mut errors,
        );
        rules::check_entries("issues", &draft.issues, None, &mut errors);
        errors.into_result()
    }

    fn validate_invoice_link(&self, amount_billed: Money) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        rules::check_amount_billed(amount_billed, &mut errors);
        errors.into_result()
    }
}
