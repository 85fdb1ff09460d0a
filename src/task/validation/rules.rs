//! Individual validation rule implementations.
//!
//! Each rule inspects one aspect of its input and records failures into a
//! shared [`ValidationErrors`] collector, so a validator can run every rule
//! and report all problems together.

use crate::{
    config::TaskValidationConfig,
    task::{
        domain::{Money, Progress, TaskFields, TaskStatus, TaskUpdateDraft},
        error::ValidationErrors,
    },
};

/// Requires a non-blank name within the configured length.
pub fn check_name(name: &str, config: &TaskValidationConfig, errors: &mut ValidationErrors) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.add("name", "name is required");
        return;
    }
    let length = trimmed.chars().count();
    if length > config.max_name_length {
        errors.add(
            "name",
            format!(
                "name must be at most {} characters (got {length})",
                config.max_name_length
            ),
        );
    }
}

/// Bounds the optional description length.
pub fn check_description(
    description: Option<&str>,
    config: &TaskValidationConfig,
    errors: &mut ValidationErrors,
) {
    let Some(text) = description else {
        return;
    };
    let length = text.chars().count();
    if length > config.max_description_length {
        errors.add(
            "description",
            format!(
                "description must be at most {} characters (got {length})",
                config.max_description_length
            ),
        );
    }
}

/// Requires progress in `0..=100` and, at 100, a completed status with a
/// completion date.
pub fn check_progress(fields: &TaskFields, errors: &mut ValidationErrors) {
    let Ok(progress) = Progress::new(fields.progress) else {
        errors.add("progress", "progress must be between 0 and 100");
        return;
    };
    if !progress.is_complete() {
        return;
    }
    if fields.actual_completion_date.is_none() {
        errors.add(
            "actual_completion_date",
            "actual completion date is required when progress is 100",
        );
    }
    if fields.status != TaskStatus::Completed {
        errors.add("status", "status must be completed when progress is 100");
    }
}

/// Orders the start, expected and actual completion dates.
pub fn check_dates(fields: &TaskFields, errors: &mut ValidationErrors) {
    let Some(start) = fields.start_date else {
        return;
    };
    if fields
        .expected_completion_date
        .is_some_and(|expected| expected <= start)
    {
        errors.add(
            "expected_completion_date",
            "expected completion date must be after the start date",
        );
    }
    if fields
        .actual_completion_date
        .is_some_and(|actual| actual < start)
    {
        errors.add(
            "actual_completion_date",
            "actual completion date cannot precede the start date",
        );
    }
}

/// Requires a budget on billable work and non-negative amounts.
pub fn check_billing(fields: &TaskFields, errors: &mut ValidationErrors) {
    match fields.budget_amount {
        None if fields.billable => {
            errors.add("budget_amount", "budget amount is required for billable tasks");
        }
        Some(budget) if budget.is_negative() => {
            errors.add("budget_amount", "budget amount cannot be negative");
        }
        _ => {}
    }
    if fields.cost_to_date.is_negative() {
        errors.add("cost_to_date", "cost to date cannot be negative");
    }
}

/// Requires non-blank entries and caps the entry count when a limit is given.
pub fn check_entries(
    field: &str,
    entries: &[String],
    limit: Option<usize>,
    errors: &mut ValidationErrors,
) {
    if entries.iter().any(|entry| entry.trim().is_empty()) {
        errors.add(field, format!("{field} entries cannot be empty"));
    }
    if let Some(max) = limit.filter(|max| entries.len() > *max) {
        errors.add(
            field,
            format!("at most {max} {field} are allowed (got {})", entries.len()),
        );
    }
}

/// Requires a non-blank note within the configured length.
pub fn check_note(note: &str, config: &TaskValidationConfig, errors: &mut ValidationErrors) {
    if note.trim().is_empty() {
        errors.add("note", "note is required");
        return;
    }
    let length = note.chars().count();
    if length > config.max_note_length {
        errors.add(
            "note",
            format!(
                "note must be at most {} characters (got {length})",
                config.max_note_length
            ),
        );
    }
}

/// Requires the update's resulting progress to stay in `0..=100`.
pub fn check_delta(current: Progress, draft: &TaskUpdateDraft, errors: &mut ValidationErrors) {
    if current.checked_add_delta(draft.delta).is_none() {
        errors.add(
            "delta",
            format!(
                "progress {current} plus delta {} must stay between 0% and 100%",
                draft.delta
            ),
        );
    }
}

/// Requires a strictly positive billed amount.
pub fn check_amount_billed(amount: Money, errors: &mut ValidationErrors) {
    if !amount.is_positive() {
        errors.add("amount_billed", "amount billed must be greater than zero");
    }
}
