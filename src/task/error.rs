//! Field-scoped validation errors for task workflow input.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation failures keyed by field name.
///
/// Validators collect every failure instead of stopping at the first one, so a
/// caller can report all problems with a submission at once.
///
/// # Examples
///
/// ```
/// use foreman::task::error::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("name", "name is required");
/// errors.add("progress", "progress must be between 0 and 100");
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.messages("name"), ["name is required"]);
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed: {}", describe(.fields))]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding a single message.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Moves every message from `other` into this set.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Returns `true` when no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the total number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Returns `true` when the field has at least one message.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the messages recorded for a field.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns the field-to-messages map.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Converts the set into `Ok(())` when empty and `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one failure was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn describe(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| format!("{field}: {message}"))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
