//! Bounded task progress percentage.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion percentage of a task, always within `0..=100`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Progress(u8);

impl Progress {
    /// No work done.
    pub const NONE: Self = Self(0);

    /// Work finished.
    pub const COMPLETE: Self = Self(100);

    const MAX: i32 = 100;

    /// Creates a validated progress value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidProgress`] outside `0..=100`.
    pub fn new(value: i32) -> Result<Self, TaskDomainError> {
        if !(0..=Self::MAX).contains(&value) {
            return Err(TaskDomainError::InvalidProgress(value));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| TaskDomainError::InvalidProgress(value))
    }

    /// Creates a progress value, clamping out-of-range input to the bounds.
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        let bounded = value.clamp(0, Self::MAX);
        u8::try_from(bounded).map_or(Self::COMPLETE, Self)
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns `true` at 100%.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 == 100
    }

    /// Applies a delta, returning `None` when the result leaves `0..=100`.
    #[must_use]
    pub fn checked_add_delta(self, delta: i32) -> Option<Self> {
        i32::from(self.0)
            .checked_add(delta)
            .and_then(|value| Self::new(value).ok())
    }

    /// Applies a delta, clamping the result to `0..=100`.
    #[must_use]
    pub fn saturating_add_delta(self, delta: i32) -> Self {
        Self::clamped(i32::from(self.0).saturating_add(delta))
    }
}

impl TryFrom<i32> for Progress {
    type Error = TaskDomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for i32 {
    fn from(value: Progress) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
