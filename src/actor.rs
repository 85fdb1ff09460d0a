//! Opaque actor identifiers used for audit attribution.
//!
//! Identity is resolved upstream; the workflow engine only requires that the
//! identifier is present and reasonably sized.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest actor identifier accepted, matching `VARCHAR(255)`.
const MAX_ACTOR_ID_LENGTH: usize = 255;

/// Identifier of the user or system acting on the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// Creates a validated actor identifier.
    ///
    /// Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidActorId`] when the value is blank or longer than 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidActorId> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_ACTOR_ID_LENGTH {
            return Err(InvalidActorId(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActorId {
    type Error = InvalidActorId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorId> for String {
    fn from(value: ActorId) -> Self {
        value.0
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned for blank or oversized actor identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid actor identifier '{0}'")]
pub struct InvalidActorId(pub String);
