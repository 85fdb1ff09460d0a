//! Site and task-code value objects.

use super::{SiteId, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Initials used when a site name has no alphanumeric characters.
const FALLBACK_INITIALS: &str = "SITE";

/// A construction site as seen by the workflow engine.
///
/// Sites are owned by an external collaborator; the engine only reads them to
/// scope tasks and derive task-code prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    id: SiteId,
    name: String,
}

impl Site {
    /// Creates a site reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySiteName`] when the name is blank.
    pub fn new(id: SiteId, name: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptySiteName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
        })
    }

    /// Returns the site identifier.
    #[must_use]
    pub const fn id(&self) -> SiteId {
        self.id
    }

    /// Returns the site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the upper-case initials of each word in the site name.
    ///
    /// Words are split on anything that is not alphanumeric.
    ///
    /// # Examples
    ///
    /// ```
    /// use foreman::task::domain::{Site, SiteId};
    ///
    /// let site = Site::new(SiteId::new(), "Harbor View Tower").expect("valid site");
    /// assert_eq!(site.initials(), "HVT");
    /// ```
    #[must_use]
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split(|ch: char| !ch.is_alphanumeric())
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            FALLBACK_INITIALS.to_owned()
        } else {
            initials
        }
    }
}

/// Human-readable task code, unique per site: `<INITIALS>-TASK-NNNN`.
///
/// Codes order by prefix and then by numeric sequence, so `HVT-TASK-10000`
/// follows `HVT-TASK-9999`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskCode(String);

impl TaskCode {
    const MARKER: &'static str = "-TASK-";

    /// Formats a task code from site initials and a sequence number.
    ///
    /// Sequence numbers are zero-padded to four digits; larger numbers keep
    /// all their digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use foreman::task::domain::TaskCode;
    ///
    /// assert_eq!(TaskCode::generate("HVT", 7).as_str(), "HVT-TASK-0007");
    /// assert_eq!(TaskCode::generate("HVT", 12_345).as_str(), "HVT-TASK-12345");
    /// ```
    #[must_use]
    pub fn generate(initials: &str, sequence: u32) -> Self {
        Self(format!("{initials}{}{sequence:04}", Self::MARKER))
    }

    /// Parses a stored task code.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskCode`] when the value does not
    /// match `<INITIALS>-TASK-<digits>`.
    pub fn parse(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let valid = raw.split_once(Self::MARKER).is_some_and(|(prefix, digits)| {
            !prefix.is_empty()
                && prefix.chars().all(char::is_alphanumeric)
                && !digits.is_empty()
                && digits.chars().all(|ch| ch.is_ascii_digit())
        });
        if valid {
            Ok(Self(raw))
        } else {
            Err(TaskDomainError::InvalidTaskCode(raw))
        }
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the code into its prefix and its digits without leading zeros.
    fn sort_key(&self) -> (&str, usize, &str) {
        let (prefix, digits) = self
            .0
            .split_once(Self::MARKER)
            .unwrap_or((&*self.0, ""));
        let significant = digits.trim_start_matches('0');
        (prefix, significant.len(), significant)
    }

    /// Returns the numeric sequence portion of the code.
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        self.0
            .split_once(Self::MARKER)
            .and_then(|(_, digits)| digits.parse().ok())
    }
}

impl Ord for TaskCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for TaskCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for TaskCode {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TaskCode> for String {
    fn from(value: TaskCode) -> Self {
        value.0
    }
}

impl fmt::Display for TaskCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
