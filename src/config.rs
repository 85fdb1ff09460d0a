//! Workflow configuration.
//!
//! Configuration is plain data with defaults for every field, so a JSON file
//! only needs to name the settings it overrides. Files are read through a
//! capability-scoped directory handle.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Default number of audit events retained before the oldest are evicted.
pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// Default audit retention window in days.
pub const DEFAULT_AUDIT_RETENTION_DAYS: u32 = 90;

/// Default number of recorded events between capacity compactions.
pub const DEFAULT_AUDIT_COMPACT_EVERY: usize = 100;

/// Top-level configuration for the task workflow engine.
///
/// # Examples
///
/// ```
/// use foreman::config::WorkflowConfig;
///
/// let config = WorkflowConfig::from_json_str(r#"{ "audit": { "retention_days": 30 } }"#)
///     .expect("valid configuration");
/// assert_eq!(config.audit.retention_days, 30);
/// assert_eq!(config.audit.capacity, 10_000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Audit trail retention settings.
    pub audit: AuditConfig,
    /// Task validation limits.
    pub validation: TaskValidationConfig,
}

/// Audit trail retention and compaction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Maximum number of events kept; older events are evicted first.
    pub capacity: usize,
    /// Events older than this many days are purged.
    pub retention_days: u32,
    /// Whether the workflow service purges expired events when it starts.
    pub purge_on_start: bool,
    /// Number of recorded events between capacity compactions.
    pub compact_every: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_AUDIT_CAPACITY,
            retention_days: DEFAULT_AUDIT_RETENTION_DAYS,
            purge_on_start: true,
            compact_every: DEFAULT_AUDIT_COMPACT_EVERY,
        }
    }
}

/// Limits applied by the task validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskValidationConfig {
    /// Maximum task name length in characters.
    pub max_name_length: usize,
    /// Maximum task description length in characters.
    pub max_description_length: usize,
    /// Maximum progress note length in characters.
    pub max_note_length: usize,
    /// Maximum number of attachment URLs per task or update.
    pub max_attachments: usize,
}

impl Default for TaskValidationConfig {
    fn default() -> Self {
        Self {
            max_name_length: 200,
            max_description_length: 5_000,
            max_note_length: 2_000,
            max_attachments: 20,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl WorkflowConfig {
    /// Parses configuration from a JSON document, filling missing fields with
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] when a value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, or any error
    /// from [`WorkflowConfig::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = read_config_file(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads configuration from a JSON file, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`WorkflowConfig::load`] except for a
    /// missing file.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match read_config_file(path) {
            Ok(contents) => Self::from_json_str(&contents),
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audit.capacity == 0 {
            return Err(ConfigError::Invalid(
                "audit.capacity must be greater than zero".to_owned(),
            ));
        }
        if self.audit.compact_every == 0 {
            return Err(ConfigError::Invalid(
                "audit.compact_every must be greater than zero".to_owned(),
            ));
        }
        if self.audit.retention_days == 0 {
            return Err(ConfigError::Invalid(
                "audit.retention_days must be greater than zero".to_owned(),
            ));
        }
        if self.validation.max_name_length == 0 {
            return Err(ConfigError::Invalid(
                "validation.max_name_length must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Utf8Path) -> Result<String, ConfigError> {
    let io_error = |source: io::Error| ConfigError::Io {
        path: path.to_owned(),
        source,
    };
    let file_name = path.file_name().ok_or_else(|| {
        io_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "configuration path must name a file",
        ))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    dir.read_to_string(file_name).map_err(io_error)
}
