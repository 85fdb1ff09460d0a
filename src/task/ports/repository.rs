//! Repository port for task persistence and lookup.

use crate::task::domain::{
    ApprovalLevel, EntityKind, SiteId, Task, TaskCode, TaskId, TaskQuery,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the task ID already exists
    /// or [`RepositoryError::DuplicateTaskCode`] when the site already has a
    /// task with the same code.
    async fn store(&self, task: &Task) -> RepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> RepositoryResult<()>;

    /// Finds a task by identifier, archived or not.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Finds a task by its per-site code.
    async fn find_by_code(&self, site_id: SiteId, code: &TaskCode)
    -> RepositoryResult<Option<Task>>;

    /// Returns tasks matching the query, ordered by site and code.
    async fn search(&self, query: &TaskQuery) -> RepositoryResult<Vec<Task>>;
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate {kind} identifier: {id}")]
    Duplicate {
        /// Kind of record.
        kind: EntityKind,
        /// Conflicting identifier.
        id: Uuid,
    },

    /// The record was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of record.
        kind: EntityKind,
        /// Missing identifier.
        id: Uuid,
    },

    /// The site already has a task with this code.
    #[error("duplicate task code {code} for site {site_id}")]
    DuplicateTaskCode {
        /// Owning site.
        site_id: SiteId,
        /// Conflicting code.
        code: TaskCode,
    },

    /// The task already has an approval for this level.
    #[error("duplicate {level} approval for task {task_id}")]
    DuplicateApprovalLevel {
        /// Owning task.
        task_id: TaskId,
        /// Conflicting level.
        level: ApprovalLevel,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Creates a duplicate-identifier error.
    pub fn duplicate(kind: EntityKind, id: impl Into<Uuid>) -> Self {
        Self::Duplicate {
            kind,
            id: id.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(kind: EntityKind, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
