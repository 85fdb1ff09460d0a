//! Pool handle and blocking helpers shared by the `PostgreSQL` adapters.

use crate::task::ports::{RepositoryError, RepositoryResult};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Cloneable pool handle that runs Diesel calls off the async executor.
#[derive(Debug, Clone)]
pub(super) struct PgHandle {
    pool: TaskPgPool,
}

impl PgHandle {
    pub(super) const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    pub(super) async fn run_blocking<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

/// Serializes a domain record into its `document` column value.
pub(super) fn to_document<T: Serialize>(record: &T) -> RepositoryResult<Value> {
    serde_json::to_value(record).map_err(RepositoryError::persistence)
}

/// Restores a domain record from its `document` column value.
pub(super) fn from_document<T: DeserializeOwned>(document: Value) -> RepositoryResult<T> {
    serde_json::from_value(document).map_err(RepositoryError::persistence)
}

/// Returns `true` when `err` violates the named unique constraint.
pub(super) fn violates(err: &DieselError, constraint: &str) -> bool {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            constraint_is(info.as_ref(), constraint)
        }
        _ => false,
    }
}

/// Returns `true` for any unique-constraint violation.
pub(super) const fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn constraint_is(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
