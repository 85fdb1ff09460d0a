//! `PostgreSQL` repository implementation for task storage.

use super::{
    connection::{PgHandle, TaskPgPool, from_document, is_unique_violation, to_document, violates},
    models::TaskRow,
    schema::tasks,
};
use crate::task::{
    domain::{
        EmployeeId, EntityKind, SiteId, Task, TaskCategory, TaskCode, TaskId, TaskPriority,
        TaskQuery, TaskStatus,
    },
    ports::{RepositoryError, RepositoryResult, TaskRepository},
};
use async_trait::async_trait;
use diesel::prelude::*;
use serde_json::Value;

const SITE_CODE_CONSTRAINT: &str = "idx_tasks_site_code_unique";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    handle: PgHandle,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> RepositoryResult<()> {
        let task_id = task.id();
        let site_id = task.site_id();
        let code = task.code().clone();
        let row = to_row(task)?;

        self.handle
            .run_blocking(move |connection| {
                diesel::insert_into(tasks::table)
                    .values(&row)
                    .execute(connection)
                    .map_err(|err| {
                        if violates(&err, SITE_CODE_CONSTRAINT) {
                            RepositoryError::DuplicateTaskCode { site_id, code }
                        } else if is_unique_violation(&err) {
                            RepositoryError::duplicate(EntityKind::Task, task_id)
                        } else {
                            RepositoryError::persistence(err)
                        }
                    })?;
                Ok(())
            })
            .await
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.handle
            .run_blocking(move |connection| {
                let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(RepositoryError::persistence)?;
                if updated == 0 {
                    return Err(RepositoryError::not_found(EntityKind::Task, task_id));
                }
                Ok(())
            })
            .await
    }

    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        self.handle
            .run_blocking(move |connection| {
                let document = tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .select(tasks::document)
                    .first::<Value>(connection)
                    .optional()
                    .map_err(RepositoryError::persistence)?;
                document.map(from_document).transpose()
            })
            .await
    }

    async fn find_by_code(
        &self,
        site_id: SiteId,
        code: &TaskCode,
    ) -> RepositoryResult<Option<Task>> {
        let lookup_code = code.as_str().to_owned();
        self.handle
            .run_blocking(move |connection| {
                let document = tasks::table
                    .filter(tasks::site_id.eq(site_id.into_inner()))
                    .filter(tasks::code.eq(lookup_code))
                    .select(tasks::document)
                    .first::<Value>(connection)
                    .optional()
                    .map_err(RepositoryError::persistence)?;
                document.map(from_document).transpose()
            })
            .await
    }

    async fn search(&self, query: &TaskQuery) -> RepositoryResult<Vec<Task>> {
        let criteria = query.clone();
        self.handle
            .run_blocking(move |connection| {
                let mut statement = tasks::table.into_boxed();
                if let Some(site_id) = criteria.site_id {
                    statement = statement.filter(tasks::site_id.eq(site_id.into_inner()));
                }
                if !criteria.include_archived {
                    statement = statement.filter(tasks::archived.eq(false));
                }
                if !criteria.statuses.is_empty() {
                    let statuses: Vec<&str> =
                        criteria.statuses.iter().copied().map(TaskStatus::as_str).collect();
                    statement = statement.filter(tasks::status.eq_any(statuses));
                }
                if !criteria.priorities.is_empty() {
                    let priorities: Vec<&str> = criteria
                        .priorities
                        .iter()
                        .copied()
                        .map(TaskPriority::as_str)
                        .collect();
                    statement = statement.filter(tasks::priority.eq_any(priorities));
                }
                if !criteria.categories.is_empty() {
                    let categories: Vec<&str> = criteria
                        .categories
                        .iter()
                        .copied()
                        .map(TaskCategory::as_str)
                        .collect();
                    statement = statement.filter(tasks::category.eq_any(categories));
                }
                if let Some(executor) = criteria.executor_id {
                    statement = statement.filter(tasks::executor_id.eq(executor.into_inner()));
                }

                let documents = statement
                    .order(tasks::site_id.asc())
                    .select(tasks::document)
                    .load::<Value>(connection)
                    .map_err(RepositoryError::persistence)?;

                // Free-text criteria are applied after the indexed filters.
                let mut found = Vec::with_capacity(documents.len());
                for document in documents {
                    let task: Task = from_document(document)?;
                    if criteria.matches(&task) {
                        found.push(task);
                    }
                }
                // Codes sort numerically, which the varchar column cannot do.
                found.sort_by(|left, right| {
                    (left.site_id(), left.code()).cmp(&(right.site_id(), right.code()))
                });
                Ok(found)
            })
            .await
    }
}

fn to_row(task: &Task) -> RepositoryResult<TaskRow> {
    Ok(TaskRow {
        id: task.id().into_inner(),
        site_id: task.site_id().into_inner(),
        code: task.code().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        category: task.category().as_str().to_owned(),
        executor_id: task.executor_id().map(EmployeeId::into_inner),
        expected_completion_date: task.expected_completion_date(),
        archived: task.is_archived(),
        document: to_document(task)?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}
