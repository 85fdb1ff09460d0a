//! `PostgreSQL` stores for progress updates, approvals and invoice links.

use super::{
    connection::{PgHandle, TaskPgPool, from_document, is_unique_violation, to_document, violates},
    models::{NewTaskInvoiceLinkRow, NewTaskUpdateRow, TaskApprovalRow},
    schema::{task_approvals, task_invoice_links, task_updates},
};
use crate::task::{
    domain::{
        ApprovalLevel, EntityKind, InvoiceId, TaskApproval, TaskId, TaskInvoiceLink, TaskUpdate,
    },
    ports::{
        RepositoryError, RepositoryResult, TaskApprovalRepository, TaskInvoiceLinkRepository,
        TaskUpdateRepository,
    },
};
use async_trait::async_trait;
use diesel::prelude::*;
use serde_json::Value;

const TASK_LEVEL_CONSTRAINT: &str = "idx_task_approvals_task_level_unique";

fn decode_all<T: serde::de::DeserializeOwned>(documents: Vec<Value>) -> RepositoryResult<Vec<T>> {
    documents.into_iter().map(from_document).collect()
}

/// `PostgreSQL`-backed progress update store.
#[derive(Debug, Clone)]
pub struct PostgresTaskUpdateRepository {
    handle: PgHandle,
}

impl PostgresTaskUpdateRepository {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

#[async_trait]
impl TaskUpdateRepository for PostgresTaskUpdateRepository {
    async fn store(&self, update: &TaskUpdate) -> RepositoryResult<()> {
        let update_id = update.id();
        let row = NewTaskUpdateRow {
            id: update_id.into_inner(),
            task_id: update.task_id().into_inner(),
            document: to_document(update)?,
            recorded_at: update.recorded_at(),
        };
        self.handle
            .run_blocking(move |connection| {
                diesel::insert_into(task_updates::table)
                    .values(&row)
                    .execute(connection)
                    .map_err(|err| {
                        if is_unique_violation(&err) {
                            RepositoryError::duplicate(EntityKind::TaskUpdate, update_id)
                        } else {
                            RepositoryError::persistence(err)
                        }
                    })?;
                Ok(())
            })
            .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskUpdate>> {
        self.handle
            .run_blocking(move |connection| {
                let documents = task_updates::table
                    .filter(task_updates::task_id.eq(task_id.into_inner()))
                    .order((task_updates::recorded_at.asc(), task_updates::seq.asc()))
                    .select(task_updates::document)
                    .load::<Value>(connection)
                    .map_err(RepositoryError::persistence)?;
                decode_all(documents)
            })
            .await
    }
}

/// `PostgreSQL`-backed approval store.
#[derive(Debug, Clone)]
pub struct PostgresTaskApprovalRepository {
    handle: PgHandle,
}

impl PostgresTaskApprovalRepository {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

fn to_approval_row(approval: &TaskApproval) -> RepositoryResult<TaskApprovalRow> {
    Ok(TaskApprovalRow {
        id: approval.id().into_inner(),
        task_id: approval.task_id().into_inner(),
        level: approval.level().as_str().to_owned(),
        status: approval.status().as_str().to_owned(),
        document: to_document(approval)?,
    })
}

#[async_trait]
impl TaskApprovalRepository for PostgresTaskApprovalRepository {
    async fn store(&self, approval: &TaskApproval) -> RepositoryResult<()> {
        let approval_id = approval.id();
        let task_id = approval.task_id();
        let level = approval.level();
        let row = to_approval_row(approval)?;
        self.handle
            .run_blocking(move |connection| {
                diesel::insert_into(task_approvals::table)
                    .values(&row)
                    .execute(connection)
                    .map_err(|err| {
                        if violates(&err, TASK_LEVEL_CONSTRAINT) {
                            RepositoryError::DuplicateApprovalLevel { task_id, level }
                        } else if is_unique_violation(&err) {
                            RepositoryError::duplicate(EntityKind::TaskApproval, approval_id)
                        } else {
                            RepositoryError::persistence(err)
                        }
                    })?;
                Ok(())
            })
            .await
    }

    async fn update(&self, approval: &TaskApproval) -> RepositoryResult<()> {
        let approval_id = approval.id();
        let row = to_approval_row(approval)?;
        self.handle
            .run_blocking(move |connection| {
                let updated = diesel::update(
                    task_approvals::table.filter(task_approvals::id.eq(approval_id.into_inner())),
                )
                .set(&row)
                .execute(connection)
                .map_err(RepositoryError::persistence)?;
                if updated == 0 {
                    return Err(RepositoryError::not_found(
                        EntityKind::TaskApproval,
                        approval_id,
                    ));
                }
                Ok(())
            })
            .await
    }

    async fn find_by_task_and_level(
        &self,
        task_id: TaskId,
        level: ApprovalLevel,
    ) -> RepositoryResult<Option<TaskApproval>> {
        self.handle
            .run_blocking(move |connection| {
                let document = task_approvals::table
                    .filter(task_approvals::task_id.eq(task_id.into_inner()))
                    .filter(task_approvals::level.eq(level.as_str()))
                    .select(task_approvals::document)
                    .first::<Value>(connection)
                    .optional()
                    .map_err(RepositoryError::persistence)?;
                document.map(from_document).transpose()
            })
            .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskApproval>> {
        self.handle
            .run_blocking(move |connection| {
                let documents = task_approvals::table
                    .filter(task_approvals::task_id.eq(task_id.into_inner()))
                    .select(task_approvals::document)
                    .load::<Value>(connection)
                    .map_err(RepositoryError::persistence)?;
                let mut approvals: Vec<TaskApproval> = decode_all(documents)?;
                approvals.sort_by_key(TaskApproval::level);
                Ok(approvals)
            })
            .await
    }
}

/// `PostgreSQL`-backed invoice link store.
#[derive(Debug, Clone)]
pub struct PostgresTaskInvoiceLinkRepository {
    handle: PgHandle,
}

impl PostgresTaskInvoiceLinkRepository {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

#[async_trait]
impl TaskInvoiceLinkRepository for PostgresTaskInvoiceLinkRepository {
    async fn store(&self, link: &TaskInvoiceLink) -> RepositoryResult<()> {
        let link_id = link.id();
        let row = NewTaskInvoiceLinkRow {
            id: link_id.into_inner(),
            task_id: link.task_id().into_inner(),
            invoice_id: link.invoice_id().into_inner(),
            document: to_document(link)?,
            linked_at: link.linked_at(),
        };
        self.handle
            .run_blocking(move |connection| {
                diesel::insert_into(task_invoice_links::table)
                    .values(&row)
                    .execute(connection)
                    .map_err(|err| {
                        if is_unique_violation(&err) {
                            RepositoryError::duplicate(EntityKind::TaskInvoiceLink, link_id)
                        } else {
                            RepositoryError::persistence(err)
                        }
                    })?;
                Ok(())
            })
            .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> RepositoryResult<Vec<TaskInvoiceLink>> {
        self.handle
            .run_blocking(move |connection| {
                let documents = task_invoice_links::table
                    .filter(task_invoice_links::task_id.eq(task_id.into_inner()))
                    .order((
                        task_invoice_links::linked_at.asc(),
                        task_invoice_links::seq.asc(),
                    ))
                    .select(task_invoice_links::document)
                    .load::<Value>(connection)
                    .map_err(RepositoryError::persistence)?;
                decode_all(documents)
            })
            .await
    }

    async fn find_by_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> RepositoryResult<Vec<TaskInvoiceLink>> {
        self.handle
            .run_blocking(move |connection| {
                let documents = task_invoice_links::table
                    .filter(task_invoice_links::invoice_id.eq(invoice_id.into_inner()))
                    .order((
                        task_invoice_links::linked_at.asc(),
                        task_invoice_links::seq.asc(),
                    ))
                    .select(task_invoice_links::document)
                    .load::<Value>(connection)
                    .map_err(RepositoryError::persistence)?;
                decode_all(documents)
            })
            .await
    }
}
