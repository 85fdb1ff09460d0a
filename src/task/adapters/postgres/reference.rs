//! `PostgreSQL` site and invoice directories and task-code sequence.

use super::{
    connection::{PgHandle, TaskPgPool},
    models::{InvoiceRow, NewTaskCodeSequenceRow, SiteRow},
    schema::{invoices, sites, task_code_sequences},
};
use crate::task::{
    domain::{Invoice, InvoiceId, Money, Site, SiteId},
    ports::{InvoiceRepository, RepositoryError, RepositoryResult, SiteRepository, TaskCodeSequence},
};
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed site directory.
#[derive(Debug, Clone)]
pub struct PostgresSiteRepository {
    handle: PgHandle,
}

impl PostgresSiteRepository {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

#[async_trait]
impl SiteRepository for PostgresSiteRepository {
    async fn find_by_id(&self, id: SiteId) -> RepositoryResult<Option<Site>> {
        self.handle
            .run_blocking(move |connection| {
                let row = sites::table
                    .filter(sites::id.eq(id.into_inner()))
                    .select(SiteRow::as_select())
                    .first::<SiteRow>(connection)
                    .optional()
                    .map_err(RepositoryError::persistence)?;
                row.map(row_to_site).transpose()
            })
            .await
    }
}

fn row_to_site(row: SiteRow) -> RepositoryResult<Site> {
    Site::new(SiteId::from_uuid(row.id), row.name).map_err(RepositoryError::persistence)
}

/// `PostgreSQL`-backed invoice directory.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceRepository {
    handle: PgHandle,
}

impl PostgresInvoiceRepository {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        self.handle
            .run_blocking(move |connection| {
                let row = invoices::table
                    .filter(invoices::id.eq(id.into_inner()))
                    .select(InvoiceRow::as_select())
                    .first::<InvoiceRow>(connection)
                    .optional()
                    .map_err(RepositoryError::persistence)?;
                row.map(row_to_invoice).transpose()
            })
            .await
    }
}

fn row_to_invoice(row: InvoiceRow) -> RepositoryResult<Invoice> {
    let InvoiceRow {
        id,
        site_id,
        invoice_number,
        total_amount,
        paid_amount,
    } = row;
    Invoice::new(
        InvoiceId::from_uuid(id),
        SiteId::from_uuid(site_id),
        invoice_number,
        Money::from_minor_units(total_amount),
        Money::from_minor_units(paid_amount),
    )
    .map_err(RepositoryError::persistence)
}

/// Per-site counter stored in `task_code_sequences`.
///
/// Each call is a single upsert, so concurrent callers never receive the
/// same value.
#[derive(Debug, Clone)]
pub struct PostgresTaskCodeSequence {
    handle: PgHandle,
}

impl PostgresTaskCodeSequence {
    /// Creates a new sequence from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            handle: PgHandle::new(pool),
        }
    }
}

#[async_trait]
impl TaskCodeSequence for PostgresTaskCodeSequence {
    async fn next_value(&self, site_id: SiteId) -> RepositoryResult<u32> {
        self.handle
            .run_blocking(move |connection| {
                let value = diesel::insert_into(task_code_sequences::table)
                    .values(&NewTaskCodeSequenceRow {
                        site_id: site_id.into_inner(),
                        last_value: 1,
                    })
                    .on_conflict(task_code_sequences::site_id)
                    .do_update()
                    .set(task_code_sequences::last_value.eq(task_code_sequences::last_value + 1))
                    .returning(task_code_sequences::last_value)
                    .get_result::<i32>(connection)
                    .map_err(RepositoryError::persistence)?;
                u32::try_from(value).map_err(RepositoryError::persistence)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::domain::TaskDomainError;

    #[test]
    fn invoice_row_converts_minor_units() {
        let row = InvoiceRow {
            id: uuid::Uuid::new_v4(),
            site_id: uuid::Uuid::new_v4(),
            invoice_number: "INV-2024-001".to_owned(),
            total_amount: 500_000,
            paid_amount: 150_000,
        };

        let invoice = row_to_invoice(row).expect("invoice");

        assert_eq!(invoice.number(), "INV-2024-001");
        assert_eq!(invoice.paid_amount(), Money::from_major_units(1_500));
    }

    #[test]
    fn blank_site_name_is_reported_as_persistence_error() {
        let row = SiteRow {
            id: uuid::Uuid::new_v4(),
            name: "  ".to_owned(),
        };

        let err = row_to_site(row).expect_err("blank name");

        assert!(matches!(err, RepositoryError::Persistence(_)));
        assert_eq!(
            err.to_string(),
            format!("persistence error: {}", TaskDomainError::EmptySiteName)
        );
    }
}
