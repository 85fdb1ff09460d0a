//! `PostgreSQL` implementation of the audit log port.

use super::{
    models::{AuditEventRow, NewAuditEventRow},
    schema::audit_events,
};
use crate::audit::{
    domain::{AuditEvent, AuditQuery},
    ports::{AuditLog, AuditLogError, AuditLogResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by the audit adapter.
pub type AuditPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed audit log.
///
/// Appends never delete rows; [`AuditLog::compact`] trims the oldest rows
/// beyond the configured capacity.
#[derive(Debug, Clone)]
pub struct PostgresAuditLog {
    pool: AuditPgPool,
    capacity: usize,
}

impl PostgresAuditLog {
    /// Creates a log from a connection pool and a row capacity.
    #[must_use]
    pub const fn new(pool: AuditPgPool, capacity: usize) -> Self {
        Self { pool, capacity }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AuditLogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AuditLogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AuditLogError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AuditLogError::persistence)?
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn append(&self, event: AuditEvent) -> AuditLogResult<()> {
        let row = to_new_row(&event)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(audit_events::table)
                .values(&row)
                .execute(connection)
                .map_err(AuditLogError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn query(&self, query: &AuditQuery) -> AuditLogResult<Vec<AuditEvent>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = audit_events::table.into_boxed();
            if let Some(kind) = filter.entity_type {
                statement = statement.filter(audit_events::entity_type.eq(kind.as_str()));
            }
            if let Some(id) = filter.entity_id {
                statement = statement.filter(audit_events::entity_id.eq(id));
            }
            if let Some(actor) = filter.actor {
                statement = statement.filter(audit_events::actor.eq(String::from(actor)));
            }
            if let Some(site) = filter.site_id {
                statement = statement.filter(audit_events::site_id.eq(site));
            }
            if let Some(kind) = filter.event_type {
                statement = statement.filter(audit_events::event_type.eq(kind.as_str()));
            }
            if let Some(from) = filter.from {
                statement = statement.filter(audit_events::recorded_at.ge(from));
            }
            if let Some(until) = filter.until {
                statement = statement.filter(audit_events::recorded_at.lt(until));
            }
            if let Some(limit) = filter.limit {
                statement = statement.limit(i64::try_from(limit).unwrap_or(i64::MAX));
            }

            let rows = statement
                .order((audit_events::recorded_at.desc(), audit_events::seq.desc()))
                .select(AuditEventRow::as_select())
                .load::<AuditEventRow>(connection)
                .map_err(AuditLogError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> AuditLogResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(audit_events::table.filter(audit_events::recorded_at.lt(cutoff)))
                .execute(connection)
                .map_err(AuditLogError::persistence)
        })
        .await
    }

    async fn len(&self) -> AuditLogResult<usize> {
        self.run_blocking(|connection| {
            let count = audit_events::table
                .count()
                .get_result::<i64>(connection)
                .map_err(AuditLogError::persistence)?;
            usize::try_from(count).map_err(AuditLogError::persistence)
        })
        .await
    }

    async fn compact(&self) -> AuditLogResult<usize> {
        let keep = i64::try_from(self.capacity).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let overflow = audit_events::table
                .order((audit_events::recorded_at.desc(), audit_events::seq.desc()))
                .offset(keep)
                .select(audit_events::id)
                .load::<uuid::Uuid>(connection)
                .map_err(AuditLogError::persistence)?;
            if overflow.is_empty() {
                return Ok(0);
            }
            diesel::delete(audit_events::table.filter(audit_events::id.eq_any(overflow)))
                .execute(connection)
                .map_err(AuditLogError::persistence)
        })
        .await
    }
}

fn to_new_row(event: &AuditEvent) -> AuditLogResult<NewAuditEventRow> {
    let document = serde_json::to_value(event).map_err(AuditLogError::persistence)?;
    Ok(NewAuditEventRow {
        id: event.id().into_inner(),
        entity_type: event.entity_type().as_str().to_owned(),
        entity_id: event.entity_id(),
        actor: event.actor().as_str().to_owned(),
        site_id: event.site_id(),
        event_type: event.event_type().as_str().to_owned(),
        document,
        recorded_at: event.recorded_at(),
    })
}

fn row_to_event(row: AuditEventRow) -> AuditLogResult<AuditEvent> {
    serde_json::from_value(row.document).map_err(AuditLogError::persistence)
}
