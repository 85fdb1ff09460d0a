//! Invoice references and task-to-invoice links.

use super::{InvoiceId, Money, SiteId, TaskDomainError, TaskId, TaskInvoiceLinkId};
use crate::actor::ActorId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An invoice as seen by the workflow engine.
///
/// Invoices are owned by the finance collaborator; the engine reads the paid
/// amount when linking work to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    site_id: SiteId,
    number: String,
    total_amount: Money,
    paid_amount: Money,
}

impl Invoice {
    /// Creates an invoice reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyInvoiceNumber`] when the number is
    /// blank.
    pub fn new(
        id: InvoiceId,
        site_id: SiteId,
        number: impl Into<String>,
        total_amount: Money,
        paid_amount: Money,
    ) -> Result<Self, TaskDomainError> {
        let raw = number.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyInvoiceNumber);
        }
        Ok(Self {
            id,
            site_id,
            number: trimmed.to_owned(),
            total_amount,
            paid_amount,
        })
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the billed site.
    #[must_use]
    pub const fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// Returns the invoice number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the invoice total.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Returns the amount paid so far.
    #[must_use]
    pub const fn paid_amount(&self) -> Money {
        self.paid_amount
    }
}

/// Financial join between a task and an invoice.
///
/// The paid amount is a snapshot taken at link time and is not kept in sync
/// with later invoice payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInvoiceLink {
    id: TaskInvoiceLinkId,
    task_id: TaskId,
    invoice_id: InvoiceId,
    amount_billed: Money,
    amount_paid: Money,
    balance: Money,
    linked_by: ActorId,
    linked_at: DateTime<Utc>,
}

impl TaskInvoiceLink {
    /// Links billed work on a task to an invoice.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        invoice: &Invoice,
        amount_billed: Money,
        linked_by: ActorId,
        clock: &impl Clock,
    ) -> Self {
        let amount_paid = invoice.paid_amount();
        Self {
            id: TaskInvoiceLinkId::new(),
            task_id,
            invoice_id: invoice.id(),
            amount_billed,
            amount_paid,
            balance: amount_billed.saturating_sub(amount_paid),
            linked_by,
            linked_at: clock.utc(),
        }
    }

    /// Returns the link identifier.
    #[must_use]
    pub const fn id(&self) -> TaskInvoiceLinkId {
        self.id
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    /// Returns the amount billed for the task.
    #[must_use]
    pub const fn amount_billed(&self) -> Money {
        self.amount_billed
    }

    /// Returns the invoice's paid amount at link time.
    #[must_use]
    pub const fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    /// Returns `amount_billed - amount_paid`.
    #[must_use]
    pub const fn balance(&self) -> Money {
        self.balance
    }

    /// Returns the linking actor.
    #[must_use]
    pub const fn linked_by(&self) -> &ActorId {
        &self.linked_by
    }

    /// Returns the link timestamp.
    #[must_use]
    pub const fn linked_at(&self) -> DateTime<Utc> {
        self.linked_at
    }

    /// Returns `true` when the stored balance equals billed minus paid.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.balance == self.amount_billed.saturating_sub(self.amount_paid)
    }
}
