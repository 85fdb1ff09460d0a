//! Linking billed task work to invoices.

use super::{
    EntityRef, TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService, workflow::snapshot,
};
use crate::{
    actor::ActorId,
    audit::domain::{AuditEntityType, AuditEvent, AuditEventType},
    task::domain::{InvoiceId, Money, TaskId, TaskInvoiceLink},
};
use mockable::Clock;
use serde_json::json;

impl<C> TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Bills work on a task against an invoice.
    ///
    /// The invoice's paid amount is captured at link time and is not kept in
    /// sync afterwards. The billed amount is added to the task's cost to
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task or invoice does
    /// not exist, [`TaskWorkflowError::Validation`] when the amount is not
    /// positive, or a repository error when persistence fails.
    pub async fn link_task_to_invoice(
        &self,
        task_id: TaskId,
        invoice_id: InvoiceId,
        amount_billed: Money,
        actor: &ActorId,
    ) -> TaskWorkflowResult<TaskInvoiceLink> {
        let mut task = self.load_task(task_id).await?;
        let invoice = self
            .ports
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| TaskWorkflowError::NotFound(EntityRef::Invoice(invoice_id)))?;
        self.validator.validate_invoice_link(amount_billed)?;

        let link = TaskInvoiceLink::new(
            task_id,
            &invoice,
            amount_billed,
            actor.clone(),
            &*self.clock,
        );
        self.ports.invoice_links.store(&link).await?;
        task.add_cost(amount_billed, &*self.clock);
        self.ports.tasks.update(&task).await?;
        tracing::debug!(
            %task_id,
            %invoice_id,
            amount_billed = %amount_billed,
            balance = %link.balance(),
            "linked task to invoice"
        );

        self.audit
            .record(
                AuditEvent::new(
                    AuditEntityType::TaskInvoiceLink,
                    link.id(),
                    actor.clone(),
                    AuditEventType::Create,
                    format!(
                        "Linked task {} to invoice {}",
                        task.code(),
                        invoice.number()
                    ),
                    &*self.clock,
                )
                .with_site(task.site_id())
                .with_new_value(snapshot(&link))
                .with_metadata("task_id", json!(task_id))
                .with_metadata("invoice_id", json!(invoice_id))
                .with_metadata("cost_to_date", json!(task.cost_to_date())),
            )
            .await;

        Ok(link)
    }
}
