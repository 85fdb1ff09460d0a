//! Task workflow service: construction, creation and field updates.

use super::{CreateTaskRequest, EntityRef, TaskWorkflowError, TaskWorkflowResult};
use crate::{
    actor::ActorId,
    audit::{
        domain::{AuditEntityType, AuditEvent, AuditEventType, changed_fields},
        ports::{AuditLog, AuditLogResult},
        services::{AuditTrail, RetentionReport},
    },
    config::WorkflowConfig,
    task::{
        domain::{ApprovalLevel, Task, TaskApproval, TaskCode, TaskId, TaskPatch, TaskStatus},
        ports::{
            InvoiceRepository, SiteRepository, TaskApprovalRepository, TaskCodeSequence,
            TaskInvoiceLinkRepository, TaskRepository, TaskUpdateRepository, TaskValidator,
        },
        validation::DefaultTaskValidator,
    },
};
use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Port handles the workflow service depends on.
#[derive(Clone)]
pub struct WorkflowPorts {
    /// Task store.
    pub tasks: Arc<dyn TaskRepository>,
    /// Progress update store.
    pub updates: Arc<dyn TaskUpdateRepository>,
    /// Approval store.
    pub approvals: Arc<dyn TaskApprovalRepository>,
    /// Invoice link store.
    pub invoice_links: Arc<dyn TaskInvoiceLinkRepository>,
    /// Invoice directory.
    pub invoices: Arc<dyn InvoiceRepository>,
    /// Site directory.
    pub sites: Arc<dyn SiteRepository>,
    /// Task-code sequence.
    pub sequence: Arc<dyn TaskCodeSequence>,
    /// Audit event store.
    pub audit_log: Arc<dyn AuditLog>,
}

/// Orchestrates task lifecycle, progress, approvals and invoicing.
///
/// The service is the only writer of task, update, approval and invoice link
/// records. Every successful mutation is followed by a best-effort audit
/// event; audit failures never undo the mutation.
pub struct TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    pub(super) ports: WorkflowPorts,
    pub(super) clock: Arc<C>,
    pub(super) validator: Arc<dyn TaskValidator>,
    pub(super) audit: AuditTrail<C>,
    purge_on_start: bool,
}

impl<C> Clone for TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            ports: self.ports.clone(),
            clock: Arc::clone(&self.clock),
            validator: Arc::clone(&self.validator),
            audit: self.audit.clone(),
            purge_on_start: self.purge_on_start,
        }
    }
}

impl<C> TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a service using the default validator configured from
    /// `config`.
    ///
    /// Audit capacity belongs to the log behind `ports`; build in-memory
    /// stores with [`InMemoryWorkflowStore::from_config`].
    ///
    /// [`InMemoryWorkflowStore::from_config`]: crate::task::adapters::memory::InMemoryWorkflowStore::from_config
    #[must_use]
    pub fn new(ports: WorkflowPorts, clock: Arc<C>, config: &WorkflowConfig) -> Self {
        let audit = AuditTrail::new(
            Arc::clone(&ports.audit_log),
            Arc::clone(&clock),
            &config.audit,
        );
        Self {
            ports,
            clock,
            validator: Arc::new(DefaultTaskValidator::with_config(config.validation.clone())),
            audit,
            purge_on_start: config.audit.purge_on_start,
        }
    }

    /// Replaces the validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn TaskValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Runs start-up housekeeping: purges expired audit events and compacts
    /// the audit log when configured to.
    ///
    /// # Errors
    ///
    /// Returns the audit log error when housekeeping fails.
    pub async fn start(&self) -> AuditLogResult<RetentionReport> {
        if !self.purge_on_start {
            return Ok(RetentionReport::default());
        }
        let report = self.audit.enforce_retention().await?;
        tracing::info!(
            expired = report.expired,
            compacted = report.compacted,
            "task workflow service started"
        );
        Ok(report)
    }

    /// Returns the audit trail for history queries.
    #[must_use]
    pub const fn audit_trail(&self) -> &AuditTrail<C> {
        &self.audit
    }

    /// Creates a task with a generated per-site code.
    ///
    /// Billable and high or critical priority tasks also receive one pending
    /// approval per level, created in level order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the site does not exist,
    /// [`TaskWorkflowError::Validation`] when the fields are invalid, or a
    /// repository error when persistence fails.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        actor: &ActorId,
    ) -> TaskWorkflowResult<Task> {
        let (site_id, fields) = request.into_parts();
        let site = self
            .ports
            .sites
            .find_by_id(site_id)
            .await?
            .ok_or_else(|| TaskWorkflowError::NotFound(EntityRef::Site(site_id)))?;
        self.validator.validate_task(&fields)?;

        let sequence = self.ports.sequence.next_value(site_id).await?;
        let code = TaskCode::generate(&site.initials(), sequence);
        let task = Task::new(site_id, code, fields, actor.clone(), &*self.clock)?;
        self.ports.tasks.store(&task).await?;
        tracing::debug!(task_id = %task.id(), code = %task.code(), "created task");

        let action = format!("Created task {}", task.code());
        self.audit
            .record(
                self.task_event(&task, actor, AuditEventType::Create, action)
                    .with_new_value(snapshot(&task))
                    .with_metadata("code", json!(task.code().as_str())),
            )
            .await;

        if task.requires_approval() {
            self.open_approvals(&task, actor).await?;
        }
        Ok(task)
    }

    async fn open_approvals(&self, task: &Task, actor: &ActorId) -> TaskWorkflowResult<()> {
        for level in ApprovalLevel::ALL {
            let approval = TaskApproval::pending(task.id(), level, &*self.clock);
            self.ports.approvals.store(&approval).await?;
            self.audit
                .record(
                    AuditEvent::new(
                        AuditEntityType::TaskApproval,
                        approval.id(),
                        actor.clone(),
                        AuditEventType::Create,
                        format!("Opened {level} approval for task {}", task.code()),
                        &*self.clock,
                    )
                    .with_site(task.site_id())
                    .with_new_value(snapshot(&approval))
                    .with_metadata("task_id", json!(task.id()))
                    .with_metadata("level", json!(level)),
                )
                .await;
        }
        tracing::debug!(task_id = %task.id(), "opened approval workflow");
        Ok(())
    }

    /// Applies a partial update to a task.
    ///
    /// Setting progress to 100 forces the status to completed and stamps the
    /// completion date when the patch does not supply one. An empty patch
    /// returns the task unchanged without writing or auditing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task does not exist,
    /// [`TaskWorkflowError::Validation`] when the merged fields are invalid,
    /// or a repository error when persistence fails.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        patch: &TaskPatch,
        actor: &ActorId,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.load_task(task_id).await?;
        if patch.is_empty() {
            return Ok(task);
        }

        let mut fields = task.fields();
        patch.apply_to(&mut fields);
        if patch.progress == Some(100) {
            fields.status = TaskStatus::Completed;
            if fields.actual_completion_date.is_none() {
                fields.actual_completion_date = Some(self.clock.utc());
            }
        }
        self.validator.validate_task(&fields)?;

        let before = snapshot(&task);
        task.apply_fields(fields, &*self.clock)?;
        self.ports.tasks.update(&task).await?;
        tracing::debug!(task_id = %task.id(), "updated task");

        let after = snapshot(&task);
        let changed = changed_fields(&before, &after);
        let action = format!("Updated task {}", task.code());
        self.audit
            .record(
                self.task_event(&task, actor, AuditEventType::Update, action)
                    .with_old_value(before)
                    .with_new_value(after)
                    .with_metadata("changed_fields", json!(changed)),
            )
            .await;
        Ok(task)
    }

    /// Loads a task or reports it missing.
    pub(super) async fn load_task(&self, task_id: TaskId) -> TaskWorkflowResult<Task> {
        self.ports
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskWorkflowError::NotFound(EntityRef::Task(task_id)))
    }

    /// Starts an audit event about a task.
    pub(super) fn task_event(
        &self,
        task: &Task,
        actor: &ActorId,
        event_type: AuditEventType,
        action: String,
    ) -> AuditEvent {
        AuditEvent::new(
            AuditEntityType::Task,
            task.id(),
            actor.clone(),
            event_type,
            action,
            &*self.clock,
        )
        .with_site(task.site_id())
    }
}

/// Serializes a record for an audit snapshot.
///
/// Records that fail to serialize are audited without a snapshot.
pub(super) fn snapshot<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to snapshot record for audit");
        Value::Null
    })
}
