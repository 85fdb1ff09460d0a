//! Per-level approval decisions and approval queries.

use super::{
    EntityRef, TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService, workflow::snapshot,
};
use crate::{
    actor::ActorId,
    audit::domain::{AuditEntityType, AuditEvent, AuditEventType},
    task::domain::{ApprovalDecision, ApprovalLevel, ApprovalSummary, TaskApproval, TaskId},
};
use mockable::Clock;
use serde_json::json;

impl<C> TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Records a decision on one approval level of a task.
    ///
    /// Levels are decided independently: earlier levels need not be resolved
    /// first, and a later decision replaces an earlier one on the same level.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task has no approval
    /// for `level`, or a repository error when persistence fails. No audit
    /// event is written on failure.
    pub async fn approve_task(
        &self,
        task_id: TaskId,
        level: ApprovalLevel,
        decision: ApprovalDecision,
        actor: &ActorId,
        remark: Option<String>,
    ) -> TaskWorkflowResult<TaskApproval> {
        let mut approval = self
            .ports
            .approvals
            .find_by_task_and_level(task_id, level)
            .await?
            .ok_or_else(|| TaskWorkflowError::NotFound(EntityRef::Approval { task_id, level }))?;

        let before = snapshot(&approval);
        approval.decide(decision, actor.clone(), remark, &*self.clock);
        self.ports.approvals.update(&approval).await?;
        tracing::debug!(
            %task_id,
            %level,
            status = %approval.status(),
            "recorded approval decision"
        );

        let (event_type, verb) = match decision {
            ApprovalDecision::Approved => (AuditEventType::Approved, "Approved"),
            ApprovalDecision::Rejected => (AuditEventType::Rejected, "Rejected"),
        };
        let mut event = AuditEvent::new(
            AuditEntityType::TaskApproval,
            approval.id(),
            actor.clone(),
            event_type,
            format!("{verb} {level} approval for task {task_id}"),
            &*self.clock,
        )
        .with_old_value(before)
        .with_new_value(snapshot(&approval))
        .with_metadata("task_id", json!(task_id))
        .with_metadata("level", json!(level));
        if let Some(site_id) = self.site_of(task_id).await {
            event = event.with_site(site_id);
        }
        self.audit.record(event).await;

        Ok(approval)
    }

    /// Returns a task's approvals in level order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task does not exist,
    /// or a repository error when the lookup fails.
    pub async fn get_task_approvals(
        &self,
        task_id: TaskId,
    ) -> TaskWorkflowResult<Vec<TaskApproval>> {
        self.load_task(task_id).await?;
        Ok(self.ports.approvals.find_by_task(task_id).await?)
    }

    /// Summarises a task's approval state.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`TaskWorkflowService::get_task_approvals`].
    pub async fn approval_summary(
        &self,
        task_id: TaskId,
    ) -> TaskWorkflowResult<ApprovalSummary> {
        let approvals = self.get_task_approvals(task_id).await?;
        Ok(ApprovalSummary::from_approvals(&approvals))
    }

    /// Looks up a task's site for audit attribution, ignoring failures.
    async fn site_of(&self, task_id: TaskId) -> Option<uuid::Uuid> {
        match self.ports.tasks.find_by_id(task_id).await {
            Ok(task) => task.map(|found| found.site_id().into_inner()),
            Err(err) => {
                tracing::warn!(%task_id, error = %err, "could not resolve task site for audit");
                None
            }
        }
    }
}
