//! Progress update recording.

use super::{ProgressRecorded, TaskWorkflowResult, TaskWorkflowService, workflow::snapshot};
use crate::{
    audit::domain::{AuditEntityType, AuditEvent, AuditEventType},
    task::domain::{TaskUpdate, TaskUpdateDraft},
};
use mockable::Clock;
use serde_json::json;

impl<C> TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Records a progress delta against a task.
    ///
    /// The update is stored first, then the task takes the resulting
    /// progress. An explicit status change is applied next; reaching 100%
    /// forces the task to completed with a completion date of now, overriding
    /// any explicit status. A reported headcount replaces the task's
    /// manpower.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskWorkflowError::NotFound`] when the task does not
    /// exist, [`super::TaskWorkflowError::Validation`] when the note is blank
    /// or the resulting progress leaves `0..=100` (reported on `delta`), or a
    /// repository error when persistence fails.
    pub async fn add_task_update(
        &self,
        draft: TaskUpdateDraft,
    ) -> TaskWorkflowResult<ProgressRecorded> {
        let mut task = self.load_task(draft.task_id).await?;
        self.validator.validate_update(task.progress(), &draft)?;

        let actor = draft.entered_by.clone();
        let update = TaskUpdate::record(task.progress(), draft, &*self.clock);
        self.ports.updates.store(&update).await?;

        task.record_progress(
            update.progress_after(),
            update.status_change(),
            update.manpower(),
            &*self.clock,
        );
        self.ports.tasks.update(&task).await?;
        tracing::debug!(
            task_id = %task.id(),
            progress = %task.progress(),
            status = %task.status(),
            "recorded progress update"
        );

        self.audit
            .record(
                AuditEvent::new(
                    AuditEntityType::TaskUpdate,
                    update.id(),
                    actor,
                    AuditEventType::Create,
                    format!(
                        "Recorded progress {} -> {} on task {}",
                        update.progress_before(),
                        update.progress_after(),
                        task.code()
                    ),
                    &*self.clock,
                )
                .with_site(task.site_id())
                .with_new_value(snapshot(&update))
                .with_metadata("task_id", json!(task.id()))
                .with_metadata("delta", json!(update.delta())),
            )
            .await;

        Ok(ProgressRecorded { update, task })
    }
}
