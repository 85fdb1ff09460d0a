//! Archiving and restoring tasks.

use super::{TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService};
use crate::{
    actor::ActorId,
    audit::domain::AuditEventType,
    task::domain::{Task, TaskId},
};
use mockable::Clock;
use serde_json::json;

impl<C> TaskWorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Hides a task from default listings.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task does not exist,
    /// [`TaskWorkflowError::StateConflict`] when it is already archived, or a
    /// repository error when persistence fails.
    pub async fn archive_task(&self, task_id: TaskId, actor: &ActorId) -> TaskWorkflowResult<Task> {
        self.set_archived(task_id, true, actor).await
    }

    /// Returns an archived task to default listings.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task does not exist,
    /// [`TaskWorkflowError::StateConflict`] when it is not archived, or a
    /// repository error when persistence fails.
    pub async fn restore_task(&self, task_id: TaskId, actor: &ActorId) -> TaskWorkflowResult<Task> {
        self.set_archived(task_id, false, actor).await
    }

    async fn set_archived(
        &self,
        task_id: TaskId,
        archived: bool,
        actor: &ActorId,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.load_task(task_id).await?;
        if task.is_archived() == archived {
            let reason = if archived {
                "is already archived"
            } else {
                "is not archived"
            };
            return Err(TaskWorkflowError::StateConflict {
                task_id,
                reason: reason.to_owned(),
            });
        }

        task.set_archived(archived, &*self.clock);
        self.ports.tasks.update(&task).await?;
        tracing::debug!(%task_id, archived, "changed task archive flag");

        let (event_type, verb) = if archived {
            (AuditEventType::Archive, "Archived")
        } else {
            (AuditEventType::Restore, "Restored")
        };
        let action = format!("{verb} task {}", task.code());
        self.audit
            .record(
                self.task_event(&task, actor, event_type, action)
                    .with_old_value(json!({ "archived": !archived }))
                    .with_new_value(json!({ "archived": archived })),
            )
            .await;
        Ok(task)
    }
}
