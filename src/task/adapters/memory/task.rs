//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::task::{
    domain::{EntityKind, SiteId, Task, TaskCode, TaskId, TaskQuery},
    ports::{RepositoryError, RepositoryResult, TaskRepository},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    code_index: HashMap<(SiteId, TaskCode), TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_by_site_and_code(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        (left.site_id(), left.code()).cmp(&(right.site_id(), right.code()))
    });
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(RepositoryError::duplicate(EntityKind::Task, task.id()));
        }

        let code_key = (task.site_id(), task.code().clone());
        if state.code_index.contains_key(&code_key) {
            return Err(RepositoryError::DuplicateTaskCode {
                site_id: task.site_id(),
                code: task.code().clone(),
            });
        }

        state.code_index.insert(code_key, task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let existing = state
            .tasks
            .get_mut(&task.id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Task, task.id()))?;
        existing.clone_from(task);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_code(
        &self,
        site_id: SiteId,
        code: &TaskCode,
    ) -> RepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let task = state
            .code_index
            .get(&(site_id, code.clone()))
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn search(&self, query: &TaskQuery) -> RepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        sort_by_site_and_code(&mut tasks);
        Ok(tasks)
    }
}
