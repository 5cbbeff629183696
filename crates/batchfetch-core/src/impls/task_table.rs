//! The map both task stores keep behind their lock.
//!
//! All methods are synchronous and assume the caller holds the store's lock,
//! so no `.await` ever happens while the table is borrowed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{StoreError, Task, TaskId, TaskStatus};

#[derive(Debug, Clone, Default)]
pub(crate) struct TaskTable {
    tasks: HashMap<TaskId, Task>,
}

impl TaskTable {
    pub(crate) fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub(crate) fn insert(&mut self, task: Task) -> Result<(), StoreError> {
        if self.tasks.contains_key(&task.id) {
            return Err(StoreError::DuplicateKey(task.id));
        }
        self.tasks.insert(task.id, task);
        Ok(())
    }

    pub(crate) fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.get(id).cloned()
    }

    pub(crate) fn replace(&mut self, mut task: Task, now: DateTime<Utc>) -> Result<Task, StoreError> {
        let slot = self
            .tasks
            .get_mut(&task.id)
            .ok_or(StoreError::NotFound(task.id))?;
        task.updated_at = now;
        *slot = task.clone();
        Ok(task)
    }

    pub(crate) fn all(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub(crate) fn with_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }
}
