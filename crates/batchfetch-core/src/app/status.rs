//! Status - ステータス集計
//!
//! Per-status task counts, reported by the health endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            counts.record(task.status);
        }
        counts
    }

    fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Processing => self.processing += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.processing + self.completed + self.failed
    }
}
