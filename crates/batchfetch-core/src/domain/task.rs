//! Task record: the batch of URLs plus its lifecycle state and per-URL results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TaskId, TaskStatus};

/// Outcome of downloading one URL. Exactly one of file name / error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Saved { file_name: String },
    Failed { error: String },
}

/// Per-URL result, appended once while a task is processed and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    pub url: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileResult {
    pub fn saved(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: FileOutcome::Saved {
                file_name: file_name.into(),
            },
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: FileOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FileOutcome::Saved { .. })
    }

    pub fn file_name(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Saved { file_name } => Some(file_name),
            FileOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Saved { .. } => None,
            FileOutcome::Failed { error } => Some(error),
        }
    }
}

/// A batch download request tracked as one unit.
///
/// Invariants:
/// - `results` is empty while `Pending`.
/// - `results.len() == urls.len()` once `Completed` or `Failed`.
///
/// The store owns the persisted copy; anything else holds a snapshot and must
/// write it back through `TaskStore::update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub urls: Vec<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FileResult>,
}

impl Task {
    pub fn new(id: TaskId, urls: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            urls,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            results: Vec::new(),
        }
    }

    /// Pending -> Processing.
    pub fn start_processing(&mut self) {
        self.status = TaskStatus::Processing;
        self.results.clear();
    }

    /// Back to Pending, discarding partial results so the next run starts from scratch.
    pub fn revert_to_pending(&mut self) {
        self.status = TaskStatus::Pending;
        self.results.clear();
    }

    /// Record the results of a full pass and move to the matching terminal state.
    pub fn finish(&mut self, results: Vec<FileResult>) {
        debug_assert_eq!(results.len(), self.urls.len());
        self.status = if results.iter().all(FileResult::is_success) {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed
        };
        self.results = results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn task(urls: &[&str]) -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            urls.iter().map(|u| u.to_string()).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn new_task_is_pending_without_results() {
        let t = task(&["http://x/a.txt"]);
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.results.is_empty());
        assert_eq!(t.created_at, t.updated_at);
    }

    #[test]
    fn finish_all_saved_completes() {
        let mut t = task(&["http://x/a.txt", "http://x/b.txt"]);
        t.start_processing();
        t.finish(vec![
            FileResult::saved("http://x/a.txt", "a.txt"),
            FileResult::saved("http://x/b.txt", "b.txt"),
        ]);
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.results.len(), 2);
    }

    #[test]
    fn finish_with_any_error_fails() {
        let mut t = task(&["http://x/a.txt", "http://x/b.txt"]);
        t.start_processing();
        t.finish(vec![
            FileResult::saved("http://x/a.txt", "a.txt"),
            FileResult::failed("http://x/b.txt", "bad status: 404 Not Found"),
        ]);
        assert_eq!(t.status, TaskStatus::Failed);
    }

    #[test]
    fn revert_clears_partial_results() {
        let mut t = task(&["http://x/a.txt", "http://x/b.txt"]);
        t.start_processing();
        t.results.push(FileResult::saved("http://x/a.txt", "a.txt"));
        t.revert_to_pending();
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.results.is_empty());
    }

    #[test]
    fn file_result_wire_shape() {
        let ok = serde_json::to_value(FileResult::saved("http://x/a.txt", "a.txt")).unwrap();
        assert_eq!(ok, serde_json::json!({"url": "http://x/a.txt", "file_name": "a.txt"}));

        let err = serde_json::to_value(FileResult::failed("http://x/b.txt", "boom")).unwrap();
        assert_eq!(err, serde_json::json!({"url": "http://x/b.txt", "error": "boom"}));

        let back: FileResult = serde_json::from_value(err).unwrap();
        assert_eq!(back.error(), Some("boom"));
        assert_eq!(back.file_name(), None);
    }

    #[test]
    fn pending_task_omits_results() {
        let t = task(&["http://x/a.txt"]);
        let v = serde_json::to_value(&t).unwrap();
        assert!(v.get("results").is_none());
        assert_eq!(v["status"], "pending");
    }
}
