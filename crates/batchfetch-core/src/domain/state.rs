//! Task lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a download task.
///
/// State transitions:
/// - Pending -> Processing -> Completed
/// - Pending -> Processing -> Failed
/// - Pending -> Processing -> Pending (interrupted by shutdown, or reset by recovery)
///
/// `Processing` only ever means "a live worker is driving this task right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting for the scheduler.
    Pending,

    /// Currently being downloaded by the scheduler.
    Processing,

    /// Every URL was downloaded.
    Completed,

    /// At least one URL failed.
    Failed,
}

impl TaskStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending(TaskStatus::Pending, false)]
    #[case::processing(TaskStatus::Processing, false)]
    #[case::completed(TaskStatus::Completed, true)]
    #[case::failed(TaskStatus::Failed, true)]
    fn terminal_states(#[case] status: TaskStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }
}
