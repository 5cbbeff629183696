//! TaskStore port - the source of truth for task state.
//!
//! Implementations hand out owned snapshots. Mutating a returned `Task` has no
//! effect until it goes back through `update`.

use async_trait::async_trait;

use crate::domain::{StoreError, Task, TaskId, TaskStatus};

/// Concurrency-safe mapping of task ID to task record.
///
/// # Contract
/// - Reads may run concurrently with reads, never with a write.
/// - Writes are mutually exclusive.
/// - `find_by_id` reports absence as `Ok(None)`, not as an error.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task. Fails with `DuplicateKey` if the ID is taken.
    async fn create(&self, task: Task) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError>;

    /// Replace the stored record and refresh its `updated_at`.
    ///
    /// Returns the record as stored. Fails with `NotFound` for an unknown ID.
    async fn update(&self, task: Task) -> Result<Task, StoreError>;

    /// Full snapshot, order unspecified.
    async fn find_all(&self) -> Result<Vec<Task>, StoreError>;

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError>;
}
