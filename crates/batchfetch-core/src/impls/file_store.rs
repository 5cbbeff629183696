//! FileTaskStore - task store that survives restarts.
//!
//! Same table as the in-memory store, plus a JSON snapshot on disk rewritten
//! after every mutation. The snapshot is written to a sibling temp file and
//! renamed over the old one, so a crash mid-write leaves the previous snapshot
//! intact. Tasks stranded in `Processing` by a crash are reset by the
//! recovery pass on the next start.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::task_table::TaskTable;
use crate::domain::{StoreError, Task, TaskId, TaskStatus};
use crate::ports::{Clock, SystemClock, TaskStore};

pub struct FileTaskStore {
    table: RwLock<TaskTable>,
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileTaskStore {
    /// Load the snapshot at `path`, or start empty if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    pub async fn open_with_clock(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks: Vec<Task> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), tasks = tasks.len(), "opened task state file");

        Ok(Self {
            table: RwLock::new(TaskTable::from_tasks(tasks)),
            path,
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &TaskTable) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&table.all())?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "task state persisted");
        Ok(())
    }

    /// Apply `op` and persist; on a persistence failure the table is rolled back
    /// so memory never runs ahead of disk.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut TaskTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut table = self.table.write().await;
        let before = table.clone();
        let out = op(&mut *table)?;
        if let Err(e) = self.persist(&*table).await {
            *table = before;
            return Err(e);
        }
        Ok(out)
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn create(&self, task: Task) -> Result<(), StoreError> {
        self.mutate(|table| table.insert(task)).await
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.table.read().await.get(id))
    }

    async fn update(&self, task: Task) -> Result<Task, StoreError> {
        let now = self.clock.now();
        self.mutate(|table| table.replace(task, now)).await
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.table.read().await.all())
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        Ok(self.table.read().await.with_status(status))
    }
}
