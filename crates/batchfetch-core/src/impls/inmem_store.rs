//! InMemoryTaskStore - process-lifetime task store.
//!
//! One `RwLock` guards the whole map. Task counts are modest and every
//! operation is a point lookup or a linear scan, so the coarse lock is enough.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::task_table::TaskTable;
use crate::domain::{StoreError, Task, TaskId, TaskStatus};
use crate::ports::{Clock, SystemClock, TaskStore};

pub struct InMemoryTaskStore {
    table: RwLock<TaskTable>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(TaskTable::default()),
            clock,
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: Task) -> Result<(), StoreError> {
        self.table.write().await.insert(task)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.table.read().await.get(id))
    }

    async fn update(&self, task: Task) -> Result<Task, StoreError> {
        let now = self.clock.now();
        self.table.write().await.replace(task, now)
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.table.read().await.all())
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        Ok(self.table.read().await.with_status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileResult;
    use crate::ports::FixedClock;
    use chrono::{Duration, TimeZone, Utc};
    use ulid::Ulid;

    fn new_task(url: &str) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task::new(TaskId::from_ulid(Ulid::new()), vec![url.to_string()], created)
    }

    #[tokio::test]
    async fn create_then_find_by_id() {
        let store = InMemoryTaskStore::new();
        let task = new_task("http://x/a.txt");
        store.create(task.clone()).await.unwrap();

        let found = store.find_by_id(&task.id).await.unwrap();
        assert_eq!(found, Some(task));
    }

    #[tokio::test]
    async fn find_by_id_reports_absence_as_none() {
        let store = InMemoryTaskStore::new();
        let missing = TaskId::from_ulid(Ulid::new());
        assert!(store.find_by_id(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = InMemoryTaskStore::new();
        let task = new_task("http://x/a.txt");
        store.create(task.clone()).await.unwrap();

        let err = store.create(task.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(id) if id == task.id));
    }

    #[tokio::test]
    async fn update_refreshes_timestamp() {
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(1);
        let store = InMemoryTaskStore::with_clock(Arc::new(FixedClock::new(later)));
        let task = new_task("http://x/a.txt");
        store.create(task.clone()).await.unwrap();

        let mut changed = task.clone();
        changed.start_processing();
        let stored = store.update(changed).await.unwrap();

        assert_eq!(stored.status, TaskStatus::Processing);
        assert_eq!(stored.updated_at, later);
        assert_eq!(stored.created_at, task.created_at);
        let found = store.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(found, stored);
    }

    #[tokio::test]
    async fn update_unknown_task_is_not_found() {
        let store = InMemoryTaskStore::new();
        let task = new_task("http://x/a.txt");
        let err = store.update(task.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == task.id));
    }

    #[tokio::test]
    async fn returned_snapshots_are_detached() {
        let store = InMemoryTaskStore::new();
        let task = new_task("http://x/a.txt");
        store.create(task.clone()).await.unwrap();

        let mut snapshot = store.find_by_id(&task.id).await.unwrap().unwrap();
        snapshot.start_processing();
        snapshot.finish(vec![FileResult::saved("http://x/a.txt", "a.txt")]);

        let stored = store.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Pending);
        assert!(stored.results.is_empty());
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let store = InMemoryTaskStore::new();
        let a = new_task("http://x/a.txt");
        let mut b = new_task("http://x/b.txt");
        store.create(a.clone()).await.unwrap();
        store.create(b.clone()).await.unwrap();
        b.start_processing();
        store.update(b.clone()).await.unwrap();

        let pending = store.find_by_status(TaskStatus::Pending).await.unwrap();
        let processing = store.find_by_status(TaskStatus::Processing).await.unwrap();
        assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a.id]);
        assert_eq!(processing.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b.id]);
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_creates_all_land() {
        let store = Arc::new(InMemoryTaskStore::new());
        let mut joins = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            joins.push(tokio::spawn(async move {
                store.create(new_task(&format!("http://x/{i}"))).await
            }));
        }
        for j in joins {
            j.await.unwrap().unwrap();
        }
        assert_eq!(store.find_all().await.unwrap().len(), 32);
    }
}
