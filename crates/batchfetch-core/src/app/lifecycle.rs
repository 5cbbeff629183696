//! TaskLifecycle - creation, status queries and the per-task state machine.
//!
//! # Flow of one processing pass
//! 1. Pending -> Processing, persisted.
//! 2. For each URL in order: check shutdown, then download and record a `FileResult`.
//! 3. Completed (all saved) or Failed (any error), persisted once.
//!
//! A shutdown observed before a URL sends the task back to Pending with its
//! partial results discarded. The next run redoes it from the first URL, so
//! results never mix two attempts.
//!
//! If the terminal or revert write fails, the task is put back to Pending on a
//! best-effort basis. When even that write fails, its ID goes on a requeue
//! backlog that every tick retries before scanning, so a task is never left in
//! Processing without a live worker.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::status::TaskCounts;
use crate::domain::{EngineError, FileResult, Task, TaskId, TaskStatus};
use crate::ports::{Clock, Downloader, FileStorage, IdGenerator, TaskStore};

/// How a processing pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Every URL was attempted; carries the terminal status.
    Finished(TaskStatus),

    /// Shutdown was observed; the task is Pending again.
    Interrupted,
}

pub struct TaskLifecycle {
    store: Arc<dyn TaskStore>,
    downloader: Arc<dyn Downloader>,
    storage: Arc<dyn FileStorage>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    // Processing で取り残されたタスク (store 書き込み失敗)
    requeue_backlog: Mutex<HashSet<TaskId>>,
}

fn shutdown_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

impl TaskLifecycle {
    pub fn new(
        store: Arc<dyn TaskStore>,
        downloader: Arc<dyn Downloader>,
        storage: Arc<dyn FileStorage>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            downloader,
            storage,
            ids,
            clock,
            requeue_backlog: Mutex::new(HashSet::new()),
        }
    }

    /// Register a new Pending task. Only rejects an empty batch; URL syntax is
    /// the API layer's concern.
    pub async fn create_task(&self, urls: Vec<String>) -> Result<Task, EngineError> {
        if urls.is_empty() {
            return Err(EngineError::Validation(
                "at least one url is required".to_string(),
            ));
        }

        let task = Task::new(self.ids.generate_task_id(), urls, self.clock.now());
        self.store.create(task.clone()).await?;
        info!(task_id = %task.id, urls = task.urls.len(), "task created");
        Ok(task)
    }

    /// Current snapshot of a task. Unknown and malformed IDs are both `TaskNotFound`.
    pub async fn get_task_status(&self, id: &str) -> Result<Task, EngineError> {
        let Ok(task_id) = id.parse::<TaskId>() else {
            return Err(EngineError::TaskNotFound(id.to_string()));
        };
        self.store
            .find_by_id(&task_id)
            .await?
            .ok_or_else(|| EngineError::TaskNotFound(id.to_string()))
    }

    /// Drive one task through a full pass.
    ///
    /// Callers must guarantee that no other pass runs for the same task at the
    /// same time; the scheduler does so by being the only caller.
    pub async fn process_task(
        &self,
        mut task: Task,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ProcessOutcome, EngineError> {
        task.start_processing();
        let mut task = self.store.update(task).await?;
        let task_id = task.id;
        info!(%task_id, urls = task.urls.len(), "processing task");

        let dir = self.storage.download_dir();
        let urls = task.urls.clone();
        let mut results = Vec::with_capacity(urls.len());

        for url in &urls {
            if shutdown_requested(shutdown) {
                task.revert_to_pending();
                if let Err(e) = self.store.update(task.clone()).await {
                    error!(%task_id, error = %e, "failed to return interrupted task to pending");
                    self.requeue(task).await;
                    return Err(e.into());
                }
                info!(%task_id, "shutdown requested, task returned to pending");
                return Ok(ProcessOutcome::Interrupted);
            }

            let result = match self.downloader.fetch(url, dir).await {
                Ok(file_name) => {
                    debug!(%task_id, url = %url, file_name = %file_name, "downloaded");
                    FileResult::saved(url.as_str(), file_name)
                }
                Err(e) => {
                    warn!(%task_id, url = %url, error = %e, "download failed");
                    FileResult::failed(url.as_str(), e.to_string())
                }
            };
            results.push(result);
        }

        task.finish(results);
        let task = match self.store.update(task.clone()).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(%task_id, error = %e, "failed to persist finished task");
                self.requeue(task).await;
                return Err(e.into());
            }
        };
        info!(%task_id, status = %task.status, "task finished");
        Ok(ProcessOutcome::Finished(task.status))
    }

    /// Best-effort Processing -> Pending after a failed write. On failure the
    /// ID is parked on the backlog for the next tick.
    async fn requeue(&self, mut task: Task) {
        let task_id = task.id;
        task.revert_to_pending();
        match self.store.update(task).await {
            Ok(_) => warn!(%task_id, "task re-queued after failed write"),
            Err(e) => {
                error!(%task_id, error = %e, "re-queue failed, retrying next tick");
                self.park(task_id);
            }
        }
    }

    fn park(&self, task_id: TaskId) {
        if let Ok(mut backlog) = self.requeue_backlog.lock() {
            backlog.insert(task_id);
        }
    }

    /// Retry parked re-queues. Tasks that left Processing some other way
    /// (e.g. the recovery pass) are dropped from the backlog.
    async fn drain_requeue_backlog(&self) {
        let parked: Vec<TaskId> = match self.requeue_backlog.lock() {
            Ok(mut backlog) => backlog.drain().collect(),
            Err(_) => return,
        };

        for task_id in parked {
            match self.store.find_by_id(&task_id).await {
                Ok(Some(task)) if task.status == TaskStatus::Processing => {
                    self.requeue(task).await;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(%task_id, error = %e, "failed to load parked task");
                    self.park(task_id);
                }
            }
        }
    }

    /// One scheduler tick: attempt every task that is Pending right now, oldest
    /// first. Returns how many passes ran to completion.
    ///
    /// A failed scan means "no work this tick". Per-task failures are logged and
    /// the batch moves on.
    pub async fn process_pending_batch(&self, shutdown: &watch::Receiver<bool>) -> usize {
        self.drain_requeue_backlog().await;

        let mut pending = match self.store.find_by_status(TaskStatus::Pending).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "failed to scan pending tasks, skipping tick");
                return 0;
            }
        };
        if pending.is_empty() {
            return 0;
        }
        // ULID 順 = 作成順
        pending.sort_by_key(|t| t.id);
        debug!(count = pending.len(), "pending tasks found");

        let mut finished = 0;
        for task in pending {
            if shutdown_requested(shutdown) {
                debug!("shutdown requested, leaving rest of batch pending");
                break;
            }
            let task_id = task.id;
            match self.process_task(task, shutdown).await {
                Ok(ProcessOutcome::Finished(_)) => finished += 1,
                Ok(ProcessOutcome::Interrupted) => break,
                Err(e) => error!(%task_id, error = %e, "task processing failed"),
            }
        }
        finished
    }

    /// Reset every task stranded in Processing back to Pending. Run once at
    /// startup, before the scheduler. Returns how many tasks were reset.
    pub async fn recover_pending_tasks(&self) -> Result<usize, EngineError> {
        let stranded = self.store.find_by_status(TaskStatus::Processing).await?;

        let mut recovered = 0;
        for mut task in stranded {
            let task_id = task.id;
            task.revert_to_pending();
            match self.store.update(task).await {
                Ok(_) => {
                    info!(%task_id, "recovered stranded task");
                    recovered += 1;
                }
                Err(e) => error!(%task_id, error = %e, "failed to recover task"),
            }
        }
        Ok(recovered)
    }

    pub async fn counts_by_status(&self) -> Result<TaskCounts, EngineError> {
        let tasks = self.store.find_all().await?;
        Ok(TaskCounts::from_tasks(&tasks))
    }
}
