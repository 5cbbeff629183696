//! TaskService - the facade the HTTP layer and the binary talk to.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::lifecycle::TaskLifecycle;
use super::scheduler::Scheduler;
use super::status::TaskCounts;
use crate::domain::{EngineError, Task};
use crate::ports::FileStorage;

pub struct TaskService {
    lifecycle: Arc<TaskLifecycle>,
    scheduler: Scheduler,
    storage: Arc<dyn FileStorage>,
    poll_interval: Duration,
}

impl TaskService {
    pub fn new(
        lifecycle: Arc<TaskLifecycle>,
        storage: Arc<dyn FileStorage>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            lifecycle,
            scheduler: Scheduler::new(),
            storage,
            poll_interval,
        }
    }

    pub async fn create_task(&self, urls: Vec<String>) -> Result<Task, EngineError> {
        self.lifecycle.create_task(urls).await
    }

    pub async fn get_task_status(&self, id: &str) -> Result<Task, EngineError> {
        self.lifecycle.get_task_status(id).await
    }

    /// Create the download directory. Startup aborts if this fails.
    pub async fn ensure_download_dir(&self) -> Result<(), EngineError> {
        self.storage
            .ensure_download_dir()
            .await
            .map_err(EngineError::Storage)?;
        info!(dir = %self.storage.download_dir().display(), "download directory ready");
        Ok(())
    }

    pub async fn recover_pending_tasks(&self) -> Result<usize, EngineError> {
        let recovered = self.lifecycle.recover_pending_tasks().await?;
        info!(recovered, "recovery pass finished");
        Ok(recovered)
    }

    pub async fn start_processing(&self) -> Result<(), EngineError> {
        self.scheduler
            .start(Arc::clone(&self.lifecycle), self.poll_interval)
            .await
    }

    /// Stop the scheduler and wait for it. An in-flight download finishes first;
    /// its task goes back to Pending.
    pub async fn stop_processing(&self) {
        self.scheduler.stop().await;
    }

    pub fn is_processing(&self) -> bool {
        self.scheduler.is_running()
    }

    pub async fn stats(&self) -> Result<TaskCounts, EngineError> {
        self.lifecycle.counts_by_status().await
    }
}
