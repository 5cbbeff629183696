//! TaskServiceBuilder - サービスの構築とワイヤリング
//!
//! Every port except the downloader has a default, so a binary only wires
//! what it wants to swap out:
//!
//! ```ignore
//! let service = TaskServiceBuilder::new(config)
//!     .store(Arc::new(FileTaskStore::open("state.json").await?))
//!     .downloader(Arc::new(HttpDownloader::new(timeout)?))
//!     .build()?;
//! ```
//!
//! `build()` validates the wiring up front (fail-fast) so a bad config never
//! reaches the scheduler.

use std::sync::Arc;

use super::config::EngineConfig;
use super::lifecycle::TaskLifecycle;
use super::service::TaskService;
use crate::impls::{InMemoryTaskStore, LocalFileStorage};
use crate::ports::{Clock, Downloader, FileStorage, IdGenerator, SystemClock, TaskStore, UlidGenerator};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no downloader configured")]
    MissingDownloader,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

pub struct TaskServiceBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn TaskStore>>,
    downloader: Option<Arc<dyn Downloader>>,
    storage: Option<Arc<dyn FileStorage>>,
    ids: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
}

impl TaskServiceBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            store: None,
            downloader: None,
            storage: None,
            ids: None,
            clock: None,
        }
    }

    /// Defaults to `InMemoryTaskStore`.
    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn downloader(mut self, downloader: Arc<dyn Downloader>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Defaults to `LocalFileStorage` over `EngineConfig::download_dir`.
    pub fn storage(mut self, storage: Arc<dyn FileStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<TaskService, BuildError> {
        if self.config.poll_interval.is_zero() {
            return Err(BuildError::ZeroPollInterval);
        }
        let downloader = self.downloader.ok_or(BuildError::MissingDownloader)?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryTaskStore::with_clock(Arc::clone(&clock))));
        let storage = self.storage.unwrap_or_else(|| {
            Arc::new(LocalFileStorage::new(self.config.download_dir.clone()))
        });
        // ID の timestamp と created_at を同じ clock から取る
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));

        let lifecycle = TaskLifecycle::new(store, downloader, Arc::clone(&storage), ids, clock);
        Ok(TaskService::new(
            Arc::new(lifecycle),
            storage,
            self.config.poll_interval,
        ))
    }
}
