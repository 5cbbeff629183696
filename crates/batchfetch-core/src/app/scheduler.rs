//! Scheduler - 定期実行ループ
//!
//! One background loop: every `interval` it hands the current Pending tasks to
//! `TaskLifecycle::process_pending_batch`, one after another. A single loop
//! means a task is never driven by two workers at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::lifecycle::TaskLifecycle;
use crate::domain::EngineError;

/// Scheduler handle.
/// - `request_shutdown()` は新しいタスクの開始を止めるだけ (実行中の download は待つ)
/// - `stop()` で loop の終了まで待てる
pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    join: Mutex<Option<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            join: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the loop. The first tick fires one `interval` after start.
    pub async fn start(
        &self,
        lifecycle: Arc<TaskLifecycle>,
        interval: Duration,
    ) -> Result<(), EngineError> {
        let mut join = self.join.lock().await;
        if join.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        // a previous stop() left `true` behind
        self.shutdown_tx.send_replace(false);
        let shutdown_rx = self.shutdown_tx.subscribe();

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        *join = Some(tokio::spawn(async move {
            scheduler_loop(lifecycle, interval, shutdown_rx).await;
            running.store(false, Ordering::SeqCst);
        }));
        Ok(())
    }

    /// Signal the loop to stop without waiting for it.
    pub fn request_shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Signal the loop and wait until it has exited. The in-flight download, if
    /// any, runs to completion first. No-op when not started.
    ///
    /// The join lock is held until the loop is gone, so a concurrent `start()`
    /// waits here instead of clearing the signal under a live loop.
    pub async fn stop(&self) {
        let mut join = self.join.lock().await;
        self.request_shutdown();
        if let Some(handle) = join.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "scheduler task did not exit cleanly");
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn scheduler_loop(
    lifecycle: Arc<TaskLifecycle>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(interval_ms = period.as_millis() as u64, "scheduler started");

    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    // 処理が interval を超えても tick をまとめて撃たない
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped = Scheduler dropped
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let finished = lifecycle.process_pending_batch(&shutdown_rx).await;
        if finished > 0 {
            debug!(finished, "tick finished tasks");
        }
    }

    info!("scheduler stopped");
}
