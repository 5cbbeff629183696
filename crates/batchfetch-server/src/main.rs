use std::sync::Arc;

use anyhow::Context;
use batchfetch_core::app::TaskServiceBuilder;
use batchfetch_core::impls::{FileTaskStore, HttpDownloader, InMemoryTaskStore};
use batchfetch_core::ports::TaskStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // RUST_LOG wins; otherwise info for us, warn for the HTTP stack
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn")),
        )
        .init();

    let store: Arc<dyn TaskStore> = match &config.state_file {
        Some(path) => {
            let store = FileTaskStore::open(path)
                .await
                .with_context(|| format!("failed to open state file {}", path.display()))?;
            info!(path = %path.display(), "using file-backed task store");
            Arc::new(store)
        }
        None => {
            info!("using in-memory task store");
            Arc::new(InMemoryTaskStore::new())
        }
    };
    let downloader =
        HttpDownloader::new(config.request_timeout()).context("failed to build HTTP client")?;

    let service = TaskServiceBuilder::new(config.engine())
        .store(store)
        .downloader(Arc::new(downloader))
        .build()
        .context("invalid service configuration")?;
    let service = Arc::new(service);

    service
        .ensure_download_dir()
        .await
        .context("failed to prepare download directory")?;

    if let Err(e) = service.recover_pending_tasks().await {
        warn!(error = %e, "recovery pass failed, stranded tasks stay in processing");
    }
    service
        .start_processing()
        .await
        .context("failed to start scheduler")?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "listening");

    let served = axum::serve(listener, api::router(Arc::clone(&service)))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("shutting down, waiting for scheduler");
    service.stop_processing().await;
    info!("bye");

    served.context("HTTP server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
