use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use batchfetch_core::app::EngineConfig;
use clap::Parser;

/// Batch URL download service
#[derive(Parser, Debug, Clone)]
#[command(name = "batchfetch")]
#[command(version)]
#[command(about = "Accepts batches of URLs over HTTP and downloads them in the background", long_about = None)]
pub struct Config {
    /// Address the HTTP API listens on
    #[arg(long, env = "BATCHFETCH_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Directory downloaded files are written to
    #[arg(long, env = "BATCHFETCH_DOWNLOAD_DIR", value_name = "DIR")]
    #[arg(default_value = batchfetch_core::app::DEFAULT_DOWNLOAD_DIR)]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub download_dir: PathBuf,

    /// Seconds between scheduler ticks
    #[arg(long, env = "BATCHFETCH_POLL_INTERVAL_SECS", value_name = "SECS", default_value_t = 5)]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_secs: u64,

    /// Per-request timeout for downloads, in seconds
    #[arg(long, env = "BATCHFETCH_REQUEST_TIMEOUT_SECS", value_name = "SECS", default_value_t = 1800)]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Persist tasks to this JSON file. In-memory only when omitted.
    #[arg(long, env = "BATCHFETCH_STATE_FILE", value_name = "FILE")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub state_file: Option<PathBuf>,
}

impl Config {
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            download_dir: self.download_dir.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
