use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Engine settings that are not tied to a particular adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Where downloaded files are written.
    pub download_dir: PathBuf,

    /// Time between scheduler ticks.
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
