use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ports::FileStorage;

/// Download directory on the local filesystem.
pub struct LocalFileStorage {
    download_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn ensure_download_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.download_dir).await
    }

    fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}
