//! FileStorage port - where downloaded files land.

use async_trait::async_trait;
use std::io;
use std::path::Path;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Create the download directory if missing. Failing here is fatal at startup.
    async fn ensure_download_dir(&self) -> io::Result<()>;

    fn download_dir(&self) -> &Path;
}
