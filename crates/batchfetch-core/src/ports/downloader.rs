//! Downloader port - transfers one URL into a directory.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::DownloadError;

/// Performs the byte transfer of one URL.
///
/// # Contract
/// - Returns the file name (relative to `destination_dir`) on success.
/// - Leaves no partial file behind on failure.
/// - Derives a collision-free name when the URL has no usable one.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<String, DownloadError>;
}
