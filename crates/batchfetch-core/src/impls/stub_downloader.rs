//! StubDownloader - scripted download executor for tests and local runs.
//!
//! Every URL succeeds with its derived file name unless it was scripted to
//! fail with a status line. Nothing is written to disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use super::http_downloader::file_name_from_url;
use crate::domain::DownloadError;
use crate::ports::Downloader;

#[derive(Default)]
pub struct StubDownloader {
    failures: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StubDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `url` fail with `bad status: <status>`.
    pub fn fail_with_status(mut self, url: impl Into<String>, status: impl Into<String>) -> Self {
        self.failures.insert(url.into(), status.into());
        self
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Downloader for StubDownloader {
    async fn fetch(&self, url: &str, _destination_dir: &Path) -> Result<String, DownloadError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        if let Some(status) = self.failures.get(url) {
            return Err(DownloadError::BadStatus(status.clone()));
        }
        file_name_from_url(url).ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))
    }
}
