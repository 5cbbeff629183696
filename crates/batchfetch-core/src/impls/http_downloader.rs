//! HttpDownloader - reqwest backed download executor.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use crate::domain::DownloadError;
use crate::ports::Downloader;

/// Default per-request timeout; large files on slow links need the headroom.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DownloadError::Request(e.to_string()))?;
        Ok(Self { client })
    }

    async fn write_body(
        file: &mut tokio::fs::File,
        response: reqwest::Response,
    ) -> Result<(), DownloadError> {
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::SaveFile(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::SaveFile(e.to_string()))?;
        }
        file.flush()
            .await
            .map_err(|e| DownloadError::SaveFile(e.to_string()))
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<String, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::BadStatus(status.to_string()));
        }

        let file_name = file_name_from_url(url).unwrap_or_else(fallback_file_name);
        let path = destination_dir.join(&file_name);
        debug!(url, path = %path.display(), "writing download");

        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(DownloadError::CreateFile)?;

        if let Err(e) = Self::write_body(&mut file, response).await {
            drop(file);
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %rm, "failed to remove partial download");
            }
            return Err(e);
        }

        Ok(file_name)
    }
}

/// Last path segment of the URL, if it is usable as a file name.
///
/// URLs with a query string are rejected: the segment alone would not
/// identify the resource.
///
/// The name ignores host and parent path, so `http://a/x.txt` and
/// `http://b/x.txt` both map to `x.txt` and the later download overwrites the
/// earlier file. Only the generated fallback names are unique.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if parsed.query().is_some() {
        return None;
    }
    let segment = parsed.path_segments()?.next_back()?;
    match segment {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

fn fallback_file_name() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("download_{nanos}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("http://x/a.txt", Some("a.txt"))]
    #[case::nested("https://example.com/files/2024/report.pdf", Some("report.pdf"))]
    #[case::trailing_slash("http://x/dir/", None)]
    #[case::root("http://x", None)]
    #[case::query("http://x/get?id=1", None)]
    #[case::dot_dot("http://x/a/..", None)]
    #[case::not_a_url("not a url", None)]
    fn derives_file_name(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(file_name_from_url(url).as_deref(), expected);
    }

    #[tokio::test]
    async fn same_last_segment_shares_one_file() {
        let mut a = mockito::Server::new_async().await;
        let mut b = mockito::Server::new_async().await;
        let _ma = a.mock("GET", "/one/x.txt").with_body("from a").create_async().await;
        let _mb = b.mock("GET", "/two/x.txt").with_body("from b").create_async().await;
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(DEFAULT_REQUEST_TIMEOUT).unwrap();

        let first = downloader
            .fetch(&format!("{}/one/x.txt", a.url()), dir.path())
            .await
            .unwrap();
        let second = downloader
            .fetch(&format!("{}/two/x.txt", b.url()), dir.path())
            .await
            .unwrap();

        assert_eq!(first, "x.txt");
        assert_eq!(second, "x.txt");
        let body = tokio::fs::read_to_string(dir.path().join("x.txt")).await.unwrap();
        assert_eq!(body, "from b");
    }

    #[test]
    fn fallback_names_are_prefixed() {
        assert!(fallback_file_name().starts_with("download_"));
    }

    #[tokio::test]
    async fn downloads_body_into_directory() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/a.txt")
            .with_status(200)
            .with_body("hello world")
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(DEFAULT_REQUEST_TIMEOUT).unwrap();

        let name = downloader
            .fetch(&format!("{}/a.txt", server.url()), dir.path())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(name, "a.txt");
        let body = tokio::fs::read_to_string(dir.path().join("a.txt")).await.unwrap();
        assert_eq!(body, "hello world");
    }

    #[tokio::test]
    async fn non_ok_status_is_bad_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/b.txt")
            .with_status(404)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(DEFAULT_REQUEST_TIMEOUT).unwrap();

        let err = downloader
            .fetch(&format!("{}/b.txt", server.url()), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::BadStatus(_)));
        assert_eq!(err.to_string(), "bad status: 404 Not Found");
        assert!(!dir.path().join("b.txt").exists());
    }

    #[tokio::test]
    async fn query_urls_get_generated_name() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("x")
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(DEFAULT_REQUEST_TIMEOUT).unwrap();

        let name = downloader
            .fetch(&format!("{}/get?id=7", server.url()), dir.path())
            .await
            .unwrap();

        assert!(name.starts_with("download_"));
        assert!(dir.path().join(&name).exists());
    }

    #[tokio::test]
    async fn missing_directory_fails_to_create_file() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/a.txt")
            .with_status(200)
            .with_body("x")
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let downloader = HttpDownloader::new(DEFAULT_REQUEST_TIMEOUT).unwrap();

        let err = downloader
            .fetch(&format!("{}/a.txt", server.url()), &missing)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::CreateFile(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(Duration::from_secs(2)).unwrap();

        let err = downloader
            .fetch("http://127.0.0.1:1/a.txt", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Request(_)));
        assert!(err.to_string().starts_with("failed to download file"));
    }
}
