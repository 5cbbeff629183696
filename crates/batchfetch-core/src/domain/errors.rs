//! Errors - one enum per layer.
//!
//! - `StoreError`: task store operations.
//! - `DownloadError`: one URL's transfer. Recorded as that URL's result, never fatal.
//! - `EngineError`: what the service facade surfaces to its callers.

use std::io;

use thiserror::Error;

use super::TaskId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task already exists: {0}")]
    DuplicateKey(TaskId),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("state file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to download file: {0}")]
    Request(String),

    /// Non-200 response, e.g. `bad status: 404 Not Found`.
    #[error("bad status: {0}")]
    BadStatus(String),

    #[error("failed to create file: {0}")]
    CreateFile(io::Error),

    #[error("failed to save file: {0}")]
    SaveFile(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("failed to access task store: {0}")]
    Store(#[from] StoreError),

    #[error("download directory unavailable: {0}")]
    Storage(#[source] io::Error),

    #[error("scheduler is already running")]
    AlreadyRunning,
}
