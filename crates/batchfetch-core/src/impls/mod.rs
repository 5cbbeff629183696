//! Implementations of the ports.
//!
//! - `InMemoryTaskStore` / `FileTaskStore`: task stores (process lifetime / restart safe)
//! - `HttpDownloader`: reqwest download executor
//! - `LocalFileStorage`: download directory on local disk
//! - `StubDownloader`: scripted executor for tests

mod task_table;

pub mod file_store;
pub mod http_downloader;
pub mod inmem_store;
pub mod local_storage;
pub mod stub_downloader;

pub use self::file_store::FileTaskStore;
pub use self::http_downloader::{DEFAULT_REQUEST_TIMEOUT, HttpDownloader, file_name_from_url};
pub use self::inmem_store::InMemoryTaskStore;
pub use self::local_storage::LocalFileStorage;
pub use self::stub_downloader::StubDownloader;
