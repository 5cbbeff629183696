//! Ports - 抽象化レイヤー
//!
//! The engine only talks to the outside world through these traits: the task
//! store, the download executor, the download directory, the clock and the ID
//! generator. Implementations live in `impls`.

pub mod clock;
pub mod downloader;
pub mod id_generator;
pub mod storage;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::downloader::Downloader;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::storage::FileStorage;
pub use self::task_store::TaskStore;
