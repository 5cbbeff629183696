//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **TaskServiceBuilder**: ports のワイヤリングと起動時検証
//! - **TaskLifecycle**: タスク作成・状態遷移・recovery
//! - **Scheduler**: 定期的に Pending タスクを処理するループ
//! - **TaskService**: HTTP 層と binary が使う facade

pub mod builder;
pub mod config;
pub mod lifecycle;
pub mod scheduler;
pub mod service;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, TaskServiceBuilder};
pub use self::config::{DEFAULT_DOWNLOAD_DIR, DEFAULT_POLL_INTERVAL, EngineConfig};
pub use self::lifecycle::{ProcessOutcome, TaskLifecycle};
pub use self::scheduler::Scheduler;
pub use self::service::TaskService;
pub use self::status::TaskCounts;
