//! batchfetch-core
//!
//! Core building blocks for the batch download service.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, task, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, Downloader, FileStorage, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryTaskStore, FileTaskStore, HttpDownloader, StubDownloader など）
//! - **app**: アプリケーションロジック（lifecycle, scheduler, service, builder）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
