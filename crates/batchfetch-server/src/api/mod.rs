//! HTTP API.
//!
//! - `POST /api/v1/tasks`: submit a batch, `201 {"task_id"}`
//! - `GET /api/v1/tasks/{id}`: `200 {"task"}` or `404`
//! - `GET /health`: scheduler flag and per-status counts

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use batchfetch_core::app::TaskService;

mod dto;
mod error;
mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TaskService>,
}

pub fn router(service: Arc<TaskService>) -> Router {
    Router::new()
        .route("/api/v1/tasks", post(handlers::create_task))
        .route("/api/v1/tasks/{id}", get(handlers::get_task_status))
        .route("/health", get(handlers::health))
        .with_state(AppState { service })
}
