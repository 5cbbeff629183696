use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::debug;
use url::Url;

use super::AppState;
use super::dto::{CreateTaskRequest, CreateTaskResponse, HealthResponse, TaskStatusResponse};
use super::error::ApiError;

pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTaskResponse>), ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    validate_urls(&request.urls)?;

    let task = state.service.create_task(request.urls).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            task_id: task.id.to_string(),
        }),
    ))
}

pub async fn get_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskStatusResponse>, ApiError> {
    let task = state.service.get_task_status(&id).await?;
    Ok(Json(TaskStatusResponse { task }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let counts = state.service.stats().await?;
    Ok(Json(HealthResponse {
        processing: state.service.is_processing(),
        counts,
    }))
}

/// Accept only absolute http(s) URLs.
fn validate_urls(urls: &[String]) -> Result<(), ApiError> {
    if urls.is_empty() {
        return Err(ApiError::BadRequest("urls must not be empty".to_string()));
    }
    for raw in urls {
        let parsed = Url::parse(raw).map_err(|e| {
            debug!(url = %raw, error = %e, "rejected url");
            ApiError::BadRequest(format!("invalid url {raw:?}: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::BadRequest(format!(
                "unsupported url scheme {:?} in {raw:?}",
                parsed.scheme()
            )));
        }
    }
    Ok(())
}
