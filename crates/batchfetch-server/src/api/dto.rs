use batchfetch_core::app::TaskCounts;
use batchfetch_core::domain::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct TaskStatusResponse {
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub processing: bool,
    pub counts: TaskCounts,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
