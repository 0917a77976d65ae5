use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::task::Task;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::services::task_service::{CreateTaskInput, UpdateTaskInput};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub summary: String,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskRequest {
    pub summary: Option<String>,
    pub date: Option<NaiveDate>,
}

/// POST /api/tasks - create a task owned by the calling technician
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<ApiResponse<Task>, ApiError> {
    let task = state
        .tasks
        .create(
            &caller,
            CreateTaskInput {
                summary: payload.summary,
                date: payload.date,
            },
        )
        .await?;
    Ok(ApiResponse::created(task))
}

/// PATCH /api/tasks/:id - update a task's summary and/or date
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<ApiResponse<Task>, ApiError> {
    let task = state
        .tasks
        .update(
            &caller,
            task_id,
            UpdateTaskInput {
                summary: payload.summary,
                date: payload.date,
            },
        )
        .await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id - delete a linked technician's task
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> Result<ApiResponse<Value>, ApiError> {
    state.tasks.delete(&caller, task_id).await?;
    Ok(ApiResponse::success(json!({
        "message": "Task deleted successfully"
    })))
}
