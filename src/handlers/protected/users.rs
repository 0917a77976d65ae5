use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::database::models::task::Task;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::services::AppState;

/// GET /api/users/:id/tasks - list a user's tasks
///
/// Allowed for the user themselves and for the manager linked to them.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Task>>, ApiError> {
    let tasks = state.tasks.list_for_user(&caller, user_id).await?;
    Ok(ApiResponse::success(tasks))
}
