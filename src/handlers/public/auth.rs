use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::user::User;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::services::auth_service::RegisterInput;
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth/login - authenticate and receive a session token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<TokenResponse>, ApiError> {
    let token = state.auth.login(&payload.email, &payload.password).await?;
    Ok(ApiResponse::success(TokenResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Supplied when registering a technician under a manager.
    #[serde(default)]
    pub manager_id: Option<Uuid>,
}

/// POST /auth/register - create an identity (and its manager link)
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = state
        .auth
        .register(RegisterInput {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            manager_id: payload.manager_id,
        })
        .await?;
    Ok(ApiResponse::created(user))
}
