// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthResponse, LoginRequest, RegisterRequest};

/// POST /api/auth/register - create an account and receive a token
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(request) = payload?;
    let response = state.services.auth.register(request).await?;
    Ok(ApiResponse::created(response))
}

/// POST /api/auth/login - exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(request) = payload?;
    let response = state.services.auth.login(request).await?;
    Ok(ApiResponse::success(response))
}
