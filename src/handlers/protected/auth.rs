// handlers/protected/auth.rs - GET /api/auth/whoami, PATCH /api/auth/password

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::Identity;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ChangePasswordRequest;

/// GET /api/auth/whoami - the identity carried by the caller's token
pub async fn whoami(State(state): State<AppState>, identity: Identity) -> ApiResult<Identity> {
    Ok(ApiResponse::success(state.services.auth.whoami(&identity)))
}

/// PATCH /api/auth/password - replace the caller's password
pub async fn change_password(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    state.services.auth.change_password(&identity, request).await?;
    Ok(ApiResponse::success(json!({ "password_changed": true })))
}
