// handlers/protected/users.rs - /api/user[/:id[/task-lists]]

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::models::{TaskList, UpdateUser, User};
use crate::filter::{Listing, ListingQuery};
use crate::handlers::utils::{parse_id, ListingResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Deleted;

/// GET /api/user - every user, searchable by username
pub async fn list(
    State(state): State<AppState>,
    _identity: Identity,
    query: ListingQuery,
) -> ApiResult<ListingResponse<User>> {
    let listing = Listing::from(query);
    let page = state.services.users.list(&listing).await?;
    Ok(ApiResponse::success(ListingResponse::new(page, &listing)))
}

/// GET /api/user/:id
pub async fn get(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let user = state.services.users.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /api/user/:id - only the user themself
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let user = state.services.users.update(&identity, id, request).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/user/:id - removes the account and everything it owns
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.services.users.delete(&identity, parse_id(&id)?).await?;
    Ok(ApiResponse::success(deleted))
}

/// GET /api/user/:id/task-lists - only for `:id` equal to the caller
pub async fn task_lists(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    query: ListingQuery,
) -> ApiResult<ListingResponse<TaskList>> {
    let id = parse_id(&id)?;
    let listing = Listing::from(query);
    let page = state.services.task_lists.list(&identity, Some(id), &listing).await?;
    Ok(ApiResponse::success(ListingResponse::new(page, &listing)))
}
