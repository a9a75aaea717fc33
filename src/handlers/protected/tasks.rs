// handlers/protected/tasks.rs - /api/task[/:id]

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::models::{CreateTask, Task, UpdateTask};
use crate::handlers::utils::{parse_id, ListingResponse, TaskListingQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Deleted;

/// POST /api/task - the referenced task list must be the caller's
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<Task> {
    let Json(request) = payload?;
    let task = state.services.tasks.create(&identity, request).await?;
    Ok(ApiResponse::created(task))
}

/// GET /api/task[?task_list_id=...] - the caller's tasks
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    query: TaskListingQuery,
) -> ApiResult<ListingResponse<Task>> {
    let (task_list_id, listing) = query.split()?;
    let page = state.services.tasks.list(&identity, task_list_id, &listing).await?;
    Ok(ApiResponse::success(ListingResponse::new(page, &listing)))
}

/// GET /api/task/:id
pub async fn get(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Task> {
    let task = state.services.tasks.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(task))
}

/// PATCH /api/task/:id
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Task> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let task = state.services.tasks.update(&identity, id, request).await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/task/:id
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.services.tasks.delete(&identity, parse_id(&id)?).await?;
    Ok(ApiResponse::success(deleted))
}
