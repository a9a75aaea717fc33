// handlers/protected/task_lists.rs - /api/task-list[/:id[/tasks]]

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::models::{CreateTaskList, Task, TaskList, UpdateTaskList};
use crate::filter::{Listing, ListingQuery};
use crate::handlers::utils::{parse_id, ListingResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Deleted;

/// POST /api/task-list
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<CreateTaskList>, JsonRejection>,
) -> ApiResult<TaskList> {
    let Json(request) = payload?;
    let list = state.services.task_lists.create(&identity, request).await?;
    Ok(ApiResponse::created(list))
}

/// GET /api/task-list - the caller's lists
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    query: ListingQuery,
) -> ApiResult<ListingResponse<TaskList>> {
    let listing = Listing::from(query);
    let page = state.services.task_lists.list(&identity, None, &listing).await?;
    Ok(ApiResponse::success(ListingResponse::new(page, &listing)))
}

/// GET /api/task-list/:id
pub async fn get(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<TaskList> {
    let list = state.services.task_lists.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(list))
}

/// PATCH /api/task-list/:id
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskList>, JsonRejection>,
) -> ApiResult<TaskList> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let list = state.services.task_lists.update(&identity, id, request).await?;
    Ok(ApiResponse::success(list))
}

/// DELETE /api/task-list/:id - the list's tasks go with it
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.services.task_lists.delete(&identity, parse_id(&id)?).await?;
    Ok(ApiResponse::success(deleted))
}

/// GET /api/task-list/:id/tasks
pub async fn tasks(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    query: ListingQuery,
) -> ApiResult<ListingResponse<Task>> {
    let id = parse_id(&id)?;
    let listing = Listing::from(query);
    let page = state.services.tasks.list(&identity, Some(id), &listing).await?;
    Ok(ApiResponse::success(ListingResponse::new(page, &listing)))
}
