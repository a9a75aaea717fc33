// handlers/protected/labels.rs - /api/label[/:id]

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::models::{CreateLabel, Label, UpdateLabel};
use crate::filter::{Listing, ListingQuery};
use crate::handlers::utils::{parse_id, ListingResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Deleted;

/// POST /api/label
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<CreateLabel>, JsonRejection>,
) -> ApiResult<Label> {
    let Json(request) = payload?;
    let label = state.services.labels.create(&identity, request).await?;
    Ok(ApiResponse::created(label))
}

/// GET /api/label - the caller's labels, searchable by name
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    query: ListingQuery,
) -> ApiResult<ListingResponse<Label>> {
    let listing = Listing::from(query);
    let page = state.services.labels.list(&identity, &listing).await?;
    Ok(ApiResponse::success(ListingResponse::new(page, &listing)))
}

/// GET /api/label/:id
pub async fn get(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Label> {
    let label = state.services.labels.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(label))
}

/// PATCH /api/label/:id
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLabel>, JsonRejection>,
) -> ApiResult<Label> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let label = state.services.labels.update(&identity, id, request).await?;
    Ok(ApiResponse::success(label))
}

/// DELETE /api/label/:id
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.services.labels.delete(&identity, parse_id(&id)?).await?;
    Ok(ApiResponse::success(deleted))
}
