//! Task CRUD endpoints.
//!
//! Translates HTTP requests into [`TaskStore`](crate::store::TaskStore)
//! calls and store outcomes into status codes: validation failures map to
//! 400, unknown ids to 404, both with an `{"error": ...}` body.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::store::{StoreError, Task};

use super::routes::AppState;
use super::types::{CreateTaskRequest, ErrorResponse, UpdateTaskRequest};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn map_store_error(err: StoreError) -> ApiError {
    let status = match err {
        StoreError::EmptyTitle => StatusCode::BAD_REQUEST,
        StoreError::NotFound => StatusCode::NOT_FOUND,
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Ids are opaque to clients, so a path segment that is not a UUID can never
/// name an existing task.
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse().map_err(|_| map_store_error(StoreError::NotFound))
}

/// List all tasks in insertion order.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.store.list().await)
}

/// Create a new task.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state
        .store
        .create(&req.title)
        .await
        .map_err(map_store_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update an existing task.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .update(id, req.into())
        .await
        .map(Json)
        .map_err(map_store_error)
}

/// Delete a task.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .delete(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(map_store_error)
}
