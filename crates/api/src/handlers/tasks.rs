//! Handlers for task listing, detail, search, and the owner write paths.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use maistor_core::query::TaskListParams;
use maistor_db::models::task::{CreateTaskRequest, UpdateTaskRequest};
use maistor_db::repositories::TaskRepo;

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::services::task_service::TaskService;
use crate::state::AppState;

/// GET /api/v1/tasks
///
/// List/browse tasks with filtering, sorting, and pagination. Public for
/// browsing; the `posted`/`applications` modes require authentication.
pub async fn list_tasks(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<impl IntoResponse> {
    let page = TaskService::list_tasks(&state, &params, viewer.user_id()).await?;

    Ok(Json(DataResponse { data: page }))
}

/// Query parameters for `GET /api/v1/tasks/search`.
#[derive(Debug, Deserialize)]
pub struct TaskSearchParams {
    /// Free-text query.
    pub q: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    /// Maximum results (default 20, max 100).
    pub limit: Option<i64>,
}

/// GET /api/v1/tasks/search
///
/// Ranked full-text search over titles, descriptions, and location fields
/// (including translated variants).
pub async fn search_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskSearchParams>,
) -> AppResult<impl IntoResponse> {
    let rows = TaskRepo::search_fulltext(
        &state.pool,
        params.q.as_deref().unwrap_or(""),
        params.status.as_deref(),
        params.city.as_deref(),
        params.category.as_deref(),
        params.limit,
    )
    .await?;

    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/tasks/{id_or_slug}
///
/// Task detail by opaque id or by slug.
pub async fn get_task(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let detail = TaskService::get_task_detail(&state, &id_or_slug, viewer.user_id()).await?;

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/tasks
///
/// Post a new task. The response returns immediately; translation of the
/// content into the pivot language happens in the background.
pub async fn create_task(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<impl IntoResponse> {
    let task = TaskService::create_task(&state, input, user.user_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// PUT /api/v1/tasks/{id}
///
/// Edit a task. Owner only.
pub async fn update_task(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTaskRequest>,
) -> AppResult<impl IntoResponse> {
    let task = TaskService::update_task(&state, id, input, user.user_id).await?;

    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
///
/// Cancel a task (soft delete). Owner only.
pub async fn delete_task(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    TaskService::delete_task(&state, id, user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
