/// Task endpoints
///
/// All handlers run behind the bearer gate and act only on the caller's own
/// tasks. A task that exists but belongs to someone else answers exactly
/// like a missing one: `404 {"error":"not_found","message":"Task not found"}`.
///
/// # Endpoints
///
/// - `GET    /tasks` - List own tasks, newest first
/// - `GET    /tasks/:id` - Fetch one task
/// - `POST   /tasks` - Create a task
/// - `PUT    /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::task::{present_field, Task, TaskPatch},
};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update task request
///
/// Absent fields keep their stored value; `"description": null` clears the
/// description.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description, `Some(None)` to clear
    #[serde(default, deserialize_with = "present_field")]
    pub description: Option<Option<String>>,

    /// New completion flag
    pub is_complete: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskPatch {
            title: req.title,
            description: req.description,
            is_complete: req.is_complete,
        }
    }
}

/// List the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(auth.user_id).await?;
    Ok(Json(tasks))
}

/// Fetch one of the caller's tasks
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.get(id, auth.user_id).await?;
    Ok(Json(task))
}

/// Create a task owned by the caller
///
/// # Request
///
/// ```json
/// { "title": "buy milk", "description": "semi-skimmed" }
/// ```
///
/// # Response
///
/// `201 Created` with the stored task:
///
/// ```json
/// { "id": 1, "title": "buy milk", "description": "semi-skimmed", "isComplete": false, "ownerId": 1 }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .tasks
        .create(auth.user_id, req.title, req.description)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Merge the provided fields into one of the caller's tasks
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.update(id, auth.user_id, req.into()).await?;
    Ok(Json(task))
}

/// Delete one of the caller's tasks
///
/// Responds `200 OK` with an empty body.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(id, auth.user_id).await?;
    Ok(StatusCode::OK)
}
