use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateTaskRequest, StatusResponse},
    repo_types::Task,
    services,
};
use crate::{
    auth::middleware::SessionUser,
    error::{AppError, JsonBody},
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id/status", patch(update_status))
}

#[instrument(skip(state, user, payload), fields(owner = %user.email))]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    JsonBody(payload): JsonBody<CreateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(services::create_task(&state, &user.email, payload).await?))
}

#[instrument(skip(state, user), fields(owner = %user.email))]
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(services::list_tasks(&state, &user.email).await?))
}

// Raw string so a malformed id gets our 400 body instead of axum's rejection.
#[instrument(skip(state, _user))]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(_user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(services::toggle_status(&state, &id).await?))
}
