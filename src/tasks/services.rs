use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
    tasks::{
        dto::{CreateTaskRequest, StatusResponse},
        repo_types::Task,
    },
};

pub async fn create_task(
    state: &AppState,
    owner_email: &str,
    req: CreateTaskRequest,
) -> Result<Task, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Task name is required".into()));
    }

    let assigned_to = req.assigned_to.unwrap_or_default().trim().to_string();
    if !assigned_to.is_empty() {
        // checked once here; later renames are not tracked
        let assignee = state.users.find_by_username(&assigned_to).await.map_err(|e| {
            error!(error = %e, "assignee lookup failed");
            AppError::Internal("Failed to create task".into())
        })?;
        if assignee.is_none() {
            warn!(assigned_to = %assigned_to, "assigned user not found");
            return Err(AppError::Validation("Assigned user not found".into()));
        }
    }

    let task = Task {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: req.description.unwrap_or_default(),
        due_date: req.due_date,
        assigned_to,
        owner_email: owner_email.to_string(),
        status: false,
        created_at: OffsetDateTime::now_utc(),
    };

    let task = state.tasks.insert(task).await.map_err(|e| {
        error!(error = %e, "insert task failed");
        AppError::Internal("Failed to create task".into())
    })?;
    info!(task_id = %task.id, owner = %task.owner_email, "task created");
    Ok(task)
}

pub async fn list_tasks(state: &AppState, owner_email: &str) -> Result<Vec<Task>, AppError> {
    state.tasks.find_by_owner(owner_email).await.map_err(|e| {
        error!(error = %e, owner = %owner_email, "list tasks failed");
        AppError::Internal("Failed to retrieve tasks".into())
    })
}

/// Flips the stored status. Concurrent toggles race; the last write wins.
pub async fn toggle_status(state: &AppState, raw_id: &str) -> Result<StatusResponse, AppError> {
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::Validation("Invalid task ID".into()))?;

    let task = state
        .tasks
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!(error = %e, task_id = %id, "find task failed");
            AppError::Internal("Failed to update task status".into())
        })?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    let status = !task.status;
    let updated = state.tasks.update_status(id, status).await.map_err(|e| {
        error!(error = %e, task_id = %id, "update status failed");
        AppError::Internal("Failed to update task status".into())
    })?;
    if !updated {
        return Err(AppError::NotFound("Task not found".into()));
    }

    info!(task_id = %id, status, "task status toggled");
    Ok(StatusResponse { id, status })
}
