use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Body of `POST /api/tasks`. The owner is never taken from the client.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "dueDate", with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(default, rename = "assignedto", alias = "assignedTo")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: bool,
}
