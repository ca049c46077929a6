use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Task record; serialized as-is to clients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "dueDate", with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(rename = "assignedto")]
    pub assigned_to: String, // username, empty when unassigned
    #[serde(rename = "userEmail")]
    pub owner_email: String,
    pub status: bool,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}
