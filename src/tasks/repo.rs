use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tasks::repo_types::Task;

/// Task store, keyed by owner email.
#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn insert(&self, task: Task) -> anyhow::Result<Task>;
    /// Tasks owned by `email`, in insertion order.
    async fn find_by_owner(&self, email: &str) -> anyhow::Result<Vec<Task>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Task>>;
    /// Unconditional overwrite. Returns `false` when no task has this id.
    async fn update_status(&self, id: Uuid, status: bool) -> anyhow::Result<bool>;
}

// `seq` is assigned by the insert, so equal `created_at` values still sort in insertion order.
const FIND_BY_OWNER: &str = r#"
    SELECT id, name, description, due_date, assigned_to, owner_email, status, created_at
    FROM tasks
    WHERE owner_email = $1
    ORDER BY seq ASC
"#;

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn insert(&self, task: Task) -> anyhow::Result<Task> {
        let row = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, name, description, due_date, assigned_to, owner_email, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, due_date, assigned_to, owner_email, status, created_at
            "#,
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(&task.assigned_to)
        .bind(&task.owner_email)
        .bind(task.status)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_owner(&self, email: &str) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(FIND_BY_OWNER)
            .bind(email)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, due_date, assigned_to, owner_email, status, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: bool) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"UPDATE tasks SET status = $2 WHERE id = $1"#)
            .bind(id)
            .bind(status)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
