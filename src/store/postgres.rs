use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use super::TaskStore;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskStatus};

/// Production store backed by the `tasks` table.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task, AppError> {
        let status = TaskStatus::from_str(&self.status).map_err(AppError::Unexpected)?;
        Ok(Task {
            id: self.id.to_string(),
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_key(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidIdentifier)
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, input: TaskInput) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (id, title, description, due_date, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
             RETURNING id, title, description, due_date, status, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_task()
    }

    async fn get_all(&self) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, due_date, status, created_at, updated_at
             FROM tasks ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Task, AppError> {
        let key = parse_key(id)?;

        sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, due_date, status, created_at, updated_at
             FROM tasks WHERE id = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::TaskNotFound)?
        .into_task()
    }

    async fn update(&self, id: &str, input: TaskInput) -> Result<Task, AppError> {
        let key = parse_key(id)?;

        sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks
             SET title = $1, description = $2, due_date = $3, status = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING id, title, description, due_date, status, created_at, updated_at",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.status.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::TaskNotFound)?
        .into_task()
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let key = parse_key(id)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::TaskNotFound);
        }
        Ok(())
    }
}
