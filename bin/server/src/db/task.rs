//! Task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use taskmate_core::{TaskId, UserId};
use taskmate_tasks::{
    NewTask, Priority, StatusFilter, Task, TaskError, TaskFilter, TaskPatch, TaskStore,
};

/// Row type for task queries.
#[derive(FromRow)]
struct TaskRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    priority: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn try_into_task(self) -> Result<Task, TaskError> {
        let id = TaskId::from_str(&self.id).map_err(|e| TaskError::StorageFailed {
            reason: format!("invalid task id '{}': {e}", self.id),
        })?;
        let user_id = UserId::from_str(&self.user_id).map_err(|e| TaskError::StorageFailed {
            reason: format!("invalid user id '{}': {e}", self.user_id),
        })?;

        Ok(Task {
            id,
            user_id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            priority: Priority::parse(&self.priority).unwrap_or_default(),
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, completed, priority, due_date, created_at, updated_at";

/// Repository for task records.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, new: NewTask) -> Result<Task, TaskError> {
        let task = Task::new(new);

        sqlx::query(
            r#"
            INSERT INTO tasks
                (id, user_id, title, description, completed, priority, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id.to_string())
        .bind(task.user_id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(task)
    }

    async fn list(&self, user_id: UserId, filter: TaskFilter) -> Result<Vec<Task>, TaskError> {
        let completed = filter.status.map(|status| match status {
            StatusFilter::Completed => true,
            StatusFilter::Pending => false,
        });
        let priority = filter.priority.map(|p| p.as_str());

        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1
              AND ($2::BOOLEAN IS NULL OR completed = $2)
              AND ($3::TEXT IS NULL OR priority = $3)
            ORDER BY created_at ASC
            "#,
        ))
        .bind(user_id.to_string())
        .bind(completed)
        .bind(priority)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter().map(TaskRow::try_into_task).collect()
    }

    async fn complete(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks
            SET completed = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.ok_or(TaskError::NotFound { id: task_id })?
            .try_into_task()
    }

    async fn delete(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.ok_or(TaskError::NotFound { id: task_id })?
            .try_into_task()
    }

    async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TaskError> {
        // COALESCE keeps the stored value wherever the patch is NULL,
        // which is exactly the partial-update contract.
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                completed = COALESCE($6, completed),
                due_date = COALESCE($7, due_date),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id.to_string())
        .bind(user_id.to_string())
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.completed)
        .bind(patch.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.ok_or(TaskError::NotFound { id: task_id })?
            .try_into_task()
    }
}

fn storage(err: sqlx::Error) -> TaskError {
    TaskError::StorageFailed {
        reason: err.to_string(),
    }
}
