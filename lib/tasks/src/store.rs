//! Store contract for tasks.

use crate::error::TaskError;
use crate::task::{NewTask, Task, TaskFilter, TaskPatch};
use async_trait::async_trait;
use taskmate_core::{TaskId, UserId};

/// Trait for task persistence.
///
/// Every operation is scoped to the owning user: a task is only ever
/// visible to, and mutable by, the user that created it. Implementations
/// enforce that scoping in their queries, not callers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a new task and returns the stored record.
    async fn insert(&self, new: NewTask) -> Result<Task, TaskError>;

    /// Lists a user's tasks matching the filter, oldest first.
    async fn list(&self, user_id: UserId, filter: TaskFilter) -> Result<Vec<Task>, TaskError>;

    /// Marks a task as completed.
    async fn complete(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError>;

    /// Deletes a task, returning the deleted record.
    async fn delete(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError>;

    /// Applies a partial update and returns the updated record.
    async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TaskError>;
}
