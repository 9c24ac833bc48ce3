//! Tool dispatch.
//!
//! The dispatcher resolves a requested call to one of the registered
//! task operations, runs it with the caller's identity, and always
//! yields exactly one result. Nothing here returns an error to the
//! orchestrator: unknown tools, bad parameters, and store failures all
//! become failure results recorded inline in the turn.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use taskmate_conversation::{ToolError, ToolInvocation, ToolResult};
use taskmate_core::{TaskId, UserId};
use taskmate_tasks::{
    NewTask, Priority, ProfileError, ProfileStore, StatusFilter, TaskError, TaskFilter, TaskPatch,
    TaskStore,
};

use crate::tools::TaskTool;

/// Executes requested tool calls against the task and profile stores.
pub struct ToolDispatcher {
    tasks: Arc<dyn TaskStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl ToolDispatcher {
    /// Creates a dispatcher over the given stores.
    pub fn new(tasks: Arc<dyn TaskStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { tasks, profiles }
    }

    /// Dispatches one call, yielding exactly one result.
    ///
    /// The `user_id` parameter is read from the call itself; the
    /// orchestrator has already overridden it with the authenticated
    /// caller's id, but its absence is still handled here rather than
    /// assumed away.
    pub async fn dispatch(&self, call: &ToolInvocation) -> ToolResult {
        match self.run(call).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(tool = %call.name, error = %err, "tool call rejected");
                ToolResult::failure(err.to_string())
            }
        }
    }

    async fn run(&self, call: &ToolInvocation) -> Result<ToolResult, ToolError> {
        let tool = TaskTool::from_name(&call.name).ok_or_else(|| ToolError::UnknownTool {
            name: call.name.clone(),
        })?;
        let params = &call.parameters;
        let user_id = parse_user_id(tool, params)?;

        let result = match tool {
            TaskTool::GetUserProfile => self.get_user_profile(user_id).await,
            TaskTool::AddTask => self.add_task(tool, user_id, params).await?,
            TaskTool::ListTasks => self.list_tasks(tool, user_id, params).await?,
            TaskTool::CompleteTask => self.complete_task(tool, user_id, params).await?,
            TaskTool::DeleteTask => self.delete_task(tool, user_id, params).await?,
            TaskTool::UpdateTask => self.update_task(tool, user_id, params).await?,
        };

        Ok(result)
    }

    async fn get_user_profile(&self, user_id: UserId) -> ToolResult {
        match self.profiles.find(user_id).await {
            Ok(profile) => ToolResult::success(profile.to_json()),
            Err(ProfileError::NotFound { .. }) => ToolResult::failure("User not found"),
            Err(err) => storage_failure(TaskTool::GetUserProfile, &err.to_string()),
        }
    }

    async fn add_task(
        &self,
        tool: TaskTool,
        user_id: UserId,
        params: &Map<String, JsonValue>,
    ) -> Result<ToolResult, ToolError> {
        let title = required_string(tool, params, "title")?;
        let mut new = NewTask::new(user_id, title);

        if let Some(description) = optional_string(tool, params, "description")? {
            new = new.with_description(description);
        }
        if let Some(priority) = optional_priority(tool, params)? {
            new = new.with_priority(priority);
        }
        // Unparseable due dates are dropped rather than failing the call.
        if let Some(due_date) = optional_string(tool, params, "due_date")? {
            if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(&due_date) {
                new = new.with_due_date(parsed.to_utc());
            }
        }

        Ok(match self.tasks.insert(new).await {
            Ok(task) => ToolResult::success(serde_json::json!({
                "task_id": task.id.to_string(),
                "message": format!("Task '{}' has been added successfully!", task.title),
                "task": task.to_json(),
            })),
            Err(err) => storage_failure(tool, &err.to_string()),
        })
    }

    async fn list_tasks(
        &self,
        tool: TaskTool,
        user_id: UserId,
        params: &Map<String, JsonValue>,
    ) -> Result<ToolResult, ToolError> {
        let filter = TaskFilter {
            // Unrecognized status values (including "all") mean no filter.
            status: optional_string(tool, params, "status")?
                .as_deref()
                .and_then(StatusFilter::parse),
            priority: optional_priority(tool, params)?,
        };

        Ok(match self.tasks.list(user_id, filter).await {
            Ok(tasks) => {
                let listed: Vec<JsonValue> = tasks.iter().map(|task| task.to_json()).collect();
                ToolResult::success(serde_json::json!({
                    "count": listed.len(),
                    "tasks": listed,
                    "message": format!("You have {} task(s).", listed.len()),
                }))
            }
            Err(err) => storage_failure(tool, &err.to_string()),
        })
    }

    async fn complete_task(
        &self,
        tool: TaskTool,
        user_id: UserId,
        params: &Map<String, JsonValue>,
    ) -> Result<ToolResult, ToolError> {
        let raw_id = required_string(tool, params, "task_id")?;
        let Some(task_id) = parse_task_id(&raw_id) else {
            return Ok(not_found(&raw_id, "modify"));
        };

        Ok(match self.tasks.complete(user_id, task_id).await {
            Ok(task) => ToolResult::success(serde_json::json!({
                "message": format!("Task '{}' has been marked as completed!", task.title),
                "task": task.to_json(),
            })),
            Err(TaskError::NotFound { .. }) => not_found(&raw_id, "modify"),
            Err(err) => storage_failure(tool, &err.to_string()),
        })
    }

    async fn delete_task(
        &self,
        tool: TaskTool,
        user_id: UserId,
        params: &Map<String, JsonValue>,
    ) -> Result<ToolResult, ToolError> {
        let raw_id = required_string(tool, params, "task_id")?;
        let Some(task_id) = parse_task_id(&raw_id) else {
            return Ok(not_found(&raw_id, "delete"));
        };

        Ok(match self.tasks.delete(user_id, task_id).await {
            Ok(task) => ToolResult::success(serde_json::json!({
                "message": format!("Task '{}' has been deleted successfully!", task.title),
            })),
            Err(TaskError::NotFound { .. }) => not_found(&raw_id, "delete"),
            Err(err) => storage_failure(tool, &err.to_string()),
        })
    }

    async fn update_task(
        &self,
        tool: TaskTool,
        user_id: UserId,
        params: &Map<String, JsonValue>,
    ) -> Result<ToolResult, ToolError> {
        let raw_id = required_string(tool, params, "task_id")?;
        let Some(task_id) = parse_task_id(&raw_id) else {
            return Ok(not_found(&raw_id, "modify"));
        };

        let mut patch = TaskPatch {
            title: optional_string(tool, params, "title")?,
            description: optional_string(tool, params, "description")?,
            priority: optional_priority(tool, params)?,
            completed: optional_bool(tool, params, "completed")?,
            due_date: None,
        };
        if let Some(due_date) = optional_string(tool, params, "due_date")? {
            // Same leniency as add_task: a bad date leaves the field alone.
            patch.due_date = chrono::DateTime::parse_from_rfc3339(&due_date)
                .ok()
                .map(|d| d.to_utc());
        }

        Ok(match self.tasks.update(user_id, task_id, patch).await {
            Ok(task) => ToolResult::success(serde_json::json!({
                "message": format!("Task '{}' has been updated successfully!", task.title),
                "task": task.to_json(),
            })),
            Err(TaskError::NotFound { .. }) => not_found(&raw_id, "modify"),
            Err(err) => storage_failure(tool, &err.to_string()),
        })
    }
}

fn parse_user_id(tool: TaskTool, params: &Map<String, JsonValue>) -> Result<UserId, ToolError> {
    let raw = params
        .get("user_id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| ToolError::MissingParameter {
            tool: tool.name().to_string(),
            parameter: "user_id".to_string(),
        })?;

    UserId::from_str(raw).map_err(|e| ToolError::InvalidParameter {
        tool: tool.name().to_string(),
        parameter: "user_id".to_string(),
        reason: e.to_string(),
    })
}

fn parse_task_id(raw: &str) -> Option<TaskId> {
    TaskId::from_str(raw).ok()
}

fn required_string(
    tool: TaskTool,
    params: &Map<String, JsonValue>,
    name: &str,
) -> Result<String, ToolError> {
    optional_string(tool, params, name)?.ok_or_else(|| ToolError::MissingParameter {
        tool: tool.name().to_string(),
        parameter: name.to_string(),
    })
}

fn optional_string(
    tool: TaskTool,
    params: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<String>, ToolError> {
    match params.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ToolError::InvalidParameter {
            tool: tool.name().to_string(),
            parameter: name.to_string(),
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn optional_bool(
    tool: TaskTool,
    params: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<bool>, ToolError> {
    match params.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(ToolError::InvalidParameter {
            tool: tool.name().to_string(),
            parameter: name.to_string(),
            reason: format!("expected a boolean, got {other}"),
        }),
    }
}

fn optional_priority(
    tool: TaskTool,
    params: &Map<String, JsonValue>,
) -> Result<Option<Priority>, ToolError> {
    match optional_string(tool, params, "priority")? {
        None => Ok(None),
        Some(raw) => Priority::parse(&raw)
            .map(Some)
            .ok_or_else(|| ToolError::InvalidParameter {
                tool: tool.name().to_string(),
                parameter: "priority".to_string(),
                reason: format!("'{raw}' is not one of low, medium, high"),
            }),
    }
}

fn not_found(task_id: &str, action: &str) -> ToolResult {
    ToolResult::failure(format!(
        "Task with ID {task_id} not found or you don't have permission to {action} it."
    ))
}

fn storage_failure(tool: TaskTool, reason: &str) -> ToolResult {
    ToolResult::failure(format!("Error executing tool {}: {reason}", tool.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryProfileStore, MemoryTaskStore};
    use taskmate_tasks::UserProfile;

    fn dispatcher() -> (ToolDispatcher, Arc<MemoryTaskStore>, UserId) {
        let tasks = Arc::new(MemoryTaskStore::default());
        let user_id = UserId::new();
        let profiles = Arc::new(MemoryProfileStore::with_profile(UserProfile {
            id: user_id,
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            created_at: chrono::Utc::now(),
        }));
        (
            ToolDispatcher::new(tasks.clone(), profiles),
            tasks,
            user_id,
        )
    }

    fn call(name: &str, params: serde_json::Value) -> ToolInvocation {
        let JsonValue::Object(map) = params else {
            panic!("params must be an object");
        };
        ToolInvocation::new(name, map)
    }

    #[tokio::test]
    async fn unknown_tool_yields_failure_result() {
        let (dispatcher, _, user_id) = dispatcher();
        let result = dispatcher
            .dispatch(&call("rename_task", serde_json::json!({"user_id": user_id.to_string()})))
            .await;

        assert!(!result.is_success());
        assert!(result.error.unwrap().contains("unknown tool"));
    }

    #[tokio::test]
    async fn missing_user_id_yields_failure_result() {
        let (dispatcher, _, _) = dispatcher();
        let result = dispatcher
            .dispatch(&call("add_task", serde_json::json!({"title": "No owner"})))
            .await;

        assert!(!result.is_success());
        assert!(result.error.unwrap().contains("user_id"));
    }

    #[tokio::test]
    async fn add_task_stores_and_reports() {
        let (dispatcher, tasks, user_id) = dispatcher();
        let result = dispatcher
            .dispatch(&call(
                "add_task",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "title": "Buy milk",
                    "priority": "high",
                }),
            ))
            .await;

        assert!(result.is_success());
        let data = result.data.unwrap();
        assert!(data["message"].as_str().unwrap().contains("Buy milk"));

        let stored = tasks
            .list(user_id, TaskFilter::default())
            .await
            .expect("list");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn add_task_drops_unparseable_due_date() {
        let (dispatcher, tasks, user_id) = dispatcher();
        let result = dispatcher
            .dispatch(&call(
                "add_task",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "title": "Dated",
                    "due_date": "next tuesday",
                }),
            ))
            .await;

        assert!(result.is_success());
        let stored = tasks
            .list(user_id, TaskFilter::default())
            .await
            .expect("list");
        assert!(stored[0].due_date.is_none());
    }

    #[tokio::test]
    async fn invalid_priority_yields_failure_result() {
        let (dispatcher, _, user_id) = dispatcher();
        let result = dispatcher
            .dispatch(&call(
                "add_task",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "title": "Oops",
                    "priority": "urgent",
                }),
            ))
            .await;

        assert!(!result.is_success());
        assert!(result.error.unwrap().contains("priority"));
    }

    #[tokio::test]
    async fn list_tasks_applies_filters() {
        let (dispatcher, tasks, user_id) = dispatcher();
        tasks
            .insert(NewTask::new(user_id, "open high").with_priority(Priority::High))
            .await
            .expect("insert");
        let done = tasks
            .insert(NewTask::new(user_id, "done high").with_priority(Priority::High))
            .await
            .expect("insert");
        tasks
            .complete(user_id, done.id)
            .await
            .expect("complete");

        let result = dispatcher
            .dispatch(&call(
                "list_tasks",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "status": "pending",
                    "priority": "high",
                }),
            ))
            .await;

        assert!(result.is_success());
        let data = result.data.unwrap();
        assert_eq!(data["count"], 1);
        assert_eq!(data["tasks"][0]["title"], "open high");
        assert_eq!(data["message"], "You have 1 task(s).");
    }

    #[tokio::test]
    async fn complete_task_for_other_user_is_not_found() {
        let (dispatcher, tasks, user_id) = dispatcher();
        let foreign = tasks
            .insert(NewTask::new(UserId::new(), "not yours"))
            .await
            .expect("insert");

        let result = dispatcher
            .dispatch(&call(
                "complete_task",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "task_id": foreign.id.to_string(),
                }),
            ))
            .await;

        assert!(!result.is_success());
        assert!(result.error.unwrap().contains("not found or you don't have permission"));
    }

    #[tokio::test]
    async fn delete_task_removes_the_record() {
        let (dispatcher, tasks, user_id) = dispatcher();
        let task = tasks
            .insert(NewTask::new(user_id, "short-lived"))
            .await
            .expect("insert");

        let result = dispatcher
            .dispatch(&call(
                "delete_task",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "task_id": task.id.to_string(),
                }),
            ))
            .await;

        assert!(result.is_success());
        let remaining = tasks
            .list(user_id, TaskFilter::default())
            .await
            .expect("list");
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn update_task_touches_only_supplied_fields() {
        let (dispatcher, tasks, user_id) = dispatcher();
        let task = tasks
            .insert(NewTask::new(user_id, "original").with_description("keep me"))
            .await
            .expect("insert");

        let result = dispatcher
            .dispatch(&call(
                "update_task",
                serde_json::json!({
                    "user_id": user_id.to_string(),
                    "task_id": task.id.to_string(),
                    "title": "renamed",
                    "completed": true,
                }),
            ))
            .await;

        assert!(result.is_success());
        let stored = tasks
            .list(user_id, TaskFilter::default())
            .await
            .expect("list");
        assert_eq!(stored[0].title, "renamed");
        assert!(stored[0].completed);
        assert_eq!(stored[0].description.as_deref(), Some("keep me"));
    }

    #[tokio::test]
    async fn get_user_profile_returns_account_data() {
        let (dispatcher, _, user_id) = dispatcher();
        let result = dispatcher
            .dispatch(&call(
                "get_user_profile",
                serde_json::json!({"user_id": user_id.to_string()}),
            ))
            .await;

        assert!(result.is_success());
        assert_eq!(result.data.unwrap()["email"], "ada@example.com");
    }
}
