//! The closed set of task tools.
//!
//! Tools are a tagged enum rather than an open string-keyed table:
//! every schema the registry advertises has a dispatch arm by
//! construction, and an unknown name simply fails to parse.

use taskmate_conversation::{ParamKind, ToolDefinition, ToolError, ToolParameter, ToolRegistry};

/// Every tool the assistant can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTool {
    /// Look up the caller's profile.
    GetUserProfile,
    /// Create a task.
    AddTask,
    /// List tasks with optional filters.
    ListTasks,
    /// Mark a task completed.
    CompleteTask,
    /// Delete a task.
    DeleteTask,
    /// Partially update a task.
    UpdateTask,
}

impl TaskTool {
    /// All tools, in the order they are advertised.
    pub const ALL: [Self; 6] = [
        Self::GetUserProfile,
        Self::AddTask,
        Self::ListTasks,
        Self::CompleteTask,
        Self::DeleteTask,
        Self::UpdateTask,
    ];

    /// The tool's wire name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetUserProfile => "get_user_profile",
            Self::AddTask => "add_task",
            Self::ListTasks => "list_tasks",
            Self::CompleteTask => "complete_task",
            Self::DeleteTask => "delete_task",
            Self::UpdateTask => "update_task",
        }
    }

    /// Resolves a wire name to a tool.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.name() == name)
    }

    /// The schema advertised to the language model for this tool.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        let user_id = || {
            ToolParameter::required(
                "user_id",
                "The unique identifier of the authenticated user",
                ParamKind::String,
            )
        };
        let task_id = |purpose: &str| {
            ToolParameter::required(
                "task_id",
                format!("The unique identifier of the task to be {purpose}"),
                ParamKind::String,
            )
        };

        match self {
            Self::GetUserProfile => ToolDefinition::new(
                self.name(),
                "Retrieve the authenticated user's profile information including id, email, \
                 name, and account creation date.",
            )
            .with_parameter(user_id()),
            Self::AddTask => ToolDefinition::new(self.name(), "Add a new task to the user's task list")
                .with_parameter(user_id())
                .with_parameter(ToolParameter::required(
                    "title",
                    "The title or name of the task",
                    ParamKind::String,
                ))
                .with_parameter(ToolParameter::optional(
                    "description",
                    "An optional detailed description of the task",
                    ParamKind::String,
                ))
                .with_parameter(ToolParameter::optional(
                    "priority",
                    "The priority of the task (low, medium, high)",
                    ParamKind::String,
                ))
                .with_parameter(ToolParameter::optional(
                    "due_date",
                    "The due date for the task in ISO format (YYYY-MM-DDTHH:MM:SSZ)",
                    ParamKind::String,
                )),
            Self::ListTasks => ToolDefinition::new(
                self.name(),
                "List tasks with optional filtering by status and priority",
            )
            .with_parameter(user_id())
            .with_parameter(ToolParameter::optional(
                "status",
                "Filter tasks by status (completed, pending, or all)",
                ParamKind::String,
            ))
            .with_parameter(ToolParameter::optional(
                "priority",
                "Filter tasks by priority (low, medium, high)",
                ParamKind::String,
            )),
            Self::CompleteTask => ToolDefinition::new(self.name(), "Mark a task as completed")
                .with_parameter(user_id())
                .with_parameter(task_id("completed")),
            Self::DeleteTask => {
                ToolDefinition::new(self.name(), "Delete a task from the user's task list")
                    .with_parameter(user_id())
                    .with_parameter(task_id("deleted"))
            }
            Self::UpdateTask => ToolDefinition::new(self.name(), "Update the details of an existing task")
                .with_parameter(user_id())
                .with_parameter(task_id("updated"))
                .with_parameter(ToolParameter::optional(
                    "title",
                    "The new title of the task (optional)",
                    ParamKind::String,
                ))
                .with_parameter(ToolParameter::optional(
                    "description",
                    "The new description of the task (optional)",
                    ParamKind::String,
                ))
                .with_parameter(ToolParameter::optional(
                    "priority",
                    "The new priority of the task (optional)",
                    ParamKind::String,
                ))
                .with_parameter(ToolParameter::optional(
                    "completed",
                    "Whether the task is completed (optional)",
                    ParamKind::Boolean,
                ))
                .with_parameter(ToolParameter::optional(
                    "due_date",
                    "The new due date for the task in ISO format (optional)",
                    ParamKind::String,
                )),
        }
    }

    /// Builds the registry advertising every tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateName`] if two tools were declared
    /// with the same wire name; construction from the closed enum makes
    /// this unreachable in practice, so callers treat it as a startup
    /// configuration error.
    pub fn registry() -> Result<ToolRegistry, ToolError> {
        ToolRegistry::new(Self::ALL.iter().map(|tool| tool.definition()).collect())
    }
}
