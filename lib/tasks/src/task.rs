//! Task types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskmate_core::{TaskId, UserId};

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal priority.
    Medium,
    /// Needs attention soon.
    High,
}

impl Priority {
    /// Returns the lowercase string form used in storage and tool parameters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a priority from its string form, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// The user who owns this task.
    pub user_id: UserId,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Task priority.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from its creation payload.
    #[must_use]
    pub fn new(new: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            completed: false,
            priority: new.priority,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update, leaving unset fields untouched.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = Utc::now();
    }

    /// Projects the task into the JSON shape tool results carry.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "title": self.title,
            "description": self.description,
            "priority": self.priority.as_str(),
            "completed": self.completed,
            "due_date": self.due_date.map(|d| d.to_rfc3339()),
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Owning user.
    pub user_id: UserId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority; defaults to medium.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates a payload with defaults for the optional fields.
    #[must_use]
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update for a task.
///
/// `None` fields are left untouched; there is no "clear field" signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New completion state.
    pub completed: Option<bool>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
    }
}

/// Completion-status filter for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Only completed tasks.
    Completed,
    /// Only open tasks.
    Pending,
}

impl StatusFilter {
    /// Parses a status filter from its string form, case-insensitively.
    ///
    /// Unrecognized values (including "all") mean no filtering.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Filter for task listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Restrict by completion status.
    pub status: Option<StatusFilter>,
    /// Restrict by priority.
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Returns true if the task passes the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            Some(StatusFilter::Completed) => task.completed,
            Some(StatusFilter::Pending) => !task.completed,
            None => true,
        };
        let priority_ok = match self.priority {
            Some(p) => task.priority == p,
            None => true,
        };
        status_ok && priority_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults() {
        let task = Task::new(NewTask::new(UserId::new(), "Buy milk"));
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn patch_leaves_unset_fields_untouched() {
        let mut task = Task::new(
            NewTask::new(UserId::new(), "Write report").with_description("quarterly numbers"),
        );
        task.apply(TaskPatch {
            priority: Some(Priority::High),
            ..TaskPatch::default()
        });

        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description.as_deref(), Some("quarterly numbers"));
    }

    #[test]
    fn empty_patch() {
        assert!(TaskPatch::default().is_empty());
        assert!(
            !TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse("medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn status_filter_parse() {
        assert_eq!(StatusFilter::parse("Completed"), Some(StatusFilter::Completed));
        assert_eq!(StatusFilter::parse("pending"), Some(StatusFilter::Pending));
        assert_eq!(StatusFilter::parse("all"), None);
    }

    #[test]
    fn filter_matches() {
        let mut task = Task::new(NewTask::new(UserId::new(), "t").with_priority(Priority::High));
        let filter = TaskFilter {
            status: Some(StatusFilter::Pending),
            priority: Some(Priority::High),
        };
        assert!(filter.matches(&task));

        task.completed = true;
        assert!(!filter.matches(&task));
    }

    #[test]
    fn task_serde_roundtrip() {
        let task = Task::new(NewTask::new(UserId::new(), "Serialize me"));
        let json = serde_json::to_string(&task).expect("serialize");
        let parsed: Task = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(task.id, parsed.id);
        assert_eq!(task.title, parsed.title);
    }
}
