//! Error types for the tasks crate.

use std::fmt;
use taskmate_core::{TaskId, UserId};

/// Errors from task store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task does not exist, or is not owned by the requesting user.
    NotFound { id: TaskId },
    /// Storage operation failed.
    StorageFailed { reason: String },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "task not found: {id}"),
            Self::StorageFailed { reason } => {
                write!(f, "task storage failed: {reason}")
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// Errors from profile lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// No account with this id.
    NotFound { id: UserId },
    /// Storage operation failed.
    StorageFailed { reason: String },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "user not found: {id}"),
            Self::StorageFailed { reason } => {
                write!(f, "profile storage failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ProfileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_error_display() {
        let id = TaskId::new();
        let err = TaskError::NotFound { id };
        assert!(err.to_string().contains("task not found"));
    }

    #[test]
    fn profile_error_display() {
        let err = ProfileError::StorageFailed {
            reason: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("connection reset"));
    }
}
