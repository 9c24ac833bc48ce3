//! Error types for the assistant crate.

use std::fmt;

/// Errors from handling one conversation turn.
///
/// Deliberately small: gateway failures and individual tool failures
/// are recovered inside the turn and never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// The supplied conversation id does not exist, or belongs to a
    /// different user. One undifferentiated rejection for both, so a
    /// caller cannot probe for the existence of other users'
    /// conversations.
    NotAccessible,
    /// A store operation failed; the turn did not complete.
    Persistence { reason: String },
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAccessible => {
                write!(
                    f,
                    "Conversation not found or you don't have permission to access it"
                )
            }
            Self::Persistence { reason } => {
                write!(f, "persistence failed: {reason}")
            }
        }
    }
}

impl std::error::Error for TurnError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_accessible_reveals_nothing() {
        let text = TurnError::NotAccessible.to_string();
        assert!(text.contains("not found or you don't have permission"));
    }

    #[test]
    fn persistence_error_display() {
        let err = TurnError::Persistence {
            reason: "pool exhausted".to_string(),
        };
        assert!(err.to_string().contains("pool exhausted"));
    }
}
