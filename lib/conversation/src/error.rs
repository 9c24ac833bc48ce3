//! Error types for the conversation crate.

use std::fmt;
use taskmate_core::ConversationId;

/// Errors from conversation store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// Conversation does not exist.
    NotFound { id: ConversationId },
    /// Storage operation failed.
    StorageFailed { reason: String },
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "conversation not found: {id}"),
            Self::StorageFailed { reason } => {
                write!(f, "conversation storage failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ConversationError {}

/// Errors from message store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Tool-call and tool-result lists differ in length.
    MisalignedToolRecord { calls: usize, results: usize },
    /// Storage operation failed.
    StorageFailed { reason: String },
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MisalignedToolRecord { calls, results } => {
                write!(
                    f,
                    "tool record misaligned: {calls} call(s) but {results} result(s)"
                )
            }
            Self::StorageFailed { reason } => {
                write!(f, "message storage failed: {reason}")
            }
        }
    }
}

impl std::error::Error for MessageError {}

/// Errors from tool registry and parameter handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Two definitions share a name.
    DuplicateName { name: String },
    /// Requested tool is not registered.
    UnknownTool { name: String },
    /// A required parameter is absent.
    MissingParameter { tool: String, parameter: String },
    /// A parameter has the wrong shape.
    InvalidParameter {
        tool: String,
        parameter: String,
        reason: String,
    },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "duplicate tool name: {name}")
            }
            Self::UnknownTool { name } => write!(f, "unknown tool: {name}"),
            Self::MissingParameter { tool, parameter } => {
                write!(f, "tool '{tool}' missing parameter '{parameter}'")
            }
            Self::InvalidParameter {
                tool,
                parameter,
                reason,
            } => {
                write!(f, "invalid parameter '{parameter}' for tool '{tool}': {reason}")
            }
        }
    }
}

impl std::error::Error for ToolError {}
