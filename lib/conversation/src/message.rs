//! Message types for conversations.

use crate::error::MessageError;
use crate::tool::ToolResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use taskmate_core::{ConversationId, MessageId};

/// The role of a persisted message.
///
/// Only user and assistant turns are stored; tool activity is folded
/// into the assistant message that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User/human message.
    User,
    /// Assistant/AI message.
    Assistant,
}

impl MessageRole {
    /// Returns the lowercase string form used in storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parses a role from its storage form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A tool call as recorded on an assistant message.
///
/// Calls and their results are stored in two parallel lists correlated
/// by index, never by name, so two calls to the same tool within one
/// turn keep their own results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the invoked tool.
    pub name: String,
    /// Parameters the tool ran with.
    pub parameters: Map<String, JsonValue>,
}

impl ToolInvocation {
    /// Creates an invocation record.
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: Map<String, JsonValue>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// The conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Message role.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
    /// Position within the conversation, assigned by the store at write
    /// time. Strictly increasing from 0, equal to append order.
    pub sequence: i64,
    /// Tool calls made during this turn (assistant messages).
    pub tool_calls: Vec<ToolInvocation>,
    /// Results of those calls, index-aligned with `tool_calls`.
    pub tool_results: Vec<ToolResult>,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Returns true if this message carries tool activity.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A message awaiting persistence.
///
/// The store assigns the identifier, the sequence number, and the
/// timestamp; callers never supply ordering.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Target conversation.
    pub conversation_id: ConversationId,
    /// Message role.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
    /// Tool calls made during this turn.
    pub tool_calls: Vec<ToolInvocation>,
    /// Results of those calls, index-aligned with `tool_calls`.
    pub tool_results: Vec<ToolResult>,
}

impl NewMessage {
    /// Creates a user message.
    #[must_use]
    pub fn user(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    /// Creates an assistant message without tool activity.
    #[must_use]
    pub fn assistant(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    /// Attaches tool activity to an assistant message.
    #[must_use]
    pub fn with_tool_record(
        mut self,
        tool_calls: Vec<ToolInvocation>,
        tool_results: Vec<ToolResult>,
    ) -> Self {
        self.tool_calls = tool_calls;
        self.tool_results = tool_results;
        self
    }

    /// Checks the call/result alignment invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::MisalignedToolRecord`] when the two lists
    /// differ in length.
    pub fn validate(&self) -> Result<(), MessageError> {
        if self.tool_calls.len() == self.tool_results.len() {
            Ok(())
        } else {
            Err(MessageError::MisalignedToolRecord {
                calls: self.tool_calls.len(),
                results: self.tool_results.len(),
            })
        }
    }
}

/// Trait for message persistence.
///
/// Implementations must serialize sequence assignment per conversation:
/// two concurrent appends to the same conversation must never produce
/// duplicate or out-of-order sequence numbers.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a message, assigning the next sequence number, and
    /// returns the stored record.
    async fn append(&self, new: NewMessage) -> Result<Message, MessageError>;

    /// Lists a conversation's messages ordered by sequence.
    async fn list(&self, conversation_id: ConversationId) -> Result<Vec<Message>, MessageError>;
}
