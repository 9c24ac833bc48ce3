//! Conversation model for the taskmate platform.
//!
//! A conversation is a durable, ordered transcript of user and
//! assistant messages, owned by exactly one user. This crate defines
//! the conversation and message records, the store contracts the
//! persistence layer implements, and the tool registry whose schemas
//! are advertised to the language model.

pub mod conversation;
pub mod error;
pub mod message;
pub mod tool;

pub use conversation::{Conversation, ConversationStore};
pub use error::{ConversationError, MessageError, ToolError};
pub use message::{Message, MessageRole, MessageStore, NewMessage, ToolInvocation};
pub use tool::{ParamKind, ToolDefinition, ToolParameter, ToolRegistry, ToolResult};
