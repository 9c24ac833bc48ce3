//! Conversation orchestration engine for the taskmate platform.
//!
//! This crate turns one user utterance into a durable conversation
//! turn: it resolves the conversation, replays history to the language
//! model, executes any tool calls the model requests against the task
//! store, and persists the full exchange. It is the only place where
//! conversation identity, message ordering, side effects, and gateway
//! failure handling meet.

pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod reply;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::ToolDispatcher;
pub use error::TurnError;
pub use orchestrator::{ChatOrchestrator, ExecutedToolCall, TurnOutcome, FALLBACK_REPLY};
pub use tools::TaskTool;
