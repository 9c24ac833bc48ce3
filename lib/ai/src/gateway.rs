//! Gateway request/response types and the `ChatGateway` trait.

use crate::error::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// The speaker of a prior turn sent to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Human message.
    User,
    /// Model message.
    Assistant,
}

/// A prior turn, projected down to what the model needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayTurn {
    /// Who spoke.
    pub role: TurnRole,
    /// What was said.
    pub content: String,
}

impl GatewayTurn {
    /// Creates a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// A request to the gateway: one new message plus its context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The new user message.
    pub message: String,
    /// Prior turns in order, excluding the new message.
    pub history: Vec<GatewayTurn>,
    /// Tool schemas advertised to the model, in the wire format the
    /// registry exports.
    pub tools: Vec<JsonValue>,
}

impl ChatRequest {
    /// Creates a request with no history or tools.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Sets the prior turns.
    #[must_use]
    pub fn with_history(mut self, history: Vec<GatewayTurn>) -> Self {
        self.history = history;
        self
    }

    /// Sets the advertised tool schemas.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<JsonValue>) -> Self {
        self.tools = tools;
        self
    }
}

/// A tool invocation requested by the model.
///
/// Transient: produced by one gateway reply, consumed by the dispatcher
/// within the same turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedToolCall {
    /// Name of the tool the model wants to run.
    pub name: String,
    /// Parameter name to value mapping, as the model produced it.
    pub parameters: Map<String, JsonValue>,
}

/// What the gateway returned for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayReply {
    /// Generated text.
    pub text: String,
    /// Tool calls the model requested, in the order it requested them.
    pub tool_calls: Vec<RequestedToolCall>,
}

/// Trait for language-model gateways.
///
/// The single injected seam between the orchestrator and the outside
/// world: one method, one explicit failure channel. Every error is
/// recoverable from the orchestrator's point of view.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Generates a reply for the request.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the backend is unreachable, times
    /// out, rejects the request, or produces an unparseable response.
    async fn generate(&self, request: &ChatRequest) -> Result<GatewayReply, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = ChatRequest::new("add a task")
            .with_history(vec![GatewayTurn::user("hi"), GatewayTurn::assistant("hello")])
            .with_tools(vec![serde_json::json!({"name": "add_task"})]);

        assert_eq!(request.message, "add a task");
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.tools.len(), 1);
    }

    #[test]
    fn turn_roles_serialize_lowercase() {
        let turn = GatewayTurn::assistant("done");
        let json = serde_json::to_value(&turn).expect("serialize");
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn requested_tool_call_roundtrip() {
        let mut parameters = Map::new();
        parameters.insert("title".to_string(), JsonValue::String("Buy milk".into()));
        let call = RequestedToolCall {
            name: "add_task".to_string(),
            parameters,
        };

        let json = serde_json::to_string(&call).expect("serialize");
        let parsed: RequestedToolCall = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.name, "add_task");
        assert_eq!(parsed.parameters["title"], "Buy milk");
    }
}
