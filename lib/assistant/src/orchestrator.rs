//! The conversation orchestrator.
//!
//! One entry point, [`ChatOrchestrator::handle_turn`], drives a whole
//! turn: resolve the conversation, replay history, call the gateway,
//! run requested tools, persist both sides of the exchange, and
//! compose the reply.
//!
//! Durability rules: the user's message is persisted before the gateway
//! is called, so a gateway outage never loses input; a gateway failure
//! is answered with a fixed fallback reply and the turn still
//! completes; a failing tool call is recorded inline and does not stop
//! its siblings. Only a conversation-access rejection (before anything
//! is written) or a store failure aborts the turn.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use taskmate_ai::{ChatGateway, ChatRequest, GatewayTurn, TurnRole};
use taskmate_conversation::{
    Conversation, ConversationError, ConversationStore, Message, MessageError, MessageRole,
    MessageStore, NewMessage, ToolError, ToolInvocation, ToolRegistry, ToolResult,
};
use taskmate_core::{ConversationId, UserId};

use crate::dispatcher::ToolDispatcher;
use crate::error::TurnError;
use crate::reply;
use crate::tools::TaskTool;

/// Reply served when the gateway cannot be reached. The turn still
/// persists, so the transcript stays consistent across the outage.
pub const FALLBACK_REPLY: &str = "Hello! I'm your AI assistant. I'm currently experiencing \
    connectivity issues with my advanced features, but I'm here to help you manage your tasks. \
    You can ask me to add, list, complete, or delete tasks.";

/// One tool call that ran during a turn, with its outcome.
#[derive(Debug, Clone)]
pub struct ExecutedToolCall {
    /// Tool name.
    pub name: String,
    /// Parameters the tool ran with, after the caller-identity
    /// override.
    pub parameters: Map<String, JsonValue>,
    /// The call's result.
    pub result: ToolResult,
}

impl ExecutedToolCall {
    /// The call record persisted on the assistant message (results are
    /// stored separately, index-aligned).
    #[must_use]
    pub fn invocation(&self) -> ToolInvocation {
        ToolInvocation::new(self.name.clone(), self.parameters.clone())
    }
}

/// The result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The conversation the turn belongs to; freshly created when the
    /// caller supplied no id.
    pub conversation_id: ConversationId,
    /// The composed assistant reply.
    pub reply: String,
    /// Tool calls executed this turn, in execution order.
    pub tool_calls: Vec<ExecutedToolCall>,
}

/// Coordinates conversations, the gateway, and tool execution.
pub struct ChatOrchestrator {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    gateway: Arc<dyn ChatGateway>,
    dispatcher: ToolDispatcher,
    registry: ToolRegistry,
}

impl ChatOrchestrator {
    /// Creates an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] if the tool registry fails its startup
    /// validation.
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        gateway: Arc<dyn ChatGateway>,
        dispatcher: ToolDispatcher,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            conversations,
            messages,
            gateway,
            dispatcher,
            registry: TaskTool::registry()?,
        })
    }

    /// Handles one user turn.
    ///
    /// # Errors
    ///
    /// [`TurnError::NotAccessible`] when the supplied conversation id is
    /// unknown or owned by someone else (nothing is written);
    /// [`TurnError::Persistence`] when a store operation fails.
    pub async fn handle_turn(
        &self,
        user_id: UserId,
        text: &str,
        conversation_id: Option<ConversationId>,
    ) -> Result<TurnOutcome, TurnError> {
        let conversation_id = self.resolve_conversation(user_id, conversation_id).await?;

        // Everything already said, in order, projected down to the
        // {role, content} pairs the gateway consumes. All prior turns
        // are sent; there is no windowing.
        let history: Vec<GatewayTurn> = self
            .messages
            .list(conversation_id)
            .await
            .map_err(message_failure)?
            .iter()
            .map(project_turn)
            .collect();

        // The user's message is durable before the gateway can fail.
        self.messages
            .append(NewMessage::user(conversation_id, text))
            .await
            .map_err(message_failure)?;

        let request = ChatRequest::new(text)
            .with_history(history)
            .with_tools(self.registry.to_gateway_schemas());

        let generated = match self.gateway.generate(&request).await {
            Ok(generated) => generated,
            Err(err) => {
                tracing::warn!(
                    conversation = %conversation_id,
                    error = %err,
                    "gateway call failed, serving fallback reply"
                );
                self.messages
                    .append(NewMessage::assistant(conversation_id, FALLBACK_REPLY))
                    .await
                    .map_err(message_failure)?;
                return Ok(TurnOutcome {
                    conversation_id,
                    reply: FALLBACK_REPLY.to_string(),
                    tool_calls: Vec::new(),
                });
            }
        };

        let mut executed = Vec::with_capacity(generated.tool_calls.len());
        for requested in generated.tool_calls {
            let mut parameters = requested.parameters;
            // The model's parameters never decide who the call acts for.
            parameters.insert(
                "user_id".to_string(),
                JsonValue::String(user_id.to_string()),
            );

            let invocation = ToolInvocation::new(requested.name.clone(), parameters.clone());
            let result = self.dispatcher.dispatch(&invocation).await;
            tracing::info!(
                conversation = %conversation_id,
                tool = %requested.name,
                success = result.is_success(),
                "tool call executed"
            );
            executed.push(ExecutedToolCall {
                name: requested.name,
                parameters,
                result,
            });
        }

        let reply_text = reply::compose(&generated.text, &executed);

        let calls: Vec<ToolInvocation> = executed.iter().map(ExecutedToolCall::invocation).collect();
        let results: Vec<ToolResult> = executed.iter().map(|call| call.result.clone()).collect();
        self.messages
            .append(
                NewMessage::assistant(conversation_id, reply_text.clone())
                    .with_tool_record(calls, results),
            )
            .await
            .map_err(message_failure)?;

        self.conversations
            .touch(conversation_id)
            .await
            .map_err(conversation_failure)?;

        Ok(TurnOutcome {
            conversation_id,
            reply: reply_text,
            tool_calls: executed,
        })
    }

    /// Resolves the conversation for a turn: create one when no id was
    /// supplied, otherwise fetch and check ownership. A missing
    /// conversation and a foreign conversation get the same rejection.
    async fn resolve_conversation(
        &self,
        user_id: UserId,
        conversation_id: Option<ConversationId>,
    ) -> Result<ConversationId, TurnError> {
        match conversation_id {
            None => {
                let conversation = Conversation::with_auto_title(user_id);
                self.conversations
                    .create(&conversation)
                    .await
                    .map_err(conversation_failure)?;
                tracing::debug!(conversation = %conversation.id, "created conversation");
                Ok(conversation.id)
            }
            Some(id) => match self
                .conversations
                .find(id)
                .await
                .map_err(conversation_failure)?
            {
                Some(conversation) if conversation.is_owned_by(user_id) => Ok(conversation.id),
                _ => Err(TurnError::NotAccessible),
            },
        }
    }
}

fn project_turn(message: &Message) -> GatewayTurn {
    GatewayTurn {
        role: match message.role {
            MessageRole::User => TurnRole::User,
            MessageRole::Assistant => TurnRole::Assistant,
        },
        content: message.content.clone(),
    }
}

fn conversation_failure(err: ConversationError) -> TurnError {
    TurnError::Persistence {
        reason: err.to_string(),
    }
}

fn message_failure(err: MessageError) -> TurnError {
    TurnError::Persistence {
        reason: err.to_string(),
    }
}
