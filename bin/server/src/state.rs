//! Shared application state.

use std::sync::Arc;

use taskmate_assistant::ChatOrchestrator;
use taskmate_conversation::{ConversationStore, MessageStore};

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The conversation orchestration engine.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Conversation listing/lookup for the read endpoints.
    pub conversations: Arc<dyn ConversationStore>,
    /// Transcript access for the read endpoints.
    pub messages: Arc<dyn MessageStore>,
}

impl AppState {
    /// Creates the shared state.
    pub fn new(
        orchestrator: ChatOrchestrator,
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            conversations,
            messages,
        }
    }
}
