//! Conversation identity and ownership.

use crate::error::ConversationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskmate_core::{ConversationId, UserId};

/// A conversation thread between one user and the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: ConversationId,
    /// The user who owns this conversation. Only the owner may read it
    /// or append to it.
    pub user_id: UserId,
    /// Optional display title.
    pub title: Option<String>,
    /// Whether the conversation is still active. Nothing in this core
    /// deletes conversations; deactivation is an external concern.
    pub is_active: bool,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation last saw activity.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a new conversation for a user.
    #[must_use]
    pub fn new(user_id: UserId, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            user_id,
            title,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a conversation titled after its owner, used when a turn
    /// arrives without a conversation id.
    #[must_use]
    pub fn with_auto_title(user_id: UserId) -> Self {
        let display = user_id.to_string();
        let short: String = display.chars().take(12).collect();
        Self::new(user_id, Some(format!("Chat with {short}...")))
    }

    /// Returns true if `user_id` owns this conversation.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Bumps the activity timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Trait for conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Stores a new conversation.
    async fn create(&self, conversation: &Conversation) -> Result<(), ConversationError>;

    /// Fetches a conversation by id.
    async fn find(&self, id: ConversationId) -> Result<Option<Conversation>, ConversationError>;

    /// Bumps a conversation's activity timestamp.
    async fn touch(&self, id: ConversationId) -> Result<(), ConversationError>;

    /// Lists a user's conversations, most recent activity first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Conversation>, ConversationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_is_active() {
        let user_id = UserId::new();
        let conversation = Conversation::new(user_id, Some("Groceries".to_string()));

        assert!(conversation.is_active);
        assert!(conversation.is_owned_by(user_id));
        assert!(!conversation.is_owned_by(UserId::new()));
    }

    #[test]
    fn auto_title_names_the_owner() {
        let conversation = Conversation::with_auto_title(UserId::new());
        let title = conversation.title.expect("has title");
        assert!(title.starts_with("Chat with usr_"));
        assert!(title.ends_with("..."));
    }

    #[test]
    fn touch_moves_updated_at_forward() {
        let mut conversation = Conversation::new(UserId::new(), None);
        let before = conversation.updated_at;
        conversation.touch();
        assert!(conversation.updated_at >= before);
    }

    #[test]
    fn conversation_serde_roundtrip() {
        let conversation = Conversation::with_auto_title(UserId::new());
        let json = serde_json::to_string(&conversation).expect("serialize");
        let parsed: Conversation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(conversation.id, parsed.id);
        assert_eq!(conversation.title, parsed.title);
    }
}
