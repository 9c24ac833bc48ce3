//! Conversation repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use taskmate_conversation::{Conversation, ConversationError, ConversationStore};
use taskmate_core::{ConversationId, UserId};

/// Row type for conversation queries.
#[derive(FromRow)]
struct ConversationRow {
    id: String,
    user_id: String,
    title: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationRow {
    fn try_into_conversation(self) -> Result<Conversation, ConversationError> {
        let id = ConversationId::from_str(&self.id).map_err(|e| {
            ConversationError::StorageFailed {
                reason: format!("invalid conversation id '{}': {e}", self.id),
            }
        })?;
        let user_id =
            UserId::from_str(&self.user_id).map_err(|e| ConversationError::StorageFailed {
                reason: format!("invalid user id '{}': {e}", self.user_id),
            })?;

        Ok(Conversation {
            id,
            user_id,
            title: self.title,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for conversation records.
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<(), ConversationError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, title, is_active, next_sequence, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, $5, $6)
            "#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.user_id.to_string())
        .bind(&conversation.title)
        .bind(conversation.is_active)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(())
    }

    async fn find(&self, id: ConversationId) -> Result<Option<Conversation>, ConversationError> {
        let row: Option<ConversationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, is_active, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match row {
            Some(row) => Ok(Some(row.try_into_conversation()?)),
            None => Ok(None),
        }
    }

    async fn touch(&self, id: ConversationId) -> Result<(), ConversationError> {
        let result = sqlx::query(
            r#"
            UPDATE conversations
            SET updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(ConversationError::NotFound { id });
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Conversation>, ConversationError> {
        let rows: Vec<ConversationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, is_active, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter()
            .map(ConversationRow::try_into_conversation)
            .collect()
    }
}

fn storage(err: sqlx::Error) -> ConversationError {
    ConversationError::StorageFailed {
        reason: err.to_string(),
    }
}
