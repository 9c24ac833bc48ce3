//! Message repository.
//!
//! Sequence numbers come from the `next_sequence` counter on the
//! conversation row, advanced and read inside the same transaction as
//! the message insert. The row update takes a row-level lock, so two
//! concurrent appends to one conversation serialize and can neither
//! duplicate nor reorder sequence numbers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use taskmate_conversation::{
    Message, MessageError, MessageRole, MessageStore, NewMessage, ToolInvocation, ToolResult,
};
use taskmate_core::{ConversationId, MessageId};

/// Row type for message queries.
#[derive(FromRow)]
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    sequence_number: i64,
    tool_calls: serde_json::Value,
    tool_results: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn try_into_message(self) -> Result<Message, MessageError> {
        let id = MessageId::from_str(&self.id).map_err(|e| MessageError::StorageFailed {
            reason: format!("invalid message id '{}': {e}", self.id),
        })?;
        let conversation_id = ConversationId::from_str(&self.conversation_id).map_err(|e| {
            MessageError::StorageFailed {
                reason: format!("invalid conversation id '{}': {e}", self.conversation_id),
            }
        })?;
        let role = MessageRole::parse(&self.role).ok_or_else(|| MessageError::StorageFailed {
            reason: format!("invalid message role '{}'", self.role),
        })?;
        let tool_calls: Vec<ToolInvocation> =
            serde_json::from_value(self.tool_calls).map_err(|e| MessageError::StorageFailed {
                reason: format!("invalid tool_calls column: {e}"),
            })?;
        let tool_results: Vec<ToolResult> =
            serde_json::from_value(self.tool_results).map_err(|e| MessageError::StorageFailed {
                reason: format!("invalid tool_results column: {e}"),
            })?;

        Ok(Message {
            id,
            conversation_id,
            role,
            content: self.content,
            sequence: self.sequence_number,
            tool_calls,
            tool_results,
            created_at: self.created_at,
        })
    }
}

/// Repository for message records.
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(&self, new: NewMessage) -> Result<Message, MessageError> {
        new.validate()?;

        let mut tx = self.pool.begin().await.map_err(storage)?;

        // Advance the per-conversation counter and claim its previous
        // value as this message's sequence number.
        let sequence: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE conversations
            SET next_sequence = next_sequence + 1
            WHERE id = $1
            RETURNING next_sequence - 1
            "#,
        )
        .bind(new.conversation_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?;

        let Some((sequence,)) = sequence else {
            return Err(MessageError::StorageFailed {
                reason: format!("conversation {} does not exist", new.conversation_id),
            });
        };

        let message = Message {
            id: MessageId::new(),
            conversation_id: new.conversation_id,
            role: new.role,
            content: new.content,
            sequence,
            tool_calls: new.tool_calls,
            tool_results: new.tool_results,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO messages
                (id, conversation_id, role, content, sequence_number, tool_calls, tool_results, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.sequence)
        .bind(serde_json::to_value(&message.tool_calls).map_err(json)?)
        .bind(serde_json::to_value(&message.tool_results).map_err(json)?)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        Ok(message)
    }

    async fn list(&self, conversation_id: ConversationId) -> Result<Vec<Message>, MessageError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, conversation_id, role, content, sequence_number, tool_calls, tool_results, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sequence_number ASC
            "#,
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter().map(MessageRow::try_into_message).collect()
    }
}

fn storage(err: sqlx::Error) -> MessageError {
    MessageError::StorageFailed {
        reason: err.to_string(),
    }
}

fn json(err: serde_json::Error) -> MessageError {
    MessageError::StorageFailed {
        reason: format!("failed to encode tool record: {err}"),
    }
}
