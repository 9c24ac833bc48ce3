//! HTTP routes.
//!
//! Every response uses the `{"success": ..., "data"/"error": ...}`
//! envelope. The chat endpoint is the single write path; the two
//! conversation endpoints are read-only views over the same stores the
//! orchestrator writes through.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::str::FromStr;
use taskmate_assistant::TurnError;
use taskmate_core::{ConversationId, UserId};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/{user_id}/chat", post(chat))
        .route("/api/conversations/{user_id}", get(list_conversations))
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(list_messages),
        )
        .with_state(state)
}

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
struct ChatBody {
    /// The user's message.
    message: String,
    /// Continue an existing conversation, or start a new one if absent.
    conversation_id: Option<String>,
}

fn success(data: JsonValue) -> Json<JsonValue> {
    Json(serde_json::json!({ "success": true, "data": data }))
}

/// Checks that the path user is the authenticated caller.
fn own_path_user(raw: &str, caller: UserId, message: &str) -> Result<UserId, ApiError> {
    match UserId::from_str(raw) {
        Ok(user_id) if user_id == caller => Ok(user_id),
        _ => Err(ApiError::forbidden(message)),
    }
}

async fn chat(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(body): Json<ChatBody>,
) -> Result<Json<JsonValue>, ApiError> {
    let user_id = own_path_user(
        &user_id,
        caller,
        "You can only access your own chat conversations",
    )?;

    // An unparseable conversation id gets the same rejection as an
    // unknown one; the id format is not worth distinguishing to a
    // caller who cannot own such a conversation anyway.
    let conversation_id = match body.conversation_id.as_deref() {
        None => None,
        Some(raw) => Some(
            ConversationId::from_str(raw).map_err(|_| ApiError::from(TurnError::NotAccessible))?,
        ),
    };

    let outcome = state
        .orchestrator
        .handle_turn(user_id, &body.message, conversation_id)
        .await?;

    let tool_calls: Vec<JsonValue> = outcome
        .tool_calls
        .iter()
        .map(|call| {
            serde_json::json!({
                "name": call.name,
                "parameters": call.parameters,
            })
        })
        .collect();

    Ok(success(serde_json::json!({
        "conversation_id": outcome.conversation_id.to_string(),
        "response": outcome.reply,
        "tool_calls": tool_calls,
    })))
}

async fn list_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<Json<JsonValue>, ApiError> {
    let user_id = own_path_user(
        &user_id,
        caller,
        "You can only access your own conversations",
    )?;

    let conversations = state
        .conversations
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to list conversations");
            ApiError::internal()
        })?;

    Ok(success(serde_json::json!({
        "total": conversations.len(),
        "conversations": conversations,
    })))
}

async fn list_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<Json<JsonValue>, ApiError> {
    let conversation_id = ConversationId::from_str(&conversation_id)
        .map_err(|_| ApiError::conversation_not_found())?;

    let conversation = state
        .conversations
        .find(conversation_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch conversation");
            ApiError::internal()
        })?
        .ok_or_else(ApiError::conversation_not_found)?;

    if !conversation.is_owned_by(caller) {
        return Err(ApiError::conversation_forbidden());
    }

    let messages = state.messages.list(conversation_id).await.map_err(|e| {
        tracing::error!(error = %e, "failed to list messages");
        ApiError::internal()
    })?;

    Ok(success(serde_json::json!({
        "total": messages.len(),
        "messages": messages,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_conversation_id_is_optional() {
        let body: ChatBody =
            serde_json::from_str(r#"{"message": "hi"}"#).expect("deserialize");
        assert_eq!(body.message, "hi");
        assert!(body.conversation_id.is_none());
    }

    #[test]
    fn path_user_must_match_caller() {
        let caller = UserId::new();
        assert!(own_path_user(&caller.to_string(), caller, "nope").is_ok());

        let err = own_path_user(&UserId::new().to_string(), caller, "nope").unwrap_err();
        assert_eq!(err.code, "AUTH_002");

        let err = own_path_user("garbage", caller, "nope").unwrap_err();
        assert_eq!(err.code, "AUTH_002");
    }
}
