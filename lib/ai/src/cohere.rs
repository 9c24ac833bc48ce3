//! Cohere chat API backend.
//!
//! Speaks the Cohere v1 `/chat` endpoint with tool support. The client
//! carries a fixed request timeout; the orchestrator maps any failure
//! here onto its fallback reply, so nothing retries.

use crate::error::GatewayError;
use crate::gateway::{ChatGateway, ChatRequest, GatewayReply, RequestedToolCall, TurnRole};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::time::Duration;

/// Default Cohere API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "command-r-08-2024";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Cohere backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CohereConfig {
    /// API key.
    pub api_key: String,
    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl CohereConfig {
    /// Creates a configuration with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One prior turn in Cohere's wire format.
#[derive(Debug, Serialize)]
struct WireHistoryEntry {
    role: &'static str,
    message: String,
}

/// Tool call as Cohere returns it.
#[derive(Debug, Deserialize)]
struct WireToolCall {
    name: String,
    #[serde(default)]
    parameters: Map<String, JsonValue>,
}

/// Response body for the `/v1/chat` endpoint, reduced to what we use.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

/// Gateway backed by the Cohere chat API.
#[derive(Debug)]
pub struct CohereChatGateway {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CohereChatGateway {
    /// Builds a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if the key is empty or the
    /// HTTP client cannot be constructed.
    pub fn new(config: CohereConfig) -> Result<Self, GatewayError> {
        if config.api_key.is_empty() {
            return Err(GatewayError::InvalidConfig {
                reason: "api_key must not be empty".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
        })
    }

    fn wire_history(request: &ChatRequest) -> Vec<WireHistoryEntry> {
        request
            .history
            .iter()
            .map(|turn| WireHistoryEntry {
                role: match turn.role {
                    TurnRole::User => "USER",
                    TurnRole::Assistant => "CHATBOT",
                },
                message: turn.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ChatGateway for CohereChatGateway {
    async fn generate(&self, request: &ChatRequest) -> Result<GatewayReply, GatewayError> {
        let mut body = serde_json::json!({
            "model": self.model,
            "message": request.message,
            "chat_history": Self::wire_history(request),
        });
        if !request.tools.is_empty() {
            body["tools"] = JsonValue::Array(request.tools.clone());
        }

        let url = format!("{}/v1/chat", self.base_url);
        tracing::debug!(
            model = %self.model,
            history_len = request.history.len(),
            tools = request.tools.len(),
            "calling chat gateway"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::Unavailable {
                        reason: e.to_string(),
                    }
                } else {
                    GatewayError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed {
                reason: format!("status {status}: {detail}"),
            });
        }

        let parsed: WireResponse =
            response
                .json()
                .await
                .map_err(|e| GatewayError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        Ok(GatewayReply {
            text: parsed.text,
            tool_calls: parsed
                .tool_calls
                .into_iter()
                .map(|tc| RequestedToolCall {
                    name: tc.name,
                    parameters: tc.parameters,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayTurn;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = CohereChatGateway::new(CohereConfig::new("")).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConfig { .. }));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let mut config = CohereConfig::new("key");
        config.base_url = "https://api.cohere.com/".to_string();
        let gateway = CohereChatGateway::new(config).expect("build gateway");
        assert_eq!(gateway.base_url, "https://api.cohere.com");
    }

    #[test]
    fn history_maps_to_cohere_roles() {
        let request = ChatRequest::new("next").with_history(vec![
            GatewayTurn::user("first"),
            GatewayTurn::assistant("reply"),
        ]);

        let wire = CohereChatGateway::wire_history(&request);
        assert_eq!(wire[0].role, "USER");
        assert_eq!(wire[1].role, "CHATBOT");
        assert_eq!(wire[1].message, "reply");
    }

    #[test]
    fn wire_response_tolerates_missing_tool_calls() {
        let parsed: WireResponse =
            serde_json::from_str(r#"{"text": "hello"}"#).expect("deserialize");
        assert_eq!(parsed.text, "hello");
        assert!(parsed.tool_calls.is_empty());
    }
}
