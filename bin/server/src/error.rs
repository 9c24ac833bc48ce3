//! Domain error types for server operations.
//!
//! Two layers: [`StartupError`] for bringing the server up (propagated
//! as a rootcause report), and [`ApiError`] for request handling, which
//! renders as the `{code, message}` envelope the API exposes. Internal
//! detail stays in the logs; it never crosses the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;
use taskmate_assistant::TurnError;

/// Errors while bringing the server up.
#[derive(Debug)]
pub enum StartupError {
    /// Configuration could not be loaded.
    ConfigLoad { details: String },
    /// Database connection failed.
    DatabaseConnect { details: String },
    /// Migrations failed to apply.
    Migrate { details: String },
    /// Gateway client could not be constructed.
    GatewayInit { details: String },
    /// Tool registry failed startup validation.
    RegistryInit { details: String },
    /// Listener could not bind.
    Bind { addr: String, details: String },
    /// Serving failed.
    Serve { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigLoad { details } => {
                write!(f, "failed to load configuration: {details}")
            }
            Self::DatabaseConnect { details } => {
                write!(f, "failed to connect to database: {details}")
            }
            Self::Migrate { details } => {
                write!(f, "failed to run migrations: {details}")
            }
            Self::GatewayInit { details } => {
                write!(f, "failed to initialize gateway client: {details}")
            }
            Self::RegistryInit { details } => {
                write!(f, "failed to build tool registry: {details}")
            }
            Self::Bind { addr, details } => {
                write!(f, "failed to bind '{addr}': {details}")
            }
            Self::Serve { details } => write!(f, "server error: {details}"),
        }
    }
}

impl std::error::Error for StartupError {}

/// A user-visible API error: stable code, safe message, HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Stable error code, e.g. `CHAT_001`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// HTTP status the envelope is served with.
    pub status: StatusCode,
}

impl ApiError {
    /// Caller identity is missing or malformed.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            code: "AUTH_001",
            message: "Missing or invalid user identity".to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    /// Caller tried to act on another user's resources.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "AUTH_002",
            message: message.into(),
            status: StatusCode::FORBIDDEN,
        }
    }

    /// Conversation lookup failed for the messages endpoint.
    #[must_use]
    pub fn conversation_not_found() -> Self {
        Self {
            code: "MSG_001",
            message: "Conversation not found".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }

    /// Conversation belongs to someone else (messages endpoint).
    #[must_use]
    pub fn conversation_forbidden() -> Self {
        Self {
            code: "MSG_002",
            message: "You don't have access to this conversation".to_string(),
            status: StatusCode::FORBIDDEN,
        }
    }

    /// Catch-all internal failure.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            code: "GENERAL_001",
            message: "An unexpected error occurred".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::NotAccessible => Self {
                code: "CHAT_001",
                message: err.to_string(),
                status: StatusCode::NOT_FOUND,
            },
            TurnError::Persistence { reason } => {
                tracing::error!(reason = %reason, "turn failed on persistence");
                Self::internal()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": self.code,
                "message": self.message,
            },
        });
        (self.status, Json(body)).into_response()
    }
}
