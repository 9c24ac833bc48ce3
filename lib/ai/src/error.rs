//! Error types for the gateway crate.

use std::fmt;

/// Errors from gateway operations.
///
/// The orchestrator treats every variant as recoverable: a failed
/// gateway call degrades the reply, it never fails the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Backend could not be reached.
    Unavailable { reason: String },
    /// Backend rejected the request.
    RequestFailed { reason: String },
    /// Response body did not match the expected shape.
    ResponseParseFailed { reason: String },
    /// No response within the configured timeout.
    Timeout,
    /// Rate limit exceeded.
    RateLimited,
    /// Client-side configuration is unusable.
    InvalidConfig { reason: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => {
                write!(f, "gateway unavailable: {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "gateway request failed: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse gateway response: {reason}")
            }
            Self::Timeout => write!(f, "gateway request timed out"),
            Self::RateLimited => write!(f, "gateway rate limited"),
            Self::InvalidConfig { reason } => {
                write!(f, "invalid gateway configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::Unavailable {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn timeout_display() {
        assert_eq!(GatewayError::Timeout.to_string(), "gateway request timed out");
    }
}
