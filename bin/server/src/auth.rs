//! Caller identity extraction.
//!
//! Authentication itself happens upstream (the deployment fronts this
//! service with an auth proxy that verifies credentials). What reaches
//! this server is the already-verified user id in the `x-user-id`
//! header; the extractor only parses it into the typed id.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::str::FromStr;
use taskmate_core::UserId;

use crate::error::ApiError;

/// Header carrying the verified caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(ApiError::unauthenticated)?;

        let user_id = UserId::from_str(raw).map_err(|_| ApiError::unauthenticated())?;
        Ok(Self(user_id))
    }
}
