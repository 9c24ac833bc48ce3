//! User profile projection.
//!
//! Account management (registration, credentials) lives upstream; the
//! assistant only ever needs a read-only view of who it is talking to.

use crate::error::ProfileError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskmate_core::UserId;

/// Read-only view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Account email address.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Projects the profile into the JSON shape tool results carry.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "email": self.email,
            "name": self.name,
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

/// Trait for profile lookup.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches a profile by user id.
    async fn find(&self, user_id: UserId) -> Result<UserProfile, ProfileError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_json_shape() {
        let profile = UserProfile {
            id: UserId::new(),
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            created_at: Utc::now(),
        };

        let json = profile.to_json();
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["name"], "Ada");
    }
}
