//! User profile repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use taskmate_core::UserId;
use taskmate_tasks::{ProfileError, ProfileStore, UserProfile};

/// Row type for profile queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_profile(self) -> Result<UserProfile, ProfileError> {
        let id = UserId::from_str(&self.id).map_err(|e| ProfileError::StorageFailed {
            reason: format!("invalid user id '{}': {e}", self.id),
        })?;

        Ok(UserProfile {
            id,
            email: self.email,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// Repository for user profile lookups.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find(&self, user_id: UserId) -> Result<UserProfile, ProfileError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProfileError::StorageFailed {
            reason: e.to_string(),
        })?;

        row.ok_or(ProfileError::NotFound { id: user_id })?
            .try_into_profile()
    }
}
