//! Session repository for database operations
//!
//! Sessions carry only the SHA-256 hash of the bearer token. Lookup happens
//! by hash, so a leaked sessions table does not leak usable tokens.

use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::session::{self, Entity as Session};

/// Repository for session database operations
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a session for `user_id` expiring `ttl_minutes` from now.
    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        ttl_minutes: u64,
    ) -> Result<session::Model> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(ttl_minutes as i64);
        let model = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at.into()),
            created_at: Set(now.into()),
        };

        let created = model.insert(self.db.as_ref()).await?;
        Ok(created)
    }

    /// Finds a session by token hash, returning `None` for unknown or
    /// expired tokens.
    pub async fn get_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<session::Model>> {
        let found = Session::find()
            .filter(session::Column::TokenHash.eq(token_hash))
            .one(self.db.as_ref())
            .await?;

        Ok(found.filter(|s| s.expires_at > Utc::now()))
    }

    /// Deletes the session with the given token hash (logout). Deleting an
    /// already-deleted session is not an error.
    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<u64> {
        let result = Session::delete_many()
            .filter(session::Column::TokenHash.eq(token_hash))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}
