//! User repository for database operations

use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::user::{self, Entity as User};

/// Repository for user account database operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    pub db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a new user account. Email uniqueness is enforced by the
    /// database; a duplicate surfaces as a unique violation.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<user::Model> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now.into()),
        };

        let created = model.insert(self.db.as_ref()).await?;
        tracing::info!(user_id = %created.id, "Created user account");
        Ok(created)
    }

    /// Finds a user by its normalized email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let found = User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Finds a user by its ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<user::Model>> {
        let found = User::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(found)
    }

    /// Loads a set of users by ID in one query.
    pub async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = User::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }
}
