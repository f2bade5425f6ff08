//! Profile repository for database operations
//!
//! One profile per user, created lazily on first save. List entries are
//! trimmed and empty entries dropped before persisting so the search and
//! matching views never see blank strings.

use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::profile::{self, Entity as Profile, StringList};

/// Input for creating or replacing a profile.
#[derive(Debug, Clone)]
pub struct ProfileUpsert {
    pub full_name: String,
    pub faculty: String,
    pub major: String,
    pub courses: Vec<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub bio: Option<String>,
}

fn normalize_list(items: Vec<String>) -> StringList {
    StringList(
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Repository for profile database operations
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pub db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds the profile belonging to `user_id`.
    pub async fn get_by_user_id(&self, user_id: Uuid) -> Result<Option<profile::Model>> {
        let found = Profile::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Creates the profile for `user_id` on first save, or replaces every
    /// field on subsequent saves.
    pub async fn upsert(&self, user_id: Uuid, input: ProfileUpsert) -> Result<profile::Model> {
        let now = Utc::now();
        let courses = normalize_list(input.courses);
        let skills = normalize_list(input.skills);
        let interests = normalize_list(input.interests);
        let bio = input
            .bio
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        match self.get_by_user_id(user_id).await? {
            Some(existing) => {
                let mut model: profile::ActiveModel = existing.into();
                model.full_name = Set(input.full_name.trim().to_string());
                model.faculty = Set(input.faculty.trim().to_string());
                model.major = Set(input.major.trim().to_string());
                model.courses = Set(courses);
                model.skills = Set(skills);
                model.interests = Set(interests);
                model.bio = Set(bio);
                model.updated_at = Set(now.into());

                let updated = model.update(self.db.as_ref()).await?;
                tracing::debug!(user_id = %user_id, "Updated profile");
                Ok(updated)
            }
            None => {
                let model = profile::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    full_name: Set(input.full_name.trim().to_string()),
                    faculty: Set(input.faculty.trim().to_string()),
                    major: Set(input.major.trim().to_string()),
                    courses: Set(courses),
                    skills: Set(skills),
                    interests: Set(interests),
                    bio: Set(bio),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };

                let created = model.insert(self.db.as_ref()).await?;
                tracing::info!(user_id = %user_id, "Created profile");
                Ok(created)
            }
        }
    }

    /// Lists every profile except the one belonging to `user_id`, for the
    /// browse and search views.
    pub async fn list_others(&self, user_id: Uuid) -> Result<Vec<profile::Model>> {
        let found = Profile::find()
            .filter(profile::Column::UserId.ne(user_id))
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Loads the profiles for a set of user IDs in one query.
    pub async fn list_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<profile::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = Profile::find()
            .filter(profile::Column::UserId.is_in(user_ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::repositories::UserRepository;
    use migration::{Migrator, MigratorTrait};

    fn sample_input() -> ProfileUpsert {
        ProfileUpsert {
            full_name: "Sam Student".to_string(),
            faculty: "Science".to_string(),
            major: "Computer Science".to_string(),
            courses: vec!["CPSC 331".to_string()],
            skills: vec!["Rust".to_string()],
            interests: vec!["Hiking".to_string()],
            bio: Some("Third-year CS student".to_string()),
        }
    }

    #[tokio::test]
    async fn repeated_upsert_keeps_a_single_row() {
        let db = Arc::new(sea_orm::Database::connect("sqlite::memory:").await.unwrap());
        Migrator::up(db.as_ref(), None).await.unwrap();

        let user = UserRepository::new(Arc::clone(&db))
            .create("sam@ucalgary.ca", &hash_password("pw"))
            .await
            .unwrap();

        let repo = ProfileRepository::new(db);
        let first = repo.upsert(user.id, sample_input()).await.unwrap();
        let second = repo.upsert(user.id, sample_input()).await.unwrap();
        assert_eq!(first.id, second.id);

        let rows = Profile::find()
            .filter(profile::Column::UserId.eq(user.id))
            .all(repo.db.as_ref())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
