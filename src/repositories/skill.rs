//! Skill catalog repository for database operations

use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::skill::{self, Entity as Skill};

/// Repository for the skill catalog
#[derive(Debug, Clone)]
pub struct SkillRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SkillRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists the full catalog in alphabetical order.
    pub async fn list(&self) -> Result<Vec<skill::Model>> {
        let found = Skill::find()
            .order_by_asc(skill::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Inserts a skill if it is not already present. Used by the seeder.
    pub async fn ensure(&self, name: &str) -> Result<skill::Model> {
        if let Some(existing) = Skill::find()
            .filter(skill::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?
        {
            return Ok(existing);
        }

        let model = skill::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
        };
        let created = model.insert(self.db.as_ref()).await?;
        Ok(created)
    }
}
