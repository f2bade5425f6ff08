//! Event repository for database operations

use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::event::{self, Entity as Event};

/// Input for creating an event listing.
#[derive(Debug, Clone)]
pub struct EventCreate {
    pub title: String,
    pub starts_at: chrono::DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Repository for event database operations
#[derive(Debug, Clone)]
pub struct EventRepository {
    pub db: Arc<DatabaseConnection>,
}

impl EventRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists all events ordered by start time, soonest first.
    pub async fn list(&self) -> Result<Vec<event::Model>> {
        let found = Event::find()
            .order_by_asc(event::Column::StartsAt)
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Creates an event listing.
    pub async fn create(&self, input: EventCreate) -> Result<event::Model> {
        let model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            starts_at: Set(input.starts_at.into()),
            location: Set(input.location),
            description: Set(input.description),
            url: Set(input.url),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now().into()),
        };

        let created = model.insert(self.db.as_ref()).await?;
        tracing::info!(event_id = %created.id, "Created event listing");
        Ok(created)
    }
}
