//! Event entity model
//!
//! Campus events surfaced on the events page, ordered by start time.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::ActiveModelBehavior;
use uuid::Uuid;

/// Event entity representing a campus event listing
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Event title
    pub title: String,

    /// When the event starts
    pub starts_at: DateTimeWithTimeZone,

    /// Where the event takes place (optional)
    pub location: Option<String>,

    /// Longer description (optional)
    pub description: Option<String>,

    /// External link with more details (optional)
    pub url: Option<String>,

    /// User who created the listing, if any
    pub created_by: Option<Uuid>,

    /// Timestamp when the listing was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
