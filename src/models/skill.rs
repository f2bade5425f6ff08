//! Skill entity model
//!
//! The master catalog of skill names offered as suggestions during profile
//! editing. Seeded at startup and read-only at runtime.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveModelBehavior;
use uuid::Uuid;

/// Skill catalog entry
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    /// Unique identifier for the skill (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Skill name (unique)
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
