//! Profile entity model
//!
//! This module contains the SeaORM entity model for the profiles table,
//! which stores the academic profile a user fills in after registration.
//! Courses, skills and interests are JSON arrays of strings.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelBehavior, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JSON-backed list of strings used for courses, skills and interests.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

/// Profile entity representing a user's academic profile
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Unique identifier for the profile (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning user (unique, one profile per user)
    pub user_id: Uuid,

    /// Display name shown to other students
    pub full_name: String,

    /// Faculty, e.g. "Science" or "Engineering"
    pub faculty: String,

    /// Major, e.g. "Computer Science"
    pub major: String,

    /// Course codes currently enrolled in, e.g. ["CPSC 331"]
    #[sea_orm(column_type = "JsonBinary")]
    pub courses: StringList,

    /// Self-reported skills
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: StringList,

    /// Self-reported interests
    #[sea_orm(column_type = "JsonBinary")]
    pub interests: StringList,

    /// Free-form bio (optional)
    pub bio: Option<String>,

    /// Timestamp when the profile was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the profile was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
