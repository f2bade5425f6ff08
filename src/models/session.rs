//! Session entity model
//!
//! Stores hashed bearer tokens for logged-in users. The plaintext token is
//! only ever returned to the client at login time.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::ActiveModelBehavior;
use uuid::Uuid;

/// Session entity representing an active login
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Unique identifier for the session (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// The user this session belongs to
    pub user_id: Uuid,

    /// SHA-256 hash of the opaque bearer token (unique)
    pub token_hash: String,

    /// Timestamp after which the token is no longer accepted
    pub expires_at: DateTimeWithTimeZone,

    /// Timestamp when the session was created
    pub created_at: DateTimeWithTimeZone,
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
