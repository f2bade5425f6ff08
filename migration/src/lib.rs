//! Database migrations for the UCalgaryConnect API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_05_01_000001_create_users;
mod m2025_05_01_000002_create_sessions;
mod m2025_05_01_000100_create_profiles;
mod m2025_05_01_000200_create_connections;
mod m2025_05_01_000300_create_events;
mod m2025_05_01_000400_create_skills;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_05_01_000001_create_users::Migration),
            Box::new(m2025_05_01_000002_create_sessions::Migration),
            Box::new(m2025_05_01_000100_create_profiles::Migration),
            Box::new(m2025_05_01_000200_create_connections::Migration),
            Box::new(m2025_05_01_000300_create_events::Migration),
            Box::new(m2025_05_01_000400_create_skills::Migration),
        ]
    }
}
