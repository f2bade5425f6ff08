//! # Data Models
//!
//! This module contains all the data models used throughout the UCalgaryConnect API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod connection;
pub mod event;
pub mod profile;
pub mod session;
pub mod skill;
pub mod user;

pub use connection::Entity as Connection;
pub use event::Entity as Event;
pub use profile::Entity as Profile;
pub use session::Entity as Session;
pub use skill::Entity as Skill;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "uconnect".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
