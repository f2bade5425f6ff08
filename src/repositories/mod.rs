//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for database entities, providing a clean API for data access.

pub mod connection;
pub mod event;
pub mod profile;
pub mod session;
pub mod skill;
pub mod user;

pub use connection::{ConnectionRepository, ConnectionWriteError};
pub use event::EventRepository;
pub use profile::ProfileRepository;
pub use session::SessionRepository;
pub use skill::SkillRepository;
pub use user::UserRepository;
