//! # UCalgaryConnect API Library
//!
//! This library provides the core functionality for the UCalgaryConnect
//! student-networking API: session-guarded handlers, SeaORM models and
//! repositories, and the pure derived-view builders (connection tabs,
//! leaderboard, partner search).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod views;
pub use migration;
