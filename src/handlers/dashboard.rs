//! # Dashboard API Handler
//!
//! Aggregated stats for the landing page: connection counts, upcoming
//! events and profile completion.

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, repo_error};
use crate::repositories::{ConnectionRepository, EventRepository, ProfileRepository};
use crate::server::AppState;
use crate::views::matching::completion_percent;
use crate::views::partition_connections;

/// Dashboard stats for the current user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    /// Accepted connections the caller participates in
    pub active_connections: u64,
    /// Pending requests awaiting the caller's response
    pub pending_received: u64,
    /// Events that have not started yet
    pub upcoming_events: u64,
    /// Share of profile sections filled in, 0..=100 (0 without a profile)
    pub profile_completion_percent: u8,
}

/// Aggregated dashboard stats
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard stats", body = DashboardDto),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardDto>, ApiError> {
    let db = Arc::new(state.db.clone());
    let connections = ConnectionRepository::new(Arc::clone(&db));
    let profiles = ProfileRepository::new(Arc::clone(&db));
    let events = EventRepository::new(db);

    let rows = connections.list_for_user(user.id).await.map_err(repo_error)?;
    let partition = partition_connections(user.id, rows);

    let now = Utc::now();
    let upcoming_events = events
        .list()
        .await
        .map_err(repo_error)?
        .iter()
        .filter(|e| e.starts_at.with_timezone(&Utc) > now)
        .count() as u64;

    let profile_completion_percent = profiles
        .get_by_user_id(user.id)
        .await
        .map_err(repo_error)?
        .map(|p| completion_percent(&p))
        .unwrap_or(0);

    Ok(Json(DashboardDto {
        active_connections: partition.active.len() as u64,
        pending_received: partition.received.len() as u64,
        upcoming_events,
        profile_completion_percent,
    }))
}
