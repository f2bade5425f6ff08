//! # Leaderboard API Handler
//!
//! Ranks users by how many accepted connections they participate in.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, repo_error};
use crate::repositories::{ConnectionRepository, ProfileRepository, UserRepository};
use crate::server::AppState;
use crate::views::leaderboard::compute_leaderboard;

const MAX_LEADERBOARD_LIMIT: u64 = 50;

/// Query parameters for the leaderboard
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    /// Number of entries to return (default from config, max 50)
    pub limit: Option<u64>,
}

/// One ranked leaderboard row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntryDto {
    /// 1-based rank
    pub rank: u64,
    pub user_id: Uuid,
    /// Profile name, falling back to the email when no profile exists
    pub display_name: String,
    pub accepted_count: u64,
}

/// Top users by accepted connections
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    security(("bearer_auth" = [])),
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked entries", body = [LeaderboardEntryDto]),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "leaderboard"
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntryDto>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.config.leaderboard_limit)
        .clamp(1, MAX_LEADERBOARD_LIMIT) as usize;

    let db = Arc::new(state.db.clone());
    let connections = ConnectionRepository::new(Arc::clone(&db));
    let profiles = ProfileRepository::new(Arc::clone(&db));
    let users = UserRepository::new(db);

    let accepted = connections.list_accepted_all().await.map_err(repo_error)?;
    let entries = compute_leaderboard(&accepted, limit);

    let user_ids: Vec<Uuid> = entries.iter().map(|e| e.user_id).collect();

    let names: HashMap<Uuid, String> = profiles
        .list_by_user_ids(&user_ids)
        .await
        .map_err(repo_error)?
        .into_iter()
        .map(|p| (p.user_id, p.full_name))
        .collect();

    let emails: HashMap<Uuid, String> = users
        .list_by_ids(&user_ids)
        .await
        .map_err(repo_error)?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();

    let response = entries
        .into_iter()
        .map(|entry| {
            let display_name = names
                .get(&entry.user_id)
                .or_else(|| emails.get(&entry.user_id))
                .cloned()
                .unwrap_or_else(|| entry.user_id.to_string());
            LeaderboardEntryDto {
                rank: entry.rank,
                user_id: entry.user_id,
                display_name,
                accepted_count: entry.accepted_count,
            }
        })
        .collect();

    Ok(Json(response))
}
