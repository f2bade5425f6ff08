//! # Profile API Handlers
//!
//! This module contains handlers for the caller's own profile, public
//! profile cards and the find-partners search.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, profile_not_found, repo_error, validation_error};
use crate::models::connection::ConnectionStatus;
use crate::models::profile::Model as ProfileModel;
use crate::repositories::{ConnectionRepository, ProfileRepository, profile::ProfileUpsert};
use crate::server::AppState;
use crate::views::matching::{is_complete, match_percentage};
use crate::views::search::{SearchScope, search_profiles};
use crate::views::counterpart_id;

/// Public profile card shared by several endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileCard {
    pub user_id: Uuid,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "Science")]
    pub faculty: String,
    #[schema(example = "Computer Science")]
    pub major: String,
    pub courses: Vec<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub bio: Option<String>,
    /// Derived: name, faculty, major filled in and at least one course
    pub is_complete: bool,
}

impl From<ProfileModel> for ProfileCard {
    fn from(model: ProfileModel) -> Self {
        let is_complete = is_complete(&model);
        Self {
            user_id: model.user_id,
            full_name: model.full_name,
            faculty: model.faculty,
            major: model.major,
            courses: model.courses.0,
            skills: model.skills.0,
            interests: model.interests.0,
            bio: model.bio,
            is_complete,
        }
    }
}

/// Request payload for saving the caller's profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequestDto {
    pub full_name: String,
    pub faculty: String,
    pub major: String,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub bio: Option<String>,
}

/// Query parameters for the find-partners search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search query; empty matches every profile
    #[serde(default)]
    pub q: String,
    /// Fields to match against
    #[serde(default)]
    pub scope: SearchScope,
}

/// One search result with its similarity score
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResultDto {
    pub profile: ProfileCard,
    /// Weighted overlap with the caller's profile, 0..=100
    pub match_percentage: u8,
}

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/api/v1/profiles/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = ProfileCard),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 404, description = "Profile not created yet (PROFILE_NOT_FOUND)", body = ApiError)
    ),
    tag = "profiles"
)]
pub async fn get_my_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProfileCard>, ApiError> {
    let profiles = ProfileRepository::new(Arc::new(state.db.clone()));

    let profile = profiles
        .get_by_user_id(user.id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| profile_not_found(user.id))?;

    Ok(Json(profile.into()))
}

/// Create or replace the caller's profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/me",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequestDto,
    responses(
        (status = 200, description = "Stored profile", body = ProfileCard),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "profiles"
)]
pub async fn put_my_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequestDto>,
) -> Result<Json<ProfileCard>, ApiError> {
    if request.full_name.trim().is_empty() {
        return Err(validation_error(
            "Invalid profile payload",
            serde_json::json!({ "full_name": "Full name is required" }),
        ));
    }

    let profiles = ProfileRepository::new(Arc::new(state.db.clone()));
    let stored = profiles
        .upsert(
            user.id,
            ProfileUpsert {
                full_name: request.full_name,
                faculty: request.faculty,
                major: request.major,
                courses: request.courses,
                skills: request.skills,
                interests: request.interests,
                bio: request.bio,
            },
        )
        .await
        .map_err(repo_error)?;

    Ok(Json(stored.into()))
}

/// Get another user's public profile card
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{user_id}",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "User whose profile to fetch")
    ),
    responses(
        (status = 200, description = "Profile card", body = ProfileCard),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 404, description = "No profile for this user (PROFILE_NOT_FOUND)", body = ApiError)
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileCard>, ApiError> {
    let profiles = ProfileRepository::new(Arc::new(state.db.clone()));

    let profile = profiles
        .get_by_user_id(user_id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| profile_not_found(user_id))?;

    Ok(Json(profile.into()))
}

/// Find study partners
///
/// Searches every profile except the caller's own and those already in an
/// accepted connection with the caller. Each result carries a match
/// percentage against the caller's profile (0 when the caller has none).
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching profiles", body = [SearchResultDto]),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "profiles"
)]
pub async fn search(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResultDto>>, ApiError> {
    let db = Arc::new(state.db.clone());
    let profiles = ProfileRepository::new(Arc::clone(&db));
    let connections = ConnectionRepository::new(db);

    let my_profile = profiles.get_by_user_id(user.id).await.map_err(repo_error)?;

    let already_connected: HashSet<Uuid> = connections
        .list_for_user(user.id)
        .await
        .map_err(repo_error)?
        .iter()
        .filter(|c| c.status == ConnectionStatus::Accepted)
        .map(|c| counterpart_id(user.id, c))
        .collect();

    let candidates: Vec<_> = profiles
        .list_others(user.id)
        .await
        .map_err(repo_error)?
        .into_iter()
        .filter(|p| !already_connected.contains(&p.user_id))
        .collect();

    let results = search_profiles(candidates, &query.q, query.scope)
        .into_iter()
        .map(|candidate| {
            let match_pct = my_profile
                .as_ref()
                .map(|mine| match_percentage(mine, &candidate))
                .unwrap_or(0);
            SearchResultDto {
                profile: candidate.into(),
                match_percentage: match_pct,
            }
        })
        .collect();

    Ok(Json(results))
}
