//! # Skills Catalog API Handler

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, repo_error};
use crate::repositories::SkillRepository;
use crate::server::AppState;

/// One skill catalog entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SkillDto {
    pub id: Uuid,
    #[schema(example = "Python")]
    pub name: String,
}

/// The seeded skill catalog, sorted by name
#[utoipa::path(
    get,
    path = "/api/v1/skills",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Skill catalog", body = [SkillDto]),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "skills"
)]
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<SkillDto>>, ApiError> {
    let skills = SkillRepository::new(Arc::new(state.db.clone()));

    let catalog = skills
        .list()
        .await
        .map_err(repo_error)?
        .into_iter()
        .map(|s| SkillDto {
            id: s.id,
            name: s.name,
        })
        .collect();

    Ok(Json(catalog))
}
