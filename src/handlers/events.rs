//! # Events API Handler
//!
//! Serves the campus event listing with its derived display fields: a
//! location fallback and a normalized external link.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, repo_error};
use crate::models::event::Model as EventModel;
use crate::repositories::EventRepository;
use crate::server::AppState;

const LOCATION_FALLBACK: &str = "Location TBD";

/// One event listing with display fields applied
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventDto {
    pub id: Uuid,
    #[schema(example = "Tech Start Hackathon")]
    pub title: String,
    pub starts_at: String,
    /// Stored location or "Location TBD"
    pub location: String,
    pub description: Option<String>,
    /// Link normalized to carry a scheme, when one is stored
    pub url: Option<String>,
}

/// Prefixes `https://` when the stored link has no scheme. Links that still
/// do not parse are dropped rather than served broken.
fn normalize_event_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if Url::parse(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }

    let prefixed = format!("https://{}", trimmed);
    Url::parse(&prefixed).ok().map(|_| prefixed)
}

impl From<EventModel> for EventDto {
    fn from(model: EventModel) -> Self {
        Self {
            id: model.id,
            title: model.title,
            starts_at: model.starts_at.to_rfc3339(),
            location: model
                .location
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| LOCATION_FALLBACK.to_string()),
            description: model.description,
            url: model.url.as_deref().and_then(normalize_event_url),
        }
    }
}

/// Campus events ordered by start time
#[utoipa::path(
    get,
    path = "/api/v1/events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event listing", body = [EventDto]),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "events"
)]
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<EventDto>>, ApiError> {
    let events = EventRepository::new(Arc::new(state.db.clone()));

    let listing = events
        .list()
        .await
        .map_err(repo_error)?
        .into_iter()
        .map(EventDto::from)
        .collect();

    Ok(Json(listing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn url_normalization_adds_scheme_when_missing() {
        assert_eq!(
            normalize_event_url("ucalgary.ca/events"),
            Some("https://ucalgary.ca/events".to_string())
        );
        assert_eq!(
            normalize_event_url("http://ucalgary.ca"),
            Some("http://ucalgary.ca".to_string())
        );
        assert_eq!(normalize_event_url("   "), None);
    }

    #[test]
    fn missing_location_falls_back() {
        let model = EventModel {
            id: Uuid::new_v4(),
            title: "Study Night".to_string(),
            starts_at: Utc::now().into(),
            location: None,
            description: None,
            url: None,
            created_by: None,
            created_at: Utc::now().into(),
        };

        let dto: EventDto = model.into();
        assert_eq!(dto.location, "Location TBD");
        assert_eq!(dto.url, None);
    }

    #[test]
    fn stored_location_is_kept() {
        let model = EventModel {
            id: Uuid::new_v4(),
            title: "Hackathon".to_string(),
            starts_at: Utc::now().into(),
            location: Some("MacEwan Hall".to_string()),
            description: None,
            url: Some("hackathon.ucalgary.ca".to_string()),
            created_by: None,
            created_at: Utc::now().into(),
        };

        let dto: EventDto = model.into();
        assert_eq!(dto.location, "MacEwan Hall");
        assert_eq!(dto.url, Some("https://hackathon.ucalgary.ca".to_string()));
    }
}
