//! # Connection API Handlers
//!
//! This module contains handlers for the connection request lifecycle:
//! listing the three derived views, creating, responding and withdrawing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, forbidden, repo_error, validation_error};
use crate::handlers::profiles::ProfileCard;
use crate::models::connection::{ConnectionStatus, Model as ConnectionModel};
use crate::repositories::{
    ConnectionRepository, ConnectionWriteError, ProfileRepository, UserRepository,
};
use crate::server::AppState;
use crate::views::{counterpart_id, partition_connections};

/// A stored connection row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionDto {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: ConnectionStatus,
    pub created_at: String,
}

impl From<ConnectionModel> for ConnectionDto {
    fn from(model: ConnectionModel) -> Self {
        Self {
            id: model.id,
            requester_id: model.requester_id,
            recipient_id: model.recipient_id,
            status: model.status,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// The other participant of a connection, with their profile if they have one
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CounterpartDto {
    pub user_id: Uuid,
    /// Email for contact links
    pub email: String,
    /// Missing profile renders as null, never an error
    pub profile: Option<ProfileCard>,
}

/// A connection joined with its counterpart
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionWithCounterpartDto {
    #[serde(flatten)]
    pub connection: ConnectionDto,
    pub counterpart: Option<CounterpartDto>,
}

/// The caller's connections split into the three client views
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionsResponseDto {
    /// Pending requests awaiting the caller's response
    pub received: Vec<ConnectionWithCounterpartDto>,
    /// Pending requests the caller sent
    pub sent: Vec<ConnectionWithCounterpartDto>,
    /// Accepted connections
    pub active: Vec<ConnectionWithCounterpartDto>,
}

/// Request payload for creating a connection request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateConnectionRequestDto {
    pub recipient_id: Uuid,
}

/// The recipient's decision on a pending request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Declined,
}

/// Request payload for responding to a pending request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RespondRequestDto {
    pub decision: Decision,
}

fn map_write_error(error: ConnectionWriteError) -> ApiError {
    match error {
        ConnectionWriteError::NotFound => ApiError::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Connection not found",
        ),
        ConnectionWriteError::Forbidden => forbidden(Some(
            "You are not a participant allowed to modify this connection",
        )),
        ConnectionWriteError::NotPending => ApiError::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "Connection is no longer pending",
        ),
        ConnectionWriteError::AlreadyRelated => ApiError::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "A connection between these users already exists",
        ),
        ConnectionWriteError::SelfConnection => validation_error(
            "Invalid connection request",
            serde_json::json!({ "recipient_id": "Cannot connect with yourself" }),
        ),
        ConnectionWriteError::Database(db_err) => db_err.into(),
    }
}

async fn join_counterparts(
    state: &AppState,
    user_id: Uuid,
    connections: Vec<ConnectionModel>,
) -> Result<Vec<ConnectionWithCounterpartDto>, ApiError> {
    let db = Arc::new(state.db.clone());
    let users = UserRepository::new(Arc::clone(&db));
    let profiles = ProfileRepository::new(db);

    let counterpart_ids: Vec<Uuid> = connections
        .iter()
        .map(|c| counterpart_id(user_id, c))
        .collect();

    let mut emails: HashMap<Uuid, String> = users
        .list_by_ids(&counterpart_ids)
        .await
        .map_err(repo_error)?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();

    let mut cards: HashMap<Uuid, ProfileCard> = profiles
        .list_by_user_ids(&counterpart_ids)
        .await
        .map_err(repo_error)?
        .into_iter()
        .map(|p| (p.user_id, p.into()))
        .collect();

    Ok(connections
        .into_iter()
        .map(|conn| {
            let other = counterpart_id(user_id, &conn);
            let counterpart = emails.remove(&other).map(|email| CounterpartDto {
                user_id: other,
                email,
                profile: cards.remove(&other),
            });
            ConnectionWithCounterpartDto {
                connection: conn.into(),
                counterpart,
            }
        })
        .collect())
}

/// List the caller's connections as received/sent/active
#[utoipa::path(
    get,
    path = "/api/v1/connections",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Partitioned connections", body = ConnectionsResponseDto),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "connections"
)]
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ConnectionsResponseDto>, ApiError> {
    let connections = ConnectionRepository::new(Arc::new(state.db.clone()));

    let rows = connections.list_for_user(user.id).await.map_err(repo_error)?;
    let partition = partition_connections(user.id, rows);

    Ok(Json(ConnectionsResponseDto {
        received: join_counterparts(&state, user.id, partition.received).await?,
        sent: join_counterparts(&state, user.id, partition.sent).await?,
        active: join_counterparts(&state, user.id, partition.active).await?,
    }))
}

/// Send a connection request
#[utoipa::path(
    post,
    path = "/api/v1/connections",
    security(("bearer_auth" = [])),
    request_body = CreateConnectionRequestDto,
    responses(
        (status = 201, description = "Pending request created", body = ConnectionDto),
        (status = 400, description = "Self-connection rejected", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 404, description = "Recipient does not exist", body = ApiError),
        (status = 409, description = "Pair already has a connection", body = ApiError)
    ),
    tag = "connections"
)]
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateConnectionRequestDto>,
) -> Result<(StatusCode, Json<ConnectionDto>), ApiError> {
    let db = Arc::new(state.db.clone());
    let users = UserRepository::new(Arc::clone(&db));
    let connections = ConnectionRepository::new(db);

    users
        .get_by_id(request.recipient_id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Recipient not found")
        })?;

    let created = connections
        .create_request(user.id, request.recipient_id)
        .await
        .map_err(map_write_error)?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Respond to a pending connection request
///
/// Only the recipient may respond, exactly once. The returned row is the
/// stored state after the update.
#[utoipa::path(
    post,
    path = "/api/v1/connections/{id}/respond",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Connection to respond to")
    ),
    request_body = RespondRequestDto,
    responses(
        (status = 200, description = "Updated connection", body = ConnectionDto),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Caller is not the recipient", body = ApiError),
        (status = 404, description = "Connection not found", body = ApiError),
        (status = 409, description = "Connection is no longer pending", body = ApiError)
    ),
    tag = "connections"
)]
pub async fn respond(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RespondRequestDto>,
) -> Result<Json<ConnectionDto>, ApiError> {
    let connections = ConnectionRepository::new(Arc::new(state.db.clone()));

    let accept = matches!(request.decision, Decision::Accepted);
    let updated = connections
        .respond(id, user.id, accept)
        .await
        .map_err(map_write_error)?;

    Ok(Json(updated.into()))
}

/// Withdraw a pending connection request
#[utoipa::path(
    delete,
    path = "/api/v1/connections/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Connection to withdraw")
    ),
    responses(
        (status = 204, description = "Request withdrawn"),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Caller is not the requester", body = ApiError),
        (status = 404, description = "Connection not found", body = ApiError),
        (status = 409, description = "Connection is no longer pending", body = ApiError)
    ),
    tag = "connections"
)]
pub async fn withdraw(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let connections = ConnectionRepository::new(Arc::new(state.db.clone()));

    connections
        .withdraw(id, user.id)
        .await
        .map_err(map_write_error)?;

    Ok(StatusCode::NO_CONTENT)
}
