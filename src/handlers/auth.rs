//! # Auth API Handlers
//!
//! This module contains handlers for registration, login, logout and the
//! identity endpoint.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{
    self, CurrentUser, generate_session_token, hash_password, hash_session_token, verify_password,
};
use crate::error::{ApiError, repo_error, unauthorized, validation_error};
use crate::repositories::{SessionRepository, UserRepository};
use crate::server::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Request payload for registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequestDto {
    /// Email address used as the login identifier
    #[schema(example = "jane.doe@ucalgary.ca")]
    pub email: String,
    /// Password, minimum 8 characters
    pub password: String,
}

/// Request payload for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    pub email: String,
    pub password: String,
}

/// Authenticated user identity
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
}

/// Response payload carrying a fresh session token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Opaque bearer token for subsequent requests
    pub token: String,
    pub user: UserDto,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    let mut field_errors = serde_json::Map::new();

    if email.is_empty() || !email.contains('@') {
        field_errors.insert(
            "email".to_string(),
            "A valid email address is required".into(),
        );
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH).into(),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(validation_error(
            "Invalid credentials payload",
            field_errors.into(),
        ))
    }
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created", body = AuthResponseDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequestDto>,
) -> Result<(StatusCode, Json<AuthResponseDto>), ApiError> {
    let email = normalize_email(&request.email);
    validate_credentials(&email, &request.password)?;

    let db = Arc::new(state.db.clone());
    let users = UserRepository::new(Arc::clone(&db));
    let sessions = SessionRepository::new(db);

    // Email uniqueness is enforced by the database; a duplicate maps to 409.
    let user = users
        .create(&email, &hash_password(&request.password))
        .await
        .map_err(repo_error)?;

    let token = generate_session_token();
    sessions
        .create(
            user.id,
            &hash_session_token(&token),
            state.config.session_ttl_minutes,
        )
        .await
        .map_err(repo_error)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            token,
            user: UserDto {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Logged in", body = AuthResponseDto),
        (status = 401, description = "Bad credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequestDto>,
) -> Result<Json<AuthResponseDto>, ApiError> {
    let email = normalize_email(&request.email);

    let db = Arc::new(state.db.clone());
    let users = UserRepository::new(Arc::clone(&db));
    let sessions = SessionRepository::new(db);

    // Same error for unknown email and wrong password.
    let user = users
        .get_by_email(&email)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| unauthorized(Some("Invalid email or password")))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(unauthorized(Some("Invalid email or password")));
    }

    let token = generate_session_token();
    sessions
        .create(
            user.id,
            &hash_session_token(&token),
            state.config.session_ttl_minutes,
        )
        .await
        .map_err(repo_error)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponseDto {
        token,
        user: UserDto {
            id: user.id,
            email: user.email,
        },
    }))
}

/// Log out the current session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = auth::extract_bearer_token(&headers)?;

    let sessions = SessionRepository::new(Arc::new(state.db.clone()));
    sessions
        .delete_by_token_hash(&hash_session_token(token))
        .await
        .map_err(repo_error)?;

    tracing::info!(user_id = %user.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Identity of the current session
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn me(user: CurrentUser) -> Json<UserDto> {
    Json(UserDto {
        id: user.id,
        email: user.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Jane.Doe@UCalgary.CA "), "jane.doe@ucalgary.ca");
    }

    #[test]
    fn credential_validation_collects_field_errors() {
        let err = validate_credentials("not-an-email", "short").unwrap_err();
        let details = err.details.unwrap();
        assert!(details.get("email").is_some());
        assert!(details.get("password").is_some());

        assert!(validate_credentials("jane@ucalgary.ca", "longenough").is_ok());
    }
}
