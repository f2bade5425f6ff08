//! # Authentication and Authorization
//!
//! This module provides session-backed bearer authentication for protected
//! API endpoints, plus the password and token primitives used at
//! registration and login.
//!
//! Clients hold an opaque token issued at login. Only its SHA-256 hash is
//! stored, so session rows never contain a usable credential.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, unauthorized};
use crate::repositories::{SessionRepository, UserRepository};
use crate::server::AppState;

const PASSWORD_HASH_ITERATIONS: u32 = 100_000;

/// Authenticated caller, inserted into request extensions by the middleware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Hashes a password with a fresh random salt.
///
/// Output format is `salt_hex$digest_hex`, where the digest is an iterated
/// salted SHA-256.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = derive_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Verifies a password against a stored `salt_hex$digest_hex` hash in
/// constant time.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };

    let actual = derive_digest(&salt, password);
    ConstantTimeEq::ct_eq(actual.as_slice(), expected.as_slice()).into()
}

fn derive_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut digest = {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().to_vec()
    };

    for _ in 1..PASSWORD_HASH_ITERATIONS {
        let mut hasher = Sha256::new();
        hasher.update(&digest);
        digest = hasher.finalize().to_vec();
    }

    digest
}

/// Generates a fresh opaque session token (hex of 32 random bytes).
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hashes a session token for storage and lookup.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authentication middleware that resolves the bearer token to a session
/// and loads the owning user.
///
/// Fails closed: any missing, malformed, unknown or expired token yields
/// 401 so the client can redirect to login.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?.to_string();

    let sessions = SessionRepository::new(Arc::new(state.db.clone()));
    let users = UserRepository::new(Arc::new(state.db.clone()));

    let token_hash = hash_session_token(&token);
    let session = sessions
        .get_active_by_token_hash(&token_hash)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "Session lookup failed");
            unauthorized(None)
        })?
        .ok_or_else(|| unauthorized(Some("Invalid or expired session")))?;

    let user = users
        .get_by_id(session.user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "User lookup failed");
            unauthorized(None)
        })?
        .ok_or_else(|| unauthorized(Some("Invalid or expired session")))?;

    tracing::debug!(user_id = %user.id, "Authenticated request");

    let mut request = request;
    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
    });

    Ok(next.run(request).await)
}

pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized(Some("Missing Authorization header")))
        .and_then(|value| {
            value
                .to_str()
                .map_err(|_| unauthorized(Some("Invalid Authorization header")))
        })
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")))
        })
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| unauthorized(Some("Authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use migration::{Migrator, MigratorTrait};
    use tower::ServiceExt;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("hunter2secret");
        assert!(verify_password("hunter2secret", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn password_hashes_are_salted() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_fails_verification() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("anything", "zz$zz"));
    }

    #[test]
    fn session_tokens_are_unique_and_opaque() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(hash_session_token(&a), a);
    }

    async fn test_state() -> AppState {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        AppState {
            config: Arc::new(AppConfig::default()),
            db,
        }
    }

    async fn run_middleware(state: AppState, request: Request<Body>) -> Response {
        async fn handler(user: CurrentUser) -> String {
            user.email
        }

        Router::new()
            .route("/test", get(handler))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .with_state(state)
            .oneshot(request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_auth_header_returns_401() {
        let state = test_state().await;
        let request = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_auth_scheme_returns_401() {
        let state = test_state().await;
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dGVzdDoxMjM=")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_returns_401() {
        let state = test_state().await;
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer deadbeef")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_session_passes_through() {
        let state = test_state().await;
        let db = Arc::new(state.db.clone());

        let user = UserRepository::new(Arc::clone(&db))
            .create("alice@ucalgary.ca", &hash_password("pw"))
            .await
            .unwrap();

        let token = generate_session_token();
        SessionRepository::new(db)
            .create(user.id, &hash_session_token(&token), 60)
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_session_returns_401() {
        let state = test_state().await;
        let db = Arc::new(state.db.clone());

        let user = UserRepository::new(Arc::clone(&db))
            .create("bob@ucalgary.ca", &hash_password("pw"))
            .await
            .unwrap();

        // TTL of zero minutes expires immediately.
        let token = generate_session_token();
        SessionRepository::new(db)
            .create(user.id, &hash_session_token(&token), 0)
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
