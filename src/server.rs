//! # Server Configuration
//!
//! This module contains the server setup and configuration for the
//! UCalgaryConnect API.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::telemetry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/profiles/me",
            get(handlers::profiles::get_my_profile).put(handlers::profiles::put_my_profile),
        )
        .route("/profiles/{user_id}", get(handlers::profiles::get_profile))
        .route("/profiles", get(handlers::profiles::search))
        .route(
            "/connections",
            get(handlers::connections::list).post(handlers::connections::create),
        )
        .route(
            "/connections/{id}/respond",
            post(handlers::connections::respond),
        )
        .route("/connections/{id}", delete(handlers::connections::withdraw))
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
        .route("/events", get(handlers::events::list))
        .route("/skills", get(handlers::skills::list))
        .route("/dashboard", get(handlers::dashboard::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected);

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

async fn not_found() -> ApiError {
    ApiError::new(
        axum::http::StatusCode::NOT_FOUND,
        "NOT_FOUND",
        "No such route",
    )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.cors_allowed_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let state = AppState {
        config: Arc::new(config),
        db,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token issued at login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::profiles::get_my_profile,
        crate::handlers::profiles::put_my_profile,
        crate::handlers::profiles::get_profile,
        crate::handlers::profiles::search,
        crate::handlers::connections::list,
        crate::handlers::connections::create,
        crate::handlers::connections::respond,
        crate::handlers::connections::withdraw,
        crate::handlers::leaderboard::leaderboard,
        crate::handlers::events::list,
        crate::handlers::skills::list,
        crate::handlers::dashboard::stats,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthResponse,
            crate::handlers::auth::RegisterRequestDto,
            crate::handlers::auth::LoginRequestDto,
            crate::handlers::auth::AuthResponseDto,
            crate::handlers::auth::UserDto,
            crate::handlers::profiles::ProfileCard,
            crate::handlers::profiles::UpdateProfileRequestDto,
            crate::handlers::profiles::SearchResultDto,
            crate::handlers::connections::ConnectionDto,
            crate::handlers::connections::CounterpartDto,
            crate::handlers::connections::ConnectionWithCounterpartDto,
            crate::handlers::connections::ConnectionsResponseDto,
            crate::handlers::connections::CreateConnectionRequestDto,
            crate::handlers::connections::RespondRequestDto,
            crate::handlers::connections::Decision,
            crate::handlers::leaderboard::LeaderboardEntryDto,
            crate::handlers::events::EventDto,
            crate::handlers::skills::SkillDto,
            crate::handlers::dashboard::DashboardDto,
            crate::models::connection::ConnectionStatus,
            crate::error::ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "UCalgaryConnect API",
        description = "API for connecting UCalgary students around courses, skills and events",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
