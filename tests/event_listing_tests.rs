//! Integration tests for the events listing and its derived display fields.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;
use uconnect::config::AppConfig;
use uconnect::repositories::{EventRepository, event::EventCreate};
use uconnect::server::{AppState, create_app};

async fn test_app() -> (Router, DatabaseConnection) {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let app = create_app(AppState {
        config: Arc::new(AppConfig::default()),
        db: db.clone(),
    });
    (app, db)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "jane@ucalgary.ca", "password": "correct-horse" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn get_events(app: &Router, token: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/events")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn events_are_listed_soonest_first_with_display_fallbacks() {
    let (app, db) = test_app().await;
    let token = register(&app).await;

    let events = EventRepository::new(Arc::new(db));
    events
        .create(EventCreate {
            title: "Later Workshop".to_string(),
            starts_at: Utc::now() + Duration::days(14),
            location: None,
            description: None,
            url: Some("ucalgary.ca/workshops".to_string()),
            created_by: None,
        })
        .await
        .unwrap();
    events
        .create(EventCreate {
            title: "Hackathon".to_string(),
            starts_at: Utc::now() + Duration::days(2),
            location: Some("MacEwan Hall".to_string()),
            description: Some("48 hours of building".to_string()),
            url: Some("https://hackathon.ucalgary.ca".to_string()),
            created_by: None,
        })
        .await
        .unwrap();

    let body = get_events(&app, &token).await;
    let listing = body.as_array().unwrap();
    assert_eq!(listing.len(), 2);

    // Ascending by start time
    assert_eq!(listing[0]["title"], "Hackathon");
    assert_eq!(listing[0]["location"], "MacEwan Hall");
    assert_eq!(listing[0]["url"], "https://hackathon.ucalgary.ca");

    assert_eq!(listing[1]["title"], "Later Workshop");
    assert_eq!(listing[1]["location"], "Location TBD");
    assert_eq!(listing[1]["url"], "https://ucalgary.ca/workshops");
}

#[tokio::test]
async fn empty_listing_is_an_empty_array() {
    let (app, _db) = test_app().await;
    let token = register(&app).await;

    let body = get_events(&app, &token).await;
    assert_eq!(body, json!([]));
}
