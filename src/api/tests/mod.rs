use super::*;
use crate::Config;
use crate::test_helpers::{Fixture, seed_fixture};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;


/// Router over the fixture database with default configuration
fn test_router(fixture: &Fixture) -> Router {
    create_router(test_state(fixture, Config::default()))
}

fn test_state(fixture: &Fixture, config: Config) -> AppState {
    AppState::new(fixture.db.clone(), Arc::new(config))
}

/// GET `uri`, authenticated as the fixture's first member
async fn get_authenticated(app: Router, fixture: &Fixture, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("X-Api-Key", &fixture.token)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn header<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let fixture = seed_fixture().await;

    // Port 0 = OS assigns a free port
    let mut config = Config::default();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();

    let api_handle = tokio::spawn({
        let state = test_state(&fixture, config);
        async move { start_api_server(state).await }
    });

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!api_handle.is_finished(), "server should still be running");
    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let fixture = seed_fixture().await;

    let mut config = Config::default();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let app = create_router(test_state(&fixture, config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let fixture = seed_fixture().await;

    let mut config = Config::default();
    config.server.api.cors_enabled = false;
    let app = create_router(test_state(&fixture, config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let fixture = seed_fixture().await;

    let mut config = Config::default();
    config.server.api.cors_origins = vec!["http://allowed.example".to_string()];
    let app = create_router(test_state(&fixture, config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://allowed.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        header(&response, "access-control-allow-origin"),
        "http://allowed.example"
    );
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let fixture = seed_fixture().await;

    let request = Request::builder()
        .uri("/reports/nothing_here")
        .body(Body::empty())
        .unwrap();

    let response = test_router(&fixture).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
