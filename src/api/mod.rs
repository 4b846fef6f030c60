//! REST API server module
//!
//! Serves an organization's reports to authenticated members, plus an OpenAPI
//! 3.1 description of the API.

use crate::Result;
use axum::{Router, http::HeaderValue, middleware, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Reports (require X-Api-Key)
/// - `GET /reports` - Listing of available exports
/// - `GET /reports/user_list` - Active members (`format`)
/// - `GET /reports/post_list` - Offers or inquiries (`type`, `format`)
/// - `GET /reports/transfer_list` - Transfers (`format`)
/// - `GET /reports/all_list` - ZIP with every report as CSV
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Auth applies to matched report routes only, so unknown paths stay 404
    let reports = Router::new()
        .route("/reports", get(routes::list_reports))
        .route("/reports/user_list", get(routes::user_list))
        .route("/reports/post_list", get(routes::post_list))
        .route("/reports/transfer_list", get(routes::transfer_list))
        .route("/reports/all_list", get(routes::all_list))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_member,
        ));

    let router = Router::new()
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .merge(reports);

    // Merge Swagger UI routes if enabled in config (before applying state)
    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.api.request_timeout))
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// # Arguments
///
/// * `origins` - List of allowed origins (supports "*" for any origin)
///
/// # Returns
///
/// A configured CorsLayer that allows the specified origins, all methods,
/// and all headers for cross-origin requests.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until SIGTERM or SIGINT (Ctrl+C on non-Unix platforms) is received,
/// then stops accepting connections and lets in-flight requests finish.
///
/// # Example
///
/// ```no_run
/// use org_reports::{Config, Database, api::{AppState, start_api_server}};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let db = Arc::new(Database::new(config.database_path()).await?);
///
/// start_api_server(AppState::new(db, config)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(state: AppState) -> Result<()> {
    let bind_address = state.config.server.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(state);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(crate::wait_for_signal())
    .await
    .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
