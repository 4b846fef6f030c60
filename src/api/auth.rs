//! Authentication middleware for the REST API
//!
//! Every report route requires an X-Api-Key header holding a token issued to
//! an active member. The resolved [`Principal`] is attached to the request as
//! an extension; handlers scope their reports to its organization.

use crate::api::AppState;
use crate::error::ApiError;
use crate::types::Principal;
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Authentication middleware that resolves the X-Api-Key header to a member
///
/// Returns 401 Unauthorized when the header is missing or does not match an
/// active member's token, and 500 when the token lookup itself fails.
///
/// # Examples
///
/// ```no_run
/// use axum::{Router, middleware};
/// use org_reports::api::{AppState, auth::require_member};
///
/// # fn build(state: AppState) -> Router {
/// Router::new()
///     .layer(middleware::from_fn_with_state(state.clone(), require_member))
///     .with_state(state)
/// # }
/// ```
pub async fn require_member(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let api_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let Some(api_key) = api_key else {
        return unauthorized_response("Missing X-Api-Key header");
    };

    match state.db.resolve_api_token(&api_key).await {
        Ok(Some(principal)) => {
            tracing::debug!(
                member = %principal.member_id,
                organization = %principal.organization_id,
                "authenticated request"
            );
            request.extensions_mut().insert::<Principal>(principal);
            next.run(request).await
        }
        Ok(None) => unauthorized_response("Invalid API key"),
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve API key");
            e.into_response()
        }
    }
}

/// Helper function to create a 401 Unauthorized response with a JSON error message
fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ApiError::unauthorized(message))).into_response()
}
