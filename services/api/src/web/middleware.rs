//! services/api/src/web/middleware.rs
//!
//! Bearer-token middleware protecting the admin routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::protocol::ErrorResponse;
use crate::web::state::AppState;

/// Middleware that validates the `Authorization: Bearer <token>` header
/// against the configured admin token.
///
/// If no admin token is configured, admin routes answer 503 instead of
/// running open. A missing or mismatched token is a 401.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let Some(expected) = state.config.admin_api_token.as_deref() else {
        warn!("admin route hit but ADMIN_API_TOKEN is not set");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Admin API is not configured")),
        ));
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(next.run(req).await),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Unauthorized")),
        )),
    }
}
