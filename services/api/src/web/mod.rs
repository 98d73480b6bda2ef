//! services/api/src/web/mod.rs
//!
//! The HTTP surface: handlers, envelopes, validation, locale
//! resolution and the OpenAPI master definition.

pub mod applications;
pub mod jobs;
pub mod leads;
pub mod locale;
pub mod middleware;
pub mod protocol;
pub mod state;
pub mod validate;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::web::state::AppState;

pub use locale::locale_redirect;
pub use middleware::require_admin;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        leads::create_lead_handler,
        leads::list_leads_handler,
        leads::lead_stats_handler,
        leads::get_lead_handler,
        leads::update_lead_handler,
        leads::delete_lead_handler,
        leads::update_lead_status_handler,
        applications::create_application_handler,
        applications::list_applications_handler,
        applications::update_application_status_handler,
        jobs::list_jobs_handler,
        jobs::get_job_handler,
        health_handler,
    ),
    components(
        schemas(
            protocol::ErrorResponse,
            protocol::FieldError,
            protocol::LeadCreatedResponse,
            protocol::ApplicationCreatedResponse,
            validate::LeadPayload,
            validate::LeadPatchPayload,
            validate::ApplicationPayload,
            leads::StatusUpdatePayload,
            applications::ApplicationStatusPayload,
            HealthResponse,
        )
    ),
    tags(
        (name = "Leadgen API", description = "Lead and careers intake endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Request Metadata
//=========================================================================================

/// Pulls the submitter's network metadata out of the request headers:
/// client IP (first `x-forwarded-for` hop, else `x-real-ip`), user
/// agent and referrer.
pub fn request_metadata(headers: &HeaderMap) -> (Option<String>, Option<String>, Option<String>) {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        });
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let referrer = headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (ip_address, user_agent, referrer)
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store_configured: bool,
}

/// Liveness probe. Reports whether the store has credentials so a
/// misconfigured deployment is visible without submitting a lead.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        store_configured: state.config.store_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        let (ip, _, _) = request_metadata(&headers);
        assert_eq!(ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        let (ip, ua, referrer) = request_metadata(&headers);
        assert_eq!(ip.as_deref(), Some("198.51.100.4"));
        assert!(ua.is_none());
        assert!(referrer.is_none());
    }

    #[test]
    fn absent_headers_leave_metadata_empty() {
        let (ip, ua, referrer) = request_metadata(&HeaderMap::new());
        assert!(ip.is_none() && ua.is_none() && referrer.is_none());
    }
}
