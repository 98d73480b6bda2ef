//! services/api/src/web/leads.rs
//!
//! Axum handlers for the lead intake endpoints: the public submission
//! route plus the admin listing, inspection and mutation routes.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use leadgen_core::domain::{LeadQuery, LeadStatus};
use leadgen_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::i18n;
use crate::web::protocol::{
    port_error_response, DataResponse, ErrorResponse, FieldError, LeadCreatedResponse,
};
use crate::web::request_metadata;
use crate::web::state::AppState;
use crate::web::validate::{LeadPatchPayload, LeadPayload};

/// Error mapping for the single-lead routes: a missing lead gets the
/// localized "lead not found" message rather than the raw store context.
fn lead_error_response(operation: &str, e: PortError) -> (StatusCode, Json<ErrorResponse>) {
    let bundle = i18n::bundle(i18n::DEFAULT_LOCALE);
    match e {
        PortError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(bundle.lead_not_found)),
        ),
        other => port_error_response(operation, other, bundle),
    }
}

/// Create a new lead from a contact or WhatsApp-automation form submission.
#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = LeadPayload,
    responses(
        (status = 200, description = "Lead created successfully", body = LeadCreatedResponse),
        (status = 400, description = "Validation failure with field-level details", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_lead_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<LeadPayload>,
) -> impl IntoResponse {
    let locale = payload
        .locale
        .clone()
        .unwrap_or_else(|| i18n::DEFAULT_LOCALE.to_string());
    let bundle = i18n::bundle(&locale);

    if payload.missing_required() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(bundle.missing_required_fields)),
        )
            .into_response();
    }

    let mut new_lead = match payload.into_new_lead() {
        Ok(lead) => lead,
        Err(details) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("Invalid data provided", details)),
            )
                .into_response();
        }
    };

    let (ip_address, user_agent, referrer) = request_metadata(&headers);
    new_lead.ip_address = ip_address;
    new_lead.user_agent = user_agent;
    new_lead.referrer = referrer;

    match state.leads.create_lead(new_lead).await {
        Ok(lead) => {
            info!(lead_id = %lead.id, source = %lead.source, "lead created");

            // Fire-and-forget: the response must never wait on (or fail
            // because of) the notification channel.
            let notifier = state.notifier.clone();
            let notified = lead.clone();
            tokio::spawn(async move {
                notifier.notify_lead(&notified).await;
            });

            Json(LeadCreatedResponse {
                success: true,
                message: bundle.lead_created.to_string(),
                lead_id: lead.id,
            })
            .into_response()
        }
        Err(e) => port_error_response("create_lead", e, bundle).into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeadListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin listing of leads, paginated and clamped to 100 per page.
#[utoipa::path(
    get,
    path = "/api/leads",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, clamped to [1, 100]"),
        ("offset" = Option<i64>, Query, description = "Row offset, defaults to 0")
    ),
    responses(
        (status = 200, description = "One page of leads"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(("admin_token" = []))
)]
pub async fn list_leads_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeadListParams>,
) -> impl IntoResponse {
    let query = LeadQuery {
        limit: params.limit.unwrap_or(50),
        offset: params.offset.unwrap_or(0),
        ..LeadQuery::default()
    }
    .clamped();

    match state.leads.get_leads(query).await {
        Ok(page) => {
            let mut body = serde_json::to_value(&page).unwrap_or_default();
            if let Some(map) = body.as_object_mut() {
                map.insert("success".to_string(), serde_json::Value::Bool(true));
            }
            Json(body).into_response()
        }
        Err(e) => {
            port_error_response("get_leads", e, i18n::bundle(i18n::DEFAULT_LOCALE)).into_response()
        }
    }
}

/// Admin lead statistics: per-status counts, value totals, conversion rate.
#[utoipa::path(
    get,
    path = "/api/leads/stats",
    responses(
        (status = 200, description = "Aggregate lead statistics"),
        (status = 401, description = "Missing or invalid admin token")
    ),
    security(("admin_token" = []))
)]
pub async fn lead_stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.leads.lead_stats().await {
        Ok(stats) => Json(DataResponse::new(stats)).into_response(),
        Err(e) => {
            port_error_response("lead_stats", e, i18n::bundle(i18n::DEFAULT_LOCALE)).into_response()
        }
    }
}

/// Fetch one lead by id. Not-found is a 404, never a generic failure.
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead id")),
    responses(
        (status = 200, description = "The lead"),
        (status = 404, description = "No such lead", body = ErrorResponse)
    ),
    security(("admin_token" = []))
)]
pub async fn get_lead_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.leads.get_lead_by_id(id).await {
        Ok(lead) => Json(DataResponse::new(lead)).into_response(),
        Err(e) => lead_error_response("get_lead_by_id", e).into_response(),
    }
}

/// Apply a partial update to a lead.
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead id")),
    request_body = LeadPatchPayload,
    responses(
        (status = 200, description = "The updated lead"),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "No such lead", body = ErrorResponse)
    ),
    security(("admin_token" = []))
)]
pub async fn update_lead_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadPatchPayload>,
) -> impl IntoResponse {
    let patch = match payload.into_patch() {
        Ok(patch) => patch,
        Err(details) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("Invalid data provided", details)),
            )
                .into_response();
        }
    };

    match state.leads.update_lead(id, patch).await {
        Ok(lead) => Json(DataResponse::new(lead)).into_response(),
        Err(e) => lead_error_response("update_lead", e).into_response(),
    }
}

/// Delete a lead. The only path that ever removes one.
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such lead", body = ErrorResponse)
    ),
    security(("admin_token" = []))
)]
pub async fn delete_lead_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.leads.delete_lead(id).await {
        Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
        Err(e) => lead_error_response("delete_lead", e).into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdatePayload {
    pub status: String,
    pub notes: Option<String>,
}

/// Transition a lead's status. Moving to `contacted` stamps the last
/// contact date; moving to `closed` stamps the conversion date.
#[utoipa::path(
    post,
    path = "/api/leads/{id}/status",
    params(("id" = Uuid, Path, description = "Lead id")),
    request_body = StatusUpdatePayload,
    responses(
        (status = 200, description = "The updated lead"),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "No such lead", body = ErrorResponse)
    ),
    security(("admin_token" = []))
)]
pub async fn update_lead_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdatePayload>,
) -> impl IntoResponse {
    let status: LeadStatus = match payload.status.parse() {
        Ok(status) => status,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation(
                    "Invalid data provided",
                    vec![FieldError {
                        field: "status".to_string(),
                        message: format!("'{}' is not a valid lead status", payload.status),
                    }],
                )),
            )
                .into_response();
        }
    };

    match state.leads.update_lead_status(id, status, payload.notes).await {
        Ok(lead) => Json(DataResponse::new(lead)).into_response(),
        Err(e) => lead_error_response("update_lead_status", e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lead_maps_to_localized_404() {
        let (status, Json(body)) = lead_error_response(
            "get_lead_by_id",
            PortError::NotFound("Lead 00000000-0000-0000-0000-000000000000 not found".to_string()),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Lead not found.");
    }

    #[test]
    fn other_lead_errors_keep_the_shared_mapping() {
        let (status, Json(body)) =
            lead_error_response("update_lead", PortError::NotConfigured);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.error,
            "Database not configured. Please contact the administrator."
        );
    }
}
