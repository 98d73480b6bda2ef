//! services/api/src/web/applications.rs
//!
//! Axum handlers for job applications: the public submission route and
//! the admin review routes.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use leadgen_core::domain::{ApplicationFilters, ApplicationStatus};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::i18n;
use crate::web::protocol::{
    port_error_response, ApplicationCreatedResponse, DataResponse, ErrorResponse, FieldError,
};
use crate::web::request_metadata;
use crate::web::state::AppState;
use crate::web::validate::ApplicationPayload;

/// Accept a job application from the careers form.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplicationPayload,
    responses(
        (status = 200, description = "Application submitted successfully", body = ApplicationCreatedResponse),
        (status = 400, description = "Validation failure with field-level details", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_application_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ApplicationPayload>,
) -> impl IntoResponse {
    let locale = payload
        .locale
        .clone()
        .unwrap_or_else(|| i18n::DEFAULT_LOCALE.to_string());
    let bundle = i18n::bundle(&locale);

    let (mut new_application, job_title) = match payload.into_new_application() {
        Ok(parts) => parts,
        Err(details) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("Invalid data provided", details)),
            )
                .into_response();
        }
    };

    let (ip_address, user_agent, _referrer) = request_metadata(&headers);
    new_application.ip_address = ip_address;
    new_application.user_agent = user_agent;

    match state.careers.submit_application(new_application).await {
        Ok(application) => {
            info!(
                application_id = %application.id,
                job_id = %application.job_id,
                "application submitted"
            );

            let notifier = state.notifier.clone();
            let notified = application.clone();
            tokio::spawn(async move {
                notifier
                    .notify_application(&notified, job_title.as_deref())
                    .await;
            });

            Json(ApplicationCreatedResponse {
                success: true,
                message: bundle.application_submitted.to_string(),
                application_id: application.id,
            })
            .into_response()
        }
        Err(e) => port_error_response("submit_application", e, bundle).into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationListParams {
    pub job_id: Option<Uuid>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Admin listing of applications, newest first.
#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("job_id" = Option<Uuid>, Query, description = "Restrict to one job"),
        ("status" = Option<String>, Query, description = "Application status filter"),
        ("search" = Option<String>, Query, description = "Free-text candidate search"),
        ("date_from" = Option<String>, Query, description = "Submitted at or after (RFC 3339)"),
        ("date_to" = Option<String>, Query, description = "Submitted at or before (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Matching applications"),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin token")
    ),
    security(("admin_token" = []))
)]
pub async fn list_applications_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApplicationListParams>,
) -> impl IntoResponse {
    let status = match params.status.as_deref().map(str::parse::<ApplicationStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation(
                    "Invalid data provided",
                    vec![FieldError {
                        field: "status".to_string(),
                        message: "Unknown application status".to_string(),
                    }],
                )),
            )
                .into_response();
        }
    };

    let filters = ApplicationFilters {
        job_id: params.job_id,
        status,
        search: params.search,
        date_from: params.date_from,
        date_to: params.date_to,
    };

    match state.careers.get_applications(filters).await {
        Ok(applications) => Json(DataResponse::new(applications)).into_response(),
        Err(e) => port_error_response("get_applications", e, i18n::bundle(i18n::DEFAULT_LOCALE))
            .into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationStatusPayload {
    pub status: String,
}

/// Move an application through the review pipeline.
#[utoipa::path(
    patch,
    path = "/api/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = ApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "No such application", body = ErrorResponse)
    ),
    security(("admin_token" = []))
)]
pub async fn update_application_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplicationStatusPayload>,
) -> impl IntoResponse {
    let status: ApplicationStatus = match payload.status.parse() {
        Ok(status) => status,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation(
                    "Invalid data provided",
                    vec![FieldError {
                        field: "status".to_string(),
                        message: format!("'{}' is not a valid application status", payload.status),
                    }],
                )),
            )
                .into_response();
        }
    };

    match state.careers.update_application_status(id, status).await {
        Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
        Err(e) => port_error_response(
            "update_application_status",
            e,
            i18n::bundle(i18n::DEFAULT_LOCALE),
        )
        .into_response(),
    }
}
