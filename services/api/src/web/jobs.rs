//! services/api/src/web/jobs.rs
//!
//! Public, read-only handlers for the careers job board.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use leadgen_core::domain::{JobFilters, JobLevel, JobType, RemoteType};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::i18n;
use crate::web::protocol::{port_error_response, DataResponse, ErrorResponse, FieldError};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct JobListParams {
    pub department: Option<String>,
    pub job_type: Option<String>,
    pub job_level: Option<String>,
    pub remote_type: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

fn unknown_filter(field: &str, value: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(
            "Invalid data provided",
            vec![FieldError {
                field: field.to_string(),
                message: format!("'{}' is not a valid {}", value, field),
            }],
        )),
    )
        .into_response()
}

/// List open positions. Only active jobs are returned, featured first.
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("department" = Option<String>, Query, description = "Department filter"),
        ("job_type" = Option<String>, Query, description = "full-time | part-time | contract | internship"),
        ("job_level" = Option<String>, Query, description = "entry | mid | senior | lead | manager | director"),
        ("remote_type" = Option<String>, Query, description = "remote | hybrid | onsite"),
        ("featured" = Option<bool>, Query, description = "Featured positions only"),
        ("search" = Option<String>, Query, description = "Free-text search over title and description")
    ),
    responses(
        (status = 200, description = "Active jobs matching the filters"),
        (status = 400, description = "Unknown filter value", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_jobs_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<JobListParams>,
) -> impl IntoResponse {
    let job_type = match params.job_type.as_deref().map(str::parse::<JobType>) {
        None => None,
        Some(Ok(v)) => Some(v),
        Some(Err(_)) => {
            return unknown_filter("job_type", params.job_type.as_deref().unwrap_or_default());
        }
    };
    let job_level = match params.job_level.as_deref().map(str::parse::<JobLevel>) {
        None => None,
        Some(Ok(v)) => Some(v),
        Some(Err(_)) => {
            return unknown_filter("job_level", params.job_level.as_deref().unwrap_or_default());
        }
    };
    let remote_type = match params.remote_type.as_deref().map(str::parse::<RemoteType>) {
        None => None,
        Some(Ok(v)) => Some(v),
        Some(Err(_)) => {
            return unknown_filter(
                "remote_type",
                params.remote_type.as_deref().unwrap_or_default(),
            );
        }
    };

    let filters = JobFilters {
        department: params.department,
        job_type,
        job_level,
        remote_type,
        featured: params.featured,
        search: params.search,
    };

    match state.careers.get_jobs(filters).await {
        Ok(jobs) => Json(DataResponse::new(jobs)).into_response(),
        Err(e) => {
            port_error_response("get_jobs", e, i18n::bundle(i18n::DEFAULT_LOCALE)).into_response()
        }
    }
}

/// Fetch one active job by its URL slug.
#[utoipa::path(
    get,
    path = "/api/jobs/{slug}",
    params(("slug" = String, Path, description = "Job slug")),
    responses(
        (status = 200, description = "The job"),
        (status = 404, description = "No active job with that slug", body = ErrorResponse)
    )
)]
pub async fn get_job_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.careers.get_job_by_slug(&slug).await {
        Ok(job) => Json(DataResponse::new(job)).into_response(),
        Err(leadgen_core::ports::PortError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(i18n::bundle(i18n::DEFAULT_LOCALE).job_not_found)),
        )
            .into_response(),
        Err(e) => port_error_response("get_job_by_slug", e, i18n::bundle(i18n::DEFAULT_LOCALE))
            .into_response(),
    }
}
