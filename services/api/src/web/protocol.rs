//! services/api/src/web/protocol.rs
//!
//! The JSON envelopes shared by every API endpoint, and the mapping
//! from port errors to HTTP responses.

use axum::http::StatusCode;
use axum::Json;
use leadgen_core::ports::PortError;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::i18n::Bundle;

/// One field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The failure envelope: `{success:false, error, details?}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn validation(error: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Some(details),
        }
    }
}

/// The success envelope for a created lead.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeadCreatedResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "leadId")]
    pub lead_id: uuid::Uuid,
}

/// The success envelope for a submitted application.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationCreatedResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "applicationId")]
    pub application_id: uuid::Uuid,
}

/// A generic `{success:true, data}` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Maps a `PortError` to the HTTP status and localized message the
/// original API contract promises. Validation and not-found are the
/// caller's problem and are not logged; everything else is an incident.
pub fn port_error_response(
    operation: &str,
    e: PortError,
    bundle: &Bundle,
) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        PortError::NotFound(context) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(context)),
        ),
        PortError::Conflict(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(bundle.duplicate_email)),
        ),
        PortError::PermissionDenied(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(bundle.permission_denied)),
        ),
        PortError::NotConfigured => {
            error!(operation, "store is not configured; deployment defect");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(bundle.not_configured)),
            )
        }
        PortError::Unexpected(message) => {
            error!(operation, %message, "store operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Database error: {}", message))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n;

    #[test]
    fn not_found_maps_to_404_with_context() {
        let (status, Json(body)) = port_error_response(
            "get_job_by_slug",
            PortError::NotFound("Job not found".to_string()),
            i18n::bundle("en"),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert_eq!(body.error, "Job not found");
        assert!(body.details.is_none());
    }

    #[test]
    fn conflict_maps_to_localized_duplicate_message() {
        let (status, Json(body)) = port_error_response(
            "create_lead",
            PortError::Conflict("leads_email_key".to_string()),
            i18n::bundle("es"),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Este email ya existe en nuestro sistema.");
    }

    #[test]
    fn error_envelope_skips_absent_details() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(ErrorResponse::validation(
            "Invalid data provided",
            vec![FieldError {
                field: "email".to_string(),
                message: "Please enter a valid email address".to_string(),
            }],
        ))
        .unwrap();
        assert_eq!(json["details"][0]["field"], "email");
    }
}
