//! services/api/src/web/validate.rs
//!
//! Declarative validation schemas for the two intake forms, built on
//! the `validator` derive crate. Each schema turns an untyped JSON
//! payload into a normalized domain record or a list of field-level
//! violations. Unknown fields are ignored by deserialization; the
//! whole submission is rejected on the first failing schema run.

use leadgen_core::domain::{LeadPatch, LeadSource, LeadStatus, NewApplication, NewLead};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::web::protocol::FieldError;

//=========================================================================================
// Lead Schema
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LeadPayload {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 10, max = 1000, message = "Message must be between 10 and 1000 characters"))]
    pub message: String,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub locale: Option<String>,

    #[validate(custom(function = validate_lead_source))]
    pub source: Option<String>,

    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

impl LeadPayload {
    /// True when any of the three required fields is absent or blank.
    /// Checked before the schema runs so these submissions get the
    /// dedicated "missing required fields" message.
    pub fn missing_required(&self) -> bool {
        self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
    }

    /// Trims name/email/message, lowercases the email, validates, and
    /// produces the insertable record. Request metadata (IP, user
    /// agent, referrer) is attached by the handler afterwards.
    pub fn into_new_lead(mut self) -> Result<NewLead, Vec<FieldError>> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.message = self.message.trim().to_string();

        self.validate().map_err(flatten_errors)?;

        // The custom validator above guarantees this parse succeeds.
        let source = self
            .source
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LeadSource::ContactForm);

        Ok(NewLead {
            name: self.name,
            email: self.email,
            message: self.message,
            phone: self.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            company: self.company.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            locale: self.locale,
            source,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
            utm_content: self.utm_content,
            utm_term: self.utm_term,
            ip_address: None,
            user_agent: None,
            referrer: None,
        })
    }
}

fn validate_lead_source(value: &str) -> Result<(), ValidationError> {
    value.parse::<LeadSource>().map(|_| ()).map_err(|_| {
        ValidationError::new("source").with_message("Invalid lead source".into())
    })
}

//=========================================================================================
// Lead Patch Schema
//=========================================================================================

/// Wire shape of a partial lead update. Status arrives as its wire
/// string and is parsed here, so the domain patch only ever holds a
/// known status.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeadPatchPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<i32>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub follow_up_date: Option<chrono::DateTime<chrono::Utc>>,
    pub last_contact_date: Option<chrono::DateTime<chrono::Utc>>,
    pub conversion_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl LeadPatchPayload {
    pub fn into_patch(self) -> Result<LeadPatch, Vec<FieldError>> {
        let status = match self.status.as_deref().map(str::parse::<LeadStatus>) {
            None => None,
            Some(Ok(status)) => Some(status),
            Some(Err(e)) => {
                return Err(vec![FieldError {
                    field: "status".to_string(),
                    message: e.to_string(),
                }]);
            }
        };
        Ok(LeadPatch {
            name: self.name,
            email: self.email.map(|e| e.trim().to_lowercase()),
            phone: self.phone,
            company: self.company,
            message: self.message,
            status,
            notes: self.notes,
            assigned_to: self.assigned_to,
            priority: self.priority,
            value: self.value,
            currency: self.currency,
            follow_up_date: self.follow_up_date,
            last_contact_date: self.last_contact_date,
            conversion_date: self.conversion_date,
        })
    }
}

//=========================================================================================
// Job Application Schema
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplicationPayload {
    #[validate(custom(function = validate_uuid))]
    pub job_id: String,

    /// Supplied by the form for the notification text; never stored.
    pub job_title: Option<String>,

    #[validate(length(min = 2, max = 100, message = "First name must be between 2 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 100, message = "Last name must be between 2 and 100 characters"))]
    pub last_name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    pub phone: Option<String>,

    // Optional URL fields accept an empty string as "absent": the form
    // submits "" for untouched inputs, which must pass validation.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid LinkedIn URL"))]
    pub linkedin_url: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid portfolio URL"))]
    pub portfolio_url: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid resume URL"))]
    pub resume_url: Option<String>,

    #[validate(length(max = 2000, message = "Cover letter too long"))]
    pub cover_letter: Option<String>,

    #[validate(range(min = 0, max = 50))]
    pub experience_years: Option<i32>,

    #[validate(length(max = 200, message = "Current position too long"))]
    pub current_position: Option<String>,

    #[validate(length(max = 200, message = "Current company too long"))]
    pub current_company: Option<String>,

    #[validate(length(max = 1000, message = "Response too long"))]
    pub why_interested: Option<String>,

    pub availability_date: Option<String>,

    #[validate(range(min = 0.0))]
    pub salary_expectation: Option<f64>,

    pub source: Option<String>,
    pub locale: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl ApplicationPayload {
    /// Validates and produces the insertable record plus the job title
    /// hint for the notification.
    pub fn into_new_application(
        mut self,
    ) -> Result<(NewApplication, Option<String>), Vec<FieldError>> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        self.validate().map_err(flatten_errors)?;

        // Guaranteed by the custom validator.
        let job_id = self.job_id.parse::<Uuid>().map_err(|_| {
            vec![FieldError {
                field: "job_id".to_string(),
                message: "Invalid job ID".to_string(),
            }]
        })?;

        let application = NewApplication {
            job_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            linkedin_url: self.linkedin_url,
            portfolio_url: self.portfolio_url,
            resume_url: self.resume_url,
            cover_letter: self.cover_letter,
            experience_years: self.experience_years,
            current_position: self.current_position,
            current_company: self.current_company,
            why_interested: self.why_interested,
            availability_date: self.availability_date,
            salary_expectation: self.salary_expectation,
            source: self.source.or_else(|| Some("website".to_string())),
            locale: self.locale,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
            ip_address: None,
            user_agent: None,
        };
        Ok((application, self.job_title))
    }
}

fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    value.parse::<Uuid>().map(|_| ()).map_err(|_| {
        ValidationError::new("uuid").with_message("Invalid job ID".into())
    })
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Deserializes an optional string field, coercing `""` to `None`.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Flattens `ValidationErrors` into the wire shape, sorted by field
/// name so the output is deterministic.
fn flatten_errors(errors: ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lead_payload(value: serde_json::Value) -> LeadPayload {
        serde_json::from_value(value).unwrap()
    }

    fn application_payload(value: serde_json::Value) -> ApplicationPayload {
        serde_json::from_value(value).unwrap()
    }

    fn valid_lead_json() -> serde_json::Value {
        json!({
            "name": "Jane Doe",
            "email": "jane@acme.com",
            "message": "Interested in automation services for our support team."
        })
    }

    #[test]
    fn valid_lead_passes_and_defaults_source() {
        let lead = lead_payload(valid_lead_json()).into_new_lead().unwrap();
        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.source, LeadSource::ContactForm);
    }

    #[test]
    fn email_is_trimmed_and_lowercased_before_validation() {
        let mut payload = valid_lead_json();
        payload["email"] = json!("  Jane@Acme.COM  ");
        let lead = lead_payload(payload).into_new_lead().unwrap();
        assert_eq!(lead.email, "jane@acme.com");
    }

    #[test]
    fn bad_email_yields_a_field_error() {
        let mut payload = valid_lead_json();
        payload["email"] = json!("not-an-email");
        let details = lead_payload(payload).into_new_lead().unwrap_err();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "email");
        assert_eq!(details[0].message, "Please enter a valid email address");
    }

    #[test]
    fn name_length_bounds_are_enforced() {
        let mut payload = valid_lead_json();
        payload["name"] = json!("J");
        assert_eq!(
            lead_payload(payload).into_new_lead().unwrap_err()[0].field,
            "name"
        );

        let mut payload = valid_lead_json();
        payload["name"] = json!("Jo");
        assert!(lead_payload(payload).into_new_lead().is_ok());

        let mut payload = valid_lead_json();
        payload["name"] = json!("x".repeat(101));
        assert_eq!(
            lead_payload(payload).into_new_lead().unwrap_err()[0].field,
            "name"
        );
    }

    #[test]
    fn message_shorter_than_ten_chars_is_rejected() {
        let mut payload = valid_lead_json();
        payload["message"] = json!("too short");
        assert_eq!(
            lead_payload(payload).into_new_lead().unwrap_err()[0].field,
            "message"
        );
    }

    #[test]
    fn unknown_source_tag_is_a_field_error() {
        let mut payload = valid_lead_json();
        payload["source"] = json!("billboard");
        let details = lead_payload(payload).into_new_lead().unwrap_err();
        assert_eq!(details[0].field, "source");
        assert_eq!(details[0].message, "Invalid lead source");
    }

    #[test]
    fn known_source_tag_is_kept() {
        let mut payload = valid_lead_json();
        payload["source"] = json!("whatsapp_automation_form");
        let lead = lead_payload(payload).into_new_lead().unwrap();
        assert_eq!(lead.source, LeadSource::WhatsappAutomationForm);
    }

    #[test]
    fn absent_required_fields_are_detected_before_validation() {
        let payload = lead_payload(json!({ "name": "Jane Doe" }));
        assert!(payload.missing_required());

        let payload = lead_payload(json!({
            "name": "Jane Doe",
            "email": "jane@acme.com",
            "message": "   "
        }));
        assert!(payload.missing_required());

        assert!(!lead_payload(valid_lead_json()).missing_required());
    }

    #[test]
    fn patch_payload_parses_status_and_normalizes_email() {
        let payload: LeadPatchPayload = serde_json::from_value(json!({
            "status": "qualified",
            "email": "  Jane@Acme.COM ",
            "priority": 8
        }))
        .unwrap();
        let patch = payload.into_patch().unwrap();
        assert_eq!(patch.status, Some(LeadStatus::Qualified));
        assert_eq!(patch.email.as_deref(), Some("jane@acme.com"));
        assert_eq!(patch.priority, Some(8));
        assert!(patch.name.is_none());
    }

    #[test]
    fn patch_payload_rejects_unknown_status() {
        let payload: LeadPatchPayload =
            serde_json::from_value(json!({ "status": "archived" })).unwrap();
        let details = payload.into_patch().unwrap_err();
        assert_eq!(details[0].field, "status");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut payload = valid_lead_json();
        payload["favorite_color"] = json!("teal");
        assert!(lead_payload(payload).into_new_lead().is_ok());
    }

    fn valid_application_json() -> serde_json::Value {
        json!({
            "job_id": "7b6a2dd1-4f5e-4c9f-9d44-0d3e9a2b8f11",
            "first_name": "Sam",
            "last_name": "Rios",
            "email": "sam@example.com"
        })
    }

    #[test]
    fn valid_application_passes() {
        let (application, _) = application_payload(valid_application_json())
            .into_new_application()
            .unwrap();
        assert_eq!(application.first_name, "Sam");
        assert_eq!(application.source.as_deref(), Some("website"));
    }

    #[test]
    fn malformed_job_id_is_a_field_error() {
        let mut payload = valid_application_json();
        payload["job_id"] = json!("not-a-uuid");
        let details = application_payload(payload)
            .into_new_application()
            .unwrap_err();
        assert_eq!(details[0].field, "job_id");
        assert_eq!(details[0].message, "Invalid job ID");
    }

    #[test]
    fn empty_string_url_is_treated_as_absent() {
        let mut payload = valid_application_json();
        payload["resume_url"] = json!("");
        let (application, _) = application_payload(payload)
            .into_new_application()
            .unwrap();
        assert!(application.resume_url.is_none());
    }

    #[test]
    fn malformed_url_is_rejected() {
        let mut payload = valid_application_json();
        payload["linkedin_url"] = json!("not a url");
        let details = application_payload(payload)
            .into_new_application()
            .unwrap_err();
        assert_eq!(details[0].field, "linkedin_url");
        assert_eq!(details[0].message, "Please enter a valid LinkedIn URL");
    }

    #[test]
    fn experience_years_out_of_range_is_rejected() {
        let mut payload = valid_application_json();
        payload["experience_years"] = json!(51);
        let details = application_payload(payload)
            .into_new_application()
            .unwrap_err();
        assert_eq!(details[0].field, "experience_years");
    }

    #[test]
    fn job_title_is_passed_through_for_notification_only() {
        let mut payload = valid_application_json();
        payload["job_title"] = json!("Backend Engineer");
        let (_, title) = application_payload(payload)
            .into_new_application()
            .unwrap();
        assert_eq!(title.as_deref(), Some("Backend Engineer"));
    }
}
