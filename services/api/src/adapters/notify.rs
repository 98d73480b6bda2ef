//! services/api/src/adapters/notify.rs
//!
//! Chat-webhook notification adapter. Implements the `Notifier` port by
//! POSTing a plain-text summary of a new lead or application to a
//! configured webhook URL.
//!
//! Notifications are strictly best-effort: a missing or placeholder URL
//! makes dispatch a logged no-op, and transport or HTTP failures are
//! logged and swallowed. Nothing in here may ever propagate an error to
//! the request that triggered it.

use async_trait::async_trait;
use chrono::Utc;
use leadgen_core::domain::{JobApplication, Lead};
use leadgen_core::ports::Notifier;
use serde_json::json;
use tracing::{debug, warn};

/// Placeholder left in sample env files; treated the same as unset.
const PLACEHOLDER_URL: &str = "your_webhook_url_here";

const BOT_USERNAME: &str = "Leadgen Bot";
const BOT_ICON: &str = ":robot_face:";

#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    fn target_url(&self) -> Option<&str> {
        match self.webhook_url.as_deref() {
            None | Some("") | Some(PLACEHOLDER_URL) => None,
            Some(url) => Some(url),
        }
    }

    /// POSTs the message, logging instead of returning on any failure.
    async fn dispatch(&self, text: String) {
        let Some(url) = self.target_url() else {
            debug!("webhook not configured, skipping notification");
            return;
        };

        let body = json!({
            "text": text,
            "username": BOT_USERNAME,
            "icon_emoji": BOT_ICON,
        });

        match self.client.post(url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("webhook notification sent");
            }
            Ok(response) => {
                warn!(status = %response.status(), "webhook rejected notification");
            }
            Err(e) => {
                warn!(error = %e, "failed to send webhook notification");
            }
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_lead(&self, lead: &Lead) {
        self.dispatch(format_lead_message(lead)).await;
    }

    async fn notify_application(&self, application: &JobApplication, job_title: Option<&str>) {
        self.dispatch(format_application_message(application, job_title))
            .await;
    }
}

//=========================================================================================
// Message Formatting
//=========================================================================================

fn format_lead_message(lead: &Lead) -> String {
    let mut message = String::from("\u{1f3af} *New Lead Received!*\n\n");
    message.push_str(&format!("*Name:* {}\n", lead.name));
    message.push_str(&format!("*Email:* {}\n", lead.email));

    if let Some(phone) = &lead.phone {
        message.push_str(&format!("*Phone:* {}\n", phone));
    }
    if let Some(company) = &lead.company {
        message.push_str(&format!("*Company:* {}\n", company));
    }

    message.push_str(&format!("*Message:* {}\n\n", lead.message));
    message.push_str(&format!("*Source:* {}\n", lead.source));

    if let Some(locale) = &lead.locale {
        message.push_str(&format!("*Language:* {}\n", locale.to_uppercase()));
    }

    let mut utm_info = Vec::new();
    if let Some(source) = &lead.utm_source {
        utm_info.push(format!("Source: {}", source));
    }
    if let Some(medium) = &lead.utm_medium {
        utm_info.push(format!("Medium: {}", medium));
    }
    if let Some(campaign) = &lead.utm_campaign {
        utm_info.push(format!("Campaign: {}", campaign));
    }
    if !utm_info.is_empty() {
        message.push_str(&format!("*UTM Tracking:* {}\n", utm_info.join(" | ")));
    }

    message.push_str(&format!("\n\u{1f4c5} Received at {}", Utc::now().to_rfc2822()));
    message.push_str(&format!(
        "\n\u{1f4e7} Reply: <mailto:{}|{}>",
        lead.email, lead.email
    ));
    message
}

fn format_application_message(application: &JobApplication, job_title: Option<&str>) -> String {
    let experience = application
        .experience_years
        .map(|y| format!("{} years", y))
        .unwrap_or_else(|| "Not specified".to_string());
    let current_role = application
        .current_position
        .clone()
        .unwrap_or_else(|| "Not specified".to_string());
    let company = application
        .current_company
        .clone()
        .unwrap_or_else(|| "Not specified".to_string());

    format!(
        "\u{1f680} *New Job Application!*\n\n\
         *Position:* {}\n\
         *Candidate:* {} {}\n\
         *Email:* {}\n\
         *Experience:* {}\n\
         *Current Role:* {}\n\
         *Company:* {}\n\n\
         \u{1f4c5} Applied at {}",
        job_title.unwrap_or("Unknown"),
        application.first_name,
        application.last_name,
        application.email,
        experience,
        current_role,
        company,
        Utc::now().to_rfc2822()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leadgen_core::domain::{ApplicationStatus, LeadSource, LeadStatus};
    use uuid::Uuid;

    fn sample_lead() -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: "jane@acme.com".to_string(),
            message: "Interested in automation services.".to_string(),
            phone: Some("+34 600 000 000".to_string()),
            company: None,
            locale: Some("es".to_string()),
            source: LeadSource::ContactForm,
            utm_source: Some("google".to_string()),
            utm_medium: None,
            utm_campaign: Some("spring".to_string()),
            utm_content: None,
            utm_term: None,
            ip_address: None,
            user_agent: None,
            referrer: None,
            status: LeadStatus::New,
            priority: 5,
            notes: None,
            assigned_to: None,
            value: None,
            currency: None,
            follow_up_date: None,
            last_contact_date: None,
            conversion_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn lead_message_includes_key_fields_and_reply_hint() {
        let text = format_lead_message(&sample_lead());
        assert!(text.contains("*Name:* Jane Doe"));
        assert!(text.contains("*Email:* jane@acme.com"));
        assert!(text.contains("*Phone:* +34 600 000 000"));
        assert!(!text.contains("*Company:*"));
        assert!(text.contains("*Source:* contact_form"));
        assert!(text.contains("*Language:* ES"));
        assert!(text.contains("*UTM Tracking:* Source: google | Campaign: spring"));
        assert!(text.contains("mailto:jane@acme.com"));
    }

    #[test]
    fn application_message_fills_in_not_specified() {
        let application = JobApplication {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            first_name: "Sam".to_string(),
            last_name: "Rios".to_string(),
            email: "sam@example.com".to_string(),
            phone: None,
            linkedin_url: None,
            portfolio_url: None,
            resume_url: None,
            cover_letter: None,
            experience_years: None,
            current_position: None,
            current_company: None,
            why_interested: None,
            availability_date: None,
            salary_expectation: None,
            source: None,
            locale: None,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            status: ApplicationStatus::New,
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let text = format_application_message(&application, Some("Backend Engineer"));
        assert!(text.contains("*Position:* Backend Engineer"));
        assert!(text.contains("*Candidate:* Sam Rios"));
        assert!(text.contains("*Experience:* Not specified"));
    }

    #[test]
    fn placeholder_url_disables_dispatch() {
        let notifier = WebhookNotifier::new(Some(PLACEHOLDER_URL.to_string()));
        assert!(notifier.target_url().is_none());
        let notifier = WebhookNotifier::new(None);
        assert!(notifier.target_url().is_none());
        let notifier = WebhookNotifier::new(Some("https://hooks.example.com/x".to_string()));
        assert_eq!(notifier.target_url(), Some("https://hooks.example.com/x"));
    }

    #[tokio::test]
    async fn dispatch_to_dead_webhook_does_not_error() {
        // Unroutable address: the send fails, and dispatch must swallow it.
        let notifier = WebhookNotifier::new(Some("http://127.0.0.1:1/webhook".to_string()));
        notifier.notify_lead(&sample_lead()).await;
    }
}
