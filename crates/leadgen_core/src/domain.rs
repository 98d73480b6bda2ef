//! crates/leadgen_core/src/domain.rs
//!
//! Defines the pure, core data structures for the lead and careers
//! intake pipeline. These structs are independent of any database or
//! web framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Lead Enumerations
//=========================================================================================

/// Pipeline stage of a lead. New leads always start in `New`; there is
/// no transition graph, any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Closed,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Closed => "closed",
            LeadStatus::Lost => "lost",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "proposal" => Ok(LeadStatus::Proposal),
            "closed" => Ok(LeadStatus::Closed),
            "lost" => Ok(LeadStatus::Lost),
            _ => Err(ParseEnumError::new("lead status", s)),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a lead came from. A closed set; the intake service defaults
/// to `ContactForm` when the submission does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    ContactForm,
    WhatsappAutomationForm,
    CareerApplication,
    Newsletter,
    Referral,
    SocialMedia,
    GoogleAds,
    OrganicSearch,
    Direct,
    Other,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::ContactForm => "contact_form",
            LeadSource::WhatsappAutomationForm => "whatsapp_automation_form",
            LeadSource::CareerApplication => "career_application",
            LeadSource::Newsletter => "newsletter",
            LeadSource::Referral => "referral",
            LeadSource::SocialMedia => "social_media",
            LeadSource::GoogleAds => "google_ads",
            LeadSource::OrganicSearch => "organic_search",
            LeadSource::Direct => "direct",
            LeadSource::Other => "other",
        }
    }
}

impl FromStr for LeadSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact_form" => Ok(LeadSource::ContactForm),
            "whatsapp_automation_form" => Ok(LeadSource::WhatsappAutomationForm),
            "career_application" => Ok(LeadSource::CareerApplication),
            "newsletter" => Ok(LeadSource::Newsletter),
            "referral" => Ok(LeadSource::Referral),
            "social_media" => Ok(LeadSource::SocialMedia),
            "google_ads" => Ok(LeadSource::GoogleAds),
            "organic_search" => Ok(LeadSource::OrganicSearch),
            "direct" => Ok(LeadSource::Direct),
            "other" => Ok(LeadSource::Other),
            _ => Err(ParseEnumError::new("lead source", s)),
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire string does not name a known enum variant.
#[derive(Debug, Clone, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

//=========================================================================================
// Lead
//=========================================================================================

/// A captured lead, as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub locale: Option<String>,
    pub source: LeadSource,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub status: LeadStatus,
    pub priority: i32,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub conversion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default priority assigned to freshly captured leads (mid-range).
pub const DEFAULT_LEAD_PRIORITY: i32 = 5;

/// A validated, normalized lead submission ready for insertion.
///
/// Construction happens at the edge: name/message trimmed, email
/// trimmed and lowercased, source defaulted. The store trusts these
/// invariants.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub locale: Option<String>,
    pub source: LeadSource,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// A partial update to a lead. Only fields that are `Some` are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<i32>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub conversion_date: Option<DateTime<Utc>>,
}

impl LeadPatch {
    /// True when no field would be applied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.message.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.assigned_to.is_none()
            && self.priority.is_none()
            && self.value.is_none()
            && self.currency.is_none()
            && self.follow_up_date.is_none()
            && self.last_contact_date.is_none()
            && self.conversion_date.is_none()
    }
}

//=========================================================================================
// Lead Queries
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Filters applied when listing leads.
#[derive(Debug, Clone, Default)]
pub struct LeadFilters {
    pub status: Vec<LeadStatus>,
    pub source: Vec<LeadSource>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Free-text match against name, email and company.
    pub search: Option<String>,
    pub assigned_to: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// Pagination, ordering and filtering options for lead listings.
#[derive(Debug, Clone)]
pub struct LeadQuery {
    pub limit: i64,
    pub offset: i64,
    pub order_by: String,
    pub order_direction: OrderDirection,
    pub filters: LeadFilters,
}

/// Hard cap on page size for lead listings.
pub const MAX_PAGE_SIZE: i64 = 100;

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            order_by: "created_at".to_string(),
            order_direction: OrderDirection::Desc,
            filters: LeadFilters::default(),
        }
    }
}

impl LeadQuery {
    /// Clamps the limit to `[1, MAX_PAGE_SIZE]` and the offset to `>= 0`.
    pub fn clamped(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        self.offset = self.offset.max(0);
        self
    }
}

/// One page of leads plus pagination bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct LeadPage {
    pub data: Vec<Lead>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl LeadPage {
    /// Derives the page number and page count from an offset/limit pair.
    pub fn from_parts(data: Vec<Lead>, total: i64, limit: i64, offset: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        let page = if limit > 0 { offset / limit + 1 } else { 1 };
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Aggregate counts and monetary figures across all leads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadStats {
    pub total: i64,
    pub new: i64,
    pub contacted: i64,
    pub qualified: i64,
    pub proposal: i64,
    pub closed: i64,
    pub lost: i64,
    pub total_value: f64,
    pub average_value: f64,
    /// Percentage of leads that reached `Closed`.
    pub conversion_rate: f64,
}

//=========================================================================================
// Jobs
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

impl FromStr for JobType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            _ => Err(ParseEnumError::new("job type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Manager,
    Director,
}

impl JobLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobLevel::Entry => "entry",
            JobLevel::Mid => "mid",
            JobLevel::Senior => "senior",
            JobLevel::Lead => "lead",
            JobLevel::Manager => "manager",
            JobLevel::Director => "director",
        }
    }
}

impl FromStr for JobLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(JobLevel::Entry),
            "mid" => Ok(JobLevel::Mid),
            "senior" => Ok(JobLevel::Senior),
            "lead" => Ok(JobLevel::Lead),
            "manager" => Ok(JobLevel::Manager),
            "director" => Ok(JobLevel::Director),
            _ => Err(ParseEnumError::new("job level", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    Remote,
    Hybrid,
    Onsite,
}

impl RemoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteType::Remote => "remote",
            RemoteType::Hybrid => "hybrid",
            RemoteType::Onsite => "onsite",
        }
    }
}

impl FromStr for RemoteType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(RemoteType::Remote),
            "hybrid" => Ok(RemoteType::Hybrid),
            "onsite" => Ok(RemoteType::Onsite),
            _ => Err(ParseEnumError::new("remote type", s)),
        }
    }
}

/// A posted position. Created and edited out-of-band; this codebase
/// only reads jobs, apart from the denormalized application counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub department: String,
    pub job_type: JobType,
    pub job_level: JobLevel,
    pub remote_type: RemoteType,
    pub location: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: Option<String>,
    pub is_active: bool,
    pub featured: bool,
    pub applications_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters applied when listing active jobs.
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    pub department: Option<String>,
    pub job_type: Option<JobType>,
    pub job_level: Option<JobLevel>,
    pub remote_type: Option<RemoteType>,
    pub featured: Option<bool>,
    /// Free-text match against title, description and requirements.
    pub search: Option<String>,
}

//=========================================================================================
// Job Applications
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    New,
    Reviewing,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ApplicationStatus::New),
            "reviewing" => Ok(ApplicationStatus::Reviewing),
            "interview" => Ok(ApplicationStatus::Interview),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            _ => Err(ParseEnumError::new("application status", s)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated job application ready for insertion.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub experience_years: Option<i32>,
    pub current_position: Option<String>,
    pub current_company: Option<String>,
    pub why_interested: Option<String>,
    pub availability_date: Option<String>,
    pub salary_expectation: Option<f64>,
    pub source: Option<String>,
    pub locale: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A submitted job application, as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub experience_years: Option<i32>,
    pub current_position: Option<String>,
    pub current_company: Option<String>,
    pub why_interested: Option<String>,
    pub availability_date: Option<String>,
    pub salary_expectation: Option<f64>,
    pub source: Option<String>,
    pub locale: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub status: ApplicationStatus,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters applied when listing job applications (admin).
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilters {
    pub job_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
    /// Free-text match against first name, last name, email and current company.
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_round_trips_through_wire_strings() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Proposal,
            LeadStatus::Closed,
            LeadStatus::Lost,
        ] {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
        assert!("archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn lead_source_accepts_every_known_tag() {
        assert_eq!(
            "whatsapp_automation_form".parse::<LeadSource>().unwrap(),
            LeadSource::WhatsappAutomationForm
        );
        assert_eq!("google_ads".parse::<LeadSource>().unwrap(), LeadSource::GoogleAds);
        assert!("carrier_pigeon".parse::<LeadSource>().is_err());
    }

    #[test]
    fn job_type_uses_kebab_case_wire_strings() {
        assert_eq!("full-time".parse::<JobType>().unwrap(), JobType::FullTime);
        assert!("full_time".parse::<JobType>().is_err());
    }

    #[test]
    fn lead_query_clamps_limit_and_offset() {
        let q = LeadQuery {
            limit: 200,
            offset: -5,
            ..LeadQuery::default()
        }
        .clamped();
        assert_eq!(q.limit, MAX_PAGE_SIZE);
        assert_eq!(q.offset, 0);

        let q = LeadQuery {
            limit: 0,
            ..LeadQuery::default()
        }
        .clamped();
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn lead_page_derives_page_numbers() {
        let page = LeadPage::from_parts(vec![], 101, 50, 50);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);

        let empty = LeadPage::from_parts(vec![], 0, 50, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(LeadPatch::default().is_empty());
        let patch = LeadPatch {
            notes: Some("called twice".to_string()),
            ..LeadPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
