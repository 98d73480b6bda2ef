//! crates/leadgen_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the intake pipeline.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or webhooks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    ApplicationFilters, ApplicationStatus, Job, JobApplication, JobFilters, Lead, LeadPage,
    LeadPatch, LeadQuery, LeadStats, LeadStatus, NewApplication, NewLead,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Store credentials are absent. A deployment defect, not a caller mistake.
    #[error("Database not configured")]
    NotConfigured,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint was violated (e.g. duplicate key).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The store's row-level access policy rejected the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Inserts a normalized lead with `status = new` and the default priority.
    /// Returns the stored record including its generated id.
    async fn create_lead(&self, lead: NewLead) -> PortResult<Lead>;

    /// Paginated, filtered listing. Callers are expected to pass a clamped query.
    async fn get_leads(&self, query: LeadQuery) -> PortResult<LeadPage>;

    async fn get_lead_by_id(&self, id: Uuid) -> PortResult<Lead>;

    /// Applies the `Some` fields of the patch and refreshes `updated_at`.
    async fn update_lead(&self, id: Uuid, patch: LeadPatch) -> PortResult<Lead>;

    /// Status transition. Moving to `contacted` stamps `last_contact_date`;
    /// moving to `closed` stamps `conversion_date`. No transition graph is
    /// enforced.
    async fn update_lead_status(
        &self,
        id: Uuid,
        status: LeadStatus,
        notes: Option<String>,
    ) -> PortResult<Lead>;

    async fn delete_lead(&self, id: Uuid) -> PortResult<()>;

    async fn bulk_update_leads(&self, ids: &[Uuid], patch: LeadPatch) -> PortResult<Vec<Lead>>;

    /// Duplicate emails are permitted; this is an explicit pre-check for
    /// callers that want to know.
    async fn email_exists(&self, email: &str) -> PortResult<bool>;

    async fn lead_stats(&self) -> PortResult<LeadStats>;
}

#[async_trait]
pub trait CareersStore: Send + Sync {
    /// Active jobs only, ordered featured-first then newest-first.
    async fn get_jobs(&self, filters: JobFilters) -> PortResult<Vec<Job>>;

    /// Active jobs only. A missing slug is `NotFound`, never `Unexpected`.
    async fn get_job_by_slug(&self, slug: &str) -> PortResult<Job>;

    async fn submit_application(&self, application: NewApplication) -> PortResult<JobApplication>;

    /// Admin listing, newest-first.
    async fn get_applications(
        &self,
        filters: ApplicationFilters,
    ) -> PortResult<Vec<JobApplication>>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> PortResult<()>;
}

/// Outbound chat notifications. Implementations must swallow transport
/// failures; callers dispatch these without awaiting them on the
/// response path.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_lead(&self, lead: &Lead);

    async fn notify_application(&self, application: &JobApplication, job_title: Option<&str>);
}
