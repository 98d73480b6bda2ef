//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `LeadStore` and `CareersStore` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.
//!
//! The adapter holds two pools against the same database: a restricted
//! pool (public reads, subject to row-level policy) and an elevated
//! pool (server-side writes and admin reads, bypasses policy). Neither
//! is ever handed out; all access goes through the port methods.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadgen_core::domain::{
    ApplicationFilters, ApplicationStatus, Job, JobApplication, JobFilters, Lead, LeadPage,
    LeadPatch, LeadQuery, LeadStats, LeadStatus, NewApplication, NewLead, OrderDirection,
    DEFAULT_LEAD_PRIORITY,
};
use leadgen_core::ports::{CareersStore, LeadStore, PortError, PortResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;

/// Columns a lead listing may be ordered by. Anything else silently
/// falls back to `created_at`, since the column name is spliced into
/// SQL and must never come from the caller unchecked.
const LEAD_ORDER_COLUMNS: [&str; 8] = [
    "created_at",
    "updated_at",
    "name",
    "email",
    "status",
    "priority",
    "value",
    "follow_up_date",
];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter implementing the `LeadStore` and `CareersStore` ports.
#[derive(Clone)]
pub struct PgStore {
    restricted: Option<PgPool>,
    elevated: Option<PgPool>,
}

impl PgStore {
    /// Connects whichever pools the configuration provides. With neither
    /// credential present the adapter still constructs, and every
    /// operation reports `PortError::NotConfigured`.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let restricted = match &config.database_url {
            Some(url) => Some(
                PgPoolOptions::new()
                    .max_connections(5)
                    .connect(url)
                    .await?,
            ),
            None => None,
        };
        let elevated = match &config.database_admin_url {
            Some(url) => Some(
                PgPoolOptions::new()
                    .max_connections(5)
                    .connect(url)
                    .await?,
            ),
            None => None,
        };
        if elevated.is_none() {
            warn!("DATABASE_ADMIN_URL not set; writes will use the restricted credential");
        }
        Ok(Self {
            restricted,
            elevated,
        })
    }

    #[cfg(test)]
    pub fn unconfigured() -> Self {
        Self {
            restricted: None,
            elevated: None,
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        if let Ok(pool) = self.write_pool() {
            sqlx::migrate!("./migrations").run(pool).await?;
        }
        Ok(())
    }

    /// Pool for public reads: restricted when available.
    fn read_pool(&self) -> PortResult<&PgPool> {
        self.restricted
            .as_ref()
            .or(self.elevated.as_ref())
            .ok_or(PortError::NotConfigured)
    }

    /// Pool for server-side writes and admin reads: elevated when
    /// available, otherwise the restricted pool (writes may then be
    /// rejected by the row-level policy, surfaced as PermissionDenied).
    fn write_pool(&self) -> PortResult<&PgPool> {
        self.elevated
            .as_ref()
            .or(self.restricted.as_ref())
            .ok_or(PortError::NotConfigured)
    }
}

/// Maps a sqlx error to the port taxonomy: unique violations become
/// `Conflict`, row-level policy rejections become `PermissionDenied`,
/// missing rows become `NotFound`.
fn map_db_err(op: &str, context: &str, e: sqlx::Error) -> PortError {
    match &e {
        sqlx::Error::RowNotFound => PortError::NotFound(context.to_string()),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("23505") => PortError::Conflict(context.to_string()),
            Some("42501") => PortError::PermissionDenied(context.to_string()),
            _ => PortError::Unexpected(format!("{}: {}", op, e)),
        },
        _ => PortError::Unexpected(format!("{}: {}", op, e)),
    }
}

fn like_pattern(search: &str) -> String {
    format!("%{}%", search)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct LeadRecord {
    id: Uuid,
    name: String,
    email: String,
    message: String,
    phone: Option<String>,
    company: Option<String>,
    locale: Option<String>,
    source: String,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    utm_content: Option<String>,
    utm_term: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    status: String,
    priority: i32,
    notes: Option<String>,
    assigned_to: Option<String>,
    value: Option<f64>,
    currency: Option<String>,
    follow_up_date: Option<DateTime<Utc>>,
    last_contact_date: Option<DateTime<Utc>>,
    conversion_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeadRecord {
    fn to_domain(self) -> PortResult<Lead> {
        Ok(Lead {
            id: self.id,
            name: self.name,
            email: self.email,
            message: self.message,
            phone: self.phone,
            company: self.company,
            locale: self.locale,
            source: self
                .source
                .parse()
                .map_err(|e| PortError::Unexpected(format!("leads row {}: {}", self.id, e)))?,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
            utm_content: self.utm_content,
            utm_term: self.utm_term,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            referrer: self.referrer,
            status: self
                .status
                .parse()
                .map_err(|e| PortError::Unexpected(format!("leads row {}: {}", self.id, e)))?,
            priority: self.priority,
            notes: self.notes,
            assigned_to: self.assigned_to,
            value: self.value,
            currency: self.currency,
            follow_up_date: self.follow_up_date,
            last_contact_date: self.last_contact_date,
            conversion_date: self.conversion_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct JobRecord {
    id: Uuid,
    title: String,
    slug: String,
    department: String,
    job_type: String,
    job_level: String,
    remote_type: String,
    location: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    currency: String,
    description: String,
    requirements: String,
    responsibilities: String,
    benefits: Option<String>,
    is_active: bool,
    featured: bool,
    applications_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRecord {
    fn to_domain(self) -> PortResult<Job> {
        let unexpected =
            |e: leadgen_core::domain::ParseEnumError| PortError::Unexpected(e.to_string());
        Ok(Job {
            id: self.id,
            title: self.title,
            slug: self.slug,
            department: self.department,
            job_type: self.job_type.parse().map_err(unexpected)?,
            job_level: self.job_level.parse().map_err(unexpected)?,
            remote_type: self.remote_type.parse().map_err(unexpected)?,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            currency: self.currency,
            description: self.description,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            benefits: self.benefits,
            is_active: self.is_active,
            featured: self.featured,
            applications_count: self.applications_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ApplicationRecord {
    id: Uuid,
    job_id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    linkedin_url: Option<String>,
    portfolio_url: Option<String>,
    resume_url: Option<String>,
    cover_letter: Option<String>,
    experience_years: Option<i32>,
    current_position: Option<String>,
    current_company: Option<String>,
    why_interested: Option<String>,
    availability_date: Option<String>,
    salary_expectation: Option<f64>,
    source: Option<String>,
    locale: Option<String>,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    status: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    fn to_domain(self) -> PortResult<JobApplication> {
        Ok(JobApplication {
            id: self.id,
            job_id: self.job_id,
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
            source: self.source,
            locale: self.locale,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
            status: self
                .status
                .parse()
                .map_err(|e| PortError::Unexpected(format!("job_applications row {}: {}", self.id, e)))?,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

//=========================================================================================
// Query-Building Helpers
//=========================================================================================

/// Appends the WHERE fragment for a lead listing to both the count and
/// the page query. The two queries must stay in lockstep, so they share
/// this single builder function.
fn push_lead_filters<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    filters: &'a leadgen_core::domain::LeadFilters,
) {
    qb.push(" WHERE TRUE");
    if !filters.status.is_empty() {
        let statuses: Vec<String> = filters.status.iter().map(|s| s.as_str().to_string()).collect();
        qb.push(" AND status = ANY(").push_bind(statuses).push(")");
    }
    if !filters.source.is_empty() {
        let sources: Vec<String> = filters.source.iter().map(|s| s.as_str().to_string()).collect();
        qb.push(" AND source = ANY(").push_bind(sources).push(")");
    }
    if let Some(from) = filters.date_from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filters.date_to {
        qb.push(" AND created_at <= ").push_bind(to);
    }
    if let Some(search) = &filters.search {
        let pattern = like_pattern(search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(assigned_to) = &filters.assigned_to {
        qb.push(" AND assigned_to = ").push_bind(assigned_to);
    }
    if let Some(min) = filters.min_value {
        qb.push(" AND value >= ").push_bind(min);
    }
    if let Some(max) = filters.max_value {
        qb.push(" AND value <= ").push_bind(max);
    }
}

/// Appends the `SET` list for a lead patch. `updated_at` is always
/// refreshed; everything else only when present.
fn push_lead_patch(qb: &mut QueryBuilder<'_, Postgres>, patch: &LeadPatch) {
    qb.push(" SET updated_at = now()");
    if let Some(name) = &patch.name {
        qb.push(", name = ").push_bind(name.clone());
    }
    if let Some(email) = &patch.email {
        qb.push(", email = ").push_bind(email.clone());
    }
    if let Some(phone) = &patch.phone {
        qb.push(", phone = ").push_bind(phone.clone());
    }
    if let Some(company) = &patch.company {
        qb.push(", company = ").push_bind(company.clone());
    }
    if let Some(message) = &patch.message {
        qb.push(", message = ").push_bind(message.clone());
    }
    if let Some(status) = patch.status {
        qb.push(", status = ").push_bind(status.as_str());
    }
    if let Some(notes) = &patch.notes {
        qb.push(", notes = ").push_bind(notes.clone());
    }
    if let Some(assigned_to) = &patch.assigned_to {
        qb.push(", assigned_to = ").push_bind(assigned_to.clone());
    }
    if let Some(priority) = patch.priority {
        qb.push(", priority = ").push_bind(priority);
    }
    if let Some(value) = patch.value {
        qb.push(", value = ").push_bind(value);
    }
    if let Some(currency) = &patch.currency {
        qb.push(", currency = ").push_bind(currency.clone());
    }
    if let Some(follow_up) = patch.follow_up_date {
        qb.push(", follow_up_date = ").push_bind(follow_up);
    }
    if let Some(last_contact) = patch.last_contact_date {
        qb.push(", last_contact_date = ").push_bind(last_contact);
    }
    if let Some(conversion) = patch.conversion_date {
        qb.push(", conversion_date = ").push_bind(conversion);
    }
}

fn lead_order_column(requested: &str) -> &str {
    if LEAD_ORDER_COLUMNS.contains(&requested) {
        requested
    } else {
        "created_at"
    }
}

/// Builds the patch for a status transition. Contacted stamps the last
/// contact time; closed stamps the conversion time. Idempotent:
/// re-stamping just refreshes.
fn status_patch(status: LeadStatus, notes: Option<String>) -> LeadPatch {
    let mut patch = LeadPatch {
        status: Some(status),
        notes,
        ..LeadPatch::default()
    };
    match status {
        LeadStatus::Contacted => patch.last_contact_date = Some(Utc::now()),
        LeadStatus::Closed => patch.conversion_date = Some(Utc::now()),
        _ => {}
    }
    patch
}

/// Conversion rate as a percentage of leads that reached `closed`.
fn conversion_rate(closed: i64, total: i64) -> f64 {
    if total > 0 {
        closed as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

//=========================================================================================
// `LeadStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl LeadStore for PgStore {
    async fn create_lead(&self, lead: NewLead) -> PortResult<Lead> {
        let pool = self.write_pool()?;
        let record = sqlx::query_as::<_, LeadRecord>(
            r#"
            INSERT INTO leads (
                name, email, message, phone, company, locale, source,
                utm_source, utm_medium, utm_campaign, utm_content, utm_term,
                ip_address, user_agent, referrer, status, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.message)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.locale)
        .bind(lead.source.as_str())
        .bind(&lead.utm_source)
        .bind(&lead.utm_medium)
        .bind(&lead.utm_campaign)
        .bind(&lead.utm_content)
        .bind(&lead.utm_term)
        .bind(&lead.ip_address)
        .bind(&lead.user_agent)
        .bind(&lead.referrer)
        .bind(LeadStatus::New.as_str())
        .bind(DEFAULT_LEAD_PRIORITY)
        .fetch_one(pool)
        .await
        .map_err(|e| map_db_err("create_lead", &lead.email, e))?;

        record.to_domain()
    }

    async fn get_leads(&self, query: LeadQuery) -> PortResult<LeadPage> {
        let pool = self.write_pool()?;

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM leads");
        push_lead_filters(&mut count_qb, &query.filters);
        let total: i64 = count_qb
            .build()
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("get_leads", "count", e))?
            .get(0);

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM leads");
        push_lead_filters(&mut qb, &query.filters);
        qb.push(" ORDER BY ");
        qb.push(lead_order_column(&query.order_by));
        qb.push(match query.order_direction {
            OrderDirection::Asc => " ASC",
            OrderDirection::Desc => " DESC",
        });
        qb.push(" LIMIT ").push_bind(query.limit);
        qb.push(" OFFSET ").push_bind(query.offset);

        let records = qb
            .build_query_as::<LeadRecord>()
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("get_leads", "page", e))?;

        let data = records
            .into_iter()
            .map(LeadRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;

        Ok(LeadPage::from_parts(data, total, query.limit, query.offset))
    }

    async fn get_lead_by_id(&self, id: Uuid) -> PortResult<Lead> {
        let pool = self.write_pool()?;
        let record = sqlx::query_as::<_, LeadRecord>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("get_lead_by_id", &id.to_string(), e))?
            .ok_or_else(|| PortError::NotFound(format!("Lead {} not found", id)))?;
        record.to_domain()
    }

    async fn update_lead(&self, id: Uuid, patch: LeadPatch) -> PortResult<Lead> {
        let pool = self.write_pool()?;
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE leads");
        push_lead_patch(&mut qb, &patch);
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        let record = qb
            .build_query_as::<LeadRecord>()
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("update_lead", &id.to_string(), e))?
            .ok_or_else(|| PortError::NotFound(format!("Lead {} not found", id)))?;
        record.to_domain()
    }

    async fn update_lead_status(
        &self,
        id: Uuid,
        status: LeadStatus,
        notes: Option<String>,
    ) -> PortResult<Lead> {
        self.update_lead(id, status_patch(status, notes)).await
    }

    async fn delete_lead(&self, id: Uuid) -> PortResult<()> {
        let pool = self.write_pool()?;
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| map_db_err("delete_lead", &id.to_string(), e))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Lead {} not found", id)));
        }
        Ok(())
    }

    async fn bulk_update_leads(&self, ids: &[Uuid], patch: LeadPatch) -> PortResult<Vec<Lead>> {
        let pool = self.write_pool()?;
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE leads");
        push_lead_patch(&mut qb, &patch);
        qb.push(" WHERE id = ANY(").push_bind(ids.to_vec()).push(")");
        qb.push(" RETURNING *");

        let records = qb
            .build_query_as::<LeadRecord>()
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("bulk_update_leads", "batch", e))?;
        records.into_iter().map(LeadRecord::to_domain).collect()
    }

    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        let pool = self.write_pool()?;
        let exists: bool =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM leads WHERE email = $1)")
                .bind(email.trim().to_lowercase())
                .fetch_one(pool)
                .await
                .map_err(|e| map_db_err("email_exists", email, e))?
                .get(0);
        Ok(exists)
    }

    async fn lead_stats(&self) -> PortResult<LeadStats> {
        let pool = self.write_pool()?;
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*)                                         AS total,
                COUNT(*) FILTER (WHERE status = 'new')           AS new,
                COUNT(*) FILTER (WHERE status = 'contacted')     AS contacted,
                COUNT(*) FILTER (WHERE status = 'qualified')     AS qualified,
                COUNT(*) FILTER (WHERE status = 'proposal')      AS proposal,
                COUNT(*) FILTER (WHERE status = 'closed')        AS closed,
                COUNT(*) FILTER (WHERE status = 'lost')          AS lost,
                COALESCE(SUM(value), 0)                          AS total_value,
                COALESCE(AVG(value), 0)                          AS average_value
            FROM leads
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(|e| map_db_err("lead_stats", "aggregate", e))?;

        let total: i64 = row.get("total");
        let closed: i64 = row.get("closed");
        Ok(LeadStats {
            total,
            new: row.get("new"),
            contacted: row.get("contacted"),
            qualified: row.get("qualified"),
            proposal: row.get("proposal"),
            closed,
            lost: row.get("lost"),
            total_value: row.get("total_value"),
            average_value: row.get("average_value"),
            conversion_rate: conversion_rate(closed, total),
        })
    }
}

//=========================================================================================
// `CareersStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CareersStore for PgStore {
    async fn get_jobs(&self, filters: JobFilters) -> PortResult<Vec<Job>> {
        let pool = self.read_pool()?;
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM jobs WHERE is_active = TRUE");
        if let Some(department) = &filters.department {
            qb.push(" AND department = ").push_bind(department.clone());
        }
        if let Some(job_type) = filters.job_type {
            qb.push(" AND job_type = ").push_bind(job_type.as_str());
        }
        if let Some(job_level) = filters.job_level {
            qb.push(" AND job_level = ").push_bind(job_level.as_str());
        }
        if let Some(remote_type) = filters.remote_type {
            qb.push(" AND remote_type = ").push_bind(remote_type.as_str());
        }
        if let Some(featured) = filters.featured {
            qb.push(" AND featured = ").push_bind(featured);
        }
        if let Some(search) = &filters.search {
            let pattern = like_pattern(search);
            qb.push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR requirements ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY featured DESC, created_at DESC");

        let records = qb
            .build_query_as::<JobRecord>()
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("get_jobs", "listing", e))?;
        records.into_iter().map(JobRecord::to_domain).collect()
    }

    async fn get_job_by_slug(&self, slug: &str) -> PortResult<Job> {
        let pool = self.read_pool()?;
        let record = sqlx::query_as::<_, JobRecord>(
            "SELECT * FROM jobs WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_db_err("get_job_by_slug", slug, e))?
        .ok_or_else(|| PortError::NotFound(format!("Job '{}' not found", slug)))?;
        record.to_domain()
    }

    async fn submit_application(&self, application: NewApplication) -> PortResult<JobApplication> {
        let pool = self.write_pool()?;
        let record = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            INSERT INTO job_applications (
                job_id, first_name, last_name, email, phone,
                linkedin_url, portfolio_url, resume_url, cover_letter,
                experience_years, current_position, current_company,
                why_interested, availability_date, salary_expectation,
                source, locale, utm_source, utm_medium, utm_campaign,
                status, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING *
            "#,
        )
        .bind(application.job_id)
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.linkedin_url)
        .bind(&application.portfolio_url)
        .bind(&application.resume_url)
        .bind(&application.cover_letter)
        .bind(application.experience_years)
        .bind(&application.current_position)
        .bind(&application.current_company)
        .bind(&application.why_interested)
        .bind(&application.availability_date)
        .bind(application.salary_expectation)
        .bind(&application.source)
        .bind(&application.locale)
        .bind(&application.utm_source)
        .bind(&application.utm_medium)
        .bind(&application.utm_campaign)
        .bind(ApplicationStatus::New.as_str())
        .bind(&application.ip_address)
        .bind(&application.user_agent)
        .fetch_one(pool)
        .await
        .map_err(|e| map_db_err("submit_application", &application.email, e))?;
        record.to_domain()
    }

    async fn get_applications(
        &self,
        filters: ApplicationFilters,
    ) -> PortResult<Vec<JobApplication>> {
        let pool = self.write_pool()?;
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM job_applications WHERE TRUE");
        if let Some(job_id) = filters.job_id {
            qb.push(" AND job_id = ").push_bind(job_id);
        }
        if let Some(status) = filters.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(from) = filters.date_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filters.date_to {
            qb.push(" AND created_at <= ").push_bind(to);
        }
        if let Some(search) = &filters.search {
            let pattern = like_pattern(search);
            qb.push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR current_company ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY created_at DESC");

        let records = qb
            .build_query_as::<ApplicationRecord>()
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("get_applications", "listing", e))?;
        records.into_iter().map(ApplicationRecord::to_domain).collect()
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> PortResult<()> {
        let pool = self.write_pool()?;
        let result = sqlx::query(
            "UPDATE job_applications SET status = $1, updated_at = now() WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_db_err("update_application_status", &id.to_string(), e))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Application {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgen_core::domain::NewLead;

    fn sample_lead() -> NewLead {
        NewLead {
            name: "Jane Doe".to_string(),
            email: "jane@acme.com".to_string(),
            message: "Interested in automation services.".to_string(),
            phone: None,
            company: None,
            locale: None,
            source: leadgen_core::domain::LeadSource::ContactForm,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            utm_content: None,
            utm_term: None,
            ip_address: None,
            user_agent: None,
            referrer: None,
        }
    }

    #[test]
    fn order_column_is_whitelisted() {
        assert_eq!(lead_order_column("priority"), "priority");
        assert_eq!(lead_order_column("created_at; DROP TABLE leads"), "created_at");
    }

    #[test]
    fn status_transitions_stamp_the_right_dates() {
        let patch = status_patch(LeadStatus::Contacted, None);
        assert!(patch.last_contact_date.is_some());
        assert!(patch.conversion_date.is_none());

        let patch = status_patch(LeadStatus::Closed, Some("signed".to_string()));
        assert!(patch.conversion_date.is_some());
        assert!(patch.last_contact_date.is_none());
        assert_eq!(patch.notes.as_deref(), Some("signed"));

        let patch = status_patch(LeadStatus::Qualified, None);
        assert!(patch.last_contact_date.is_none() && patch.conversion_date.is_none());
    }

    #[test]
    fn conversion_rate_handles_empty_store() {
        assert_eq!(conversion_rate(0, 0), 0.0);
        assert_eq!(conversion_rate(1, 4), 25.0);
    }

    #[tokio::test]
    async fn unconfigured_store_reports_not_configured() {
        let store = PgStore::unconfigured();
        assert!(matches!(
            store.create_lead(sample_lead()).await,
            Err(PortError::NotConfigured)
        ));
        assert!(matches!(
            store.get_jobs(JobFilters::default()).await,
            Err(PortError::NotConfigured)
        ));
        assert!(matches!(
            store.email_exists("jane@acme.com").await,
            Err(PortError::NotConfigured)
        ));
        assert!(matches!(
            store
                .bulk_update_leads(&[Uuid::new_v4()], LeadPatch::default())
                .await,
            Err(PortError::NotConfigured)
        ));
    }
}
