pub mod domain;
pub mod ports;

pub use domain::{
    ApplicationFilters, ApplicationStatus, Job, JobApplication, JobFilters, JobLevel, JobType,
    Lead, LeadFilters, LeadPage, LeadPatch, LeadQuery, LeadSource, LeadStats, LeadStatus,
    NewApplication, NewLead, OrderDirection, RemoteType,
};
pub use ports::{CareersStore, LeadStore, Notifier, PortError, PortResult};
