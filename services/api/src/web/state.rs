//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use leadgen_core::ports::{CareersStore, LeadStore, Notifier};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Everything in here is immutable after construction; requests share it
/// freely. The store adapters are connection-pooled, so concurrent use
/// needs no extra coordination.
#[derive(Clone)]
pub struct AppState {
    pub leads: Arc<dyn LeadStore>,
    pub careers: Arc<dyn CareersStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}
