//! services/api/src/lib.rs
//!
//! Library surface of the API service, shared by the `api` and
//! `openapi` binaries and by the test suite.

pub mod adapters;
pub mod config;
pub mod error;
pub mod i18n;
pub mod web;
