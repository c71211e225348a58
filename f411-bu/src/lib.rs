//! f411-bu - Flying411 Bulk Upload client
//!
//! Drives one bulk-inventory upload session through the backend pipeline:
//! file intake, server-side parsing, AI-assisted column mapping, row
//! matching against the part master, review/remediation, and final import
//! into marketplace listings.
//!
//! The workflow is strictly linear (Upload → Map → Review → Results); all
//! state lives in an owned [`workflow::UploadContext`] rather than any
//! global store.

pub mod config;
pub mod error;
pub mod models;
pub mod review;
pub mod services;
pub mod workflow;

pub use config::BuConfig;
pub use error::UploadError;
pub use services::api_client::ApiClient;
pub use workflow::{UploadContext, WizardStep};
