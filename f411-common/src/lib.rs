//! # Flying411 Common Library
//!
//! Shared code for the Flying411 client tools including:
//! - Common error type
//! - API plumbing types (pagination, error envelope)
//! - Configuration loading (TOML + environment)
//! - Logging initialization

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
