//! Job Board Common Library
//!
//! Shared code for the job board gateway including:
//! - Database entities and the repository
//! - Profile, application and form-field rules
//! - Service layer for onboarding, companies, jobs, applications and dashboards
//! - Error types and the response envelope
//! - Configuration management
//! - Authentication utilities
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod metrics;
pub mod response;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use response::ApiResponse;
pub use services::Services;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
