//! # proposicoes-core
//!
//! Core logic for the proposicoes export client - shared with the CLI.
//!
//! This crate provides:
//! - The shared HTTP client and remote service trait (`api` module)
//! - Data models (`models` module)
//! - Export client, download trigger and filter form (`services` module)
//! - Configuration (`config` module)
//! - Unified error handling (`error` module)

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use api::{ApiClient, ApiError, ProposicaoApi};
pub use config::AppConfig;
pub use error::{Error, Result};

pub use models::{format_calendar_date, ExportQuery, ReferenceItem, ReferenceKind};

pub use services::{
    DownloadTrigger, ExportClient, FieldError, FilterForm, FormField, FormState, FormValues,
    Toast, EXPORT_FILE_NAME,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
