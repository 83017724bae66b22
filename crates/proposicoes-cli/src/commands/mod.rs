//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod config;
pub mod export;
pub mod references;

use std::sync::Arc;

use anyhow::Result;
use proposicoes_core::{AppConfig, ApiClient};

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub config: AppConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// HTTP client for the configured API
    pub fn api(&self) -> Result<Arc<ApiClient>> {
        Ok(Arc::new(ApiClient::from_config(&self.config)?))
    }
}
