//! Remote service access
//!
//! Every endpoint goes through one shared base client:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ trait ProposicaoApi                                 │
//! │   fetch_reference_list(kind) -> Vec<ReferenceItem>  │
//! │   fetch_export(query) -> Vec<u8>                    │
//! └─────────────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ ApiClient (reqwest)                                 │
//! │   base URL + relative path, Accept, timeout         │
//! └─────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{ExportQuery, ReferenceItem, ReferenceKind};

/// Spreadsheet export endpoint
pub const EXPORT_PATH: &str = "/proposicao/gerar-excel";

/// Bodies of failed responses are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 500;

// ============================================================================
// Error Types
// ============================================================================

/// Transport-level failures
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request never produced a response (connect, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Base URL and path do not form a valid URL
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl ApiError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Connection failed".to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::Url(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

// ============================================================================
// Service Trait
// ============================================================================

/// The remote service the client talks to
///
/// `ApiClient` is the production implementation; tests plug in fakes.
#[async_trait]
pub trait ProposicaoApi: Send + Sync {
    /// Fetch a reference list (municipalities or species)
    async fn fetch_reference_list(&self, kind: ReferenceKind)
        -> Result<Vec<ReferenceItem>, ApiError>;

    /// Request the spreadsheet for `query`, returning the raw bytes
    async fn fetch_export(&self, query: &ExportQuery) -> Result<Vec<u8>, ApiError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Shared base HTTP client
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for `base_url` with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Url(format!(
                "{} (expected an http:// or https:// URL)",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self { base_url, client })
    }

    /// Create a client from application config
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL with an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turn a non-success response into `ApiError::Status`
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ProposicaoApi for ApiClient {
    async fn fetch_reference_list(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceItem>, ApiError> {
        let url = self.url(kind.path());
        log::debug!("[api] GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let items: Vec<ReferenceItem> = response.json().await?;
        log::debug!("[api] {} {} loaded", items.len(), kind.label());
        Ok(items)
    }

    async fn fetch_export(&self, query: &ExportQuery) -> Result<Vec<u8>, ApiError> {
        let url = self.url(EXPORT_PATH);
        log::debug!("[api] GET {} {:?}", url, query.to_params());

        let response = self
            .client
            .get(&url)
            .query(&query.to_params())
            .header(header::ACCEPT, "application/octet-stream")
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
