//! Export client
//!
//! Requests the server-generated spreadsheet and hands it to the
//! download trigger.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiError, ProposicaoApi};
use crate::error::{Error, Result};
use crate::models::ExportQuery;

use super::download::DownloadTrigger;

pub struct ExportClient {
    api: Arc<dyn ProposicaoApi>,
    download: DownloadTrigger,
}

impl ExportClient {
    pub fn new(api: Arc<dyn ProposicaoApi>, download: DownloadTrigger) -> Self {
        Self { api, download }
    }

    /// Where a successful export is saved
    pub fn target_path(&self) -> PathBuf {
        self.download.target_path()
    }

    /// Fetch the spreadsheet for `query`, save it and return the payload
    ///
    /// A 404 becomes `Error::NotFound`; every other failure, including a
    /// failed save, becomes `Error::ExportFailed`.
    pub async fn export(&self, query: &ExportQuery) -> Result<Vec<u8>> {
        let bytes = self
            .api
            .fetch_export(query)
            .await
            .map_err(classify_export_error)?;

        if let Err(e) = self.download.trigger(&bytes) {
            log::warn!("[export] Could not save spreadsheet: {}", e);
            return Err(Error::export_failed());
        }

        Ok(bytes)
    }
}

/// Map a transport error to the user-facing export error
pub fn classify_export_error(err: ApiError) -> Error {
    if err.is_not_found() {
        log::debug!("[export] No data for the given parameters");
        Error::no_data()
    } else {
        log::warn!("[export] Export request failed: {}", err);
        Error::export_failed()
    }
}
