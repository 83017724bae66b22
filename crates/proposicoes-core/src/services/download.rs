//! Download trigger
//!
//! Saves an export payload under a fixed file name. The bytes are staged in a
//! temporary file next to the target and renamed into place; the staging file
//! is removed on every path that does not end in the rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name every export is saved under, whatever the filters
pub const EXPORT_FILE_NAME: &str = "proposicoes.xlsx";

const STAGING_PREFIX: &str = ".proposicoes-";
const STAGING_SUFFIX: &str = ".part";

#[derive(Debug, Clone)]
pub struct DownloadTrigger {
    dir: PathBuf,
    file_name: String,
}

impl DownloadTrigger {
    /// Trigger saving into `dir` as `proposicoes.xlsx`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a triggered download ends up
    pub fn target_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Write `bytes` to the target path, replacing any previous export
    pub fn trigger(&self, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        // Dropping `staged` deletes the temp file
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;

        let target = self.target_path();
        staged
            .persist(&target)
            .map_err(|e| Error::Io(e.error))?;

        log::info!(
            "[download] Saved {} bytes to {}",
            bytes.len(),
            target.display()
        );
        Ok(target)
    }
}
