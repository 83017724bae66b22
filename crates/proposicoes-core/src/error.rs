//! Unified error handling for proposicoes-core

use thiserror::Error;

/// Shown when the export endpoint answers 404
pub const MSG_NO_DATA: &str = "Nenhum dado encontrado para os parâmetros fornecidos.";

/// Shown for any other export failure
pub const MSG_EXPORT_FAILED: &str = "Ocorreu um erro ao tentar gerar o Excel.";

/// Shown when either reference list fails to load
pub const MSG_REFERENCES_FAILED: &str = "Erro ao buscar dados";

/// Core error type for proposicoes-core
///
/// `NotFound` and `ExportFailed` display only their message: it is the exact
/// text the user sees.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ExportFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for proposicoes-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The localized "no data" error
    pub fn no_data() -> Self {
        Error::NotFound(MSG_NO_DATA.to_string())
    }

    /// The localized "export failed" error
    pub fn export_failed() -> Self {
        Error::ExportFailed(MSG_EXPORT_FAILED.to_string())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Whether this error came from a 404 on the export endpoint
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
