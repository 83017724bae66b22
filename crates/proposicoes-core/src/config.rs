//! Application configuration
//!
//! Values come from, in order of precedence: explicit overrides (CLI flags),
//! environment variables, built-in defaults.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};

pub const ENV_API_URL: &str = "PROPOSICOES_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PROPOSICOES_TIMEOUT_SECS";
pub const ENV_OUTPUT_DIR: &str = "PROPOSICOES_OUTPUT_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where a configuration value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Flag,
    Env,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Flag => write!(f, "flag"),
            ConfigSource::Env => write!(f, "env"),
            ConfigSource::Default => write!(f, "default"),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Base URL every endpoint is resolved against
    pub api_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Directory downloads are saved into
    pub output_dir: PathBuf,
    #[serde(skip)]
    sources: [ConfigSource; 3],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: default_output_dir(),
            sources: [ConfigSource::Default; 3],
        }
    }
}

impl AppConfig {
    /// Defaults, then environment variables, then the given flag values
    ///
    /// An environment variable shadowed by a flag is never parsed, so a
    /// malformed value cannot fail a run that overrides it.
    pub fn resolve(api_url: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        let mut config = Self::default();

        match api_url {
            Some(url) => config = config.with_api_url(url),
            None => {
                if let Ok(url) = std::env::var(ENV_API_URL) {
                    config.api_url = url;
                    config.sources[0] = ConfigSource::Env;
                }
            }
        }
        match timeout_secs {
            Some(secs) => config = config.with_timeout_secs(secs),
            None => {
                if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
                    config.timeout_secs = parse_timeout(&raw)?;
                    config.sources[1] = ConfigSource::Env;
                }
            }
        }
        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            config.output_dir = expand_path(&dir);
            config.sources[2] = ConfigSource::Env;
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self.sources[0] = ConfigSource::Flag;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self.sources[1] = ConfigSource::Flag;
        self
    }

    pub fn with_output_dir(mut self, dir: &str) -> Self {
        self.output_dir = expand_path(dir);
        self.sources[2] = ConfigSource::Flag;
        self
    }

    /// Check values that would only fail later, deep inside a request
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::config("api_url must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// `(key, value, source)` triples for display
    pub fn entries(&self) -> Vec<(&'static str, String, ConfigSource)> {
        vec![
            ("api_url", self.api_url.clone(), self.sources[0]),
            ("timeout_secs", self.timeout_secs.to_string(), self.sources[1]),
            (
                "output_dir",
                self.output_dir.to_string_lossy().to_string(),
                self.sources[2],
            ),
        ]
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::config(format!(
            "{} must be a whole number of seconds, got '{}'",
            ENV_TIMEOUT_SECS, raw
        ))
    })
}

/// The platform download directory, or the current directory
fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
