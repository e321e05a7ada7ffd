use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use fastman_client::{ApiConfig, DEFAULT_URL_TEMPLATE, DOMAIN_PLACEHOLDER};
use thiserror::Error;

pub const DEFAULT_SESSION_PATH: &str = ".fastman/session.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("FASTMAN_API_URL_TEMPLATE must contain {{domain}}, got {0}")]
    MissingPlaceholder(String),

    #[error("FASTMAN_TIMEOUT_SECS must be a positive number of seconds, got {0}")]
    InvalidTimeout(String),
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct FastmanConfig {
    pub api: ApiConfig,
    pub session_path: PathBuf,
}

impl FastmanConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let template = var("FASTMAN_API_URL_TEMPLATE").unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        if !template.contains(DOMAIN_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(template));
        }
        let mut api = ApiConfig::new(template);

        if let Some(raw) = var("FASTMAN_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            api = api.with_timeout(Duration::from_secs(secs));
        }
        if let Some(domain) = var("FASTMAN_LOCKED_DOMAIN") {
            api = api.with_locked_domain(domain);
        }

        Ok(Self {
            api,
            session_path: var("FASTMAN_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH)),
        })
    }
}
