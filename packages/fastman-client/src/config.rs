//! Tenant addressing: URL template, locked domain and domain normalization.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Placeholder substituted with the tenant domain in the URL template.
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

pub const DEFAULT_URL_TEMPLATE: &str = "https://{domain}.fastman.app/api";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Static configuration of an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL with a `{domain}` placeholder.
    pub base_url_template: String,
    /// When set, every `set_domain` call resolves to this tenant.
    pub locked_domain: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url_template: DEFAULT_URL_TEMPLATE.to_string(),
            locked_domain: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url_template: impl Into<String>) -> Self {
        Self {
            base_url_template: base_url_template.into(),
            ..Default::default()
        }
    }

    pub fn with_locked_domain(mut self, domain: impl Into<String>) -> Self {
        self.locked_domain = Some(domain.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pick the effective tenant for a caller-supplied domain.
    ///
    /// A non-blank locked domain silently overrides the argument.
    pub fn effective_domain(&self, requested: &str) -> Result<String> {
        let locked = self
            .locked_domain
            .as_deref()
            .map(normalize_domain)
            .filter(|d| !d.is_empty());

        let domain = locked.unwrap_or_else(|| normalize_domain(requested));
        if domain.is_empty() {
            return Err(ClientError::InvalidDomain);
        }
        Ok(domain)
    }

    /// Substitute an already-normalized domain into the template.
    pub fn base_url_for(&self, domain: &str) -> String {
        self.base_url_template
            .replace(DOMAIN_PLACEHOLDER, domain)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Trim surrounding whitespace and lowercase.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}
