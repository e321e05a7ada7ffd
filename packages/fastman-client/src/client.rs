//! Domain-scoped API client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::response::ApiResponse;
use crate::transport::{BaseTransport, HttpRequest, Method, ReqwestTransport};

/// Query-string pairs appended to a request.
pub type Query<'a> = &'a [(&'a str, String)];

/// Client bound to one tenant at a time.
///
/// Construct one per app session and pass it by reference; mutating the
/// domain or credential needs `&mut self`, issuing requests only `&self`.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn BaseTransport>,
    domain: Option<String>,
    base_url: Option<String>,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a client over an explicit transport.
    ///
    /// A configured locked domain is bound immediately.
    pub fn new(config: ApiConfig, transport: Arc<dyn BaseTransport>) -> Self {
        let mut client = Self {
            config,
            transport,
            domain: None,
            base_url: None,
            auth_token: None,
        };
        if client.config.locked_domain.is_some() {
            // Blank locks fall through to the first `set_domain` call.
            let _ = client.set_domain("");
        }
        client
    }

    /// Create a client over a `reqwest` transport honoring `config.timeout`.
    pub fn with_reqwest(config: ApiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Rebind to a tenant and drop any bearer credential.
    ///
    /// Returns the effective (normalized or locked) domain.
    pub fn set_domain(&mut self, domain: &str) -> Result<&str> {
        self.auth_token = None;

        let effective = self.config.effective_domain(domain)?;
        let base_url = self.config.base_url_for(&effective);
        info!(domain = %effective, base_url = %base_url, "Bound API client to domain");

        self.base_url = Some(base_url);
        let domain = self.domain.insert(effective);
        Ok(domain.as_str())
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    pub fn clear_auth_token(&mut self) {
        self.auth_token = None;
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Resolve a resource path (or an absolute URL) against the base URL.
    pub fn url_for(&self, path: &str) -> Result<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.to_string());
        }
        let base = self.base_url.as_deref().ok_or(ClientError::NoDomain)?;
        Ok(format!("{}/{}", base, path.trim_start_matches('/')))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ApiResponse<T> {
        self.execute(Method::Get, path, query, None).await.into()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_body(Method::Post, path, body).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_body(Method::Patch, path, body).await
    }

    async fn send_body<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = match serde_json::to_value(body) {
            Ok(value) => value,
            Err(e) => return Err::<T, _>(ClientError::Encode(e.to_string())).into(),
        };
        self.execute(method, path, &[], Some(body)).await.into()
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = self.url_for(path)?;
        debug!(
            method = %method,
            url = %url,
            query = ?query,
            payload = %body.as_ref().map(|b| b.to_string()).unwrap_or_default(),
            "API request"
        );

        let request = HttpRequest {
            method,
            url,
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            bearer: self.auth_token.clone(),
            body,
        };
        let reply = self.transport.send(request).await?;

        if !reply.is_success() {
            let err = ClientError::from_status(reply.status, &reply.body);
            warn!(method = %method, path, status = reply.status, error = %err, "API error");
            return Err(err);
        }

        let text = if reply.body.trim().is_empty() {
            "null"
        } else {
            reply.body.as_str()
        };
        serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
