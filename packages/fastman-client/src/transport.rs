//! HTTP transport seam.
//!
//! The client builds [`HttpRequest`]s and hands them to a [`BaseTransport`].
//! Status handling and decoding stay in the client so every transport
//! (reqwest in production, the recording mock in tests) behaves the same.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        };
        f.write_str(name)
    }
}

/// A fully-resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Raw reply: status plus body text. Non-2xx is not an error at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait BaseTransport: Send + Sync {
    /// Send a request. Only failures to obtain a reply are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpReply>;
}

/// Production transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl BaseTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply> {
        let mut builder = match request.method {
            Method::Get => self.http_client.get(&request.url),
            Method::Post => self.http_client.post(&request.url),
            Method::Patch => self.http_client.patch(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %request.method, url = %request.url, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}
