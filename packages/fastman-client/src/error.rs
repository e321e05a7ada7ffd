//! Error taxonomy for the Fastman client.
//!
//! `ClientError` never leaves the crate through the request methods: every
//! failure is folded into [`ApiResponse::Failure`](crate::ApiResponse) using
//! [`ClientError::user_message`].

use thiserror::Error;

/// Result type for fallible client internals.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong between a request and its decoded reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The transport gave up waiting for the server.
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure, or the server never answered.
    #[error("no response: {0}")]
    NoResponse(String),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {detail:?}")]
    Api { status: u16, detail: Option<String> },

    /// The reply body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// The HTTP client could not be built.
    #[error("transport setup failed: {0}")]
    Transport(String),

    /// `set_domain` received a blank domain and no locked domain applies.
    #[error("domain is empty")]
    InvalidDomain,

    /// A request was issued before any domain was bound.
    #[error("no domain configured")]
    NoDomain,
}

impl ClientError {
    /// Build an API error from a status code and the raw reply body.
    ///
    /// DRF-style bodies (`{"detail": ...}`, `{"non_field_errors": [...]}`)
    /// are mined for a server-provided message.
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            detail: extract_detail(body),
        }
    }

    /// Short human-readable message surfaced to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout => "Request timed out".to_string(),
            Self::NoResponse(_) => "Could not reach the server".to_string(),
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Api { status, .. } => match status {
                400 => "Invalid request".to_string(),
                401 => "Session expired, sign in again".to_string(),
                403 => "Not allowed".to_string(),
                404 => "Resource not found".to_string(),
                500..=599 => "Server error".to_string(),
                other => format!("Unexpected response ({})", other),
            },
            Self::Decode(_) => "Unexpected response format".to_string(),
            Self::Encode(_) => "Could not encode request".to_string(),
            Self::Transport(_) => "Could not start the HTTP client".to_string(),
            Self::InvalidDomain => "Domain is required".to_string(),
            Self::NoDomain => "No domain configured".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::NoResponse(err.to_string())
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["detail", "message", "error"] {
        if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
            if !text.trim().is_empty() {
                return Some(text.trim().to_string());
            }
        }
    }
    value
        .get("non_field_errors")
        .and_then(|v| v.as_array())
        .and_then(|errors| errors.first())
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
}
