//! Uniform result shape returned by every client call.

use crate::error::ClientError;

/// Outcome of a remote call: decoded data or a short, displayable error.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(String),
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            Self::Success(data) => ApiResponse::Success(f(data)),
            Self::Failure(message) => ApiResponse::Failure(message),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(message) => Err(message),
        }
    }
}

impl<T> From<Result<T, ClientError>> for ApiResponse<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err.user_message()),
        }
    }
}
