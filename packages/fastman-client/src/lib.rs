//! Fastman REST client.
//!
//! A domain-scoped client for the Fastman maintenance platform. One
//! [`ApiClient`] talks to one tenant at a time; every call returns an
//! [`ApiResponse`] instead of raising.
//!
//! # Example
//!
//! ```rust,ignore
//! use fastman_client::{resources::catalog, ApiClient, ApiConfig, ApiResponse};
//!
//! let mut client = ApiClient::with_reqwest(ApiConfig::default())?;
//! client.set_domain("Acme ")?; // binds https://acme.fastman.app/api
//! client.set_auth_token(token);
//!
//! match catalog::equipment_groups(&client).await {
//!     ApiResponse::Success(groups) => println!("{} groups", groups.len()),
//!     ApiResponse::Failure(message) => eprintln!("{}", message),
//! }
//! ```

pub mod choice;
pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod resources;
pub mod response;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use choice::{is_sorted_by_label, locale_cmp, sort_by_label, Choice, ChoiceId};
pub use client::{ApiClient, Query};
pub use config::{normalize_domain, ApiConfig, DEFAULT_TIMEOUT, DEFAULT_URL_TEMPLATE, DOMAIN_PLACEHOLDER};
pub use error::{ClientError, Result};
pub use pagination::{fetch_all, Cursor, Page};
pub use response::ApiResponse;
pub use transport::{BaseTransport, HttpReply, HttpRequest, Method, ReqwestTransport};
