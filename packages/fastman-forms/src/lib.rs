//! Field report forms for Fastman.
//!
//! - [`cascade`]: dependent selector levels and the driver that loads them
//! - [`submit`]: validation and write of a resolved form
//! - [`reports`]: the concrete report screens
//! - [`auth`] and [`session`]: login and the persisted session
//!
//! # Example
//!
//! ```rust,ignore
//! use fastman_forms::{reports::FailureReport, submit, CascadeDriver, ReportForm, SubmissionContext};
//!
//! let mut report = FailureReport::new();
//! let driver = CascadeDriver::new(&client);
//! driver.mount(report.selection_mut()).await;
//! driver.select(report.selection_mut(), "group", group_id).await?;
//! // ... pick equipment, fault, shift
//! let created = submit(&client, &report, &SubmissionContext::now(&session)).await?;
//! ```

pub mod auth;
pub mod cascade;
pub mod config;
pub mod reports;
pub mod session;
pub mod submit;

pub use auth::{AuthError, LoginFlow, LoginState};
pub use cascade::{CascadeDriver, LevelStatus, SelectionError, SelectionForm};
pub use config::{ConfigError, FastmanConfig};
pub use session::{BaseSessionStore, FileSessionStore, MemorySessionStore, Session, StoreError};
pub use submit::{submit, ReportForm, SubmissionContext, SubmitError, WriteMethod, WriteTarget};
