//! Turns a resolved form into a write request.

use chrono::{DateTime, Utc};
use fastman_client::resources::Created;
use fastman_client::{ApiClient, ApiResponse, ChoiceId};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::cascade::SelectionForm;
use crate::session::Session;

/// Who is submitting, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub personnel_id: ChoiceId,
    pub personnel_name: String,
    pub company_id: ChoiceId,
    pub username: String,
    pub timestamp: DateTime<Utc>,
}

impl SubmissionContext {
    pub fn from_session(session: &Session, timestamp: DateTime<Utc>) -> Self {
        Self {
            personnel_id: session.personnel_id,
            personnel_name: session.personnel_name.clone(),
            company_id: session.company_id,
            username: session.username.clone(),
            timestamp,
        }
    }

    pub fn now(session: &Session) -> Self {
        Self::from_session(session, Utc::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    Create,
    Patch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub method: WriteMethod,
    pub path: String,
}

impl WriteTarget {
    pub fn create(path: impl Into<String>) -> Self {
        Self {
            method: WriteMethod::Create,
            path: path.into(),
        }
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            method: WriteMethod::Patch,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("{field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("{0}")]
    Remote(String),
}

impl SubmitError {
    pub fn missing(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Validation {
            missing: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A report screen: its selector chain plus how to write it.
pub trait ReportForm {
    type Payload: Serialize + Send + Sync;

    fn name(&self) -> &'static str;

    fn selection(&self) -> &SelectionForm;

    fn selection_mut(&mut self) -> &mut SelectionForm;

    fn target(&self) -> Result<WriteTarget, SubmitError>;

    /// Map the resolved selection and fields onto the wire payload.
    ///
    /// Only called once every required level and field is present.
    fn assemble(&self, ctx: &SubmissionContext) -> Result<Self::Payload, SubmitError>;
}

/// Selected id of a level that validation already checked.
pub(crate) fn require(
    form: &SelectionForm,
    key: &str,
) -> Result<ChoiceId, SubmitError> {
    form.selected(key).ok_or_else(|| {
        let label = form.level(key).map(|l| l.label()).unwrap_or(key);
        SubmitError::missing([label])
    })
}

/// Validate `report`, assemble its payload and write it.
///
/// Validation failures never reach the network.
pub async fn submit<F: ReportForm>(
    client: &ApiClient,
    report: &F,
    ctx: &SubmissionContext,
) -> Result<Created, SubmitError> {
    let missing = report.selection().missing_required();
    if !missing.is_empty() {
        info!(report = report.name(), ?missing, "Submission blocked by validation");
        return Err(SubmitError::missing(missing));
    }

    let target = report.target()?;
    let payload = report.assemble(ctx)?;

    let response: ApiResponse<Created> = match target.method {
        WriteMethod::Create => client.post(&target.path, &payload).await,
        WriteMethod::Patch => client.patch(&target.path, &payload).await,
    };

    match response {
        ApiResponse::Success(created) => {
            info!(
                report = report.name(),
                id = created.id,
                code = created.code.as_deref().unwrap_or(""),
                "Report submitted"
            );
            Ok(created)
        }
        ApiResponse::Failure(message) => {
            warn!(report = report.name(), error = %message, "Report rejected");
            Err(SubmitError::Remote(message))
        }
    }
}

/// Parse a required decimal field.
pub(crate) fn parse_decimal(form: &SelectionForm, field: &str, label: &str) -> Result<f64, SubmitError> {
    let raw = form.text(field).trim().replace(',', ".");
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SubmitError::invalid(label, "must be a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_everything() {
        let err = SubmitError::missing(["Shift", "Fault"]);
        assert_eq!(err.to_string(), "missing required fields: Shift, Fault");
    }

    #[test]
    fn test_context_from_session() {
        let session = Session {
            domain: "acme".into(),
            username: "jperez".into(),
            company_id: 3,
            access_token: "tok".into(),
            personnel_id: 12,
            personnel_name: "Juan Pérez".into(),
        };
        let at = Utc::now();

        let ctx = SubmissionContext::from_session(&session, at);

        assert_eq!(ctx.personnel_id, 12);
        assert_eq!(ctx.company_id, 3);
        assert_eq!(ctx.username, "jperez");
        assert_eq!(ctx.timestamp, at);
    }
}
