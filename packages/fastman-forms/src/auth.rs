//! Three-step login: domain, then username, then password.
//!
//! Each step's payload carries what the earlier steps established, so a
//! state can never hold a username without its domain.

use std::sync::Arc;

use fastman_client::resources::auth::{check_domain, check_username, current_personnel, obtain_token};
use fastman_client::resources::TokenRequest;
use fastman_client::{ApiClient, ApiResponse, ChoiceId};
use thiserror::Error;
use tracing::{info, warn};

use crate::session::{BaseSessionStore, Session, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Domain,
    User {
        domain: String,
    },
    Password {
        domain: String,
        username: String,
        company_id: ChoiceId,
    },
    Authenticated(Session),
}

impl LoginState {
    pub fn name(&self) -> &'static str {
        match self {
            LoginState::Domain => "domain",
            LoginState::User { .. } => "user",
            LoginState::Password { .. } => "password",
            LoginState::Authenticated(_) => "authenticated",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cannot {action} in the {state} step")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

fn accepted<T>(response: ApiResponse<T>) -> AuthResult<T> {
    response.into_result().map_err(AuthError::Rejected)
}

pub struct LoginFlow {
    state: LoginState,
    store: Arc<dyn BaseSessionStore>,
}

impl LoginFlow {
    pub fn new(store: Arc<dyn BaseSessionStore>) -> Self {
        Self {
            state: LoginState::Domain,
            store,
        }
    }

    /// Resume a stored session, binding `client` to it.
    pub async fn restore(
        store: Arc<dyn BaseSessionStore>,
        client: &mut ApiClient,
    ) -> AuthResult<Self> {
        let mut flow = Self::new(store);
        if let Some(session) = flow.store.load().await? {
            session
                .apply(client)
                .map_err(|e| AuthError::Rejected(e.user_message()))?;
            // A lock can rebind the client; the token belongs to the stored tenant
            if client.domain() != Some(session.domain.as_str()) {
                warn!(
                    stored = %session.domain,
                    bound = client.domain().unwrap_or_default(),
                    "Stored session is for another domain, discarding"
                );
                client.clear_auth_token();
                flow.store.clear().await?;
                return Ok(flow);
            }
            info!(domain = %session.domain, username = %session.username, "Session restored");
            flow.state = LoginState::Authenticated(session);
        }
        Ok(flow)
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            LoginState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    fn invalid(&self, action: &'static str) -> AuthError {
        AuthError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    pub async fn submit_domain(&mut self, client: &mut ApiClient, raw: &str) -> AuthResult<&LoginState> {
        if !matches!(self.state, LoginState::Domain) {
            return Err(self.invalid("submit a domain"));
        }

        let domain = client
            .set_domain(raw)
            .map_err(|e| AuthError::Validation(e.user_message()))?
            .to_string();
        accepted(check_domain(client).await)?;

        info!(domain = %domain, "Domain accepted");
        self.state = LoginState::User { domain };
        Ok(&self.state)
    }

    pub async fn submit_username(&mut self, client: &ApiClient, raw: &str) -> AuthResult<&LoginState> {
        let LoginState::User { domain } = &self.state else {
            return Err(self.invalid("submit a username"));
        };
        let username = raw.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".into()));
        }

        let check = accepted(check_username(client, username).await)?;

        self.state = LoginState::Password {
            domain: domain.clone(),
            username: username.to_string(),
            company_id: check.company_id,
        };
        Ok(&self.state)
    }

    pub async fn submit_password(&mut self, client: &mut ApiClient, password: &str) -> AuthResult<&LoginState> {
        let LoginState::Password {
            domain,
            username,
            company_id,
        } = &self.state
        else {
            return Err(self.invalid("submit a password"));
        };
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }
        let (domain, username, company_id) = (domain.clone(), username.clone(), *company_id);

        let request = TokenRequest {
            username: &username,
            password,
            company_id,
        };
        let token = accepted(obtain_token(client, &request).await)?;
        client.set_auth_token(token.access.clone());

        let profile = match accepted(current_personnel(client).await) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(username = %username, error = %e, "Token issued but profile lookup failed");
                client.clear_auth_token();
                return Err(e);
            }
        };

        let session = Session {
            domain,
            username,
            company_id,
            access_token: token.access,
            personnel_id: profile.id,
            personnel_name: profile.name,
        };
        if let Err(e) = self.store.save(&session).await {
            warn!(username = %session.username, error = %e, "Signed in but session could not be saved");
            client.clear_auth_token();
            return Err(e.into());
        }

        info!(username = %session.username, personnel_id = session.personnel_id, "Signed in");
        self.state = LoginState::Authenticated(session);
        Ok(&self.state)
    }

    /// Step back one screen. The domain step has nothing before it.
    pub fn back(&mut self) -> &LoginState {
        self.state = match std::mem::replace(&mut self.state, LoginState::Domain) {
            LoginState::Password { domain, .. } => LoginState::User { domain },
            LoginState::User { .. } => LoginState::Domain,
            other => other,
        };
        &self.state
    }

    pub async fn logout(&mut self, client: &mut ApiClient) -> AuthResult<()> {
        client.clear_auth_token();
        self.store.clear().await?;
        self.state = LoginState::Domain;
        info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, StoreResult};
    use async_trait::async_trait;
    use fastman_client::testing::MockTransport;
    use fastman_client::{ApiConfig, HttpReply, Method};
    use serde_json::json;

    fn setup() -> (Arc<MockTransport>, ApiClient, LoginFlow) {
        let mock = Arc::new(MockTransport::new());
        let client = ApiClient::new(ApiConfig::new("https://{domain}.fastman.test/api"), mock.clone());
        let flow = LoginFlow::new(Arc::new(MemorySessionStore::new()));
        (mock, client, flow)
    }

    #[tokio::test]
    async fn test_password_in_domain_step_is_rejected_without_request() {
        let (mock, mut client, mut flow) = setup();

        let err = flow.submit_password(&mut client, "secret").await.unwrap_err();

        assert!(matches!(
            err,
            AuthError::InvalidTransition { state: "domain", .. }
        ));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_domain_stays_in_domain_step() {
        let (mock, mut client, mut flow) = setup();
        mock.route(Method::Get, "/dominio/", HttpReply::json(404, json!({})));

        let err = flow.submit_domain(&mut client, "nope").await.unwrap_err();

        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Resource not found"));
        assert_eq!(flow.state(), &LoginState::Domain);
    }

    #[tokio::test]
    async fn test_blank_username_is_validated_locally() {
        let (mock, mut client, mut flow) = setup();
        mock.route(Method::Get, "/dominio/", HttpReply::json(200, json!({})));
        flow.submit_domain(&mut client, "Acme").await.unwrap();

        let err = flow.submit_username(&client, "   ").await.unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_back_walks_to_previous_step() {
        let (mock, mut client, mut flow) = setup();
        mock.route(Method::Get, "/dominio/", HttpReply::json(200, json!({})));
        mock.route(Method::Get, "/usuario/check/", HttpReply::json(200, json!({"id_empresa": 3})));
        flow.submit_domain(&mut client, "acme").await.unwrap();
        flow.submit_username(&client, "jperez").await.unwrap();

        assert_eq!(
            flow.back(),
            &LoginState::User {
                domain: "acme".into()
            }
        );
        assert_eq!(flow.back(), &LoginState::Domain);
        assert_eq!(flow.back(), &LoginState::Domain);
    }

    #[tokio::test]
    async fn test_profile_failure_drops_token() {
        let (mock, mut client, mut flow) = setup();
        mock.route(Method::Get, "/dominio/", HttpReply::json(200, json!({})));
        mock.route(Method::Get, "/usuario/check/", HttpReply::json(200, json!({"id_empresa": 3})));
        mock.route(Method::Post, "/token/", HttpReply::json(200, json!({"access": "tok"})));
        mock.route(Method::Get, "/personal/me/", HttpReply::json(500, json!({})));
        flow.submit_domain(&mut client, "acme").await.unwrap();
        flow.submit_username(&client, "jperez").await.unwrap();

        let err = flow.submit_password(&mut client, "secret").await.unwrap_err();

        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Server error"));
        assert!(!client.is_authenticated());
        assert_eq!(flow.state().name(), "password");
    }

    struct ReadOnlyStore;

    #[async_trait]
    impl BaseSessionStore for ReadOnlyStore {
        async fn load(&self) -> StoreResult<Option<Session>> {
            Ok(None)
        }

        async fn save(&self, _session: &Session) -> StoreResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        async fn clear(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unsaved_session_drops_token() {
        let (mock, mut client, _) = setup();
        let mut flow = LoginFlow::new(Arc::new(ReadOnlyStore));
        mock.route(Method::Get, "/dominio/", HttpReply::json(200, json!({})));
        mock.route(Method::Get, "/usuario/check/", HttpReply::json(200, json!({"id_empresa": 3})));
        mock.route(Method::Post, "/token/", HttpReply::json(200, json!({"access": "tok"})));
        mock.route(Method::Get, "/personal/me/", HttpReply::json(200, json!({"id": 42, "nombre": "Juan Pérez"})));
        flow.submit_domain(&mut client, "acme").await.unwrap();
        flow.submit_username(&client, "jperez").await.unwrap();

        let err = flow.submit_password(&mut client, "secret").await.unwrap_err();

        assert!(matches!(err, AuthError::Store(StoreError::Io(_))));
        assert!(!client.is_authenticated());
        assert_eq!(flow.state().name(), "password");
    }

    #[tokio::test]
    async fn test_restore_discards_session_for_other_domain() {
        let mock = Arc::new(MockTransport::new());
        let mut client = ApiClient::new(
            ApiConfig::new("https://{domain}.fastman.test/api").with_locked_domain("planta-norte"),
            mock.clone(),
        );
        let store = Arc::new(MemorySessionStore::new());
        store
            .save(&Session {
                domain: "acme".into(),
                username: "jperez".into(),
                company_id: 3,
                access_token: "tok".into(),
                personnel_id: 42,
                personnel_name: "Juan Pérez".into(),
            })
            .await
            .unwrap();

        let flow = LoginFlow::restore(store.clone(), &mut client).await.unwrap();

        assert_eq!(flow.state(), &LoginState::Domain);
        assert!(!client.is_authenticated());
        assert_eq!(client.domain(), Some("planta-norte"));
        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(mock.call_count(), 0);
    }
}
