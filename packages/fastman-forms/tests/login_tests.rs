//! Integration tests for the login flow and session persistence.

mod common;

use std::sync::Arc;

use common::{session, TestHarness};
use fastman_client::{ApiConfig, HttpReply, Method};
use fastman_forms::{BaseSessionStore, FileSessionStore, LoginFlow, LoginState, MemorySessionStore};
use serde_json::json;

fn auth_routes(harness: &TestHarness) {
    harness.get("/dominio/", json!({"nombre": "Acme"}));
    harness.get("/usuario/check/", json!({"id_empresa": 3}));
    harness
        .mock
        .route(Method::Post, "/token/", HttpReply::json(200, json!({"access": "token-123"})));
    harness.get("/personal/me/", json!({"id": 42, "nombre": "Juan Pérez"}));
}

#[tokio::test]
async fn test_domain_is_normalized_before_check() {
    let mut harness = TestHarness::new();
    auth_routes(&harness);
    let mut flow = LoginFlow::new(Arc::new(MemorySessionStore::new()));

    let state = flow.submit_domain(&mut harness.client, "ACME ").await.unwrap();

    assert_eq!(
        state,
        &LoginState::User {
            domain: "acme".into()
        }
    );
    assert_eq!(
        harness.mock.last_call().unwrap().url,
        "https://acme.fastman.test/api/dominio/"
    );
}

#[tokio::test]
async fn test_unknown_domain_is_a_message_not_a_panic() {
    let mut harness = TestHarness::new();
    harness
        .mock
        .route(Method::Get, "/dominio/", HttpReply::json(404, json!({})));
    let mut flow = LoginFlow::new(Arc::new(MemorySessionStore::new()));

    let err = flow.submit_domain(&mut harness.client, "ghost").await.unwrap_err();

    assert_eq!(err.to_string(), "Resource not found");
    assert_eq!(flow.state(), &LoginState::Domain);
}

#[tokio::test]
async fn test_full_login_persists_session_and_restores() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn BaseSessionStore> =
        Arc::new(FileSessionStore::new(dir.path().join("session.json")));
    let mut harness = TestHarness::new();
    auth_routes(&harness);
    let mut flow = LoginFlow::new(store.clone());

    flow.submit_domain(&mut harness.client, "acme").await.unwrap();
    flow.submit_username(&harness.client, " jperez ").await.unwrap();
    flow.submit_password(&mut harness.client, "secret").await.unwrap();

    assert_eq!(flow.session(), Some(&session()));
    assert_eq!(harness.client.auth_token(), Some("token-123"));

    let token_call = harness
        .mock
        .calls()
        .into_iter()
        .find(|c| c.method == Method::Post)
        .unwrap();
    assert_eq!(
        token_call.body.unwrap(),
        json!({"username": "jperez", "password": "secret", "empresa": 3})
    );

    let mut fresh = TestHarness::new();
    let restored = LoginFlow::restore(store, &mut fresh.client).await.unwrap();
    assert_eq!(restored.session(), Some(&session()));
    assert_eq!(fresh.client.domain(), Some("acme"));
    assert_eq!(fresh.client.auth_token(), Some("token-123"));
}

#[tokio::test]
async fn test_logout_clears_token_and_store() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session()).await.unwrap();
    let mut harness = TestHarness::new();
    let mut flow = LoginFlow::restore(store.clone(), &mut harness.client)
        .await
        .unwrap();

    flow.logout(&mut harness.client).await.unwrap();

    assert_eq!(flow.state(), &LoginState::Domain);
    assert!(!harness.client.is_authenticated());
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_locked_domain_overrides_typed_domain() {
    let mut harness =
        TestHarness::with_config(ApiConfig::new(common::URL_TEMPLATE).with_locked_domain("planta-norte"));
    auth_routes(&harness);
    let mut flow = LoginFlow::new(Arc::new(MemorySessionStore::new()));

    flow.submit_domain(&mut harness.client, "acme").await.unwrap();

    assert_eq!(
        flow.state(),
        &LoginState::User {
            domain: "planta-norte".into()
        }
    );
    assert_eq!(
        harness.mock.last_call().unwrap().url,
        "https://planta-norte.fastman.test/api/dominio/"
    );
}
