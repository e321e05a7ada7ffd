// Common test utilities
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use fastman_client::testing::MockTransport;
use fastman_client::{ApiClient, ApiConfig, HttpReply, Method};
use fastman_forms::{Session, SubmissionContext};
use serde_json::{json, Value};

pub const URL_TEMPLATE: &str = "https://{domain}.fastman.test/api";

/// A client bound to the `acme` tenant over a recording transport.
pub struct TestHarness {
    pub mock: Arc<MockTransport>,
    pub client: ApiClient,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(ApiConfig::new(URL_TEMPLATE))
    }

    pub fn with_config(config: ApiConfig) -> Self {
        let mock = Arc::new(MockTransport::new());
        let client = ApiClient::new(config, mock.clone());
        Self { mock, client }
    }

    /// Bound and authenticated as [`session`].
    pub fn signed_in() -> Self {
        let mut harness = Self::new();
        session()
            .apply(&mut harness.client)
            .expect("fixture session should bind");
        harness
    }

    pub fn get(&self, suffix: &str, body: Value) {
        self.mock.route(Method::Get, suffix, HttpReply::json(200, body));
    }

    pub fn get_once(&self, suffix: &str, body: Value) {
        self.mock.route_once(Method::Get, suffix, HttpReply::json(200, body));
    }

    /// Shifts, groups and per-group equipment for the failure report.
    pub fn plant_catalog(&self) {
        self.get(
            "/turno/",
            json!([{"id": 1, "nombre": "Mañana"}, {"id": 2, "nombre": "Noche"}]),
        );
        self.get(
            "/grupoequipo/",
            json!([{"id": 10, "nombre": "Chancado"}, {"id": 20, "nombre": "Molienda"}]),
        );
        self.get(
            "/equipo/",
            json!({"results": [{"id": 100, "nombre": "Chancador primario", "id_grupoequipo": 10}], "next": null}),
        );
        self.get(
            "/falla/",
            json!([
                {"id": 7, "nombre": "Rodamiento", "descripcion": "Ruido anormal en rodamiento"},
                {"id": 8, "nombre": "Correa cortada"}
            ]),
        );
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn session() -> Session {
    Session {
        domain: "acme".to_string(),
        username: "jperez".to_string(),
        company_id: 3,
        access_token: "token-123".to_string(),
        personnel_id: 42,
        personnel_name: "Juan Pérez".to_string(),
    }
}

pub fn context() -> SubmissionContext {
    SubmissionContext::from_session(&session(), Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 0).unwrap())
}

pub fn created(id: i64, code: &str) -> HttpReply {
    HttpReply::json(201, json!({"id": id, "codigo": code}))
}
