//! Plant catalog: shifts, equipment groups, equipment, fault templates,
//! products and their classification tree.

use serde::{Deserialize, Serialize};

use crate::choice::{sort_by_label, Choice, ChoiceId};
use crate::client::ApiClient;
use crate::pagination::fetch_all;
use crate::response::ApiResponse;

/// Work shift (`turno`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "hora_inicio", default)]
    pub starts_at: Option<String>,
    #[serde(rename = "hora_fin", default)]
    pub ends_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentGroup {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo", default)]
    pub code: Option<String>,
    #[serde(rename = "id_grupoequipo", default)]
    pub group_id: Option<ChoiceId>,
}

/// Predefined failure description for an equipment group (`falla`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultTemplate {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "id_grupoequipo", default)]
    pub group_id: Option<ChoiceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo", default)]
    pub code: Option<String>,
}

/// Node of the product classification tree.
///
/// Top-level nodes hang off a product; sub-classifications point at their
/// parent through `id_parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "id_producto", default)]
    pub product_id: Option<ChoiceId>,
    #[serde(rename = "id_parent", default)]
    pub parent_id: Option<ChoiceId>,
}

impl Choice for Shift {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Choice for EquipmentGroup {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Choice for Equipment {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Choice for FaultTemplate {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn canonical_text(&self) -> Option<&str> {
        Some(
            self.description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(&self.name),
        )
    }
}

impl Choice for Product {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Choice for Classification {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

fn active() -> (&'static str, String) {
    ("status_x", "true".to_string())
}

fn sorted<T: Choice>(mut items: Vec<T>) -> Vec<T> {
    sort_by_label(&mut items);
    items
}

pub async fn shifts(client: &ApiClient) -> ApiResponse<Vec<Shift>> {
    client.get("/turno/", &[active()]).await.map(sorted)
}

pub async fn equipment_groups(client: &ApiClient) -> ApiResponse<Vec<EquipmentGroup>> {
    client.get("/grupoequipo/", &[active()]).await.map(sorted)
}

/// Active equipment of a group. Paged on large plants.
pub async fn equipment(client: &ApiClient, group_id: ChoiceId) -> ApiResponse<Vec<Equipment>> {
    fetch_all(
        client,
        "/equipo/",
        &[active(), ("id_grupoequipo", group_id.to_string())],
    )
    .await
    .map(sorted)
}

/// Fault templates applicable to an equipment (resolved server-side through
/// the equipment's group).
pub async fn fault_templates(
    client: &ApiClient,
    equipment_id: ChoiceId,
) -> ApiResponse<Vec<FaultTemplate>> {
    client
        .get("/falla/", &[("id_equipo", equipment_id.to_string())])
        .await
        .map(sorted)
}

pub async fn products(client: &ApiClient) -> ApiResponse<Vec<Product>> {
    fetch_all(client, "/producto/", &[active()]).await.map(sorted)
}

/// Top-level classifications of a product.
pub async fn classifications(
    client: &ApiClient,
    product_id: ChoiceId,
) -> ApiResponse<Vec<Classification>> {
    client
        .get("/clasificacion/", &[("id_producto", product_id.to_string())])
        .await
        .map(|items: Vec<Classification>| {
            sorted(items.into_iter().filter(|c| c.parent_id.is_none()).collect())
        })
}

pub async fn sub_classifications(
    client: &ApiClient,
    parent_id: ChoiceId,
) -> ApiResponse<Vec<Classification>> {
    client
        .get("/clasificacion/", &[("id_parent", parent_id.to_string())])
        .await
        .map(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::is_sorted_by_label;
    use crate::config::ApiConfig;
    use crate::testing::MockTransport;
    use crate::transport::{HttpReply, Method};
    use serde_json::json;
    use std::sync::Arc;

    fn client(mock: &Arc<MockTransport>) -> ApiClient {
        let mut client = ApiClient::new(ApiConfig::new("https://{domain}.fastman.test/api"), mock.clone());
        client.set_domain("acme").unwrap();
        client
    }

    #[tokio::test]
    async fn test_shifts_sorted_and_filtered_active() {
        let mock = Arc::new(MockTransport::new());
        mock.route(
            Method::Get,
            "/turno/",
            HttpReply::json(
                200,
                json!([
                    {"id": 2, "nombre": "Noche"},
                    {"id": 1, "nombre": "día"},
                    {"id": 3, "nombre": "Tarde", "hora_inicio": "14:00"}
                ]),
            ),
        );

        let shifts = shifts(&client(&mock)).await.into_result().unwrap();

        let names: Vec<_> = shifts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["día", "Noche", "Tarde"]);
        assert_eq!(shifts[2].starts_at.as_deref(), Some("14:00"));
        assert_eq!(
            mock.last_call().unwrap().query,
            vec![("status_x".to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_equipment_filtered_by_group_across_pages() {
        let mock = Arc::new(MockTransport::new());
        mock.route(
            Method::Get,
            "/equipo/",
            HttpReply::json(
                200,
                json!({"results": [{"id": 9, "nombre": "Zaranda 2"}], "next": "/equipo/?page=2"}),
            ),
        );
        mock.route(
            Method::Get,
            "/equipo/?page=2",
            HttpReply::json(200, json!({"results": [{"id": 4, "nombre": "Chancador"}]})),
        );

        let items = equipment(&client(&mock), 7).await.into_result().unwrap();

        assert_eq!(items.len(), 2);
        assert!(is_sorted_by_label(&items));
        let first = &mock.calls()[0];
        assert!(first
            .query
            .contains(&("id_grupoequipo".to_string(), "7".to_string())));
    }

    #[tokio::test]
    async fn test_classifications_skip_children() {
        let mock = Arc::new(MockTransport::new());
        mock.route(
            Method::Get,
            "/clasificacion/",
            HttpReply::json(
                200,
                json!([
                    {"id": 1, "nombre": "Calidad A", "id_producto": 5},
                    {"id": 2, "nombre": "Granulado", "id_producto": 5, "id_parent": 1}
                ]),
            ),
        );

        let items = classifications(&client(&mock), 5).await.into_result().unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_unchanged() {
        let mock = Arc::new(MockTransport::new());
        mock.route(
            Method::Get,
            "/falla/",
            HttpReply::json(403, json!({"detail": "Sin permisos"})),
        );

        let response = fault_templates(&client(&mock), 1).await;

        assert_eq!(response, ApiResponse::Failure("Sin permisos".into()));
    }

    #[test]
    fn test_fault_canonical_text_falls_back_to_name() {
        let fault = FaultTemplate {
            id: 1,
            name: "Rodamiento".into(),
            description: Some("   ".into()),
            group_id: None,
        };
        assert_eq!(fault.canonical_text(), Some("Rodamiento"));
    }
}
