//! Maintenance resources: predictive variables, checklists and work orders.

use serde::{Deserialize, Serialize};

use crate::choice::{sort_by_label, Choice, ChoiceId};
use crate::client::ApiClient;
use crate::pagination::fetch_all;
use crate::response::ApiResponse;

/// Predictive-maintenance variable measured on an equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "unidad", default)]
    pub unit: Option<String>,
    #[serde(rename = "minimo", default)]
    pub min: Option<f64>,
    #[serde(rename = "maximo", default)]
    pub max: Option<f64>,
    #[serde(rename = "id_equipo", default)]
    pub equipment_id: Option<ChoiceId>,
}

/// Checklist template (`revision`) for an equipment group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "id_grupoequipo", default)]
    pub group_id: Option<ChoiceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChoiceId,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "orden", default)]
    pub order: i32,
}

/// Work order (`OT`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: ChoiceId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "equipo_nombre", default)]
    pub equipment_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderActivity {
    pub id: ChoiceId,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "orden", default)]
    pub order: i32,
    #[serde(rename = "avance", default)]
    pub progress: Option<u8>,
}

impl Choice for Variable {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Choice for Checklist {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn canonical_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Choice for ChecklistItem {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.description
    }
}

impl Choice for WorkOrder {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.code
    }
    fn canonical_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Choice for WorkOrderActivity {
    fn id(&self) -> ChoiceId {
        self.id
    }
    fn label(&self) -> &str {
        &self.description
    }
}

pub async fn variables(client: &ApiClient, equipment_id: ChoiceId) -> ApiResponse<Vec<Variable>> {
    client
        .get("/variable/", &[("id_equipo", equipment_id.to_string())])
        .await
        .map(|mut items: Vec<Variable>| {
            sort_by_label(&mut items);
            items
        })
}

pub async fn checklists(client: &ApiClient, group_id: ChoiceId) -> ApiResponse<Vec<Checklist>> {
    client
        .get("/revision/", &[("id_grupoequipo", group_id.to_string())])
        .await
        .map(|mut items: Vec<Checklist>| {
            sort_by_label(&mut items);
            items
        })
}

/// Items of a checklist in their configured order.
pub async fn checklist_items(
    client: &ApiClient,
    checklist_id: ChoiceId,
) -> ApiResponse<Vec<ChecklistItem>> {
    client
        .get("/revisionitem/", &[("id_revision", checklist_id.to_string())])
        .await
        .map(|mut items: Vec<ChecklistItem>| {
            items.sort_by_key(|i| i.order);
            items
        })
}

/// Open work orders assigned to a person, sorted by code.
pub async fn work_orders(client: &ApiClient, personnel_id: ChoiceId) -> ApiResponse<Vec<WorkOrder>> {
    fetch_all(
        client,
        "/ot/",
        &[
            ("status_x", "true".to_string()),
            ("id_personal", personnel_id.to_string()),
        ],
    )
    .await
    .map(|mut items: Vec<WorkOrder>| {
        sort_by_label(&mut items);
        items
    })
}

pub async fn work_order_activities(
    client: &ApiClient,
    work_order_id: ChoiceId,
) -> ApiResponse<Vec<WorkOrderActivity>> {
    client
        .get("/otactividad/", &[("id_ot", work_order_id.to_string())])
        .await
        .map(|mut items: Vec<WorkOrderActivity>| {
            items.sort_by_key(|a| a.order);
            items
        })
}
