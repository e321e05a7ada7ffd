//! Write-side wire models for the field reports.
//!
//! Field names follow the backend serializers. Some fields are required by
//! the server even though the field client never fills them; they are sent
//! as `null` or their documented default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::choice::ChoiceId;

pub const BACKLOG_PATH: &str = "/backlog/";
pub const PRODUCTION_PATH: &str = "/produccion/";
pub const VARIABLE_READING_PATH: &str = "/lecturavariable/";
pub const CHECK_LOG_PATH: &str = "/checklog/";

pub fn activity_path(activity_id: ChoiceId) -> String {
    format!("/otactividad/{}/", activity_id)
}

/// Identifier and display code the server assigns to a written record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Created {
    pub id: ChoiceId,
    #[serde(rename = "codigo", default)]
    pub code: Option<String>,
}

/// Equipment failure report (`backlog`, "avería").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacklogPayload {
    #[serde(rename = "id_turno")]
    pub shift_id: ChoiceId,
    #[serde(rename = "id_equipo")]
    pub equipment_id: ChoiceId,
    #[serde(rename = "id_falla")]
    pub fault_id: ChoiceId,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "observacion")]
    pub observation: Option<String>,
    #[serde(rename = "fecha_reporte")]
    pub reported_at: DateTime<Utc>,
    #[serde(rename = "id_personal")]
    pub personnel_id: ChoiceId,
    #[serde(rename = "id_empresa")]
    pub company_id: ChoiceId,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "estado")]
    pub status: &'static str,
    #[serde(rename = "id_ot")]
    pub work_order_id: Option<ChoiceId>,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPayload {
    #[serde(rename = "id_turno")]
    pub shift_id: ChoiceId,
    #[serde(rename = "id_producto")]
    pub product_id: ChoiceId,
    #[serde(rename = "id_clasificacion")]
    pub classification_id: ChoiceId,
    #[serde(rename = "id_subclasificacion")]
    pub sub_classification_id: Option<ChoiceId>,
    #[serde(rename = "cantidad")]
    pub quantity: f64,
    #[serde(rename = "observacion")]
    pub observation: Option<String>,
    #[serde(rename = "fecha")]
    pub produced_at: DateTime<Utc>,
    #[serde(rename = "id_personal")]
    pub personnel_id: ChoiceId,
    #[serde(rename = "id_empresa")]
    pub company_id: ChoiceId,
    #[serde(rename = "id_lote")]
    pub batch_id: Option<ChoiceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableReadingPayload {
    #[serde(rename = "id_variable")]
    pub variable_id: ChoiceId,
    #[serde(rename = "id_equipo")]
    pub equipment_id: ChoiceId,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "observacion")]
    pub observation: Option<String>,
    #[serde(rename = "fecha_lectura")]
    pub read_at: DateTime<Utc>,
    #[serde(rename = "id_personal")]
    pub personnel_id: ChoiceId,
    #[serde(rename = "id_empresa")]
    pub company_id: ChoiceId,
    #[serde(rename = "fuera_rango")]
    pub out_of_range: bool,
}

/// Executed checklist (`revisión`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckLogPayload {
    #[serde(rename = "id_turno")]
    pub shift_id: ChoiceId,
    #[serde(rename = "id_equipo")]
    pub equipment_id: ChoiceId,
    #[serde(rename = "id_revision")]
    pub checklist_id: ChoiceId,
    #[serde(rename = "aprobado")]
    pub passed: bool,
    #[serde(rename = "observacion")]
    pub observation: Option<String>,
    #[serde(rename = "fecha")]
    pub checked_at: DateTime<Utc>,
    #[serde(rename = "id_personal")]
    pub personnel_id: ChoiceId,
    #[serde(rename = "id_empresa")]
    pub company_id: ChoiceId,
    #[serde(rename = "id_backlog")]
    pub backlog_id: Option<ChoiceId>,
}

/// Progress update on a work-order activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityProgressPatch {
    #[serde(rename = "avance")]
    pub progress: u8,
    #[serde(rename = "observacion")]
    pub observation: Option<String>,
    #[serde(rename = "fecha_ejecucion")]
    pub executed_at: DateTime<Utc>,
    #[serde(rename = "id_personal")]
    pub personnel_id: ChoiceId,
    #[serde(rename = "finalizada")]
    pub finished: bool,
}
