//! Equipment failure report (backlog).

use fastman_client::resources::{BacklogPayload, BACKLOG_PATH};

use crate::cascade::{
    EquipmentByGroup, EquipmentGroups, FaultsByEquipment, LevelSpec, SelectionForm, Shifts,
    TextSpec,
};
use crate::submit::{require, ReportForm, SubmissionContext, SubmitError, WriteTarget};

use super::OBSERVATION;

pub const SHIFT: &str = "shift";
pub const GROUP: &str = "group";
pub const EQUIPMENT: &str = "equipment";
pub const FAULT: &str = "fault";
pub const DESCRIPTION: &str = "description";

/// Status of a freshly reported failure.
const PENDING: &str = "pendiente";

pub struct FailureReport {
    form: SelectionForm,
}

impl Default for FailureReport {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureReport {
    pub fn new() -> Self {
        let form = SelectionForm::new()
            .with_level(LevelSpec::new(SHIFT, "Shift", Shifts))
            .with_level(LevelSpec::new(GROUP, "Equipment group", EquipmentGroups))
            .with_level(LevelSpec::new(EQUIPMENT, "Equipment", EquipmentByGroup).child_of(GROUP))
            .with_level(
                LevelSpec::new(FAULT, "Fault", FaultsByEquipment)
                    .child_of(EQUIPMENT)
                    .derives(DESCRIPTION),
            )
            .with_text(TextSpec::required(DESCRIPTION, "Description"))
            .with_text(TextSpec::optional(OBSERVATION, "Observation"));
        Self { form }
    }
}

impl ReportForm for FailureReport {
    type Payload = BacklogPayload;

    fn name(&self) -> &'static str {
        "failure"
    }

    fn selection(&self) -> &SelectionForm {
        &self.form
    }

    fn selection_mut(&mut self) -> &mut SelectionForm {
        &mut self.form
    }

    fn target(&self) -> Result<WriteTarget, SubmitError> {
        Ok(WriteTarget::create(BACKLOG_PATH))
    }

    fn assemble(&self, ctx: &SubmissionContext) -> Result<BacklogPayload, SubmitError> {
        let form = &self.form;
        Ok(BacklogPayload {
            shift_id: require(form, SHIFT)?,
            equipment_id: require(form, EQUIPMENT)?,
            fault_id: require(form, FAULT)?,
            description: form.text(DESCRIPTION).trim().to_string(),
            observation: form.optional_text(OBSERVATION),
            reported_at: ctx.timestamp,
            personnel_id: ctx.personnel_id,
            company_id: ctx.company_id,
            username: ctx.username.clone(),
            status: PENDING,
            work_order_id: None,
            image: None,
        })
    }
}
