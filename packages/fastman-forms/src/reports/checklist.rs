//! Executed checklist (revisión).

use fastman_client::resources::{CheckLogPayload, CHECK_LOG_PATH};

use crate::cascade::{
    ChecklistsByGroup, EquipmentByGroup, EquipmentGroups, LevelSpec, SelectionForm, Shifts,
    TextSpec,
};
use crate::submit::{require, ReportForm, SubmissionContext, SubmitError, WriteTarget};

use super::OBSERVATION;

pub const SHIFT: &str = "shift";
pub const GROUP: &str = "group";
pub const EQUIPMENT: &str = "equipment";
pub const CHECKLIST: &str = "checklist";
pub const RESULT: &str = "result";

pub struct ChecklistReport {
    form: SelectionForm,
}

impl Default for ChecklistReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecklistReport {
    pub fn new() -> Self {
        let form = SelectionForm::new()
            .with_level(LevelSpec::new(SHIFT, "Shift", Shifts))
            .with_level(LevelSpec::new(GROUP, "Equipment group", EquipmentGroups))
            .with_level(LevelSpec::new(EQUIPMENT, "Equipment", EquipmentByGroup).child_of(GROUP))
            .with_level(LevelSpec::new(CHECKLIST, "Checklist", ChecklistsByGroup).child_of(GROUP))
            .with_text(TextSpec::required(RESULT, "Result"))
            .with_text(TextSpec::optional(OBSERVATION, "Observation"));
        Self { form }
    }
}

/// `ok`/`fail`, also accepting the Spanish terms operators type.
fn parse_result(raw: &str) -> Result<bool, SubmitError> {
    match raw.trim().to_lowercase().as_str() {
        "ok" | "pass" | "aprobado" | "si" | "sí" => Ok(true),
        "fail" | "rechazado" | "no" => Ok(false),
        _ => Err(SubmitError::invalid("Result", "expected ok or fail")),
    }
}

impl ReportForm for ChecklistReport {
    type Payload = CheckLogPayload;

    fn name(&self) -> &'static str {
        "checklist"
    }

    fn selection(&self) -> &SelectionForm {
        &self.form
    }

    fn selection_mut(&mut self) -> &mut SelectionForm {
        &mut self.form
    }

    fn target(&self) -> Result<WriteTarget, SubmitError> {
        Ok(WriteTarget::create(CHECK_LOG_PATH))
    }

    fn assemble(&self, ctx: &SubmissionContext) -> Result<CheckLogPayload, SubmitError> {
        let form = &self.form;
        Ok(CheckLogPayload {
            shift_id: require(form, SHIFT)?,
            equipment_id: require(form, EQUIPMENT)?,
            checklist_id: require(form, CHECKLIST)?,
            passed: parse_result(form.text(RESULT))?,
            observation: form.optional_text(OBSERVATION),
            checked_at: ctx.timestamp,
            personnel_id: ctx.personnel_id,
            company_id: ctx.company_id,
            backlog_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_result() {
        assert_eq!(parse_result(" OK "), Ok(true));
        assert_eq!(parse_result("rechazado"), Ok(false));
        assert!(matches!(
            parse_result("maybe"),
            Err(SubmitError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_group_change_clears_equipment_and_checklist() {
        let report = ChecklistReport::new();
        let children: Vec<_> = report
            .selection()
            .levels()
            .iter()
            .filter(|l| l.parent() == Some(GROUP))
            .map(|l| l.key())
            .collect();
        assert_eq!(children, vec![EQUIPMENT, CHECKLIST]);
    }
}
