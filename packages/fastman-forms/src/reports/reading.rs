//! Predictive-maintenance variable reading.

use fastman_client::resources::{Variable, VariableReadingPayload, VARIABLE_READING_PATH};

use crate::cascade::{
    EquipmentByGroup, EquipmentGroups, LevelSpec, SelectionForm, TextSpec, VariablesByEquipment,
};
use crate::submit::{parse_decimal, require, ReportForm, SubmissionContext, SubmitError, WriteTarget};

use super::OBSERVATION;

pub const GROUP: &str = "group";
pub const EQUIPMENT: &str = "equipment";
pub const VARIABLE: &str = "variable";
pub const VALUE: &str = "value";

pub struct VariableReadingReport {
    form: SelectionForm,
}

impl Default for VariableReadingReport {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableReadingReport {
    pub fn new() -> Self {
        let form = SelectionForm::new()
            .with_level(LevelSpec::new(GROUP, "Equipment group", EquipmentGroups))
            .with_level(LevelSpec::new(EQUIPMENT, "Equipment", EquipmentByGroup).child_of(GROUP))
            .with_level(
                LevelSpec::new(VARIABLE, "Variable", VariablesByEquipment).child_of(EQUIPMENT),
            )
            .with_text(TextSpec::required(VALUE, "Value"))
            .with_text(TextSpec::optional(OBSERVATION, "Observation"));
        Self { form }
    }

    /// The selected variable, with its unit and limits.
    pub fn variable(&self) -> Option<&Variable> {
        self.form.selected_record::<Variable>(VARIABLE)
    }
}

fn out_of_range(variable: Option<&Variable>, value: f64) -> bool {
    let Some(variable) = variable else {
        return false;
    };
    variable.min.is_some_and(|min| value < min) || variable.max.is_some_and(|max| value > max)
}

impl ReportForm for VariableReadingReport {
    type Payload = VariableReadingPayload;

    fn name(&self) -> &'static str {
        "reading"
    }

    fn selection(&self) -> &SelectionForm {
        &self.form
    }

    fn selection_mut(&mut self) -> &mut SelectionForm {
        &mut self.form
    }

    fn target(&self) -> Result<WriteTarget, SubmitError> {
        Ok(WriteTarget::create(VARIABLE_READING_PATH))
    }

    fn assemble(&self, ctx: &SubmissionContext) -> Result<VariableReadingPayload, SubmitError> {
        let form = &self.form;
        let value = parse_decimal(form, VALUE, "Value")?;

        Ok(VariableReadingPayload {
            variable_id: require(form, VARIABLE)?,
            equipment_id: require(form, EQUIPMENT)?,
            value,
            observation: form.optional_text(OBSERVATION),
            read_at: ctx.timestamp,
            personnel_id: ctx.personnel_id,
            company_id: ctx.company_id,
            out_of_range: out_of_range(self.variable(), value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(min: Option<f64>, max: Option<f64>) -> Variable {
        Variable {
            id: 1,
            name: "Temperatura".into(),
            unit: Some("C".into()),
            min,
            max,
            equipment_id: Some(4),
        }
    }

    #[test]
    fn test_out_of_range_bounds() {
        let v = variable(Some(10.0), Some(80.0));
        assert!(!out_of_range(Some(&v), 10.0));
        assert!(!out_of_range(Some(&v), 80.0));
        assert!(out_of_range(Some(&v), 80.5));
        assert!(out_of_range(Some(&v), 9.9));
    }

    #[test]
    fn test_open_bounds_never_out_of_range() {
        assert!(!out_of_range(Some(&variable(None, None)), -1e9));
        assert!(!out_of_range(None, 1.0));
    }
}
