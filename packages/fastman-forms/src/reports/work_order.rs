//! Progress on a work-order activity.

use fastman_client::resources::{activity_path, ActivityProgressPatch};
use fastman_client::ChoiceId;

use crate::cascade::{ActivitiesByWorkOrder, LevelSpec, SelectionForm, TextSpec, WorkOrdersFor};
use crate::submit::{require, ReportForm, SubmissionContext, SubmitError, WriteTarget};

use super::OBSERVATION;

pub const WORK_ORDER: &str = "work_order";
pub const ACTIVITY: &str = "activity";
pub const PROGRESS: &str = "progress";

pub struct WorkOrderExecution {
    form: SelectionForm,
}

impl WorkOrderExecution {
    /// Work orders are scoped to the signed-in person.
    pub fn new(personnel_id: ChoiceId) -> Self {
        let form = SelectionForm::new()
            .with_level(LevelSpec::new(
                WORK_ORDER,
                "Work order",
                WorkOrdersFor { personnel_id },
            ))
            .with_level(
                LevelSpec::new(ACTIVITY, "Activity", ActivitiesByWorkOrder).child_of(WORK_ORDER),
            )
            .with_text(TextSpec::required(PROGRESS, "Progress"))
            .with_text(TextSpec::optional(OBSERVATION, "Observation"));
        Self { form }
    }

    fn progress(&self) -> Result<u8, SubmitError> {
        self.form
            .text(PROGRESS)
            .trim()
            .trim_end_matches('%')
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| SubmitError::invalid("Progress", "must be a whole number from 0 to 100"))
    }
}

impl ReportForm for WorkOrderExecution {
    type Payload = ActivityProgressPatch;

    fn name(&self) -> &'static str {
        "work-order"
    }

    fn selection(&self) -> &SelectionForm {
        &self.form
    }

    fn selection_mut(&mut self) -> &mut SelectionForm {
        &mut self.form
    }

    fn target(&self) -> Result<WriteTarget, SubmitError> {
        let activity = require(&self.form, ACTIVITY)?;
        Ok(WriteTarget::patch(activity_path(activity)))
    }

    fn assemble(&self, ctx: &SubmissionContext) -> Result<ActivityProgressPatch, SubmitError> {
        let progress = self.progress()?;
        Ok(ActivityProgressPatch {
            progress,
            observation: self.form.optional_text(OBSERVATION),
            executed_at: ctx.timestamp,
            personnel_id: ctx.personnel_id,
            finished: progress == 100,
        })
    }
}
