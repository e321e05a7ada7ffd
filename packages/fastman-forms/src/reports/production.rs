//! Production report.

use fastman_client::resources::{ProductionPayload, PRODUCTION_PATH};

use crate::cascade::{
    ClassificationsByProduct, LevelSpec, Products, SelectionForm, Shifts, SubClassifications,
    TextSpec,
};
use crate::submit::{parse_decimal, require, ReportForm, SubmissionContext, SubmitError, WriteTarget};

use super::OBSERVATION;

pub const SHIFT: &str = "shift";
pub const PRODUCT: &str = "product";
pub const CLASSIFICATION: &str = "classification";
pub const SUB_CLASSIFICATION: &str = "sub_classification";
pub const QUANTITY: &str = "quantity";

pub struct ProductionReport {
    form: SelectionForm,
}

impl Default for ProductionReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductionReport {
    pub fn new() -> Self {
        let form = SelectionForm::new()
            .with_level(LevelSpec::new(SHIFT, "Shift", Shifts))
            .with_level(LevelSpec::new(PRODUCT, "Product", Products))
            .with_level(
                LevelSpec::new(CLASSIFICATION, "Classification", ClassificationsByProduct)
                    .child_of(PRODUCT),
            )
            .with_level(
                LevelSpec::new(SUB_CLASSIFICATION, "Sub-classification", SubClassifications)
                    .child_of(CLASSIFICATION)
                    .optional(),
            )
            .with_text(TextSpec::required(QUANTITY, "Quantity"))
            .with_text(TextSpec::optional(OBSERVATION, "Observation"));
        Self { form }
    }
}

impl ReportForm for ProductionReport {
    type Payload = ProductionPayload;

    fn name(&self) -> &'static str {
        "production"
    }

    fn selection(&self) -> &SelectionForm {
        &self.form
    }

    fn selection_mut(&mut self) -> &mut SelectionForm {
        &mut self.form
    }

    fn target(&self) -> Result<WriteTarget, SubmitError> {
        Ok(WriteTarget::create(PRODUCTION_PATH))
    }

    fn assemble(&self, ctx: &SubmissionContext) -> Result<ProductionPayload, SubmitError> {
        let form = &self.form;
        let quantity = parse_decimal(form, QUANTITY, "Quantity")?;
        if quantity <= 0.0 {
            return Err(SubmitError::invalid("Quantity", "must be greater than zero"));
        }

        Ok(ProductionPayload {
            shift_id: require(form, SHIFT)?,
            product_id: require(form, PRODUCT)?,
            classification_id: require(form, CLASSIFICATION)?,
            sub_classification_id: form.selected(SUB_CLASSIFICATION),
            quantity,
            observation: form.optional_text(OBSERVATION),
            produced_at: ctx.timestamp,
            personnel_id: ctx.personnel_id,
            company_id: ctx.company_id,
            batch_id: None,
        })
    }
}
