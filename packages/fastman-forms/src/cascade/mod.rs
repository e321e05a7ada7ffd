//! Cascading selector forms.
//!
//! A form is a forest of levels. Each child level's options depend on its
//! parent's selection; changing a parent resets the subtree below it.

mod driver;
mod form;
mod level;
mod source;

pub use driver::CascadeDriver;
pub use form::{Resolution, SelectionError, SelectionForm};
pub use level::{FetchTicket, FieldKey, Level, LevelKey, LevelSpec, LevelStatus, TextSpec};
pub use source::{
    ActivitiesByWorkOrder, ChecklistsByGroup, ClassificationsByProduct, EquipmentByGroup,
    EquipmentGroups, ErasedSource, FaultsByEquipment, OptionEntry, OptionSource, Products, Shifts,
    SubClassifications, VariablesByEquipment, WorkOrdersFor,
};
