//! The field report screens.

pub mod checklist;
pub mod failure;
pub mod production;
pub mod reading;
pub mod work_order;

pub use checklist::ChecklistReport;
pub use failure::FailureReport;
pub use production::ProductionReport;
pub use reading::VariableReadingReport;
pub use work_order::WorkOrderExecution;

/// Free-text field shared by every report.
pub const OBSERVATION: &str = "observation";
