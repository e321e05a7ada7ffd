//! Remote resource fetchers, one per backend resource.
//!
//! Every fetcher returns the client's [`ApiResponse`](crate::ApiResponse)
//! unchanged on failure; list fetchers return fully-paged, sorted items.

pub mod auth;
pub mod catalog;
pub mod maintenance;
pub mod reports;

pub use auth::{PersonnelProfile, TokenReply, TokenRequest, UserCheck};
pub use catalog::{Classification, Equipment, EquipmentGroup, FaultTemplate, Product, Shift};
pub use maintenance::{Checklist, ChecklistItem, Variable, WorkOrder, WorkOrderActivity};
pub use reports::{
    activity_path, ActivityProgressPatch, BacklogPayload, CheckLogPayload, Created,
    ProductionPayload, VariableReadingPayload, BACKLOG_PATH, CHECK_LOG_PATH, PRODUCTION_PATH,
    VARIABLE_READING_PATH,
};
