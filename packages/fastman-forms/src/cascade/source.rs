//! Option sources: the fetcher behind each selector level.
//!
//! A level stores its source type-erased so forms can mix record types
//! (shifts next to equipment next to fault templates) in one collection.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use fastman_client::resources::{catalog, maintenance};
use fastman_client::resources::{
    Checklist, Classification, Equipment, EquipmentGroup, FaultTemplate, Product, Shift, Variable,
    WorkOrder, WorkOrderActivity,
};
use fastman_client::{ApiClient, ApiResponse, Choice, ChoiceId};

/// One selectable option, with its record kept for typed access later.
#[derive(Clone)]
pub struct OptionEntry {
    pub id: ChoiceId,
    pub label: String,
    pub canonical_text: Option<String>,
    record: Arc<dyn Any + Send + Sync>,
}

impl OptionEntry {
    pub fn from_choice<T: Choice + Send + Sync + 'static>(item: T) -> Self {
        Self {
            id: item.id(),
            label: item.label().to_string(),
            canonical_text: item.canonical_text().map(str::to_string),
            record: Arc::new(item),
        }
    }

    /// The original record, if it is a `T`.
    pub fn record<T: 'static>(&self) -> Option<&T> {
        self.record.downcast_ref::<T>()
    }
}

impl fmt::Debug for OptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

impl PartialEq for OptionEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label
    }
}

/// Typed fetcher for one selector level.
#[async_trait]
pub trait OptionSource: Send + Sync {
    type Item: Choice + Send + Sync + 'static;

    /// Fetch options; `parent` is the selected id of the parent level, or
    /// `None` for root levels.
    async fn fetch(&self, client: &ApiClient, parent: Option<ChoiceId>)
        -> ApiResponse<Vec<Self::Item>>;
}

/// Type-erased source stored by the form.
#[async_trait]
pub trait ErasedSource: Send + Sync {
    async fn fetch_entries(
        &self,
        client: &ApiClient,
        parent: Option<ChoiceId>,
    ) -> ApiResponse<Vec<OptionEntry>>;
}

#[async_trait]
impl<S: OptionSource> ErasedSource for S {
    async fn fetch_entries(
        &self,
        client: &ApiClient,
        parent: Option<ChoiceId>,
    ) -> ApiResponse<Vec<OptionEntry>> {
        self.fetch(client, parent)
            .await
            .map(|items| items.into_iter().map(OptionEntry::from_choice).collect())
    }
}

macro_rules! root_source {
    ($(#[$meta:meta])* $name:ident, $item:ty, $fetch:path) => {
        $(#[$meta])*
        pub struct $name;

        #[async_trait]
        impl OptionSource for $name {
            type Item = $item;

            async fn fetch(&self, client: &ApiClient, _parent: Option<ChoiceId>) -> ApiResponse<Vec<$item>> {
                $fetch(client).await
            }
        }
    };
}

macro_rules! child_source {
    ($(#[$meta:meta])* $name:ident, $item:ty, $fetch:path) => {
        $(#[$meta])*
        pub struct $name;

        #[async_trait]
        impl OptionSource for $name {
            type Item = $item;

            async fn fetch(&self, client: &ApiClient, parent: Option<ChoiceId>) -> ApiResponse<Vec<$item>> {
                match parent {
                    Some(parent) => $fetch(client, parent).await,
                    None => ApiResponse::Success(Vec::new()),
                }
            }
        }
    };
}

root_source!(Shifts, Shift, catalog::shifts);
root_source!(EquipmentGroups, EquipmentGroup, catalog::equipment_groups);
root_source!(Products, Product, catalog::products);

child_source!(
    /// Equipment of the selected group.
    EquipmentByGroup,
    Equipment,
    catalog::equipment
);
child_source!(
    /// Fault templates of the selected equipment.
    FaultsByEquipment,
    FaultTemplate,
    catalog::fault_templates
);
child_source!(ClassificationsByProduct, Classification, catalog::classifications);
child_source!(SubClassifications, Classification, catalog::sub_classifications);
child_source!(VariablesByEquipment, Variable, maintenance::variables);
child_source!(ChecklistsByGroup, Checklist, maintenance::checklists);
child_source!(ActivitiesByWorkOrder, WorkOrderActivity, maintenance::work_order_activities);

/// Open work orders assigned to one person. The person comes from the
/// session, not from a parent level.
pub struct WorkOrdersFor {
    pub personnel_id: ChoiceId,
}

#[async_trait]
impl OptionSource for WorkOrdersFor {
    type Item = WorkOrder;

    async fn fetch(&self, client: &ApiClient, _parent: Option<ChoiceId>) -> ApiResponse<Vec<WorkOrder>> {
        maintenance::work_orders(client, self.personnel_id).await
    }
}
