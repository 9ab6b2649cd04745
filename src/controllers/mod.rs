//! Transport-neutral controllers, one per catalog resource.
//!
//! Each endpoint takes already-decoded parameters (or a raw JSON body for writes) and
//! returns an [`ApiResponse`]. Routing and HTTP mechanics belong to the host.

pub mod activity;
pub mod currencies;
pub mod delivery_dates;
pub mod inventory;
pub mod params;
pub mod resource;
pub mod response;
pub mod specification_attributes;
pub mod warehouses;

pub use activity::{ActivityEntry, ActivityLog, MemoryActivityLog, TracingActivityLog};
pub use currencies::CurrenciesController;
pub use delivery_dates::DeliveryDatesController;
pub use inventory::ProductWarehouseInventoryController;
pub use params::{
    CurrenciesParams, DeliveryDatesParams, InventoryParams, ListingParams, WarehousesParams,
};
pub use resource::ResourceController;
pub use response::ApiResponse;
pub use specification_attributes::SpecificationAttributesController;
pub use warehouses::WarehousesController;
