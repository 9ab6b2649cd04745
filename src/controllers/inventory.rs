use crate::controllers::params::InventoryParams;
use crate::controllers::response::ApiResponse;
use crate::framework::{render, ApiError, PaginationConfig, ResourceService, StoreClient};
use crate::model::ProductWarehouseInventory;
use tracing::{debug, instrument};

/// Read-only endpoint under `/api/product_warehouse_inventory`.
pub struct ProductWarehouseInventoryController {
    inventory: ResourceService<ProductWarehouseInventory>,
    pagination: PaginationConfig,
}

impl ProductWarehouseInventoryController {
    pub fn new(inventory: StoreClient<ProductWarehouseInventory>, pagination: PaginationConfig) -> Self {
        Self {
            inventory: ResourceService::new(inventory),
            pagination,
        }
    }

    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &InventoryParams) -> ApiResponse {
        debug!(?params, "list called");
        let result = async {
            let mut spec = params.listing.query_spec(&self.pagination)?;
            if let Some(product_id) = params.product_id {
                spec = spec.with_equal("product_id", product_id);
            }
            if let Some(warehouse_id) = params.warehouse_id {
                spec = spec.with_equal("warehouse_id", warehouse_id);
            }
            let listing = self.inventory.list(&spec).await?;
            Ok::<_, ApiError>(render(&listing.items, &params.listing.selection()))
        }
        .await;
        ApiResponse::from_result(result)
    }
}
