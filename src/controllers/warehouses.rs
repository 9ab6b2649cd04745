use crate::controllers::activity::ActivityLog;
use crate::controllers::params::WarehousesParams;
use crate::controllers::resource::ResourceController;
use crate::controllers::response::ApiResponse;
use crate::framework::{
    render, ApiError, DefaultFactory, Factory, PaginationConfig, QuerySpec, RecordId,
    RecordStore, ResourceService, StoreClient,
};
use crate::model::{ProductWarehouseInventory, Warehouse};
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Endpoints under `/api/warehouses`.
pub struct WarehousesController {
    warehouses: ResourceService<Warehouse>,
    inventory: StoreClient<ProductWarehouseInventory>,
    pagination: PaginationConfig,
    activity: Arc<dyn ActivityLog>,
}

impl WarehousesController {
    pub fn new(
        warehouses: StoreClient<Warehouse>,
        inventory: StoreClient<ProductWarehouseInventory>,
        pagination: PaginationConfig,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            warehouses: ResourceService::new(warehouses),
            inventory,
            pagination,
            activity,
        }
    }

    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &WarehousesParams) -> ApiResponse {
        debug!(?params, "list called");
        let result = async {
            let spec = params.listing.query_spec(&self.pagination)?;
            let Some(spec) = self.restrict_to_product(spec, params.product_id).await? else {
                return Ok(render::<Warehouse>(&[], &params.listing.selection()));
            };
            self.list_page(&spec, &params.listing.selection()).await
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[instrument(skip(self, params))]
    pub async fn count(&self, params: &WarehousesParams) -> ApiResponse {
        let result = async {
            let spec = params.listing.count_spec(&self.pagination)?;
            let count = match self.restrict_to_product(spec, params.product_id).await? {
                Some(spec) => self.warehouses.count(&spec).await?,
                None => 0,
            };
            Ok::<_, ApiError>(json!({ "count": count }))
        }
        .await;
        ApiResponse::from_result(result)
    }

    /// Narrow the id set to warehouses holding inventory for `product_id`.
    ///
    /// `None` when no warehouse can match, so the caller skips the listing read.
    async fn restrict_to_product(
        &self,
        spec: QuerySpec,
        product_id: Option<RecordId>,
    ) -> Result<Option<QuerySpec>, ApiError> {
        let Some(product_id) = product_id else {
            return Ok(Some(spec));
        };
        let mut holding: BTreeSet<RecordId> = self
            .inventory
            .fetch_all()
            .await?
            .into_iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.warehouse_id)
            .collect();
        if !spec.ids().is_empty() {
            holding.retain(|id| spec.ids().contains(id));
        }
        debug!(product_id, warehouses = holding.len(), "Restricted to product");
        if holding.is_empty() {
            return Ok(None);
        }
        let mut narrowed = QuerySpec::new(spec.window())
            .with_ids(holding)
            .with_since_id(spec.since_id());
        for filter in spec.equality() {
            narrowed = narrowed.with_equal(filter.field, filter.value.clone());
        }
        Ok(Some(narrowed))
    }
}

#[async_trait]
impl ResourceController<Warehouse> for WarehousesController {
    const CREATED: &'static str = "AddNewWarehouse";
    const UPDATED: &'static str = "EditWarehouse";
    const DELETED: &'static str = "DeleteWarehouse";

    fn service(&self) -> &ResourceService<Warehouse> {
        &self.warehouses
    }

    fn factory(&self) -> &dyn Factory<Warehouse> {
        &DefaultFactory
    }

    fn activity(&self) -> &dyn ActivityLog {
        self.activity.as_ref()
    }
}
