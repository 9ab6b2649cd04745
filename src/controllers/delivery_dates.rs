use crate::controllers::activity::ActivityLog;
use crate::controllers::params::DeliveryDatesParams;
use crate::controllers::resource::ResourceController;
use crate::controllers::response::ApiResponse;
use crate::framework::{Factory, PaginationConfig, ResourceService, StoreClient};
use crate::model::{DeliveryDate, DeliveryDateFactory};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Endpoints under `/api/delivery-dates`.
pub struct DeliveryDatesController {
    delivery_dates: ResourceService<DeliveryDate>,
    pagination: PaginationConfig,
    activity: Arc<dyn ActivityLog>,
}

impl DeliveryDatesController {
    pub fn new(
        delivery_dates: StoreClient<DeliveryDate>,
        pagination: PaginationConfig,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            delivery_dates: ResourceService::new(delivery_dates),
            pagination,
            activity,
        }
    }

    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &DeliveryDatesParams) -> ApiResponse {
        debug!(?params, "list called");
        let result = async {
            let mut spec = params.listing.query_spec(&self.pagination)?;
            if let Some(name) = &params.name {
                spec = spec.with_equal("name", name.as_str());
            }
            self.list_page(&spec, &params.listing.selection()).await
        }
        .await;
        ApiResponse::from_result(result)
    }
}

#[async_trait]
impl ResourceController<DeliveryDate> for DeliveryDatesController {
    const CREATED: &'static str = "AddNewDeliveryDate";
    const UPDATED: &'static str = "UpdateDeliveryDate";
    const DELETED: &'static str = "DeleteDeliveryDate";

    fn service(&self) -> &ResourceService<DeliveryDate> {
        &self.delivery_dates
    }

    fn factory(&self) -> &dyn Factory<DeliveryDate> {
        &DeliveryDateFactory
    }

    fn activity(&self) -> &dyn ActivityLog {
        self.activity.as_ref()
    }
}
