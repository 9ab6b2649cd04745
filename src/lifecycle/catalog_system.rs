use crate::controllers::{
    ActivityLog, CurrenciesController, DeliveryDatesController,
    ProductWarehouseInventoryController, SpecificationAttributesController, TracingActivityLog,
    WarehousesController,
};
use crate::framework::{Record, StoreActor, StoreClient};
use crate::lifecycle::config::{ApiConfig, ConfigError};
use crate::model::{
    Currency, DeliveryDate, ProductWarehouseInventory, SpecificationAttribute,
    SpecificationAttributeOption, Warehouse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Records to preload into the stores at startup.
///
/// Options may be given inline on their attribute, in `specification_attribute_options`,
/// or both. Inline options are moved to the option store and take their attribute's id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub currencies: Vec<Currency>,
    pub warehouses: Vec<Warehouse>,
    pub delivery_dates: Vec<DeliveryDate>,
    pub specification_attributes: Vec<SpecificationAttribute>,
    pub specification_attribute_options: Vec<SpecificationAttributeOption>,
    pub product_warehouse_inventory: Vec<ProductWarehouseInventory>,
}

impl CatalogSeed {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn split_options(
        attributes: Vec<SpecificationAttribute>,
        mut options: Vec<SpecificationAttributeOption>,
    ) -> (Vec<SpecificationAttribute>, Vec<SpecificationAttributeOption>) {
        let attributes = attributes
            .into_iter()
            .map(|mut attribute| {
                for mut option in attribute.specification_attribute_options.drain(..) {
                    option.specification_attribute_id = attribute.id;
                    options.push(option);
                }
                attribute
            })
            .collect();
        (attributes, options)
    }
}

/// Runs one store actor per record type and wires the controllers to them.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::new(ApiConfig::default())?;
///
/// let response = system.warehouses.get_by_id(1, None).await;
/// assert_eq!(response.status(), 404);
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    pub currencies: CurrenciesController,
    pub warehouses: WarehousesController,
    pub delivery_dates: DeliveryDatesController,
    pub specification_attributes: SpecificationAttributesController,
    pub inventory: ProductWarehouseInventoryController,

    /// Store tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl CatalogSystem {
    /// Empty stores, activity written to the trace log.
    pub fn new(config: ApiConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, CatalogSeed::default(), Arc::new(TracingActivityLog))
    }

    /// Spawns the stores with `seed` preloaded. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if `config` fails validation. Nothing is spawned then.
    pub fn with_seed(
        config: ApiConfig,
        seed: CatalogSeed,
        activity: Arc<dyn ActivityLog>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let buffer = config.store_buffer_size;
        let mut handles = Vec::with_capacity(6);
        let (attributes, options) =
            CatalogSeed::split_options(seed.specification_attributes, seed.specification_attribute_options);

        // 1. Stores
        let currencies = spawn_store(buffer, seed.currencies, &mut handles);
        let warehouses = spawn_store(buffer, seed.warehouses, &mut handles);
        let delivery_dates = spawn_store(buffer, seed.delivery_dates, &mut handles);
        let attributes = spawn_store(buffer, attributes, &mut handles);
        let options = spawn_store(buffer, options, &mut handles);
        let inventory = spawn_store(buffer, seed.product_warehouse_inventory, &mut handles);

        // 2. Controllers. Warehouses read inventory for the product filter.
        let pagination = config.pagination;
        Ok(Self {
            currencies: CurrenciesController::new(
                currencies,
                pagination,
                config.currency,
                activity.clone(),
            ),
            warehouses: WarehousesController::new(
                warehouses,
                inventory.clone(),
                pagination,
                activity.clone(),
            ),
            delivery_dates: DeliveryDatesController::new(
                delivery_dates,
                pagination,
                activity.clone(),
            ),
            specification_attributes: SpecificationAttributesController::new(
                attributes,
                options,
                pagination,
                activity,
            ),
            inventory: ProductWarehouseInventoryController::new(inventory, pagination),
            handles,
        })
    }

    /// Drops every controller, which closes the store channels, then waits for the
    /// store tasks to finish.
    ///
    /// Returns `Err` if any store task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");

        drop(self.currencies);
        drop(self.warehouses);
        drop(self.delivery_dates);
        drop(self.specification_attributes);
        drop(self.inventory);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}

fn spawn_store<T: Record>(
    buffer: usize,
    seed: Vec<T>,
    handles: &mut Vec<JoinHandle<()>>,
) -> StoreClient<T> {
    let (actor, client) = StoreActor::with_records(buffer, seed);
    handles.push(tokio::spawn(actor.run()));
    client
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_options_move_to_the_option_seed() {
        let seed = CatalogSeed::from_json(
            r#"{
                "specification_attributes": [
                    { "id": 4, "name": "Color", "specification_attribute_options": [
                        { "id": 10, "name": "Red" },
                        { "id": 11, "name": "Blue" }
                    ] }
                ],
                "specification_attribute_options": [
                    { "id": 12, "specification_attribute_id": 4, "name": "Green" }
                ]
            }"#,
        )
        .unwrap();

        let (attributes, options) = CatalogSeed::split_options(
            seed.specification_attributes,
            seed.specification_attribute_options,
        );
        assert!(attributes[0].specification_attribute_options.is_empty());
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.specification_attribute_id == 4));
    }

    #[tokio::test]
    async fn shutdown_waits_for_every_store() {
        let system = CatalogSystem::new(ApiConfig::default()).unwrap();
        assert_eq!(system.handles.len(), 6);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_pagination_is_refused_at_startup() {
        let mut config = ApiConfig::default();
        config.pagination.min_limit = 0;
        let result = CatalogSystem::with_seed(
            config,
            CatalogSeed::default(),
            Arc::new(TracingActivityLog),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let mut config = ApiConfig::default();
        config.pagination.default_page = 0;
        assert!(matches!(CatalogSystem::new(config), Err(ConfigError::Invalid(_))));
    }
}
