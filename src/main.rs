//! Demo: spin up the catalog, write a few records through the controllers and read them back.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use catalog_api::controllers::{
    ListingParams, ResourceController, TracingActivityLog, WarehousesParams,
};
use catalog_api::framework::RecordId;
use catalog_api::lifecycle::{setup_tracing, ApiConfig, CatalogSeed, CatalogSystem};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, Instrument};

const SEED: &str = r#"{
    "warehouses": [
        { "id": 1, "name": "North" },
        { "id": 2, "name": "South" }
    ],
    "product_warehouse_inventory": [
        { "id": 1, "product_id": 7, "warehouse_id": 2, "stock_quantity": 40 }
    ]
}"#;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting catalog demo");

    let seed = CatalogSeed::from_json(SEED).map_err(|e| e.to_string())?;
    let system = CatalogSystem::with_seed(ApiConfig::default(), seed, Arc::new(TracingActivityLog))
        .map_err(|e| e.to_string())?;

    // Warehouses
    let span = tracing::info_span!("warehouses");
    async {
        let created = system
            .warehouses
            .create(&json!({ "warehouse": { "name": "East", "admin_comment": "opened in spring" } }))
            .await;
        info!(status = created.status(), body = ?created.body(), "Warehouse created");

        let stocked = system
            .warehouses
            .list(&WarehousesParams {
                product_id: Some(7),
                ..Default::default()
            })
            .await;
        info!(body = ?stocked.body(), "Warehouses stocking product 7");
    }
    .instrument(span)
    .await;

    // Specification attributes with nested options
    let span = tracing::info_span!("specification_attributes");
    let reconciled = async {
        let created = system
            .specification_attributes
            .create(&json!({
                "specification_attribute": {
                    "name": "Color",
                    "specification_attribute_options": [
                        { "name": "Red" },
                        { "name": "Green" },
                        { "name": "Blue" }
                    ]
                }
            }))
            .await;
        let id = created
            .body()
            .and_then(|b| b["specification_attributes"][0]["id"].as_i64())
            .ok_or_else(|| format!("create failed with status {}", created.status()))?;
        let id = RecordId::try_from(id).map_err(|e| e.to_string())?;

        // Green is left out, so it is deleted.
        let updated = system
            .specification_attributes
            .update(
                id,
                &json!({
                    "specification_attribute": {
                        "specification_attribute_options": [
                            { "name": "Red", "color_squares_rgb": "#FF0000" },
                            { "name": "Blue" }
                        ]
                    }
                }),
            )
            .await;
        info!(status = updated.status(), body = ?updated.body(), "Options reconciled");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = reconciled {
        error!(error = %e, "Specification attribute demo failed");
    }

    // Field selection
    let listing = system
        .specification_attributes
        .list(&ListingParams {
            fields: Some("id, name".into()),
            ..Default::default()
        })
        .await;
    info!(body = ?listing.body(), "Selected fields");

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
