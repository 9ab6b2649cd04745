use catalog_api::controllers::{
    ListingParams, MemoryActivityLog, ResourceController, SpecificationAttributesController,
    WarehousesController, WarehousesParams,
};
use catalog_api::framework::{
    create_mock_store, next_request, MockStore, PaginationConfig, StoreError, StoreRequest,
};
use catalog_api::model::{
    ProductWarehouseInventory, SpecificationAttribute, SpecificationAttributeOption, Warehouse,
};
use serde_json::json;
use std::sync::Arc;

/// Real controller, mocked stores.
///
/// Pattern: Controller + Mocks
/// - Real request pipeline (parameter validation, filtering, rendering)
/// - Mocked stores, so each test states exactly which reads it expects
fn warehouses(
    warehouse_mock: &MockStore<Warehouse>,
    inventory_mock: &MockStore<ProductWarehouseInventory>,
) -> WarehousesController {
    WarehousesController::new(
        warehouse_mock.client(),
        inventory_mock.client(),
        PaginationConfig::default(),
        Arc::new(MemoryActivityLog::new()),
    )
}

#[tokio::test]
async fn test_invalid_limit_never_reaches_the_store() {
    let warehouse_mock = MockStore::<Warehouse>::new();
    let inventory_mock = MockStore::<ProductWarehouseInventory>::new();
    let controller = warehouses(&warehouse_mock, &inventory_mock);

    let params = WarehousesParams {
        listing: ListingParams {
            limit: Some(-1),
            ..Default::default()
        },
        product_id: Some(7),
    };
    let response = controller.list(&params).await;
    assert_eq!(response.status(), 400);

    warehouse_mock.verify();
    inventory_mock.verify();
}

#[tokio::test]
async fn test_product_without_inventory_skips_the_warehouse_read() {
    let warehouse_mock = MockStore::<Warehouse>::new();
    let inventory_mock = MockStore::<ProductWarehouseInventory>::new();
    inventory_mock
        .expect_fetch_all()
        .return_ok(vec![ProductWarehouseInventory::new(1, 8, 1, 3)]);
    let controller = warehouses(&warehouse_mock, &inventory_mock);

    let params = WarehousesParams {
        product_id: Some(7),
        ..Default::default()
    };
    let response = controller.list(&params).await;
    assert_eq!(response.body().unwrap(), &json!({ "warehouses": [] }));

    warehouse_mock.verify();
    inventory_mock.verify();
}

#[tokio::test]
async fn test_store_failure_is_an_internal_error() {
    let warehouse_mock = MockStore::<Warehouse>::new();
    let inventory_mock = MockStore::<ProductWarehouseInventory>::new();
    warehouse_mock
        .expect_fetch_by_id(3)
        .return_err(StoreError::Backend("disk full".into()));
    let controller = warehouses(&warehouse_mock, &inventory_mock);

    let response = controller.get_by_id(3, None).await;
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.body().unwrap(),
        &json!({ "errors": { "store": ["Store backend error: disk full"] } })
    );

    warehouse_mock.verify();
}

#[tokio::test]
async fn test_update_merges_onto_the_stored_record() {
    let warehouse_mock = MockStore::<Warehouse>::new();
    let inventory_mock = MockStore::<ProductWarehouseInventory>::new();
    let mut stored = Warehouse::new(3, "South");
    stored.admin_comment = Some("loading bay".into());
    warehouse_mock.expect_fetch_by_id(3).return_ok(Some(stored.clone()));
    let mut expected = stored;
    expected.name = "South Annex".into();
    warehouse_mock.expect_update().return_ok(expected);
    let controller = warehouses(&warehouse_mock, &inventory_mock);

    let response = controller
        .update(3, &json!({ "warehouse": { "name": "South Annex" } }))
        .await;
    let warehouse = &response.body().unwrap()["warehouses"][0];
    assert_eq!(warehouse["name"], "South Annex");
    assert_eq!(warehouse["admin_comment"], "loading bay");

    warehouse_mock.verify();
}

/// Manual pattern: the test plays the option store and checks the writes it receives.
#[tokio::test]
async fn test_reconciliation_writes_updates_then_inserts_then_deletes() {
    let attribute_mock = MockStore::<SpecificationAttribute>::new();
    let (option_client, mut option_rx) = create_mock_store::<SpecificationAttributeOption>(10);

    let attribute = SpecificationAttribute::new(1, "Color");
    attribute_mock.expect_fetch_by_id(1).return_ok(Some(attribute.clone()));
    attribute_mock.expect_update().return_ok(attribute);

    let controller = SpecificationAttributesController::new(
        attribute_mock.client(),
        option_client,
        PaginationConfig::default(),
        Arc::new(MemoryActivityLog::new()),
    );

    let store = tokio::spawn(async move {
        let existing = vec![
            SpecificationAttributeOption::new(1, 1, "Red"),
            SpecificationAttributeOption::new(2, 1, "Green"),
        ];
        let mut writes = Vec::new();

        // Current options of the attribute.
        match next_request(&mut option_rx).await.expect("request") {
            StoreRequest::FetchAll { respond_to } => {
                let _ = respond_to.send(Ok(existing.clone()));
            }
            other => panic!("expected fetch_all, got {other:?}"),
        }
        for _ in 0..3 {
            match next_request(&mut option_rx).await.expect("request") {
                StoreRequest::Update { record, respond_to } => {
                    writes.push(format!("update {}", record.name));
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Insert { mut record, respond_to } => {
                    writes.push(format!("insert {}", record.name));
                    record.id = 3;
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Delete { id, respond_to } => {
                    writes.push(format!("delete {id}"));
                    let _ = respond_to.send(Ok(()));
                }
                other => panic!("unexpected request {other:?}"),
            }
        }
        // Re-read for the response.
        match next_request(&mut option_rx).await.expect("request") {
            StoreRequest::FetchAll { respond_to } => {
                let _ = respond_to.send(Ok(vec![
                    SpecificationAttributeOption::new(1, 1, "Red"),
                    SpecificationAttributeOption::new(3, 1, "Blue"),
                ]));
            }
            other => panic!("expected fetch_all, got {other:?}"),
        }
        writes
    });

    let response = controller
        .update(
            1,
            &json!({
                "specification_attribute": {
                    "specification_attribute_options": [{ "name": "Red" }, { "name": "Blue" }]
                }
            }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let writes = store.await.unwrap();
    assert_eq!(writes, ["update Red", "insert Blue", "delete 2"]);
    attribute_mock.verify();
}
