//! Stock of one product held in one warehouse.
use crate::framework::{FieldDef, Record, RecordId, Resource, WireSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductWarehouseInventory {
    pub id: RecordId,
    pub product_id: RecordId,
    pub warehouse_id: RecordId,
    pub stock_quantity: i32,
    pub reserved_quantity: i32,
}

impl ProductWarehouseInventory {
    pub fn new(id: RecordId, product_id: RecordId, warehouse_id: RecordId, stock_quantity: i32) -> Self {
        Self {
            id,
            product_id,
            warehouse_id,
            stock_quantity,
            reserved_quantity: 0,
        }
    }
}

static INVENTORY_FIELDS: [FieldDef<ProductWarehouseInventory>; 5] = [
    crate::wire_field!(ProductWarehouseInventory, "id" => id: RecordId, read_only),
    crate::wire_field!(ProductWarehouseInventory, "product_id" => product_id: RecordId),
    crate::wire_field!(ProductWarehouseInventory, "warehouse_id" => warehouse_id: RecordId),
    crate::wire_field!(ProductWarehouseInventory, "stock_quantity" => stock_quantity: i32),
    crate::wire_field!(ProductWarehouseInventory, "reserved_quantity" => reserved_quantity: i32),
];

static INVENTORY_SCHEMA: WireSchema<ProductWarehouseInventory> = WireSchema::new(&INVENTORY_FIELDS);

impl Record for ProductWarehouseInventory {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Resource for ProductWarehouseInventory {
    const NAME: &'static str = "product_warehouse_inventory";
    const ENVELOPE: &'static str = "product_warehouse_inventory_dtos";

    fn schema() -> &'static WireSchema<Self> {
        &INVENTORY_SCHEMA
    }
}
