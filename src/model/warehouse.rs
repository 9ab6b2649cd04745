//! A physical stock location.
//!
//! # Resource
//! This struct implements [`Resource`](crate::framework::Resource). Stock held per
//! product lives in [`ProductWarehouseInventory`](crate::model::ProductWarehouseInventory).
use crate::framework::{FieldDef, Record, RecordId, Resource, WireSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Warehouse {
    pub id: RecordId,
    pub name: String,
    pub admin_comment: Option<String>,
    pub address_id: Option<RecordId>,
}

impl Warehouse {
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }
}

static WAREHOUSE_FIELDS: [FieldDef<Warehouse>; 4] = [
    crate::wire_field!(Warehouse, "id" => id: RecordId, read_only),
    crate::wire_field!(Warehouse, "name" => name: String),
    crate::wire_field!(Warehouse, "admin_comment" => admin_comment: Option<String>),
    crate::wire_field!(Warehouse, "address_id" => address_id: Option<RecordId>),
];

static WAREHOUSE_SCHEMA: WireSchema<Warehouse> = WireSchema::new(&WAREHOUSE_FIELDS);

impl Record for Warehouse {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Resource for Warehouse {
    const NAME: &'static str = "warehouse";
    const ENVELOPE: &'static str = "warehouses";

    fn schema() -> &'static WireSchema<Self> {
        &WAREHOUSE_SCHEMA
    }
}
