//! A delivery time promise shown on product pages (e.g. "1-2 days").
use crate::framework::{FieldDef, Factory, Record, RecordId, Resource, WireSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryDate {
    pub id: RecordId,
    pub name: String,
    pub display_order: i32,
}

static DELIVERY_DATE_FIELDS: [FieldDef<DeliveryDate>; 3] = [
    crate::wire_field!(DeliveryDate, "id" => id: RecordId, read_only),
    crate::wire_field!(DeliveryDate, "name" => name: String),
    crate::wire_field!(DeliveryDate, "display_order" => display_order: i32),
];

static DELIVERY_DATE_SCHEMA: WireSchema<DeliveryDate> = WireSchema::new(&DELIVERY_DATE_FIELDS);

impl Record for DeliveryDate {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Resource for DeliveryDate {
    const NAME: &'static str = "delivery_date";
    const ENVELOPE: &'static str = "delivery_dates";

    fn schema() -> &'static WireSchema<Self> {
        &DELIVERY_DATE_SCHEMA
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryDateFactory;

impl Factory<DeliveryDate> for DeliveryDateFactory {
    fn initialize(&self) -> DeliveryDate {
        DeliveryDate::default()
    }
}
