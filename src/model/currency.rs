//! A currency the store can display prices in.
//!
//! # Resource
//! This struct implements [`Resource`](crate::framework::Resource), so it can be listed,
//! patched and rendered by a [`ResourceService`](crate::framework::ResourceService).
//! The audit timestamps are stamped by [`CurrencyFactory`] and the update path, never by
//! a client.
use crate::framework::{FieldDef, Factory, Record, RecordId, Resource, WireSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub id: RecordId,
    pub name: String,
    pub currency_code: String,
    pub rate: f64,
    pub display_locale: Option<String>,
    pub custom_formatting: Option<String>,
    pub limited_to_stores: bool,
    pub published: bool,
    pub display_order: i32,
    pub rounding_type_id: i32,
    pub created_on_utc: DateTime<Utc>,
    pub updated_on_utc: DateTime<Utc>,
}

impl Currency {
    /// Creates a published currency with the given exchange rate.
    pub fn new(id: RecordId, name: impl Into<String>, code: impl Into<String>, rate: f64) -> Self {
        Self {
            id,
            name: name.into(),
            currency_code: code.into(),
            rate,
            published: true,
            ..Default::default()
        }
    }
}

static CURRENCY_FIELDS: [FieldDef<Currency>; 12] = [
    crate::wire_field!(Currency, "id" => id: RecordId, read_only),
    crate::wire_field!(Currency, "name" => name: String),
    crate::wire_field!(Currency, "currency_code" => currency_code: String),
    crate::wire_field!(Currency, "rate" => rate: f64),
    crate::wire_field!(Currency, "display_locale" => display_locale: Option<String>),
    crate::wire_field!(Currency, "custom_formatting" => custom_formatting: Option<String>),
    crate::wire_field!(Currency, "limited_to_stores" => limited_to_stores: bool),
    crate::wire_field!(Currency, "published" => published: bool),
    crate::wire_field!(Currency, "display_order" => display_order: i32),
    crate::wire_field!(Currency, "rounding_type_id" => rounding_type_id: i32),
    crate::wire_field!(Currency, "created_on_utc" => created_on_utc: DateTime<Utc>, read_only),
    crate::wire_field!(Currency, "updated_on_utc" => updated_on_utc: DateTime<Utc>, read_only),
];

static CURRENCY_SCHEMA: WireSchema<Currency> = WireSchema::new(&CURRENCY_FIELDS);

impl Record for Currency {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Resource for Currency {
    const NAME: &'static str = "currency";
    const ENVELOPE: &'static str = "currencies";

    fn schema() -> &'static WireSchema<Self> {
        &CURRENCY_SCHEMA
    }
}

/// Starts new currencies with both audit timestamps set to the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyFactory;

impl Factory<Currency> for CurrencyFactory {
    fn initialize(&self) -> Currency {
        let now = Utc::now();
        Currency {
            created_on_utc: now,
            updated_on_utc: now,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Delta;
    use serde_json::json;

    #[test]
    fn audit_timestamps_are_read_only() {
        let original = CurrencyFactory.initialize();
        let delta = Delta::parse(
            &json!({ "name": "Euro", "created_on_utc": "2001-01-01T00:00:00Z" }),
            Currency::schema(),
        )
        .unwrap();

        let merged = delta.merged(&original, Currency::schema()).unwrap();

        assert_eq!(merged.name, "Euro");
        assert_eq!(merged.created_on_utc, original.created_on_utc);
    }

    #[test]
    fn factory_stamps_both_timestamps() {
        let currency = CurrencyFactory.initialize();
        assert_eq!(currency.created_on_utc, currency.updated_on_utc);
        assert_eq!(currency.id, 0);
    }
}
