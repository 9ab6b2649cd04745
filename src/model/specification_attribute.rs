//! Specification attributes ("Screen size", "Colour") and their options.
//!
//! Options are stored as records of their own and point at their parent through
//! `specification_attribute_id`. A [`SpecificationAttribute`] carries its options only
//! when hydrated for rendering; in payloads the `specification_attribute_options` field
//! is a child collection, reconciled by option name.

use crate::framework::{
    ChildRecord, Delta, FieldDef, FieldKind, NaturalKey, Record, RecordId, Resource, WireSchema,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationAttribute {
    pub id: RecordId,
    pub name: String,
    pub display_order: i32,
    pub specification_attribute_options: Vec<SpecificationAttributeOption>,
}

impl SpecificationAttribute {
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach options, ordered for rendering.
    #[must_use]
    pub fn with_options(mut self, mut options: Vec<SpecificationAttributeOption>) -> Self {
        options.sort_by(SpecificationAttributeOption::listing_order);
        self.specification_attribute_options = options;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationAttributeOption {
    pub id: RecordId,
    pub specification_attribute_id: RecordId,
    pub name: String,
    pub color_squares_rgb: Option<String>,
    pub display_order: i32,
}

impl SpecificationAttributeOption {
    pub fn new(id: RecordId, specification_attribute_id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            specification_attribute_id,
            name: name.into(),
            ..Default::default()
        }
    }
}

fn render_options(attribute: &SpecificationAttribute) -> Value {
    let schema = SpecificationAttributeOption::schema();
    Value::Array(
        attribute
            .specification_attribute_options
            .iter()
            .map(|option| Value::Object(schema.to_document(option)))
            .collect(),
    )
}

fn parse_options(value: &Value) -> Result<Vec<Delta>, crate::framework::ApiError> {
    Delta::parse_list(value, SpecificationAttributeOption::schema())
}

static ATTRIBUTE_FIELDS: [FieldDef<SpecificationAttribute>; 4] = [
    crate::wire_field!(SpecificationAttribute, "id" => id: RecordId, read_only),
    crate::wire_field!(SpecificationAttribute, "name" => name: String),
    crate::wire_field!(SpecificationAttribute, "display_order" => display_order: i32),
    FieldDef {
        name: "specification_attribute_options",
        get: render_options,
        kind: FieldKind::Children {
            parse: parse_options,
        },
    },
];

static ATTRIBUTE_SCHEMA: WireSchema<SpecificationAttribute> = WireSchema::new(&ATTRIBUTE_FIELDS);

static OPTION_FIELDS: [FieldDef<SpecificationAttributeOption>; 5] = [
    crate::wire_field!(SpecificationAttributeOption, "id" => id: RecordId, read_only),
    crate::wire_field!(
        SpecificationAttributeOption,
        "specification_attribute_id" => specification_attribute_id: RecordId
    ),
    crate::wire_field!(SpecificationAttributeOption, "name" => name: String),
    crate::wire_field!(
        SpecificationAttributeOption,
        "color_squares_rgb" => color_squares_rgb: Option<String>
    ),
    crate::wire_field!(SpecificationAttributeOption, "display_order" => display_order: i32),
];

static OPTION_SCHEMA: WireSchema<SpecificationAttributeOption> = WireSchema::new(&OPTION_FIELDS);

impl Record for SpecificationAttribute {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Resource for SpecificationAttribute {
    const NAME: &'static str = "specification_attribute";
    const ENVELOPE: &'static str = "specification_attributes";

    fn schema() -> &'static WireSchema<Self> {
        &ATTRIBUTE_SCHEMA
    }
}

impl Record for SpecificationAttributeOption {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Resource for SpecificationAttributeOption {
    const NAME: &'static str = "specification_attribute_option";
    const ENVELOPE: &'static str = "specification_attribute_options";

    fn schema() -> &'static WireSchema<Self> {
        &OPTION_SCHEMA
    }

    /// Options list by name, ties broken by id.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name).then(a.id.cmp(&b.id))
    }
}

impl NaturalKey for SpecificationAttributeOption {
    const KEY_FIELD: &'static str = "name";

    fn natural_key(&self) -> &str {
        &self.name
    }
}

impl ChildRecord for SpecificationAttributeOption {
    fn parent_id(&self) -> RecordId {
        self.specification_attribute_id
    }

    fn set_parent_id(&mut self, parent_id: RecordId) {
        self.specification_attribute_id = parent_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{render_one, ApiError, SelectionSet};
    use serde_json::json;

    #[test]
    fn options_render_nested_and_sorted() {
        let attribute = SpecificationAttribute::new(1, "Colour").with_options(vec![
            SpecificationAttributeOption::new(3, 1, "Red"),
            SpecificationAttributeOption::new(2, 1, "Blue"),
        ]);

        let out = render_one(&attribute, &SelectionSet::parse("name,specification_attribute_options"));

        assert_eq!(
            out,
            json!({ "specification_attributes": [{
                "name": "Colour",
                "specification_attribute_options": [
                    { "id": 2, "specification_attribute_id": 1, "name": "Blue", "color_squares_rgb": null, "display_order": 0 },
                    { "id": 3, "specification_attribute_id": 1, "name": "Red", "color_squares_rgb": null, "display_order": 0 }
                ]
            }]})
        );
    }

    #[test]
    fn child_errors_carry_the_collection_path() {
        let err = Delta::parse(
            &json!({ "specification_attribute_options": [{ "name": "ok" }, { "name": 5 }] }),
            SpecificationAttribute::schema(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::invalid_delta(
                "specification_attribute_options[1].name",
                "expected string, found number"
            )
        );
    }

    #[test]
    fn merging_an_attribute_leaves_options_alone() {
        let attribute = SpecificationAttribute::new(1, "Colour")
            .with_options(vec![SpecificationAttributeOption::new(3, 1, "Red")]);
        let delta = Delta::parse(
            &json!({ "name": "Color", "specification_attribute_options": [] }),
            SpecificationAttribute::schema(),
        )
        .unwrap();

        let merged = delta.merged(&attribute, SpecificationAttribute::schema()).unwrap();

        assert_eq!(merged.name, "Color");
        assert_eq!(merged.specification_attribute_options.len(), 1);
        assert_eq!(delta.children("specification_attribute_options").map(<[_]>::len), Some(0));
    }
}
