//! Sparse patch documents ("deltas").
//!
//! A [`Delta`] remembers exactly which fields the client sent. Merging it onto a record
//! overwrites those fields and leaves every other field untouched, so a partial update
//! never resets an omitted field to its default. JSON `null` is a value in its own right:
//! it clears a nullable field and is rejected for a non-nullable one.

use crate::framework::error::{json_type_name, ApiError};
use crate::framework::record::RecordId;
use crate::framework::schema::{FieldKind, WireSchema, WireValue};
use serde_json::Value;

/// A single present field of a delta.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Children(Vec<Delta>),
}

/// The present fields of a patch, keyed by canonical wire name, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    entries: Vec<(&'static str, FieldValue)>,
}

impl Delta {
    /// A patch with no present fields. Merging it is the identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate a JSON object against `schema` and capture its present fields.
    ///
    /// # Errors
    /// [`ApiError::InvalidDelta`] when the payload is not an object, names a field the
    /// schema does not declare, repeats a field, or carries a value of the wrong type.
    pub fn parse<T>(value: &Value, schema: &WireSchema<T>) -> Result<Self, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::invalid_delta(
                "",
                format!("expected object, found {}", json_type_name(value)),
            ));
        };

        let mut entries: Vec<(&'static str, FieldValue)> = Vec::with_capacity(map.len());
        for (key, raw) in map {
            let def = schema
                .resolve(key)
                .ok_or_else(|| ApiError::invalid_delta(key.as_str(), "unknown field"))?;
            if entries.iter().any(|(name, _)| *name == def.name) {
                return Err(ApiError::invalid_delta(def.name, "duplicate field"));
            }
            let value = match &def.kind {
                FieldKind::Scalar { check, .. } => {
                    check(raw).map_err(|e| ApiError::invalid_delta(def.name, e.to_string()))?;
                    FieldValue::Scalar(raw.clone())
                }
                FieldKind::Children { parse } => {
                    FieldValue::Children(parse(raw).map_err(|e| e.within(def.name))?)
                }
            };
            entries.push((def.name, value));
        }

        let position = |name: &str| schema.fields().iter().position(|d| d.name == name);
        entries.sort_by_key(|(name, _)| position(name));
        Ok(Self { entries })
    }

    /// Parse a JSON array of child patches.
    pub fn parse_list<T>(value: &Value, schema: &WireSchema<T>) -> Result<Vec<Self>, ApiError> {
        let Value::Array(items) = value else {
            return Err(ApiError::invalid_delta(
                "",
                format!("expected array, found {}", json_type_name(value)),
            ));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Self::parse(item, schema).map_err(|e| e.within(&format!("[{index}]"))))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.entries.iter().any(|(field, _)| *field == name)
    }

    /// Canonical names of the present fields.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Raw value of a present scalar field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find_map(|(field, value)| match value {
            FieldValue::Scalar(v) if *field == name => Some(v),
            _ => None,
        })
    }

    /// Typed value of a present scalar field.
    pub fn get<V: WireValue>(&self, name: &str) -> Option<V> {
        self.value(name).and_then(|v| V::from_wire(v).ok())
    }

    /// Child patches of a present nested collection.
    pub fn children(&self, name: &str) -> Option<&[Delta]> {
        self.entries.iter().find_map(|(field, value)| match value {
            FieldValue::Children(children) if *field == name => Some(children.as_slice()),
            _ => None,
        })
    }

    /// The `id` the client sent, if any.
    pub fn id(&self) -> Option<RecordId> {
        self.get::<RecordId>("id")
    }

    /// Overwrite every present, writable scalar field of `target`.
    ///
    /// Read-only fields and nested collections are skipped; collections go through
    /// [`reconcile`](crate::framework::reconcile()).
    pub fn merge<T>(&self, target: &mut T, schema: &WireSchema<T>) -> Result<(), ApiError> {
        for (name, value) in &self.entries {
            let FieldValue::Scalar(value) = value else {
                continue;
            };
            let def = schema
                .fields()
                .iter()
                .find(|d| d.name == *name)
                .ok_or_else(|| ApiError::invalid_delta(*name, "unknown field"))?;
            if let FieldKind::Scalar { set: Some(set), .. } = &def.kind {
                set(target, value).map_err(|e| ApiError::invalid_delta(*name, e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Non-mutating form of [`Delta::merge`].
    pub fn merged<T: Clone>(&self, target: &T, schema: &WireSchema<T>) -> Result<T, ApiError> {
        let mut next = target.clone();
        self.merge(&mut next, schema)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::FieldDef;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Shelf {
        id: i32,
        name: String,
        capacity: i32,
        note: Option<String>,
    }

    static SHELF_FIELDS: [FieldDef<Shelf>; 4] = [
        crate::wire_field!(Shelf, "id" => id: i32, read_only),
        crate::wire_field!(Shelf, "name" => name: String),
        crate::wire_field!(Shelf, "capacity" => capacity: i32),
        crate::wire_field!(Shelf, "note" => note: Option<String>),
    ];
    static SHELF_SCHEMA: WireSchema<Shelf> = WireSchema::new(&SHELF_FIELDS);

    fn shelf() -> Shelf {
        Shelf {
            id: 9,
            name: "top".into(),
            capacity: 12,
            note: Some("fragile".into()),
        }
    }

    #[test]
    fn empty_delta_is_identity() {
        let original = shelf();
        assert_eq!(Delta::empty().merged(&original, &SHELF_SCHEMA), Ok(original));
    }

    #[test]
    fn only_present_fields_change() {
        let delta = Delta::parse(&json!({ "capacity": 40 }), &SHELF_SCHEMA).unwrap();
        let merged = delta.merged(&shelf(), &SHELF_SCHEMA).unwrap();
        assert_eq!(merged, Shelf { capacity: 40, ..shelf() });
    }

    #[test]
    fn explicit_null_clears_nullable_field() {
        let delta = Delta::parse(&json!({ "note": null }), &SHELF_SCHEMA).unwrap();
        assert!(delta.is_present("note"));
        let merged = delta.merged(&shelf(), &SHELF_SCHEMA).unwrap();
        assert_eq!(merged.note, None);
        assert_eq!(merged.name, "top");
    }

    #[test]
    fn null_for_required_field_is_rejected() {
        let err = Delta::parse(&json!({ "name": null }), &SHELF_SCHEMA).unwrap_err();
        assert_eq!(err, ApiError::invalid_delta("name", "expected string, found null"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = Delta::parse(&json!({ "nmae": "typo" }), &SHELF_SCHEMA).unwrap_err();
        assert_eq!(err, ApiError::invalid_delta("nmae", "unknown field"));
    }

    #[test]
    fn type_mismatch_fails_at_parse_time() {
        let err = Delta::parse(&json!({ "capacity": "lots" }), &SHELF_SCHEMA).unwrap_err();
        assert_eq!(
            err,
            ApiError::invalid_delta("capacity", "expected 32-bit integer, found string")
        );
    }

    #[test]
    fn field_names_resolve_case_insensitively_to_canonical_names() {
        let delta = Delta::parse(&json!({ "Name": "bottom", "CAPACITY": 1 }), &SHELF_SCHEMA).unwrap();
        assert_eq!(delta.field_names().collect::<Vec<_>>(), ["name", "capacity"]);
    }

    #[test]
    fn case_variants_of_one_field_are_duplicates() {
        let err = Delta::parse(&json!({ "name": "a", "NAME": "b" }), &SHELF_SCHEMA).unwrap_err();
        assert_eq!(err, ApiError::invalid_delta("name", "duplicate field"));
    }

    #[test]
    fn read_only_id_is_captured_but_never_merged() {
        let delta = Delta::parse(&json!({ "id": 77, "name": "middle" }), &SHELF_SCHEMA).unwrap();
        assert_eq!(delta.id(), Some(77));
        let merged = delta.merged(&shelf(), &SHELF_SCHEMA).unwrap();
        assert_eq!(merged.id, 9);
        assert_eq!(merged.name, "middle");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Delta::parse(&json!([1, 2]), &SHELF_SCHEMA).unwrap_err();
        assert_eq!(err, ApiError::invalid_delta("", "expected object, found array"));
    }

    #[test]
    fn list_errors_carry_the_item_index() {
        let err = Delta::parse_list(&json!([{ "name": "a" }, { "name": 3 }]), &SHELF_SCHEMA)
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::invalid_delta("[1].name", "expected string, found number")
        );
    }
}
