//! Field selection and response envelopes.
//!
//! Clients may narrow each rendered object with a comma-separated `fields` parameter.
//! Names match case-insensitively and surrounding whitespace is ignored; names the
//! schema does not declare are dropped silently. An empty selection renders every
//! declared field. Output keys always follow the schema's declaration order.

use crate::framework::record::Resource;
use crate::framework::schema::WireSchema;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// The set of field names a client asked for, lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    names: BTreeSet<String>,
}

impl SelectionSet {
    /// Selects every declared field.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a `fields` parameter such as `"id, Name ,display_order"`.
    pub fn parse(fields: &str) -> Self {
        Self::from_names(fields.split(','))
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names = names
            .into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();
        Self { names }
    }

    pub fn is_all(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.is_all() || self.names.contains(&name.to_ascii_lowercase())
    }
}

impl From<Option<&str>> for SelectionSet {
    fn from(fields: Option<&str>) -> Self {
        fields.map_or_else(Self::all, Self::parse)
    }
}

/// The selected fields of one record, in schema order.
pub fn project<T>(record: &T, schema: &WireSchema<T>, selection: &SelectionSet) -> Map<String, Value> {
    schema
        .fields()
        .iter()
        .filter(|def| selection.contains(def.name))
        .map(|def| (def.name.to_owned(), (def.get)(record)))
        .collect()
}

/// `{"<envelope>": [ ... ]}` for a listing.
pub fn render<T: Resource>(records: &[T], selection: &SelectionSet) -> Value {
    let items = records
        .iter()
        .map(|r| Value::Object(project(r, T::schema(), selection)))
        .collect();
    let mut envelope = Map::with_capacity(1);
    envelope.insert(T::ENVELOPE.to_owned(), Value::Array(items));
    Value::Object(envelope)
}

/// Single-record responses use the same envelope with one element.
pub fn render_one<T: Resource>(record: &T, selection: &SelectionSet) -> Value {
    render(std::slice::from_ref(record), selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliveryDate;
    use serde_json::json;

    fn dates() -> Vec<DeliveryDate> {
        vec![
            DeliveryDate {
                id: 1,
                name: "1-2 days".into(),
                display_order: 1,
            },
            DeliveryDate {
                id: 2,
                name: "1 week".into(),
                display_order: 5,
            },
        ]
    }

    #[test]
    fn selection_is_trimmed_and_case_insensitive() {
        let out = render(&dates(), &SelectionSet::parse(" NAME , id,"));
        assert_eq!(
            out,
            json!({ "delivery_dates": [
                { "id": 1, "name": "1-2 days" },
                { "id": 2, "name": "1 week" }
            ]})
        );
    }

    #[test]
    fn empty_selection_renders_every_field() {
        let out = render_one(&dates()[0], &SelectionSet::parse(" , "));
        assert_eq!(
            out,
            json!({ "delivery_dates": [{ "id": 1, "name": "1-2 days", "display_order": 1 }] })
        );
    }

    #[test]
    fn unknown_names_are_ignored() {
        let out = render_one(&dates()[1], &SelectionSet::parse("display_order,colour"));
        assert_eq!(out, json!({ "delivery_dates": [{ "display_order": 5 }] }));
    }

    #[test]
    fn keys_follow_declaration_order() {
        let selection = SelectionSet::parse("display_order,name,id");
        let doc = project(&dates()[0], DeliveryDate::schema(), &selection);
        let keys: Vec<_> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "name", "display_order"]);
    }

    #[test]
    fn empty_listing_keeps_the_envelope() {
        let out = render::<DeliveryDate>(&[], &SelectionSet::all());
        assert_eq!(out, json!({ "delivery_dates": [] }));
    }
}
