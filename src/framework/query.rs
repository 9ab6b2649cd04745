//! Declarative filtering and deterministic ordering of record listings.
//!
//! Filters run in a fixed order: id set, equality filters (logical AND), `since_id`
//! cursor. The survivors are then sorted by [`Resource::listing_order`] no matter which
//! filters fired, so consecutive pages over an unchanged store never overlap or skip.

use crate::framework::error::ApiError;
use crate::framework::paginate::Window;
use crate::framework::record::{RecordId, Resource};
use serde_json::Value;
use std::collections::BTreeSet;

/// `field == value`, evaluated against the resource's wire representation.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityFilter {
    pub field: &'static str,
    pub value: Value,
}

/// Immutable, per-request listing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    ids: BTreeSet<RecordId>,
    equality: Vec<EqualityFilter>,
    since_id: RecordId,
    window: Window,
}

impl QuerySpec {
    pub fn new(window: Window) -> Self {
        Self {
            ids: BTreeSet::new(),
            equality: Vec::new(),
            since_id: 0,
            window,
        }
    }

    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = RecordId>) -> Self {
        self.ids.extend(ids);
        self
    }

    #[must_use]
    pub fn with_equal(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.equality.push(EqualityFilter {
            field,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn with_since_id(mut self, since_id: RecordId) -> Self {
        self.since_id = since_id;
        self
    }

    pub fn ids(&self) -> &BTreeSet<RecordId> {
        &self.ids
    }

    pub fn equality(&self) -> &[EqualityFilter] {
        &self.equality
    }

    pub fn since_id(&self) -> RecordId {
        self.since_id
    }

    pub fn window(&self) -> Window {
        self.window
    }
}

/// A filter that took part in producing a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedFilter {
    Ids(usize),
    Equal(&'static str),
    SinceId(RecordId),
}

/// Filtered, ordered, not yet paginated records.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered<T> {
    pub items: Vec<T>,
    pub applied: Vec<AppliedFilter>,
}

/// Run the filter chain over a snapshot of the store.
///
/// # Errors
/// An equality filter naming a field the schema does not declare.
pub fn apply<T: Resource>(records: Vec<T>, spec: &QuerySpec) -> Result<Filtered<T>, ApiError> {
    let schema = T::schema();
    let mut items = records;
    let mut applied = Vec::new();

    if !spec.ids.is_empty() {
        items.retain(|r| spec.ids.contains(&r.id()));
        applied.push(AppliedFilter::Ids(spec.ids.len()));
    }

    for filter in &spec.equality {
        let def = schema
            .resolve(filter.field)
            .ok_or_else(|| ApiError::validation(filter.field, "unknown filter field"))?;
        items.retain(|r| (def.get)(r) == filter.value);
        applied.push(AppliedFilter::Equal(def.name));
    }

    if spec.since_id > 0 {
        items.retain(|r| r.id() > spec.since_id);
        applied.push(AppliedFilter::SinceId(spec.since_id));
    }

    items.sort_by(T::listing_order);
    Ok(Filtered { items, applied })
}
