//! Request parameter models and write-body extraction.
//!
//! Parameter names are part of the wire contract: `ids`, `limit`, `page`, `since_id`,
//! `fields`, plus the per-resource filters below.

use crate::framework::{
    ApiError, Delta, PaginationConfig, QuerySpec, RecordId, Resource, SelectionSet, Window,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters every listing accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingParams {
    pub ids: Vec<RecordId>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub since_id: Option<RecordId>,
    pub fields: Option<String>,
}

impl ListingParams {
    /// Validated listing spec. Fails on an out-of-range `limit` or `page`.
    pub fn query_spec(&self, config: &PaginationConfig) -> Result<QuerySpec, ApiError> {
        let window = Window::new(self.limit, self.page, config)?;
        Ok(self.filters(window, config))
    }

    /// Same filters, default window. Counts ignore `limit` and `page`.
    pub fn count_spec(&self, config: &PaginationConfig) -> Result<QuerySpec, ApiError> {
        let window = Window::new(None, None, config)?;
        Ok(self.filters(window, config))
    }

    fn filters(&self, window: Window, config: &PaginationConfig) -> QuerySpec {
        QuerySpec::new(window)
            .with_ids(self.ids.iter().copied())
            .with_since_id(self.since_id.unwrap_or(config.default_since_id))
    }

    pub fn selection(&self) -> SelectionSet {
        SelectionSet::from(self.fields.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrenciesParams {
    #[serde(flatten)]
    pub listing: ListingParams,
    /// Include unpublished currencies.
    pub show_hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehousesParams {
    #[serde(flatten)]
    pub listing: ListingParams,
    /// Only warehouses holding inventory for this product.
    pub product_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryDatesParams {
    #[serde(flatten)]
    pub listing: ListingParams,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryParams {
    #[serde(flatten)]
    pub listing: ListingParams,
    pub product_id: Option<RecordId>,
    pub warehouse_id: Option<RecordId>,
}

/// Parse the singular root object of a write body, e.g. `{"warehouse": {...}}`.
///
/// # Errors
/// A body without the root is an [`ApiError::InvalidDelta`] on field `json`.
pub fn root_delta<T: Resource>(body: &Value) -> Result<Delta, ApiError> {
    let root = body
        .as_object()
        .and_then(|map| map.iter().find(|(key, _)| key.eq_ignore_ascii_case(T::NAME)))
        .map(|(_, value)| value)
        .ok_or_else(|| ApiError::invalid_delta("json", format!("{} root object is required", T::NAME)))?;
    Delta::parse(root, T::schema())
}

/// Reject a body whose `id` disagrees with the route.
pub fn check_route_id(delta: &Delta, id: RecordId) -> Result<(), ApiError> {
    match delta.id() {
        Some(body_id) if body_id != id => {
            Err(ApiError::invalid_delta("id", "id does not match the route"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Warehouse;
    use serde_json::json;

    #[test]
    fn resource_params_deserialize_flat() {
        let params: WarehousesParams =
            serde_json::from_value(json!({ "limit": 2, "page": 3, "product_id": 7, "ids": [1, 2] }))
                .unwrap();
        assert_eq!(params.listing.limit, Some(2));
        assert_eq!(params.listing.page, Some(3));
        assert_eq!(params.listing.ids, [1, 2]);
        assert_eq!(params.product_id, Some(7));
    }

    #[test]
    fn listing_spec_validates_the_window() {
        let params = ListingParams {
            limit: Some(0),
            ..Default::default()
        };
        let err = params.query_spec(&PaginationConfig::default()).unwrap_err();
        assert_eq!(err, ApiError::validation("limit", "invalid limit parameter"));
        assert!(params.count_spec(&PaginationConfig::default()).is_ok());
    }

    #[test]
    fn root_object_is_required() {
        let err = root_delta::<Warehouse>(&json!({ "name": "North" })).unwrap_err();
        assert_eq!(
            err,
            ApiError::invalid_delta("json", "warehouse root object is required")
        );

        let delta = root_delta::<Warehouse>(&json!({ "Warehouse": { "name": "North" } })).unwrap();
        assert_eq!(delta.get::<String>("name").as_deref(), Some("North"));
    }

    #[test]
    fn body_id_must_match_route() {
        let delta = root_delta::<Warehouse>(&json!({ "warehouse": { "id": 3 } })).unwrap();
        assert!(check_route_id(&delta, 3).is_ok());
        assert_eq!(
            check_route_id(&delta, 4),
            Err(ApiError::invalid_delta("id", "id does not match the route"))
        );
    }
}
