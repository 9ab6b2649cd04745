//! Generic per-resource operations over a [`RecordStore`].
//!
//! Every request that reaches the store has already passed parameter validation: a
//! listing with an invalid window or an unknown filter field never issues a read.

use crate::framework::delta::Delta;
use crate::framework::error::ApiError;
use crate::framework::paginate::paginate;
use crate::framework::query::{self, AppliedFilter, Filtered, QuerySpec};
use crate::framework::record::{Factory, RecordId, Resource};
use crate::framework::select::{self, SelectionSet};
use crate::framework::store::{RecordStore, StoreClient};
use serde_json::Value;
use std::marker::PhantomData;

/// One page of a listing, plus the filters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub applied: Vec<AppliedFilter>,
}

/// CRUD, listing and rendering for one resource type.
pub struct ResourceService<T: Resource, S: RecordStore<T> = StoreClient<T>> {
    store: S,
    _record: PhantomData<fn() -> T>,
}

impl<T: Resource, S: RecordStore<T> + Clone> Clone for ResourceService<T, S> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<T: Resource, S: RecordStore<T>> ResourceService<T, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Filter, order and paginate the store's records.
    pub async fn list(&self, spec: &QuerySpec) -> Result<Listing<T>, ApiError> {
        let Filtered { items, applied } = self.filtered(spec).await?;
        Ok(Listing {
            items: paginate(items, spec.window()),
            applied,
        })
    }

    /// Number of records the listing filters admit, ignoring the window.
    pub async fn count(&self, spec: &QuerySpec) -> Result<usize, ApiError> {
        Ok(self.filtered(spec).await?.items.len())
    }

    async fn filtered(&self, spec: &QuerySpec) -> Result<Filtered<T>, ApiError> {
        // Reject unknown filter fields before touching the store.
        let schema = T::schema();
        if let Some(filter) = spec.equality().iter().find(|f| schema.resolve(f.field).is_none()) {
            return Err(ApiError::validation(filter.field, "unknown filter field"));
        }
        let records = self.store.fetch_all().await?;
        query::apply(records, spec)
    }

    /// `Ok(None)` when no record has this id.
    ///
    /// # Errors
    /// A non-positive id is a validation error.
    pub async fn get_by_id(&self, id: RecordId) -> Result<Option<T>, ApiError> {
        if id <= 0 {
            return Err(ApiError::validation("id", "invalid id"));
        }
        Ok(self.store.fetch_by_id(id).await?)
    }

    /// Like [`get_by_id`](Self::get_by_id), but a missing record is an error.
    pub async fn find(&self, id: RecordId) -> Result<T, ApiError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(T::NAME, format!("{} not found", T::NAME)))
    }

    /// Build a fresh record, merge the delta onto it and insert it.
    pub async fn create(&self, delta: &Delta, factory: &dyn Factory<T>) -> Result<T, ApiError> {
        let mut record = factory.initialize();
        delta.merge(&mut record, T::schema())?;
        record.set_id(0);
        Ok(self.store.insert(record).await?)
    }

    /// Merge the delta onto the stored record. Fields absent from the delta keep their
    /// stored values.
    pub async fn update(&self, id: RecordId, delta: &Delta) -> Result<T, ApiError> {
        self.update_with(id, delta, |_| {}).await
    }

    /// [`update`](Self::update), with a hook that runs after the merge and before the write.
    pub async fn update_with(
        &self,
        id: RecordId,
        delta: &Delta,
        touch: impl FnOnce(&mut T) + Send,
    ) -> Result<T, ApiError> {
        let mut record = self.find(id).await?;
        delta.merge(&mut record, T::schema())?;
        record.set_id(id);
        touch(&mut record);
        Ok(self.store.update(record).await?)
    }

    /// Remove the record and hand it back.
    pub async fn delete(&self, id: RecordId) -> Result<T, ApiError> {
        let record = self.find(id).await?;
        self.store.delete(record.clone()).await?;
        Ok(record)
    }

    pub fn render(&self, records: &[T], selection: &SelectionSet) -> Value {
        select::render(records, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{MockStore, PaginationConfig, StoreActor, StoreError, Window};
    use crate::model::{DeliveryDate, DeliveryDateFactory};
    use serde_json::json;

    fn spec(limit: i64, page: i64) -> QuerySpec {
        QuerySpec::new(Window::new(Some(limit), Some(page), &PaginationConfig::default()).unwrap())
    }

    fn date(id: RecordId, name: &str, display_order: i32) -> DeliveryDate {
        DeliveryDate {
            id,
            name: name.into(),
            display_order,
        }
    }

    fn service_with(seed: Vec<DeliveryDate>) -> ResourceService<DeliveryDate> {
        let (actor, client) = StoreActor::with_records(8, seed);
        tokio::spawn(actor.run());
        ResourceService::new(client)
    }

    #[tokio::test]
    async fn list_filters_then_paginates() {
        let service = service_with((1..=7).map(|id| date(id, "d", id)).collect());
        let page = service.list(&spec(3, 2).with_since_id(1)).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|d| d.id).collect();
        assert_eq!(ids, [5, 6, 7]);
        assert_eq!(page.applied, [AppliedFilter::SinceId(1)]);
        assert_eq!(service.count(&spec(3, 2).with_since_id(1)).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let service = service_with(vec![date(4, "Two days", 3)]);
        let delta = Delta::parse(&json!({ "display_order": 9 }), DeliveryDate::schema()).unwrap();

        let updated = service.update(4, &delta).await.unwrap();

        assert_eq!(updated, date(4, "Two days", 9));
        assert_eq!(service.find(4).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn create_ignores_client_ids() {
        let service = service_with(vec![]);
        let delta = Delta::parse(&json!({ "id": 50, "name": "Same day" }), DeliveryDate::schema())
            .unwrap();

        let created = service.create(&delta, &DeliveryDateFactory).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Same day");
    }

    #[tokio::test]
    async fn missing_and_invalid_ids() {
        let service = service_with(vec![]);
        assert_eq!(service.get_by_id(12).await, Ok(None));
        assert_eq!(
            service.get_by_id(0).await,
            Err(ApiError::validation("id", "invalid id"))
        );
        assert_eq!(
            service.delete(12).await,
            Err(ApiError::not_found("delivery_date", "delivery_date not found"))
        );
    }

    #[tokio::test]
    async fn unknown_filter_field_never_reaches_the_store() {
        let mock = MockStore::<DeliveryDate>::new();
        let service = ResourceService::new(mock.client());

        let err = service
            .list(&spec(10, 1).with_equal("eta", 2))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::validation("eta", "unknown filter field"));
        mock.verify();
    }

    #[tokio::test]
    async fn store_failures_propagate_unchanged() {
        let mock = MockStore::<DeliveryDate>::new();
        mock.expect_fetch_all()
            .return_err(StoreError::Backend("disk full".into()));
        let service = ResourceService::new(mock.client());

        let err = service.list(&spec(10, 1)).await.unwrap_err();

        assert_eq!(err, ApiError::Store(StoreError::Backend("disk full".into())));
        mock.verify();
    }
}
