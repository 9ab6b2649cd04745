use crate::controllers::activity::ActivityLog;
use crate::controllers::params::{check_route_id, root_delta};
use crate::controllers::response::ApiResponse;
use crate::framework::{
    render, render_one, ApiError, Factory, QuerySpec, RecordId, Resource, ResourceService,
    SelectionSet,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Trait for resource controllers to inherit the standard single-record endpoints.
///
/// This trait reduces boilerplate by providing default implementations for
/// get-by-id, create, update and delete. A controller supplies its service, factory,
/// activity keywords and, when needed, a hook that runs just before an update is written.
#[async_trait]
pub trait ResourceController<T: Resource>: Send + Sync {
    /// Activity keyword for a create, e.g. `"AddNewWarehouse"`.
    const CREATED: &'static str;
    const UPDATED: &'static str;
    const DELETED: &'static str;

    fn service(&self) -> &ResourceService<T>;

    fn factory(&self) -> &dyn Factory<T>;

    fn activity(&self) -> &dyn ActivityLog;

    /// Called after the delta is merged and before the record is written.
    fn before_update(&self, _record: &mut T) {}

    /// One page of records, rendered with the client's selection.
    async fn list_page(&self, spec: &QuerySpec, selection: &SelectionSet) -> Result<Value, ApiError> {
        let listing = self.service().list(spec).await?;
        debug!(
            resource = T::NAME,
            returned = listing.items.len(),
            applied = ?listing.applied,
            "Listing"
        );
        Ok(render(&listing.items, selection))
    }

    #[tracing::instrument(skip(self), fields(resource = T::NAME))]
    async fn get_by_id(&self, id: RecordId, fields: Option<&str>) -> ApiResponse {
        let result = async {
            let record = self.service().find(id).await?;
            Ok::<_, ApiError>(render_one(&record, &SelectionSet::from(fields)))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[tracing::instrument(skip(self, body), fields(resource = T::NAME))]
    async fn create(&self, body: &Value) -> ApiResponse {
        let result = async {
            let delta = root_delta::<T>(body)?;
            let record = self.service().create(&delta, self.factory()).await?;
            info!(id = record.id(), "Created");
            self.activity().insert_activity(Self::CREATED, T::NAME, record.id()).await;
            Ok::<_, ApiError>(render_one(&record, &SelectionSet::all()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[tracing::instrument(skip(self, body), fields(resource = T::NAME))]
    async fn update(&self, id: RecordId, body: &Value) -> ApiResponse {
        let result = async {
            let delta = root_delta::<T>(body)?;
            check_route_id(&delta, id)?;
            let record = self
                .service()
                .update_with(id, &delta, |record| self.before_update(record))
                .await?;
            info!(id, "Updated");
            self.activity().insert_activity(Self::UPDATED, T::NAME, id).await;
            Ok::<_, ApiError>(render_one(&record, &SelectionSet::all()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[tracing::instrument(skip(self), fields(resource = T::NAME))]
    async fn delete(&self, id: RecordId) -> ApiResponse {
        let result = async {
            self.service().delete(id).await?;
            info!(id, "Deleted");
            self.activity().insert_activity(Self::DELETED, T::NAME, id).await;
            Ok::<_, ApiError>(json!({}))
        }
        .await;
        ApiResponse::from_result(result)
    }
}
