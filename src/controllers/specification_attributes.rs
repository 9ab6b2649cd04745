//! Specification attributes and their options.
//!
//! Attributes and options live in separate stores. Responses always carry an attribute's
//! options, read from the option store and ordered by name. A write that includes
//! `specification_attribute_options` reconciles the stored options against it: options
//! missing from the payload are **deleted**.

use crate::controllers::activity::ActivityLog;
use crate::controllers::params::{check_route_id, root_delta, ListingParams};
use crate::controllers::response::ApiResponse;
use crate::framework::{
    reconcile, render, render_one, ApiError, DefaultFactory, PaginationConfig, ReconcilePlan,
    RecordId, RecordStore, Resource, ResourceService, SelectionSet, StoreClient,
};
use crate::model::{SpecificationAttribute, SpecificationAttributeOption};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const OPTIONS_FIELD: &str = "specification_attribute_options";

/// Endpoints under `/api/specification_attributes`.
pub struct SpecificationAttributesController {
    attributes: ResourceService<SpecificationAttribute>,
    options: ResourceService<SpecificationAttributeOption>,
    pagination: PaginationConfig,
    activity: Arc<dyn ActivityLog>,
}

impl SpecificationAttributesController {
    pub fn new(
        attributes: StoreClient<SpecificationAttribute>,
        options: StoreClient<SpecificationAttributeOption>,
        pagination: PaginationConfig,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            attributes: ResourceService::new(attributes),
            options: ResourceService::new(options),
            pagination,
            activity,
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &ListingParams) -> ApiResponse {
        debug!(?params, "list called");
        let result = async {
            let spec = params.query_spec(&self.pagination)?;
            let listing = self.attributes.list(&spec).await?;
            let hydrated = self.hydrate(listing.items).await?;
            Ok::<_, ApiError>(render(&hydrated, &params.selection()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[instrument(skip(self, params))]
    pub async fn count(&self, params: &ListingParams) -> ApiResponse {
        let result = async {
            let spec = params.count_spec(&self.pagination)?;
            let count = self.attributes.count(&spec).await?;
            Ok::<_, ApiError>(json!({ "count": count }))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: RecordId, fields: Option<&str>) -> ApiResponse {
        let result = async {
            let attribute = self.attributes.find(id).await?;
            let hydrated = self.hydrate_one(attribute).await?;
            Ok::<_, ApiError>(render_one(&hydrated, &SelectionSet::from(fields)))
        }
        .await;
        ApiResponse::from_result(result)
    }

    /// Create an attribute together with any options in the payload.
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> ApiResponse {
        let result = async {
            let delta = root_delta::<SpecificationAttribute>(body)?;
            // Options are checked before the attribute is written.
            let plan = delta
                .children(OPTIONS_FIELD)
                .map(|children| reconcile::<SpecificationAttributeOption>(0, Vec::new(), children))
                .transpose()
                .map_err(|e| e.within(OPTIONS_FIELD))?;

            let attribute = self.attributes.create(&delta, &DefaultFactory).await?;
            info!(id = attribute.id, "Created");
            if let Some(mut plan) = plan {
                for option in &mut plan.inserts {
                    option.specification_attribute_id = attribute.id;
                }
                self.apply(plan).await?;
            }
            self.activity
                .insert_activity("AddNewSpecAttribute", SpecificationAttribute::NAME, attribute.id)
                .await;

            let hydrated = self.hydrate_one(attribute).await?;
            Ok::<_, ApiError>(render_one(&hydrated, &SelectionSet::all()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    /// Patch an attribute. When the payload lists options, the stored options are
    /// reconciled against that list.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: RecordId, body: &Value) -> ApiResponse {
        let result = async {
            let delta = root_delta::<SpecificationAttribute>(body)?;
            check_route_id(&delta, id)?;
            let plan = match delta.children(OPTIONS_FIELD) {
                Some(children) => {
                    let existing = self.options_of(id).await?;
                    Some(reconcile(id, existing, children).map_err(|e| e.within(OPTIONS_FIELD))?)
                }
                None => None,
            };

            let attribute = self
                .attributes
                .update_with(id, &delta, |a| a.specification_attribute_options.clear())
                .await?;
            if let Some(plan) = plan {
                debug!(
                    updates = plan.updates.len(),
                    inserts = plan.inserts.len(),
                    deletes = plan.deletes.len(),
                    "Reconciling options"
                );
                self.apply(plan).await?;
            }
            info!(id, "Updated");
            self.activity
                .insert_activity("EditSpecAttribute", SpecificationAttribute::NAME, id)
                .await;

            let hydrated = self.hydrate_one(attribute).await?;
            Ok::<_, ApiError>(render_one(&hydrated, &SelectionSet::all()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    /// Delete an attribute and every option it owns.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> ApiResponse {
        let result = async {
            let attribute = self.attributes.find(id).await?;
            for option in self.options_of(id).await? {
                self.options.store().delete(option).await?;
            }
            self.attributes.store().delete(attribute).await?;
            info!(id, "Deleted");
            self.activity
                .insert_activity("DeleteSpecAttribute", SpecificationAttribute::NAME, id)
                .await;
            Ok::<_, ApiError>(json!({}))
        }
        .await;
        ApiResponse::from_result(result)
    }

    // =========================================================================
    // Options
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn get_option(&self, id: RecordId, fields: Option<&str>) -> ApiResponse {
        let result = async {
            let option = self.options.find(id).await?;
            Ok::<_, ApiError>(render_one(&option, &SelectionSet::from(fields)))
        }
        .await;
        ApiResponse::from_result(result)
    }

    /// Create one option under an existing attribute.
    #[instrument(skip(self, body))]
    pub async fn create_option(&self, body: &Value) -> ApiResponse {
        let result = async {
            let delta = root_delta::<SpecificationAttributeOption>(body)?;
            let parent_id = delta
                .get::<RecordId>("specification_attribute_id")
                .ok_or_else(|| ApiError::invalid_delta("specification_attribute_id", "required"))?;
            let name = delta
                .get::<String>("name")
                .ok_or_else(|| ApiError::invalid_delta("name", "required"))?;
            self.attributes.find(parent_id).await?;
            self.ensure_unique_name(parent_id, &name, None).await?;

            let option = self.options.create(&delta, &DefaultFactory).await?;
            info!(id = option.id, parent_id, "Created option");
            self.activity
                .insert_activity(
                    "AddNewSpecAttributeOption",
                    SpecificationAttributeOption::NAME,
                    option.id,
                )
                .await;
            Ok::<_, ApiError>(render_one(&option, &SelectionSet::all()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[instrument(skip(self, body))]
    pub async fn update_option(&self, id: RecordId, body: &Value) -> ApiResponse {
        let result = async {
            let delta = root_delta::<SpecificationAttributeOption>(body)?;
            check_route_id(&delta, id)?;
            let current = self.options.find(id).await?;
            let next = delta.merged(&current, SpecificationAttributeOption::schema())?;
            if next.specification_attribute_id != current.specification_attribute_id {
                self.attributes.find(next.specification_attribute_id).await?;
            }
            self.ensure_unique_name(next.specification_attribute_id, &next.name, Some(id))
                .await?;

            let option = self.options.update(id, &delta).await?;
            info!(id, "Updated option");
            self.activity
                .insert_activity(
                    "EditSpecAttributeOption",
                    SpecificationAttributeOption::NAME,
                    id,
                )
                .await;
            Ok::<_, ApiError>(render_one(&option, &SelectionSet::all()))
        }
        .await;
        ApiResponse::from_result(result)
    }

    #[instrument(skip(self))]
    pub async fn delete_option(&self, id: RecordId) -> ApiResponse {
        let result = async {
            self.options.delete(id).await?;
            info!(id, "Deleted option");
            self.activity
                .insert_activity(
                    "DeleteSpecAttributeOption",
                    SpecificationAttributeOption::NAME,
                    id,
                )
                .await;
            Ok::<_, ApiError>(json!({}))
        }
        .await;
        ApiResponse::from_result(result)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn options_of(&self, parent_id: RecordId) -> Result<Vec<SpecificationAttributeOption>, ApiError> {
        Ok(self
            .options
            .store()
            .fetch_all()
            .await?
            .into_iter()
            .filter(|o| o.specification_attribute_id == parent_id)
            .collect())
    }

    async fn ensure_unique_name(
        &self,
        parent_id: RecordId,
        name: &str,
        except: Option<RecordId>,
    ) -> Result<(), ApiError> {
        let taken = self
            .options_of(parent_id)
            .await?
            .iter()
            .any(|o| o.name == name && Some(o.id) != except);
        if taken {
            return Err(ApiError::invalid_delta("name", "duplicate natural key"));
        }
        Ok(())
    }

    /// Write a reconciliation plan. Stops at the first failing write; earlier writes stay.
    async fn apply(&self, plan: ReconcilePlan<SpecificationAttributeOption>) -> Result<(), ApiError> {
        let store = self.options.store();
        let result = async {
            for option in plan.updates {
                store.update(option).await?;
            }
            for option in plan.inserts {
                store.insert(option).await?;
            }
            for option in plan.deletes {
                store.delete(option).await?;
            }
            Ok::<_, ApiError>(())
        }
        .await;
        if let Err(err) = &result {
            warn!(error = %err, "Option reconciliation stopped part way");
        }
        result
    }

    async fn hydrate(
        &self,
        attributes: Vec<SpecificationAttribute>,
    ) -> Result<Vec<SpecificationAttribute>, ApiError> {
        if attributes.is_empty() {
            return Ok(attributes);
        }
        let options = self.options.store().fetch_all().await?;
        Ok(attributes
            .into_iter()
            .map(|attribute| {
                let owned = options
                    .iter()
                    .filter(|o| o.specification_attribute_id == attribute.id)
                    .cloned()
                    .collect();
                attribute.with_options(owned)
            })
            .collect())
    }

    async fn hydrate_one(&self, attribute: SpecificationAttribute) -> Result<SpecificationAttribute, ApiError> {
        let options = self.options_of(attribute.id).await?;
        Ok(attribute.with_options(options))
    }
}
