use crate::controllers::activity::ActivityLog;
use crate::controllers::params::CurrenciesParams;
use crate::controllers::resource::ResourceController;
use crate::controllers::response::ApiResponse;
use crate::framework::{
    render_one, Factory, PaginationConfig, ResourceService, SelectionSet, StoreClient,
};
use crate::lifecycle::CurrencySettings;
use crate::model::{Currency, CurrencyFactory};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Endpoints under `/api/currencies`.
pub struct CurrenciesController {
    currencies: ResourceService<Currency>,
    pagination: PaginationConfig,
    settings: CurrencySettings,
    activity: Arc<dyn ActivityLog>,
}

impl CurrenciesController {
    pub fn new(
        currencies: StoreClient<Currency>,
        pagination: PaginationConfig,
        settings: CurrencySettings,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            currencies: ResourceService::new(currencies),
            pagination,
            settings,
            activity,
        }
    }

    /// Published currencies, or every currency with `show_hidden`.
    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &CurrenciesParams) -> ApiResponse {
        debug!(?params, "list called");
        let result = async {
            let mut spec = params.listing.query_spec(&self.pagination)?;
            if !params.show_hidden {
                spec = spec.with_equal("published", true);
            }
            self.list_page(&spec, &params.listing.selection()).await
        }
        .await;
        ApiResponse::from_result(result)
    }

    /// The store's primary currency. 204 when none is configured or it no longer exists.
    #[instrument(skip(self))]
    pub async fn primary(&self) -> ApiResponse {
        let Some(id) = self.settings.primary_store_currency_id.filter(|id| *id > 0) else {
            debug!("No primary currency configured");
            return ApiResponse::NoContent;
        };
        match self.currencies.get_by_id(id).await {
            Ok(Some(currency)) => ApiResponse::Ok(render_one(&currency, &SelectionSet::all())),
            Ok(None) => ApiResponse::NoContent,
            Err(err) => ApiResponse::from_result(Err(err)),
        }
    }
}

#[async_trait]
impl ResourceController<Currency> for CurrenciesController {
    const CREATED: &'static str = "AddNewCurrency";
    const UPDATED: &'static str = "UpdateCurrency";
    const DELETED: &'static str = "DeleteCurrency";

    fn service(&self) -> &ResourceService<Currency> {
        &self.currencies
    }

    fn factory(&self) -> &dyn Factory<Currency> {
        &CurrencyFactory
    }

    fn activity(&self) -> &dyn ActivityLog {
        self.activity.as_ref()
    }

    fn before_update(&self, currency: &mut Currency) {
        currency.updated_on_utc = Utc::now();
    }
}
