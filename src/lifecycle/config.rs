//! API configuration.
//!
//! Every field has a default, so an empty JSON object is a valid configuration:
//!
//! ```rust
//! use catalog_api::lifecycle::ApiConfig;
//!
//! let config = ApiConfig::from_json(r#"{ "pagination": { "max_limit": 100 } }"#).unwrap();
//! assert_eq!(config.pagination.max_limit, 100);
//! assert_eq!(config.pagination.default_limit, 50);
//! ```

use crate::framework::{PaginationConfig, RecordId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Store-wide currency settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    pub primary_store_currency_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub pagination: PaginationConfig,
    /// Channel capacity of each record store actor.
    pub store_buffer_size: usize,
    pub currency: CurrencySettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            store_buffer_size: 32,
            currency: CurrencySettings::default(),
        }
    }
}

impl ApiConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagination.validate().map_err(ConfigError::Invalid)?;
        if self.store_buffer_size == 0 {
            return Err(ConfigError::Invalid("store_buffer_size must be positive".into()));
        }
        Ok(())
    }
}
