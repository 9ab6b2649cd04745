pub mod catalog_system;
pub mod config;
pub mod tracing;

pub use catalog_system::{CatalogSeed, CatalogSystem};
pub use config::{ApiConfig, ConfigError, CurrencySettings};
pub use self::tracing::setup_tracing;
