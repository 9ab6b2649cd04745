//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Log levels come from the `RUST_LOG` environment variable. The compact format hides the
//! module prefix (`with_target(false)`); every event carries its own structured fields
//! instead (`record_type`, `resource`, `id`, ...).
//!
//! ## What Gets Traced
//!
//! - **Store Lifecycle**: startup and shutdown of each record store, with its size
//! - **Store Operations**: inserts, updates and deletes at `info`, reads at `debug`
//! - **Controller Requests**: one span per endpoint call, rejected requests at `warn`
//! - **Activity**: audit entries from [`TracingActivityLog`](crate::controllers::TracingActivityLog)
//!
//! The query, pagination, delta and selection functions are pure and emit nothing.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Writes and rejections only
//! RUST_LOG=info cargo run
//!
//! # Include reads, listing sizes and parameters
//! RUST_LOG=debug cargo run
//!
//! # Store traffic only
//! RUST_LOG=catalog_api::framework::store=debug cargo run
//! ```
//!
//! ## Example Output
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Store started record_type="Warehouse" size=5
//! INFO create:Inserted record_type="Warehouse" id=6 size=6
//! INFO create:Created resource="warehouse" id=6
//! INFO create:Activity keyword="AddNewWarehouse" resource="warehouse" id=6
//! WARN list: Request rejected status=400 error=limit: invalid limit parameter
//! ```

/// Install the global `fmt` subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
