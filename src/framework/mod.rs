//! Generic catalog resource framework.
//!
//! This module provides the building blocks every catalog resource shares: a static
//! wire schema, sparse patch documents, listing filters, pagination, field selection
//! and an actor-backed record store.
//!
//! # Main Components
//!
//! - [`Resource`] - Trait that catalog record types implement
//! - [`WireSchema`] / [`wire_field!`](crate::wire_field) - Declared wire representation
//! - [`Delta`] - Presence-tracking patch document, merged onto records
//! - [`QuerySpec`] / [`Window`] - Listing filters and the pagination window
//! - [`SelectionSet`] - Client field selection for rendering
//! - [`reconcile()`] - Child collection reconciliation by natural key
//! - [`RecordStore`] / [`StoreActor`] / [`StoreClient`] - Persistence seam
//! - [`ResourceService`] - The above, wired together per resource
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test services without spawning a store actor.

pub mod delta;
pub mod error;
pub mod mock;
pub mod paginate;
pub mod query;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod select;
pub mod service;
pub mod store;

pub use delta::{Delta, FieldValue};
pub use error::{ApiError, FieldError, StoreError};
pub use mock::{create_mock_store, next_request, MockStore};
pub use paginate::{paginate, PaginationConfig, Window};
pub use query::{AppliedFilter, EqualityFilter, Filtered, QuerySpec};
pub use reconcile::{reconcile, ReconcilePlan};
pub use record::{ChildRecord, DefaultFactory, Factory, NaturalKey, Record, RecordId, Resource};
pub use schema::{FieldDef, FieldKind, WireSchema, WireValue};
pub use select::{render, render_one, SelectionSet};
pub use service::{Listing, ResourceService};
pub use store::{RecordStore, StoreActor, StoreClient, StoreRequest};
