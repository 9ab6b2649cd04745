//! # Catalog API
//!
//! > **The read/write core of a catalog REST API.**
//!
//! This crate implements the request pipeline behind the catalog endpoints: listing with
//! filters and pagination, partial updates from JSON bodies, reconciliation of nested child
//! collections, and field-selected rendering. HTTP routing is left to the host; every
//! controller method takes already-parsed parameters and returns an [`ApiResponse`](controllers::ApiResponse)
//! carrying a status code and a JSON body.
//!
//! ## Core Concepts
//!
//! ### One pipeline, many resources
//! A record type describes itself once, through a static [`WireSchema`](framework::WireSchema).
//! The query builder, the delta merge and the field selector all read that schema, so adding a
//! resource means writing its struct and its field table, not another copy of the pipeline.
//!
//! ### Deltas, not documents
//! An update body is a [`Delta`](framework::Delta): the set of fields the client actually sent.
//! `null` clears a field, a missing key leaves it alone. Child collections are reconciled by
//! natural key, and children missing from the payload are deleted.
//!
//! ### Stores are actors
//! Each record type lives in a [`StoreActor`](framework::StoreActor) running in its own Tokio
//! task, reached through a cloneable [`StoreClient`](framework::StoreClient). Controllers only
//! see the [`RecordStore`](framework::RecordStore) trait, which [`MockStore`](framework::MockStore)
//! also implements for tests.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Query building, pagination, delta merge, child reconciliation, field selection and the store.
//! Nothing here knows about currencies or warehouses.
//!
//! ### 2. The Records ([`model`])
//! Plain structs with their wire schemas: [`Currency`](model::Currency), [`Warehouse`](model::Warehouse),
//! [`DeliveryDate`](model::DeliveryDate), [`SpecificationAttribute`](model::SpecificationAttribute)
//! and [`ProductWarehouseInventory`](model::ProductWarehouseInventory).
//!
//! ### 3. The Endpoints ([`controllers`])
//! One controller per resource, mapping parameters and bodies onto the engine and errors onto
//! status codes.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! Configuration, tracing setup, and [`CatalogSystem`](lifecycle::CatalogSystem), which spawns
//! the stores and wires the controllers to them.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod controllers;
pub mod framework;
pub mod lifecycle;
pub mod model;
