//! The contracts every catalog record type satisfies.
//!
//! # Architecture Note
//! By defining a contract ([`Resource`]) that all our catalog types (Currency, Warehouse,
//! DeliveryDate, ...) must satisfy, the listing, merge and rendering pipeline is written
//! *once* and reused for every resource. The per-resource part shrinks to a static
//! [`WireSchema`](crate::framework::WireSchema) table plus two envelope names.

use crate::framework::schema::WireSchema;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Store-assigned identity. Valid identities are positive; `0` means "not yet persisted".
pub type RecordId = i32;

/// Anything the record store can hold.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);
}

/// A record type exposed over the API.
pub trait Resource: Record + Default {
    /// Singular JSON root used by write payloads (e.g. `"warehouse"`).
    const NAME: &'static str;

    /// Plural key of the response envelope (e.g. `"warehouses"`).
    const ENVELOPE: &'static str;

    /// The canonical, ordered wire representation.
    fn schema() -> &'static WireSchema<Self>;

    /// Total order used by listings. Ascending id unless a resource says otherwise.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.id().cmp(&b.id())
    }
}

/// Natural identity of a child record, used to reconcile nested collections.
pub trait NaturalKey {
    /// Wire name of the field holding the key.
    const KEY_FIELD: &'static str;

    fn natural_key(&self) -> &str;
}

/// A record owned by a parent record through a foreign key.
pub trait ChildRecord: Resource + NaturalKey {
    fn parent_id(&self) -> RecordId;

    fn set_parent_id(&mut self, parent_id: RecordId);
}

/// Builds fresh records for the creation path (identity left at 0, audit fields stamped).
pub trait Factory<T>: Send + Sync {
    fn initialize(&self) -> T;
}

/// Factory that starts from `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl<T: Default> Factory<T> for DefaultFactory {
    fn initialize(&self) -> T {
        T::default()
    }
}
