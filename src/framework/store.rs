//! # Record Store
//!
//! The persistence seam of the catalog pipeline.
//!
//! ## Key Types
//!
//! - [`RecordStore`]: the async contract every backing store satisfies.
//! - [`StoreActor`]: an in-memory store that owns its records inside a task.
//! - [`StoreClient`]: the cloneable handle that talks to a [`StoreActor`].

use crate::framework::error::StoreError;
use crate::framework::record::{Record, RecordId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Async reads and writes of one record type.
///
/// # Architecture Note
/// The listing and merge pipeline only ever sees this trait, never a concrete store.
/// Swapping the in-memory actor for a database-backed store (or a [`MockStore`]) does
/// not touch a single controller.
///
/// [`MockStore`]: crate::framework::MockStore
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Snapshot of every record, in no particular order.
    async fn fetch_all(&self) -> Result<Vec<T>, StoreError>;

    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<T>, StoreError>;

    /// Persist a new record. An id of 0 is replaced by a store-assigned one.
    async fn insert(&self, record: T) -> Result<T, StoreError>;

    async fn update(&self, record: T) -> Result<T, StoreError>;

    async fn delete(&self, record: T) -> Result<(), StoreError>;
}

// =============================================================================
// 2. THE MESSAGES
// =============================================================================

/// One-shot response channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests accepted by a [`StoreActor`], one per [`RecordStore`] operation.
#[derive(Debug)]
pub enum StoreRequest<T: Record> {
    FetchAll {
        respond_to: Response<Vec<T>>,
    },
    FetchById {
        id: RecordId,
        respond_to: Response<Option<T>>,
    },
    Insert {
        record: T,
        respond_to: Response<T>,
    },
    Update {
        record: T,
        respond_to: Response<T>,
    },
    Delete {
        id: RecordId,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// In-memory record store.
///
/// **Concurrency Model**:
/// Requests are processed one at a time by the task running [`StoreActor::run`], so the
/// record map needs no lock. Every client sees the writes of earlier requests.
pub struct StoreActor<T: Record> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

impl<T: Record> StoreActor<T> {
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        Self::with_records(buffer_size, Vec::new())
    }

    /// Start from existing records. Ids keep counting past the largest seeded id.
    pub fn with_records(
        buffer_size: usize,
        seed: impl IntoIterator<Item = T>,
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let records: BTreeMap<RecordId, T> = seed.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = records.keys().next_back().map_or(1, |max| max.saturating_add(1));
        let actor = Self {
            receiver,
            records,
            next_id,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        let record_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        info!(record_type, size = self.records.len(), "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::FetchAll { respond_to } => {
                    debug!(record_type, size = self.records.len(), "FetchAll");
                    let _ = respond_to.send(Ok(self.records.values().cloned().collect()));
                }
                StoreRequest::FetchById { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(record_type, id, found = record.is_some(), "FetchById");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Insert { record, respond_to } => {
                    let result = self.insert(record);
                    match &result {
                        Ok(r) => info!(record_type, id = r.id(), size = self.records.len(), "Inserted"),
                        Err(e) => warn!(record_type, error = %e, "Insert failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update { record, respond_to } => {
                    let id = record.id();
                    let result = match self.records.get_mut(&id) {
                        Some(slot) => {
                            *slot = record.clone();
                            info!(record_type, id, "Updated");
                            Ok(record)
                        }
                        None => {
                            warn!(record_type, id, "Not found");
                            Err(StoreError::NotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    let result = match self.records.remove(&id) {
                        Some(_) => {
                            info!(record_type, id, size = self.records.len(), "Deleted");
                            Ok(())
                        }
                        None => {
                            warn!(record_type, id, "Not found");
                            Err(StoreError::NotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(record_type, size = self.records.len(), "Shutdown");
    }

    fn insert(&mut self, mut record: T) -> Result<T, StoreError> {
        if record.id() == 0 {
            record.set_id(self.next_id);
        } else if self.records.contains_key(&record.id()) {
            return Err(StoreError::Conflict(record.id()));
        }
        // The id after the largest stored one must stay representable.
        let following = record
            .id()
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("record id space exhausted".into()))?;
        self.next_id = self.next_id.max(following);
        self.records.insert(record.id(), record.clone());
        Ok(record)
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// A cloneable handle to a [`StoreActor`].
#[derive(Clone)]
pub struct StoreClient<T: Record> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Record> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R: Send>(
        &self,
        make: impl FnOnce(Response<R>) -> StoreRequest<T> + Send,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for StoreClient<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| StoreRequest::FetchAll { respond_to })
            .await
    }

    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| StoreRequest::FetchById { id, respond_to })
            .await
    }

    async fn insert(&self, record: T) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Insert { record, respond_to })
            .await
    }

    async fn update(&self, record: T) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Update { record, respond_to })
            .await
    }

    async fn delete(&self, record: T) -> Result<(), StoreError> {
        let id = record.id();
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Warehouse;

    fn warehouse(id: RecordId, name: &str) -> Warehouse {
        Warehouse {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_store_actor_lifecycle() {
        let (actor, client) = StoreActor::<Warehouse>::new(10);
        tokio::spawn(actor.run());

        // 1. Insert assigns ids
        let first = client.insert(warehouse(0, "North")).await.unwrap();
        let second = client.insert(warehouse(0, "South")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        // 2. Update replaces the stored record
        let renamed = client.update(warehouse(2, "South Annex")).await.unwrap();
        assert_eq!(renamed.name, "South Annex");
        let fetched = client.fetch_by_id(2).await.unwrap().unwrap();
        assert_eq!(fetched.name, "South Annex");

        // 3. Delete removes it
        client.delete(fetched).await.unwrap();
        assert!(client.fetch_by_id(2).await.unwrap().is_none());
        assert_eq!(client.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seeded_store_continues_numbering() {
        let (actor, client) =
            StoreActor::with_records(10, vec![warehouse(4, "a"), warehouse(9, "b")]);
        tokio::spawn(actor.run());

        let inserted = client.insert(warehouse(0, "c")).await.unwrap();
        assert_eq!(inserted.id, 10);
        assert_eq!(
            client.insert(warehouse(4, "dup")).await,
            Err(StoreError::Conflict(4))
        );
    }

    #[tokio::test]
    async fn largest_id_is_refused_without_a_write() {
        let (actor, client) =
            StoreActor::with_records(10, vec![warehouse(RecordId::MAX, "edge")]);
        tokio::spawn(actor.run());

        let exhausted = Err(StoreError::Backend("record id space exhausted".into()));
        assert_eq!(client.insert(warehouse(0, "next")).await, exhausted);

        let (actor, client) = StoreActor::<Warehouse>::new(10);
        tokio::spawn(actor.run());
        assert_eq!(client.insert(warehouse(RecordId::MAX, "edge")).await, exhausted);
        assert!(client.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_records_report_not_found() {
        let (actor, client) = StoreActor::<Warehouse>::new(10);
        tokio::spawn(actor.run());

        assert_eq!(
            client.update(warehouse(3, "x")).await,
            Err(StoreError::NotFound(3))
        );
        assert_eq!(
            client.delete(warehouse(3, "x")).await,
            Err(StoreError::NotFound(3))
        );
    }

    #[tokio::test]
    async fn closed_store_is_reported() {
        let (actor, client) = StoreActor::<Warehouse>::new(10);
        drop(actor);
        assert_eq!(client.fetch_all().await, Err(StoreError::Closed));
    }
}
