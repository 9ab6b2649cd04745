//! # Mock Store
//!
//! Utilities for testing controllers and services without a running [`StoreActor`].
//!
//! Use [`MockStore`] for scripted responses, or [`create_mock_store`] together with
//! [`next_request`] to answer each request by hand.
//!
//! [`StoreActor`]: crate::framework::StoreActor

use crate::framework::error::StoreError;
use crate::framework::record::{Record, RecordId};
use crate::framework::store::{StoreClient, StoreRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response it gets.
enum Expectation<T: Record> {
    FetchAll {
        response: Result<Vec<T>, StoreError>,
    },
    FetchById {
        id: RecordId,
        response: Result<Option<T>, StoreError>,
    },
    Insert {
        response: Result<T, StoreError>,
    },
    Update {
        response: Result<T, StoreError>,
    },
    Delete {
        id: RecordId,
        response: Result<(), StoreError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A scripted store. Requests must arrive in the order the expectations were added.
///
/// # Example
/// ```ignore
/// let mock = MockStore::<Warehouse>::new();
/// mock.expect_fetch_all().return_ok(vec![warehouse]);
///
/// let service = ResourceService::new(mock.client());
/// // Use service in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockStore<T: Record> {
    client: StoreClient<T>,
    expectations: Expectations<T>,
    unexpected: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Record> MockStore<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let unexpected = Arc::new(Mutex::new(Vec::new()));
        let pending = expectations.clone();
        let failures = unexpected.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = pending.lock().unwrap().pop_front();
                match (request, expectation) {
                    (StoreRequest::FetchAll { respond_to }, Some(Expectation::FetchAll { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::FetchById { id, respond_to },
                        Some(Expectation::FetchById { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Insert { respond_to, .. }, Some(Expectation::Insert { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Update { respond_to, .. }, Some(Expectation::Update { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => reject(request, &failures),
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    pub fn expect_fetch_all(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::FetchAll { response })
    }

    pub fn expect_fetch_by_id(&self, id: RecordId) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::FetchById { id, response })
    }

    pub fn expect_insert(&self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Insert { response })
    }

    pub fn expect_update(&self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Update { response })
    }

    pub fn expect_delete(&self, id: RecordId) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Verifies that every expectation was consumed and nothing unexpected arrived.
    pub fn verify(&self) {
        let unexpected = self.unexpected.lock().unwrap();
        if !unexpected.is_empty() {
            panic!("Unexpected store requests: {:?}", *unexpected);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<R>(
        &self,
        make: impl FnOnce(Result<R, StoreError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }
}

impl<T: Record> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Record an unscripted request for [`MockStore::verify`], then answer it with an error.
///
/// The record is written before the reply, so a caller that has seen the error can
/// verify immediately.
fn reject<T: Record>(request: StoreRequest<T>, failures: &Mutex<Vec<String>>) {
    let note = |description: String| failures.lock().unwrap().push(description);
    match request {
        StoreRequest::FetchAll { respond_to } => {
            note("fetch_all".into());
            let _ = respond_to.send(unexpected());
        }
        StoreRequest::FetchById { id, respond_to } => {
            note(format!("fetch_by_id({id})"));
            let _ = respond_to.send(unexpected());
        }
        StoreRequest::Insert { record, respond_to } => {
            note(format!("insert({record:?})"));
            let _ = respond_to.send(unexpected());
        }
        StoreRequest::Update { record, respond_to } => {
            note(format!("update({record:?})"));
            let _ = respond_to.send(unexpected());
        }
        StoreRequest::Delete { id, respond_to } => {
            note(format!("delete({id})"));
            let _ = respond_to.send(unexpected());
        }
    }
}

fn unexpected<R>() -> Result<R, StoreError> {
    Err(StoreError::Backend("unexpected request".into()))
}

/// Sets the response of one expected request.
pub struct ExpectationBuilder<T: Record, R> {
    expectations: Expectations<T>,
    make: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation<T>>,
}

impl<T: Record, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.respond(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.respond(Err(error));
    }

    fn respond(self, response: Result<R, StoreError>) {
        let expectation = (self.make)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// MANUAL HELPERS
// =============================================================================

/// Creates a store client and the receiver its requests arrive on.
///
/// # Testing Strategy
/// The test plays the part of the store: it pulls each request off `receiver`,
/// inspects it, and answers through its `respond_to` channel.
pub fn create_mock_store<T: Record>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Next request sent to a client from [`create_mock_store`].
pub async fn next_request<T: Record>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<StoreRequest<T>> {
    receiver.recv().await
}
