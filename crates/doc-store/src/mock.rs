//! # Mock Collections
//!
//! `MockClient<T>` hands out a real [`CollectionClient<T>`] whose requests are answered
//! from a queue of scripted expectations instead of a running actor. Use it to test
//! code that sits *around* a collection: validation short-circuits, optimistic updates
//! and their rollback, error mapping.
//!
//! | | MockClient | CollectionActor |
//! |---|---|---|
//! | State | scripted replies | real documents |
//! | Failure injection | `return_err` | needs crafted data |
//! | Use case | logic around the client | the collection itself, full flows |
//!
//! ```rust
//! use doc_store::mock::MockClient;
//! use doc_store::{Document, StoreError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Item { id: u32 }
//! #[derive(Debug)] struct ItemCreate;
//! #[derive(Debug, thiserror::Error)] #[error("item")] struct ItemError;
//!
//! #[async_trait]
//! impl Document for Item {
//!     type Id = u32; type Create = ItemCreate; type Patch = (); type Query = ();
//!     type Action = (); type ActionResult = (); type Context = (); type Error = ItemError;
//!     fn from_create_params(id: u32, _: ItemCreate) -> Result<Self, ItemError> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), ItemError> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), ItemError> { Ok(()) }
//!     fn select(docs: Vec<&Self>, _: &()) -> Vec<Self> { docs.into_iter().cloned().collect() }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Item>::new();
//!     mock.expect_get(1).return_err(StoreError::ChannelClosed);
//!
//!     let result = mock.client().get(1).await;
//!     assert!(matches!(result, Err(StoreError::ChannelClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! The lower-level [`create_mock_client`] returns the raw request receiver instead, for
//! tests that need to observe state *while* a request is still in flight.

use crate::client::CollectionClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: Document> {
    Create(Result<T::Id, StoreError>),
    Insert(T::Id, Result<T, StoreError>),
    Get(T::Id, Result<Option<T>, StoreError>),
    Query(Result<Vec<T>, StoreError>),
    Update(T::Id, Result<T, StoreError>),
    Delete(T::Id, Result<(), StoreError>),
    Action(T::Id, Result<T::ActionResult, StoreError>),
}

impl<T: Document> Expectation<T> {
    fn op(&self) -> &'static str {
        match self {
            Expectation::Create(_) => "create",
            Expectation::Insert(..) => "insert",
            Expectation::Get(..) => "get",
            Expectation::Query(_) => "query",
            Expectation::Update(..) => "update",
            Expectation::Delete(..) => "delete",
            Expectation::Action(..) => "action",
        }
    }
}

struct MockState<T: Document> {
    expectations: VecDeque<Expectation<T>>,
    failures: Vec<String>,
    requests: usize,
}

type Shared<T> = Arc<Mutex<MockState<T>>>;

/// A scripted collection for tests.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation (wrong operation or wrong key) is recorded as a failure and its reply
/// channel is dropped, so the caller sees [`StoreError::ResponseDropped`];
/// [`MockClient::verify`] then panics with the recorded failures.
pub struct MockClient<T: Document> {
    client: CollectionClient<T>,
    state: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Document> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn reply<R>(respond_to: oneshot::Sender<Result<R, StoreError>>, response: Result<R, StoreError>) {
    let _ = respond_to.send(response);
}

fn check_id<I: PartialEq + std::fmt::Debug>(
    failures: &mut Vec<String>,
    op: &str,
    expected: &I,
    got: &I,
) -> bool {
    if expected == got {
        true
    } else {
        failures.push(format!("{op}: expected id {expected:?}, got {got:?}"));
        false
    }
}

impl<T: Document> MockClient<T> {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest<T>>(100);
        let state: Shared<T> = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            failures: Vec::new(),
            requests: 0,
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut guard = task_state.lock().unwrap();
                guard.requests += 1;
                let expectation = guard.expectations.pop_front();
                let failures = &mut guard.failures;

                match (request, expectation) {
                    (
                        CollectionRequest::Create { respond_to, .. },
                        Some(Expectation::Create(r)),
                    ) => reply(respond_to, r),
                    (
                        CollectionRequest::Insert { id, respond_to, .. },
                        Some(Expectation::Insert(expected, r)),
                    ) => {
                        if check_id(failures, "insert", &expected, &id) {
                            reply(respond_to, r)
                        }
                    }
                    (
                        CollectionRequest::Get { id, respond_to },
                        Some(Expectation::Get(expected, r)),
                    ) => {
                        if check_id(failures, "get", &expected, &id) {
                            reply(respond_to, r)
                        }
                    }
                    (CollectionRequest::Query { respond_to, .. }, Some(Expectation::Query(r))) => {
                        reply(respond_to, r)
                    }
                    (
                        CollectionRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update(expected, r)),
                    ) => {
                        if check_id(failures, "update", &expected, &id) {
                            reply(respond_to, r)
                        }
                    }
                    (
                        CollectionRequest::Delete { id, respond_to },
                        Some(Expectation::Delete(expected, r)),
                    ) => {
                        if check_id(failures, "delete", &expected, &id) {
                            reply(respond_to, r)
                        }
                    }
                    (
                        CollectionRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action(expected, r)),
                    ) => {
                        if check_id(failures, "action", &expected, &id) {
                            reply(respond_to, r)
                        }
                    }
                    (request, Some(expectation)) => failures.push(format!(
                        "expected {} request, got {}",
                        expectation.op(),
                        request.op()
                    )),
                    (request, None) => {
                        failures.push(format!("unexpected {} request", request.op()))
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> CollectionClient<T> {
        self.client.clone()
    }

    /// Number of requests the mock has received so far.
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, StoreError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            state: self.state.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_insert(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |r| Expectation::Insert(id, r))
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |r| Expectation::Get(id, r))
    }

    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Query)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |r| Expectation::Update(id, r))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |r| Expectation::Delete(id, r))
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |r| Expectation::Action(id, r))
    }

    /// Panics unless every expectation was consumed and no request misbehaved.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.failures.is_empty() {
            panic!("Mock collection failures: {}", state.failures.join("; "));
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Scripts the reply to one expected request.
pub struct ExpectationBuilder<T: Document, R> {
    state: Shared<T>,
    wrap: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation<T> + Send>,
}

impl<T: Document, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.wrap)(response);
        self.state.lock().unwrap().expectations.push_back(expectation);
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client plus the receiving end of its request channel.
///
/// The test plays the collection: it pulls requests with the `next_*` helpers and
/// answers them whenever it likes, which makes in-flight state observable.
pub fn create_mock_client<T: Document>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Pulls the next request if it is a Create.
pub async fn next_create<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, StoreError>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Pulls the next request if it is a Query.
pub async fn next_query<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Query, oneshot::Sender<Result<Vec<T>, StoreError>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Query { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Pulls the next request if it is an Action.
pub async fn next_action<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, StoreError>>,
)> {
    match receiver.recv().await {
        Some(CollectionRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Card {
        id: u32,
        label: String,
    }

    #[derive(Debug)]
    struct CardCreate {
        label: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("card error")]
    struct CardError;

    #[async_trait]
    impl Document for Card {
        type Id = u32;
        type Create = CardCreate;
        type Patch = ();
        type Query = ();
        type Action = bool;
        type ActionResult = bool;
        type Context = ();
        type Error = CardError;

        fn from_create_params(id: u32, params: CardCreate) -> Result<Self, CardError> {
            Ok(Self {
                id,
                label: params.label,
            })
        }

        async fn on_update(&mut self, _: (), _: &()) -> Result<(), CardError> {
            Ok(())
        }

        async fn handle_action(&mut self, flag: bool, _: &()) -> Result<bool, CardError> {
            Ok(flag)
        }

        fn select(docs: Vec<&Self>, _: &()) -> Vec<Self> {
            docs.into_iter().cloned().collect()
        }
    }

    #[tokio::test]
    async fn test_raw_channel_create() {
        let (client, mut receiver) = create_mock_client::<Card>(10);

        let task = tokio::spawn(async move {
            client
                .create(CardCreate {
                    label: "first".to_string(),
                })
                .await
        });

        let (params, responder) = next_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(params.label, "first");
        responder.send(Ok(7)).unwrap();

        assert!(matches!(task.await.unwrap(), Ok(7)));
    }

    #[tokio::test]
    async fn test_expectations_in_order() {
        let mut mock = MockClient::<Card>::new();
        mock.expect_create().return_ok(1);
        mock.expect_get(1).return_ok(Some(Card {
            id: 1,
            label: "first".to_string(),
        }));
        mock.expect_action(1).return_err(StoreError::ChannelClosed);

        let client = mock.client();
        let id = client
            .create(CardCreate {
                label: "first".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(client.get(1).await.unwrap().unwrap().label, "first");
        assert!(matches!(
            client.perform_action(1, true).await,
            Err(StoreError::ChannelClosed)
        ));

        assert_eq!(mock.request_count(), 3);
        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_is_reported() {
        let mock = MockClient::<Card>::new();
        let result = mock.client().delete(3).await;
        assert!(matches!(result, Err(StoreError::ResponseDropped)));
        assert_eq!(mock.request_count(), 1);

        let verdict = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verdict.is_err());
    }

    #[tokio::test]
    async fn test_wrong_id_is_reported() {
        let mut mock = MockClient::<Card>::new();
        mock.expect_delete(1).return_ok(());

        let result = mock.client().delete(2).await;
        assert!(matches!(result, Err(StoreError::ResponseDropped)));

        let verdict = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verdict.is_err());
    }
}
