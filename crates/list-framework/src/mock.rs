//! # Mock Endpoint & Testing Guide
//!
//! Stores are only interesting when the network misbehaves: slow responses, failures and
//! responses arriving in the wrong order. This module provides two in-memory endpoints that
//! make those situations deterministic.
//!
//! | Feature | `MockEndpoint` (fluent) | `create_mock_endpoint` (manual) |
//! |---------|-------------------------|----------------------------------|
//! | **Responses** | Scripted up front | Sent by the test, one by one |
//! | **Ordering control** | Per-response delay | Total: answer in any order |
//! | **Use Case** | Happy paths, error injection | Out-of-order and race tests |
//!
//! ## Pattern 1: Scripted responses
//!
//! ```rust,ignore
//! let mut mock = MockEndpoint::<Brand>::new();
//! mock.expect_list().return_ok(vec![nike.clone()]);
//! mock.expect_delete(nike.id).return_err(EndpointError::Timeout);
//!
//! let (actor, client) = StoreActor::new(8);
//! tokio::spawn(actor.run(mock.endpoint()));
//! // ... drive the client ...
//! mock.verify();
//! ```
//!
//! ## Pattern 2: Manual responders
//!
//! ```rust,ignore
//! let (endpoint, mut requests) = create_mock_endpoint::<Brand>(8);
//! tokio::spawn(actor.run(endpoint));
//!
//! let first = tokio::spawn({ let c = client.clone(); async move { c.fetch(q1).await } });
//! let (_, answer_first) = expect_list(&mut requests).await.unwrap();
//! // ... issue a second fetch, answer it, then answer the first one late ...
//! ```

use crate::endpoint::CollectionEndpoint;
use crate::entity::ResourceItem;
use crate::error::EndpointError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Type alias for the one-shot channel a test answers a request through.
pub type Responder<R> = oneshot::Sender<Result<R, EndpointError>>;

/// A request received by a mock endpoint.
#[derive(Debug)]
pub enum EndpointRequest<T: ResourceItem> {
    List {
        query: T::Query,
        respond_to: Responder<Vec<T>>,
    },
    Create {
        payload: T::Create,
        respond_to: Responder<T>,
    },
    Update {
        id: T::Id,
        patch: T::Update,
        respond_to: Responder<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Responder<()>,
    },
}

/// A [`CollectionEndpoint`] that forwards every call to a channel the test reads from.
pub struct ChannelEndpoint<T: ResourceItem> {
    sender: mpsc::Sender<EndpointRequest<T>>,
}

impl<T: ResourceItem> Clone for ChannelEndpoint<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ResourceItem> ChannelEndpoint<T> {
    async fn call<R>(
        &self,
        request: impl FnOnce(Responder<R>) -> EndpointRequest<T>,
    ) -> Result<R, EndpointError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| EndpointError::Transport("mock endpoint closed".into()))?;
        response
            .await
            .map_err(|_| EndpointError::Transport("mock responder dropped".into()))?
    }
}

#[async_trait]
impl<T: ResourceItem> CollectionEndpoint<T> for ChannelEndpoint<T>
where
    T::Query: Clone,
{
    async fn list(&self, query: &T::Query) -> Result<Vec<T>, EndpointError> {
        let query = query.clone();
        self.call(|respond_to| EndpointRequest::List { query, respond_to })
            .await
    }

    async fn create(&self, payload: T::Create) -> Result<T, EndpointError> {
        self.call(|respond_to| EndpointRequest::Create {
            payload,
            respond_to,
        })
        .await
    }

    async fn update(&self, id: &T::Id, patch: T::Update) -> Result<T, EndpointError> {
        let id = id.clone();
        self.call(|respond_to| EndpointRequest::Update {
            id,
            patch,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: &T::Id) -> Result<(), EndpointError> {
        let id = id.clone();
        self.call(|respond_to| EndpointRequest::Delete { id, respond_to })
            .await
    }
}

// =============================================================================
// MANUAL RESPONDERS
// =============================================================================

/// Creates a channel endpoint and the receiver the test answers requests from.
pub fn create_mock_endpoint<T: ResourceItem>(
    buffer_size: usize,
) -> (ChannelEndpoint<T>, mpsc::Receiver<EndpointRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelEndpoint { sender }, receiver)
}

/// Helper to verify that the next request is a List
pub async fn expect_list<T: ResourceItem>(
    receiver: &mut mpsc::Receiver<EndpointRequest<T>>,
) -> Option<(T::Query, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(EndpointRequest::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next request is a Create
pub async fn expect_create<T: ResourceItem>(
    receiver: &mut mpsc::Receiver<EndpointRequest<T>>,
) -> Option<(T::Create, Responder<T>)> {
    match receiver.recv().await {
        Some(EndpointRequest::Create {
            payload,
            respond_to,
        }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next request is an Update
pub async fn expect_update<T: ResourceItem>(
    receiver: &mut mpsc::Receiver<EndpointRequest<T>>,
) -> Option<(T::Id, T::Update, Responder<T>)> {
    match receiver.recv().await {
        Some(EndpointRequest::Update {
            id,
            patch,
            respond_to,
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next request is a Delete
pub async fn expect_delete<T: ResourceItem>(
    receiver: &mut mpsc::Receiver<EndpointRequest<T>>,
) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(EndpointRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: ResourceItem> {
    List {
        response: Result<Vec<T>, EndpointError>,
    },
    Create {
        response: Result<T, EndpointError>,
    },
    Update {
        id: T::Id,
        response: Result<T, EndpointError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), EndpointError>,
    },
}

struct Scripted<T: ResourceItem> {
    expectation: Expectation<T>,
    delay: Duration,
}

struct Script<T: ResourceItem> {
    pending: VecDeque<Scripted<T>>,
    mismatches: Vec<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock endpoint answering requests from an ordered script.
///
/// Requests are matched against expectations in order. A request that does not match the
/// next expectation is answered with a transport error and reported by [`MockEndpoint::verify`].
pub struct MockEndpoint<T: ResourceItem> {
    endpoint: ChannelEndpoint<T>,
    script: Arc<Mutex<Script<T>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceItem> Default for MockEndpoint<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceItem> MockEndpoint<T> {
    /// Creates a new mock endpoint with no expectations.
    pub fn new() -> Self {
        let (endpoint, mut receiver) = create_mock_endpoint::<T>(100);
        let script = Arc::new(Mutex::new(Script {
            pending: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let script_clone = Arc::clone(&script);

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = lock(&script_clone).pending.pop_front();
                let delay = next.as_ref().map(|s| s.delay).unwrap_or_default();
                let answer: Box<dyn FnOnce() + Send> = match (request, next.map(|s| s.expectation)) {
                    (EndpointRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
                        Box::new(move || {
                            let _ = respond_to.send(response);
                        })
                    }
                    (EndpointRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        Box::new(move || {
                            let _ = respond_to.send(response);
                        })
                    }
                    (
                        EndpointRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => Box::new(move || {
                        let _ = respond_to.send(response);
                    }),
                    (
                        EndpointRequest::Delete { id, respond_to },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => Box::new(move || {
                        let _ = respond_to.send(response);
                    }),
                    (request, _) => {
                        lock(&script_clone)
                            .mismatches
                            .push(format!("unexpected request: {}", describe(&request)));
                        reject(request);
                        continue;
                    }
                };
                tokio::spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    answer();
                });
            }
        });

        Self {
            endpoint,
            script,
            _handle: handle,
        }
    }

    /// Returns the endpoint to hand to `StoreActor::run`.
    pub fn endpoint(&self) -> ChannelEndpoint<T> {
        self.endpoint.clone()
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(&self.script, |response| Expectation::List { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(&self.script, |response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(&self.script, move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(&self.script, move |response| Expectation::Delete { id, response })
    }

    /// Verifies that all expectations were met and no unexpected request arrived.
    pub fn verify(&self) {
        let script = lock(&self.script);
        if !script.mismatches.is_empty() {
            panic!("Mock endpoint mismatches: {:?}", script.mismatches);
        }
        if !script.pending.is_empty() {
            panic!("Not all expectations were met. {} remaining", script.pending.len());
        }
    }
}

fn describe<T: ResourceItem>(request: &EndpointRequest<T>) -> String {
    match request {
        EndpointRequest::List { query, .. } => format!("List {query:?}"),
        EndpointRequest::Create { payload, .. } => format!("Create {payload:?}"),
        EndpointRequest::Update { id, patch, .. } => format!("Update {id} {patch:?}"),
        EndpointRequest::Delete { id, .. } => format!("Delete {id}"),
    }
}

fn reject<T: ResourceItem>(request: EndpointRequest<T>) {
    let error = || EndpointError::Transport("unexpected request".into());
    match request {
        EndpointRequest::List { respond_to, .. } => {
            let _ = respond_to.send(Err(error()));
        }
        EndpointRequest::Create { respond_to, .. } => {
            let _ = respond_to.send(Err(error()));
        }
        EndpointRequest::Update { respond_to, .. } => {
            let _ = respond_to.send(Err(error()));
        }
        EndpointRequest::Delete { respond_to, .. } => {
            let _ = respond_to.send(Err(error()));
        }
    }
}

/// Builder for one scripted response.
pub struct ExpectationBuilder<T: ResourceItem, R> {
    script: Arc<Mutex<Script<T>>>,
    make: Box<dyn FnOnce(Result<R, EndpointError>) -> Expectation<T> + Send>,
    delay: Duration,
}

impl<T: ResourceItem, R> ExpectationBuilder<T, R> {
    fn new(
        script: &Arc<Mutex<Script<T>>>,
        make: impl FnOnce(Result<R, EndpointError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            script: Arc::clone(script),
            make: Box::new(make),
            delay: Duration::ZERO,
        }
    }

    /// Holds the response back for `delay` after the request arrives.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: EndpointError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, EndpointError>) {
        let expectation = (self.make)(response);
        lock(&self.script).pending.push_back(Scripted {
            expectation,
            delay: self.delay,
        });
    }
}
