//! # Resource Store Actor
//!
//! This module defines the `StoreActor`, the single owner of one resource list. It is the
//! "Server" side of the store: it processes client requests and network completions
//! sequentially, so `items`, `loading` and `error` are never mutated concurrently.

use crate::client::StoreClient;
use crate::endpoint::CollectionEndpoint;
use crate::entity::ResourceItem;
use crate::error::{EndpointError, StoreError};
use crate::message::{Completion, FetchOutcome, StoreRequest};
use crate::state::StoreState;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

const PANICKED: &str = "endpoint task panicked";

/// The generic actor that owns the canonical copy of a resource list.
///
/// # Architecture Note
/// The actor never awaits the network inside its loop. Every endpoint call runs in its
/// own task and posts a [`Completion`] back, so a slow `create` never delays a `fetch`
/// and vice versa. Reconciliation still happens one message at a time.
///
/// **Out-of-order protection**: every `Fetch` takes the next value of a per-store
/// sequence counter. A fetch response is applied only if its sequence is still the
/// latest issued; older responses (successful or failed) are dropped and the caller
/// is told [`FetchOutcome::Superseded`].
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `StoreActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass the collection endpoint into `actor.run(endpoint)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust,ignore
/// let (actor, client) = StoreActor::<Brand>::new(32);
/// tokio::spawn(actor.run(brand_endpoint));
///
/// client.fetch(query).await?;
/// let rows = client.state().items;
/// ```
pub struct StoreActor<T: ResourceItem> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    completions_tx: mpsc::UnboundedSender<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    publisher: watch::Sender<StoreState<T>>,
    state: StoreState<T>,
    latest_fetch: u64,
    in_flight: usize,
    resource: &'static str,
}

impl<T: ResourceItem> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the request channel. If the channel is full,
    ///   calls on the client wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (publisher, state_rx) = watch::channel(StoreState::default());
        // "Brand" instead of "catalog_admin::model::brand::Brand"
        let resource = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let actor = Self {
            receiver,
            completions_tx,
            completions,
            publisher,
            state: StoreState::default(),
            latest_fetch: 0,
            in_flight: 0,
            resource,
        };
        (actor, StoreClient::new(sender, state_rx))
    }

    /// Runs the actor's event loop until every client is dropped and every in-flight
    /// endpoint call has completed.
    ///
    /// # Endpoint Injection
    /// The endpoint is supplied here rather than to `new()`, so clients can be handed out
    /// before the transport they will eventually talk to exists.
    pub async fn run<E: CollectionEndpoint<T>>(mut self, endpoint: E) {
        let endpoint = Arc::new(endpoint);
        let resource = self.resource;
        info!(resource, "Store started");

        let mut accepting = true;
        loop {
            if !accepting && self.in_flight == 0 {
                break;
            }
            tokio::select! {
                msg = self.receiver.recv(), if accepting => match msg {
                    Some(request) => self.handle_request(&endpoint, request),
                    None => {
                        debug!(resource, in_flight = self.in_flight, "Clients gone, draining");
                        accepting = false;
                    }
                },
                Some(done) = self.completions.recv() => self.handle_completion(done),
                else => break,
            }
        }

        info!(resource, size = self.state.items.len(), "Shutdown");
    }

    fn handle_request<E: CollectionEndpoint<T>>(&mut self, endpoint: &Arc<E>, request: StoreRequest<T>) {
        let resource = self.resource;
        match request {
            StoreRequest::Fetch { query, respond_to } => {
                self.latest_fetch += 1;
                let seq = self.latest_fetch;
                debug!(resource, seq, ?query, "Fetch");
                self.state.loading = true;
                self.state.error = None;
                self.publish();

                let endpoint = Arc::clone(endpoint);
                self.dispatch(
                    "Fetch",
                    async move { endpoint.list(&query).await },
                    move |result| Completion::Fetched {
                        seq,
                        result,
                        respond_to,
                    },
                );
            }
            StoreRequest::Create {
                payload,
                respond_to,
            } => {
                debug!(resource, ?payload, "Create");
                let endpoint = Arc::clone(endpoint);
                self.dispatch(
                    "Create",
                    async move { endpoint.create(payload).await },
                    move |result| Completion::Created { result, respond_to },
                );
            }
            StoreRequest::Update {
                id,
                patch,
                respond_to,
            } => {
                debug!(resource, %id, ?patch, "Update");
                let endpoint = Arc::clone(endpoint);
                let target = id.clone();
                self.dispatch(
                    "Update",
                    async move { endpoint.update(&target, patch).await },
                    move |result| Completion::Updated {
                        id,
                        result,
                        respond_to,
                    },
                );
            }
            StoreRequest::Delete { id, respond_to } => {
                debug!(resource, %id, "Delete");
                let endpoint = Arc::clone(endpoint);
                let target = id.clone();
                self.dispatch(
                    "Delete",
                    async move { endpoint.delete(&target).await },
                    move |result| Completion::Deleted {
                        id,
                        result,
                        respond_to,
                    },
                );
            }
        }
    }

    fn handle_completion(&mut self, done: Completion<T>) {
        self.in_flight -= 1;
        let resource = self.resource;
        match done {
            Completion::Fetched {
                seq,
                result,
                respond_to,
            } => {
                if seq != self.latest_fetch {
                    warn!(resource, seq, latest = self.latest_fetch, ok = result.is_ok(), "Superseded fetch discarded");
                    let _ = respond_to.send(Ok(FetchOutcome::Superseded));
                    return;
                }
                self.state.loading = false;
                match result {
                    Ok(items) => {
                        let duplicates = self.state.replace_all(items);
                        if duplicates > 0 {
                            warn!(resource, seq, duplicates, "Fetch returned repeated ids, kept first");
                        }
                        let count = self.state.items.len();
                        info!(resource, seq, count, "Fetched");
                        self.publish();
                        let _ = respond_to.send(Ok(FetchOutcome::Applied { count }));
                    }
                    Err(e) => {
                        let _ = respond_to.send(Err(self.fail("Fetch", e)));
                    }
                }
            }
            Completion::Created { result, respond_to } => match result {
                Ok(item) => {
                    let id = item.id().clone();
                    self.state.prepend(item.clone());
                    info!(resource, %id, size = self.state.items.len(), "Created");
                    self.publish();
                    let _ = respond_to.send(Ok(item));
                }
                Err(e) => {
                    let _ = respond_to.send(Err(self.fail("Create", e)));
                }
            },
            Completion::Updated {
                id,
                result,
                respond_to,
            } => match result {
                Ok(item) => {
                    if self.state.replace(item.clone()) {
                        info!(resource, %id, "Updated");
                        self.publish();
                    } else {
                        debug!(resource, %id, "Updated item not listed, list unchanged");
                    }
                    let _ = respond_to.send(Ok(item));
                }
                Err(e) => {
                    let _ = respond_to.send(Err(self.fail("Update", e)));
                }
            },
            Completion::Deleted {
                id,
                result,
                respond_to,
            } => match result {
                // Delete is idempotent: an id the server no longer knows is already gone.
                Ok(()) | Err(EndpointError::NotFound(_)) => {
                    if self.state.remove(&id) {
                        info!(resource, %id, size = self.state.items.len(), "Deleted");
                        self.publish();
                    } else {
                        debug!(resource, %id, "Deleted item not listed, list unchanged");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                Err(e) => {
                    let _ = respond_to.send(Err(self.fail("Delete", e)));
                }
            },
        }
    }

    /// Records a failure in the observable state and converts it for the caller.
    fn fail(&mut self, operation: &'static str, e: EndpointError) -> StoreError {
        warn!(resource = self.resource, operation, error = %e, "Endpoint call failed");
        self.state.error = Some(e.to_string());
        self.publish();
        StoreError::Endpoint(e)
    }

    /// Runs `call` in its own task and posts `complete(result)` back to the actor.
    ///
    /// The call is awaited through its `JoinHandle`, so a panicking endpoint still
    /// produces a completion: the caller gets a transport error and `loading` is reset.
    fn dispatch<R, F, C>(&mut self, operation: &'static str, call: F, complete: C)
    where
        R: Send + 'static,
        F: Future<Output = Result<R, EndpointError>> + Send + 'static,
        C: FnOnce(Result<R, EndpointError>) -> Completion<T> + Send + 'static,
    {
        self.in_flight += 1;
        let resource = self.resource;
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::spawn(call).await {
                Ok(result) => result,
                Err(e) => {
                    error!(resource, operation, error = %e, "Endpoint task panicked");
                    Err(EndpointError::Transport(PANICKED.into()))
                }
            };
            let _ = completions.send(complete(result));
        });
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}
