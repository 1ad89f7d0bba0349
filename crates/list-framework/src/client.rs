//! # Store Client
//!
//! This module defines the cloneable handle the rest of the application uses to talk to
//! a `StoreActor`.

use crate::entity::ResourceItem;
use crate::error::StoreError;
use crate::message::{FetchOutcome, StoreRequest};
use crate::state::StoreState;
use tokio::sync::{mpsc, oneshot, watch};

/// A type-safe client for interacting with a `StoreActor`.
///
/// ## StoreClient
///
/// Forwards fetch and mutation requests over a Tokio mpsc channel and returns results via
/// oneshot channels. Every method resolves only after the actor has reconciled its list,
/// so reading [`StoreClient::state`] right after an awaited call observes its effect.
///
/// * **Cloneable** – holds only a sender and a watch receiver.
/// * **Observable** – [`StoreClient::subscribe`] yields every published [`StoreState`].
#[derive(Clone)]
pub struct StoreClient<T: ResourceItem> {
    sender: mpsc::Sender<StoreRequest<T>>,
    state: watch::Receiver<StoreState<T>>,
}

impl<T: ResourceItem> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>, state: watch::Receiver<StoreState<T>>) -> Self {
        Self { sender, state }
    }

    /// Replaces the list with the endpoint's answer to `query`, unless a newer fetch
    /// is issued before this one resolves.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, query: T::Query) -> Result<FetchOutcome, StoreError> {
        self.begin_fetch(query).await?.outcome().await
    }

    /// Hands the fetch to the actor and returns as soon as it has been queued.
    ///
    /// Queuing order is issue order, so a caller that fires several fetches without
    /// waiting for them still gets "latest issued wins".
    pub async fn begin_fetch(&self, query: T::Query) -> Result<PendingFetch, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Fetch { query, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        Ok(PendingFetch { response })
    }

    /// Creates an item remotely and prepends the canonical copy to the list.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn create(&self, payload: T::Create) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Create {
                payload,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn update(&self, id: T::Id, patch: T::Update) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update {
                id,
                patch,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { id, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Current snapshot of the store.
    pub fn state(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    /// A receiver that is notified every time the store publishes a new state.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.clone()
    }
}

/// A fetch that has been queued on the store but not yet answered.
#[derive(Debug)]
pub struct PendingFetch {
    response: oneshot::Receiver<Result<FetchOutcome, StoreError>>,
}

impl PendingFetch {
    pub async fn outcome(self) -> Result<FetchOutcome, StoreError> {
        self.response.await.map_err(|_| StoreError::StoreDropped)?
    }
}
