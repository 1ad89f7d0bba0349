//! # Backend Client
//!
//! Typed request API of a [`CollectionActor`](super::CollectionActor).

use super::entity::CatalogEntity;
use super::error::BackendError;
use super::message::BackendRequest;
use crate::query::CollectionQuery;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `CollectionActor`.
///
/// Cheap to clone: it holds only the request sender. The actor stops once every clone
/// has been dropped.
pub struct BackendClient<T: CatalogEntity> {
    sender: mpsc::Sender<BackendRequest<T>>,
}

impl<T: CatalogEntity> Clone for BackendClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: CatalogEntity> BackendClient<T> {
    pub fn new(sender: mpsc::Sender<BackendRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<R, BackendError>>) -> BackendRequest<T>,
    ) -> Result<R, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| BackendError::ActorClosed)?;
        response.await.map_err(|_| BackendError::ActorDropped)?
    }

    pub async fn list(&self, query: CollectionQuery) -> Result<Vec<T>, BackendError> {
        self.request(|respond_to| BackendRequest::List { query, respond_to })
            .await
    }

    /// Reads one record directly. Stores never call this; it lets tests inspect the backend.
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, BackendError> {
        self.request(|respond_to| BackendRequest::Get { id, respond_to })
            .await
    }

    pub async fn create(&self, params: T::Create) -> Result<T, BackendError> {
        self.request(|respond_to| BackendRequest::Create { params, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, BackendError> {
        self.request(|respond_to| BackendRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), BackendError> {
        self.request(|respond_to| BackendRequest::Delete { id, respond_to })
            .await
    }
}
