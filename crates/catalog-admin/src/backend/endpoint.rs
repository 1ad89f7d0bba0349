//! The [`CollectionEndpoint`] a store talks to.
//!
//! Wraps a [`BackendClient`] with a simulated network: every call waits `latency` before
//! reaching the actor, and queued faults make the next calls fail without reaching it.

use super::client::BackendClient;
use super::entity::CatalogEntity;
use crate::query::CollectionQuery;
use async_trait::async_trait;
use list_framework::{CollectionEndpoint, EndpointError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

pub struct BackendEndpoint<T: CatalogEntity> {
    client: BackendClient<T>,
    latency: Duration,
    faults: Arc<Mutex<VecDeque<EndpointError>>>,
}

impl<T: CatalogEntity> Clone for BackendEndpoint<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            latency: self.latency,
            faults: Arc::clone(&self.faults),
        }
    }
}

impl<T: CatalogEntity> BackendEndpoint<T> {
    pub fn new(client: BackendClient<T>, latency: Duration) -> Self {
        Self {
            client,
            latency,
            faults: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn client(&self) -> &BackendClient<T> {
        &self.client
    }

    /// Makes the next call through this endpoint (or any clone of it) fail with `error`.
    /// Faults queue up and are consumed one per call.
    pub fn fail_next(&self, error: EndpointError) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
    }

    async fn round_trip(&self) -> Result<(), EndpointError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let fault = self
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match fault {
            Some(error) => {
                debug!(%error, "Injected fault");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<T: CatalogEntity> CollectionEndpoint<T> for BackendEndpoint<T> {
    async fn list(&self, query: &CollectionQuery) -> Result<Vec<T>, EndpointError> {
        self.round_trip().await?;
        Ok(self.client.list(query.clone()).await?)
    }

    async fn create(&self, payload: T::Create) -> Result<T, EndpointError> {
        self.round_trip().await?;
        Ok(self.client.create(payload).await?)
    }

    async fn update(&self, id: &T::Id, patch: T::Update) -> Result<T, EndpointError> {
        self.round_trip().await?;
        Ok(self.client.update(id.clone(), patch).await?)
    }

    async fn delete(&self, id: &T::Id) -> Result<(), EndpointError> {
        self.round_trip().await?;
        Ok(self.client.delete(id.clone()).await?)
    }
}
