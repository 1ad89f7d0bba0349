//! # Backend Messages
//!
//! Requests processed by a [`CollectionActor`](super::CollectionActor), one variant per
//! operation of the remote collection. Each carries the oneshot sender its answer goes to.

use super::entity::CatalogEntity;
use super::error::BackendError;
use crate::query::CollectionQuery;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the backend.
pub type Response<T> = oneshot::Sender<Result<T, BackendError>>;

#[derive(Debug)]
pub enum BackendRequest<T: CatalogEntity> {
    List {
        query: CollectionQuery,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
