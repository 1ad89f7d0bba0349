//! # Store Messages
//!
//! This module defines the message types exchanged between the `StoreClient` and the
//! `StoreActor`, plus the completion messages the actor's own network tasks post back
//! to it.

use crate::entity::ResourceItem;
use crate::error::{EndpointError, StoreError};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// What happened to a fetch once its response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response belonged to the latest fetch and replaced the list.
    Applied { count: usize },
    /// A newer fetch was issued before this one resolved; the response was dropped.
    Superseded,
}

/// Request sent to the store actor.
///
/// # The CRUD Pattern
/// The variants map onto the operations of a remote collection:
///
/// - **Fetch**: Replaces the list with the endpoint's answer to a query.
/// - **Create**: Prepends the canonical item returned by the endpoint.
/// - **Update**: Replaces the item with the matching id, if still listed.
/// - **Delete**: Removes the item with the matching id, if still listed.
#[derive(Debug)]
pub enum StoreRequest<T: ResourceItem> {
    Fetch {
        query: T::Query,
        respond_to: Response<FetchOutcome>,
    },
    Create {
        payload: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        patch: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

/// Result of an endpoint call, posted back to the actor by the task that awaited it.
///
/// The responder travels with the completion so the caller is answered only after the
/// actor has reconciled its state.
#[derive(Debug)]
pub(crate) enum Completion<T: ResourceItem> {
    Fetched {
        seq: u64,
        result: Result<Vec<T>, EndpointError>,
        respond_to: Response<FetchOutcome>,
    },
    Created {
        result: Result<T, EndpointError>,
        respond_to: Response<T>,
    },
    Updated {
        id: T::Id,
        result: Result<T, EndpointError>,
        respond_to: Response<T>,
    },
    Deleted {
        id: T::Id,
        result: Result<(), EndpointError>,
        respond_to: Response<()>,
    },
}
