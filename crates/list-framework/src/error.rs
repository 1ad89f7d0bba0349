//! # Framework Errors
//!
//! This module defines the error types shared by the store, its client and every
//! collection endpoint. Centralizing them keeps the message a user sees in the list's
//! error banner identical to the one the caller receives from the rejected call.

/// Failures reported by a remote collection endpoint.
///
/// Every variant is transient from the store's point of view: it is surfaced to the
/// user and never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("timeout")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors returned by [`StoreClient`](crate::StoreClient) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The endpoint call failed. The same message is recorded in `StoreState::error`.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
}
