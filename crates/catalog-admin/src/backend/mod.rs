//! # In-Memory Collection Backend
//!
//! Stands in for the remote API behind the dashboard. Each resource type gets its own
//! [`CollectionActor`] that owns the records and answers list/get/create/update/delete
//! requests sequentially.
//!
//! ## Structure
//!
//! - [`entity`] - [`CatalogEntity`], the contract a model implements to be stored here
//! - [`error`] - [`BackendError`] and its mapping onto `EndpointError`
//! - [`message`] - [`BackendRequest`], the messages the actor processes
//! - [`actor`] - [`CollectionActor`], the server side
//! - [`client`] - [`BackendClient`], the typed request API
//! - [`endpoint`] - [`BackendEndpoint`], the `CollectionEndpoint` a store talks to, with
//!   simulated latency and fault injection
//!
//! ## Usage
//!
//! ```rust
//! use catalog_admin::backend::{self, BackendEndpoint};
//! use catalog_admin::model::{Brand, BrandCreate};
//! use list_framework::StoreActor;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, backend) = backend::new::<Brand>(16);
//!     tokio::spawn(actor.run());
//!
//!     backend.create(BrandCreate::new("Nike", "Sportswear")).await.unwrap();
//!
//!     let (store, client) = StoreActor::new(16);
//!     tokio::spawn(store.run(BackendEndpoint::new(backend, Duration::ZERO)));
//!     client.fetch(Default::default()).await.unwrap();
//!     assert_eq!(client.state().items[0].name, "Nike");
//! }
//! ```

pub mod actor;
pub mod client;
pub mod endpoint;
pub mod entity;
pub mod error;
pub mod message;

pub use actor::CollectionActor;
pub use client::BackendClient;
pub use endpoint::BackendEndpoint;
pub use entity::{required, CatalogEntity};
pub use error::BackendError;
pub use message::BackendRequest;

/// Creates a collection actor and its client.
pub fn new<T: CatalogEntity>(buffer_size: usize) -> (CollectionActor<T>, BackendClient<T>) {
    CollectionActor::new(buffer_size)
}
