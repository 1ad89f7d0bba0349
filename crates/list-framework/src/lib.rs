//! # List Framework
//!
//! This crate provides the building blocks for the filtered, paginated resource lists of an
//! admin dashboard: a debounced filter controller, a per-resource store that talks to a remote
//! collection, and the page arithmetic a table needs.
//!
//! ## Why an actor per store?
//!
//! A list screen has two sources of concurrency: the user keeps typing while requests are in
//! flight, and the network answers in whatever order it likes. Giving every resource list a
//! single owner (a [`StoreActor`]) that reconciles one message at a time removes both races:
//!
//! - **Isolated state**: only the actor writes `items`, `loading` and `error`
//! - **Latest issued wins**: each fetch takes a sequence number and stale answers are dropped
//! - **Non-blocking**: endpoint calls run in their own tasks, so a slow create never holds
//!   up a fetch
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! ```text
//!  keystrokes ─▶ FilterController ──debounced FilterCriteria──▶ QueryTranslator
//!                                                                     │ T::Query
//!                                                                     ▼
//!  table ◀── PageView ◀── Paginator ◀── StoreState ◀── StoreActor ◀─▶ CollectionEndpoint
//! ```
//!
//! 1. **Filter Layer** ([`FilterController`]) - live inputs, normalization and debounce
//! 2. **Store Layer** ([`StoreActor`], [`StoreClient`]) - fetch sequencing and local reconciliation
//! 3. **View Layer** ([`ResourceList`], [`Paginator`]) - composition and page slicing
//!
//! The two seams, [`CollectionEndpoint`] and [`QueryTranslator`], are implemented by the
//! application.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use list_framework::{CollectionEndpoint, EndpointError, ResourceItem, StoreActor};
//!
//! #[derive(Clone, Debug)]
//! struct Tag { id: u32, label: String }
//!
//! impl ResourceItem for Tag {
//!     type Id = u32;
//!     type Create = String;
//!     type Update = String;
//!     type Query = Option<String>;
//!     fn id(&self) -> &u32 { &self.id }
//! }
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl CollectionEndpoint<Tag> for Fixed {
//!     async fn list(&self, search: &Option<String>) -> Result<Vec<Tag>, EndpointError> {
//!         let all = vec![Tag { id: 1, label: "sale".into() }, Tag { id: 2, label: "new".into() }];
//!         Ok(all.into_iter().filter(|t| search.as_ref().map_or(true, |s| t.label.contains(s.as_str()))).collect())
//!     }
//!     async fn create(&self, label: String) -> Result<Tag, EndpointError> { Ok(Tag { id: 3, label }) }
//!     async fn update(&self, id: &u32, label: String) -> Result<Tag, EndpointError> { Ok(Tag { id: *id, label }) }
//!     async fn delete(&self, _: &u32) -> Result<(), EndpointError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = StoreActor::<Tag>::new(8);
//!     tokio::spawn(actor.run(Fixed));
//!
//!     client.fetch(Some("sa".into())).await.unwrap();
//!     assert_eq!(client.state().items.len(), 1);
//!
//!     client.create("clearance".into()).await.unwrap();
//!     assert_eq!(client.state().items[0].label, "clearance");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store runs in its own Tokio task; each endpoint call in a short-lived task
//! - Requests and completions are reconciled **sequentially** within a store
//! - Observers read snapshots through a `watch` channel and never block the actor
//! - The filter controller's timer is one task that is aborted and re-armed on every edit
//!
//! ## Testing
//!
//! The [`mock`] module provides a scripted [`MockEndpoint`](mock::MockEndpoint) and a manual
//! channel endpoint whose responses the test sends explicitly, which is how out-of-order
//! arrival is exercised. Filter tests run on a paused Tokio clock.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod entity;
pub mod error;
pub mod filter;
pub mod list;
pub mod message;
pub mod mock;
pub mod pagination;
pub mod state;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use client::{PendingFetch, StoreClient};
pub use config::{FilterConfig, StoreConfig};
pub use endpoint::{CollectionEndpoint, QueryTranslator};
pub use entity::ResourceItem;
pub use error::{EndpointError, StoreError};
pub use filter::{DateRange, FilterController, FilterCriteria};
pub use list::{PageView, ResourceList};
pub use message::{FetchOutcome, Response, StoreRequest};
pub use pagination::Paginator;
pub use state::StoreState;
pub use store::StoreActor;
