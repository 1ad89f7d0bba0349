//! # ResourceItem Trait
//!
//! The `ResourceItem` trait defines the contract that every list resource (Brand, Category,
//! Transaction, …) must implement to be held by the generic `StoreActor`. It names the
//! associated types for the identifier, the create payload, the update patch and the
//! backend-shaped query the collection endpoint understands.
//!
//! # Architecture Note
//! By defining one contract that every resource type must satisfy, the store's fetch and
//! reconciliation logic is written *once* and reused for every screen of the dashboard.
//!
//! Associated types keep the calls type-safe: a `Brand` store accepts a `BrandCreate`
//! payload and a `BrandUpdate` patch, and the compiler rejects a `CategoryCreate`.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any list item must implement to be managed by a `StoreActor`.
///
/// The store never invents identifiers or merges patches itself: the collection endpoint
/// returns the canonical item for every successful mutation, and the store only needs
/// to locate items by [`ResourceItem::id`] to reconcile its list.
pub trait ResourceItem: Clone + Send + Sync + 'static {
    /// The opaque identifier for this item (e.g., `BrandId`, `u64`, `String`).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The payload required to create a new item.
    type Create: Send + Sync + Debug + 'static;

    /// The partial patch applied by an update.
    type Update: Send + Sync + Debug + 'static;

    /// The backend-shaped filter object accepted by the endpoint's `list`.
    ///
    /// This is *not* `FilterCriteria`; a [`QueryTranslator`](crate::QueryTranslator)
    /// produces it.
    type Query: Send + Sync + Debug + 'static;

    /// Returns the identity of this item.
    fn id(&self) -> &Self::Id;
}
