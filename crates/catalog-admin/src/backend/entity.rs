//! # CatalogEntity Trait
//!
//! The contract every model implements to be held by a [`CollectionActor`](super::CollectionActor).
//! It extends [`ResourceItem`] with the server-side behaviour the remote API would own:
//! building a record from a create payload, applying a patch, and the uniqueness key the
//! collection enforces.
//!
//! The hooks receive the current time instead of reading the clock, so `created_at` and
//! `updated_at` are stamped once per request by the actor.

use super::error::BackendError;
use crate::query::{CollectionQuery, Record};
use chrono::{DateTime, Utc};
use list_framework::ResourceItem;
use std::fmt::Debug;

/// Trait that any catalog model must implement to be served by the in-memory backend.
///
/// Identifiers are generated by the actor from a `u32` counter, hence `Id: From<u32>`.
pub trait CatalogEntity:
    ResourceItem<Id: From<u32>, Query = CollectionQuery> + Record + Debug
{
    /// Rejects every update and delete with [`BackendError::ReadOnly`].
    const READ_ONLY: bool = false;

    /// Construct the full record from the generated ID and the payload.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        now: DateTime<Utc>,
    ) -> Result<Self, BackendError>;

    /// Apply a patch in place. On error the record must be left unchanged.
    fn on_update(&mut self, update: Self::Update, now: DateTime<Utc>) -> Result<(), BackendError>;

    /// Key that must be unique within the collection, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Fails with [`BackendError::Missing`] when `value` is blank.
pub fn required(field: &'static str, value: &str) -> Result<(), BackendError> {
    if value.trim().is_empty() {
        return Err(BackendError::Missing { field });
    }
    Ok(())
}
