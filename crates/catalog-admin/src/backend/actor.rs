//! # Collection Actor
//!
//! The server side of the in-memory backend. It owns every record of one resource type
//! and processes requests sequentially, so no `Mutex` guards the records.

use super::client::BackendClient;
use super::entity::CatalogEntity;
use super::error::BackendError;
use super::message::BackendRequest;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that stores a collection of catalog records.
///
/// # Implementation Details
///
/// The actor keeps a `HashMap` (`store`) from id to record, a `Vec` (`order`) of ids in
/// insertion order, and a `u32` counter (`next_id`) for id generation.
///
/// ## Operations
///
/// * **List**: records matching the query, newest first.
/// * **Get**: a clone of the record, or `None`.
/// * **Create**:
///     1. Generates the next id and stamps the current time.
///     2. Calls `T::from_create_params` to validate and build the record.
///     3. Rejects it if its `unique_key` is already taken.
///     4. Stores it and returns the canonical record.
/// * **Update**: applies the patch to a copy, checks uniqueness, then swaps it in.
/// * **Delete**: removes the record. Unknown ids are `NotFound`.
pub struct CollectionActor<T: CatalogEntity> {
    receiver: mpsc::Receiver<BackendRequest<T>>,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_id: u32,
}

impl<T: CatalogEntity> CollectionActor<T> {
    /// Creates a new `CollectionActor` and its associated `BackendClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, BackendClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        };
        (actor, BackendClient::new(sender))
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    pub async fn run(mut self) {
        // "Brand" instead of "catalog_admin::model::brand::Brand"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Backend started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BackendRequest::List { query, respond_to } => {
                    let items = self.list(&query);
                    debug!(entity_type, %query, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                BackendRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                BackendRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params);
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), size = self.store.len(), "Created")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                BackendRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update, entity_type);
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                BackendRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id, entity_type);
                    match &result {
                        Ok(()) => info!(entity_type, %id, size = self.store.len(), "Deleted"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn list(&self, query: &crate::query::CollectionQuery) -> Vec<T> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.store.get(id))
            .filter(|item| query.matches(*item))
            .cloned()
            .collect()
    }

    fn create(&mut self, params: T::Create) -> Result<T, BackendError> {
        let id = T::Id::from(self.next_id);
        let item = T::from_create_params(id.clone(), params, Utc::now())?;
        self.ensure_unique(&item)?;
        self.next_id += 1;
        self.store.insert(id.clone(), item.clone());
        self.order.push(id);
        Ok(item)
    }

    fn update(&mut self, id: &T::Id, update: T::Update, entity_type: &'static str) -> Result<T, BackendError> {
        if T::READ_ONLY {
            return Err(BackendError::ReadOnly {
                resource: entity_type,
            });
        }
        let mut item = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        item.on_update(update, Utc::now())?;
        self.ensure_unique(&item)?;
        self.store.insert(id.clone(), item.clone());
        Ok(item)
    }

    fn delete(&mut self, id: &T::Id, entity_type: &'static str) -> Result<(), BackendError> {
        if T::READ_ONLY {
            return Err(BackendError::ReadOnly {
                resource: entity_type,
            });
        }
        self.store
            .remove(id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        self.order.retain(|existing| existing != id);
        Ok(())
    }

    /// Fails if another record already holds `item`'s unique key.
    fn ensure_unique(&self, item: &T) -> Result<(), BackendError> {
        let Some(key) = item.unique_key() else {
            return Ok(());
        };
        let taken = self
            .store
            .values()
            .any(|other| other.id() != item.id() && other.unique_key().as_deref() == Some(key.as_str()));
        if taken {
            return Err(BackendError::Conflict(key));
        }
        Ok(())
    }
}
