//! # External Seams
//!
//! The two collaborators the core talks to but does not implement:
//!
//! - [`CollectionEndpoint`] is the request/response interface of one remote collection.
//! - [`QueryTranslator`] is the pure mapping from [`FilterCriteria`] to the backend's
//!   query syntax. It is domain glue and lives with the application, not the core.

use crate::entity::ResourceItem;
use crate::error::EndpointError;
use crate::filter::FilterCriteria;
use async_trait::async_trait;

/// Remote collection interface for one resource type.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use list_framework::{CollectionEndpoint, EndpointError, ResourceItem};
///
/// #[derive(Clone, Debug)]
/// struct Tag { id: u32, label: String }
///
/// impl ResourceItem for Tag {
///     type Id = u32;
///     type Create = String;
///     type Update = String;
///     type Query = ();
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// struct Offline;
///
/// #[async_trait]
/// impl CollectionEndpoint<Tag> for Offline {
///     async fn list(&self, _: &()) -> Result<Vec<Tag>, EndpointError> {
///         Err(EndpointError::Timeout)
///     }
///     async fn create(&self, label: String) -> Result<Tag, EndpointError> {
///         Ok(Tag { id: 1, label })
///     }
///     async fn update(&self, id: &u32, label: String) -> Result<Tag, EndpointError> {
///         Ok(Tag { id: *id, label })
///     }
///     async fn delete(&self, _: &u32) -> Result<(), EndpointError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CollectionEndpoint<T: ResourceItem>: Send + Sync + 'static {
    /// `LIST(filter) → sequence of items`, in server order.
    async fn list(&self, query: &T::Query) -> Result<Vec<T>, EndpointError>;

    /// `CREATE(payload) → item`.
    async fn create(&self, payload: T::Create) -> Result<T, EndpointError>;

    /// `UPDATE(id, patch) → item`.
    async fn update(&self, id: &T::Id, patch: T::Update) -> Result<T, EndpointError>;

    /// `DELETE(id) → ()`.
    async fn delete(&self, id: &T::Id) -> Result<(), EndpointError>;
}

/// Maps normalized filter criteria into a backend-shaped query object.
pub trait QueryTranslator<Q>: Send + Sync + 'static {
    fn translate(&self, criteria: &FilterCriteria) -> Q;
}

impl<Q, F> QueryTranslator<Q> for F
where
    F: Fn(&FilterCriteria) -> Q + Send + Sync + 'static,
{
    fn translate(&self, criteria: &FilterCriteria) -> Q {
        self(criteria)
    }
}
