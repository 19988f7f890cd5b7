//! # DocumentClient Trait
//!
//! Shared surface for domain-specific clients: implement `inner()` and
//! `map_error()` and the read/delete operations come for free.

use crate::{CollectionClient, Document, StoreError};
use async_trait::async_trait;

/// Trait for collection-specific client wrappers.
///
/// # Example
///
/// ```rust
/// use doc_store::{CollectionClient, Document, DocumentClient, StoreError};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Tag { id: u32 }
/// #[derive(Debug)] struct TagCreate;
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct TagError(String);
///
/// #[async_trait]
/// impl Document for Tag {
///     type Id = u32; type Create = TagCreate; type Patch = (); type Query = ();
///     type Action = (); type ActionResult = (); type Context = (); type Error = TagError;
///     fn from_create_params(id: u32, _: TagCreate) -> Result<Self, TagError> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), TagError> { Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), TagError> { Ok(()) }
///     fn select(docs: Vec<&Self>, _: &()) -> Vec<Self> { docs.into_iter().cloned().collect() }
/// }
///
/// struct TagClient { inner: CollectionClient<Tag> }
///
/// #[async_trait]
/// impl DocumentClient<Tag> for TagClient {
///     type Error = TagError;
///     fn inner(&self) -> &CollectionClient<Tag> { &self.inner }
///     fn map_error(e: StoreError) -> TagError { TagError(e.to_string()) }
/// }
///
/// async fn usage(client: TagClient) {
///     // get(), query() and delete() are provided.
///     let _ = client.get(1).await;
///     let _ = client.query(()).await;
///     let _ = client.delete(1).await;
/// }
/// ```
#[async_trait]
pub trait DocumentClient<T: Document>: Send + Sync {
    /// The collection-specific error type.
    type Error: Send + Sync;

    /// Access the wrapped generic client.
    fn inner(&self) -> &CollectionClient<T>;

    /// Map engine errors into the collection-specific error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch a document by key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Run a query against the collection.
    #[tracing::instrument(skip(self))]
    async fn query(&self, query: T::Query) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(query).await.map_err(Self::map_error)
    }

    /// Delete a document by key.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
