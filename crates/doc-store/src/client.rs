//! # Collection Client
//!
//! The async handle used to talk to a [`CollectionActor`](crate::CollectionActor).

use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use tokio::sync::{mpsc, oneshot};

/// A cloneable, type-safe handle onto one document collection.
///
/// Holds only the request sender, so clones are cheap and may be shared across
/// tasks. Every method sends one request and awaits the actor's reply.
pub struct CollectionClient<T: Document> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Document> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Document> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> CollectionRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ResponseDropped)?
    }

    /// Create a document under a generated key.
    pub async fn create(&self, params: T::Create) -> Result<T::Id, StoreError> {
        self.call(|respond_to| CollectionRequest::Create { params, respond_to })
            .await
    }

    /// Create a document under a caller-chosen key. Fails with
    /// [`StoreError::AlreadyExists`] when the key is taken.
    pub async fn insert(&self, id: T::Id, params: T::Create) -> Result<T, StoreError> {
        self.call(|respond_to| CollectionRequest::Insert {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.call(|respond_to| CollectionRequest::Get { id, respond_to })
            .await
    }

    pub async fn query(&self, query: T::Query) -> Result<Vec<T>, StoreError> {
        self.call(|respond_to| CollectionRequest::Query { query, respond_to })
            .await
    }

    /// Apply a patch and return the stored result.
    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, StoreError> {
        self.call(|respond_to| CollectionRequest::Update {
            id,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        self.call(|respond_to| CollectionRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, StoreError> {
        self.call(|respond_to| CollectionRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}
