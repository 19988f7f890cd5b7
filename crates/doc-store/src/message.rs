//! # Collection Messages
//!
//! Requests sent from a [`CollectionClient`](crate::CollectionClient) to its
//! [`CollectionActor`](crate::CollectionActor), each carrying a oneshot reply channel.

use crate::document::Document;
use crate::error::StoreError;
use tokio::sync::oneshot;

/// One-shot reply channel used by the collection actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// A request against one document collection.
///
/// The variants mirror the operations a managed document database offers:
/// generated-key create, caller-keyed insert, point reads, predicate queries,
/// partial updates, deletes, plus a typed `Action` escape hatch for
/// document-specific operations (favorite toggles, list membership, …).
#[derive(Debug)]
pub enum CollectionRequest<T: Document> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Insert {
        id: T::Id,
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

impl<T: Document> CollectionRequest<T> {
    /// Short operation name, used in logs and mock diagnostics.
    pub fn op(&self) -> &'static str {
        match self {
            CollectionRequest::Create { .. } => "create",
            CollectionRequest::Insert { .. } => "insert",
            CollectionRequest::Get { .. } => "get",
            CollectionRequest::Query { .. } => "query",
            CollectionRequest::Update { .. } => "update",
            CollectionRequest::Delete { .. } => "delete",
            CollectionRequest::Action { .. } => "action",
        }
    }
}
