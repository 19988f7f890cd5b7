//! # Collection Actor
//!
//! `CollectionActor<T>` owns one in-memory document collection and serves every
//! request for it from a single Tokio task. Requests are handled strictly in
//! arrival order, which gives per-document submission ordering without locks.

use crate::client::CollectionClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of a document collection.
///
/// Owns the `store` map, the insertion order used to present query candidates
/// newest first, and the counter used for generated keys.
///
/// # Usage
///
/// ```rust
/// use doc_store::{CollectionActor, Document};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Note { id: u32, body: String }
/// #[derive(Debug)] struct NoteCreate { body: String }
/// #[derive(Debug)] struct NotePatch { body: Option<String> }
/// #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
///
/// #[async_trait]
/// impl Document for Note {
///     type Id = u32;
///     type Create = NoteCreate;
///     type Patch = NotePatch;
///     type Query = ();
///     type Action = ();
///     type ActionResult = ();
///     type Context = ();
///     type Error = NoteError;
///
///     fn from_create_params(id: u32, p: NoteCreate) -> Result<Self, NoteError> {
///         Ok(Self { id, body: p.body })
///     }
///     async fn on_update(&mut self, p: NotePatch, _: &()) -> Result<(), NoteError> {
///         if let Some(body) = p.body { self.body = body; }
///         Ok(())
///     }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), NoteError> { Ok(()) }
///     fn select(docs: Vec<&Self>, _: &()) -> Vec<Self> { docs.into_iter().cloned().collect() }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = CollectionActor::<Note>::new("notes", 10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(NoteCreate { body: "hello".into() }).await.unwrap();
///     let note = client.get(id).await.unwrap().unwrap();
///     assert_eq!(note.body, "hello");
/// }
/// ```
pub struct CollectionActor<T: Document> {
    name: &'static str,
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_id: u32,
}

impl<T: Document> CollectionActor<T> {
    /// Creates the actor and its client.
    ///
    /// `name` is the collection name used in logs. `buffer_size` bounds the
    /// request channel; callers wait when it is full.
    ///
    /// # Panics
    ///
    /// Panics if `buffer_size` is zero.
    pub fn new(name: &'static str, buffer_size: usize) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        };
        (actor, CollectionClient::new(sender))
    }

    fn generate_id(&mut self) -> T::Id {
        loop {
            let id = T::Id::from(self.next_id);
            self.next_id += 1;
            if !self.store.contains_key(&id) {
                return id;
            }
        }
    }

    fn put(&mut self, id: T::Id, doc: T) {
        if self.store.insert(id.clone(), doc).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: &T::Id) {
        if self.store.remove(id).is_some() {
            self.order.retain(|k| k != id);
        }
    }

    /// Runs the request loop until every client has been dropped.
    ///
    /// `context` is injected into every document hook.
    pub async fn run(mut self, context: T::Context) {
        let collection = self.name;
        info!(collection, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Create { params, respond_to } => {
                    debug!(collection, ?params, "Create");
                    let id = self.generate_id();
                    let result = self.build(id.clone(), params, &context).await;
                    match result {
                        Ok(doc) => {
                            self.put(id.clone(), doc);
                            info!(collection, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(collection, error = %e, "Create failed");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                CollectionRequest::Insert {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(collection, %id, ?params, "Insert");
                    if self.store.contains_key(&id) {
                        warn!(collection, %id, "Already exists");
                        let _ = respond_to.send(Err(StoreError::AlreadyExists(id.to_string())));
                        continue;
                    }
                    match self.build(id.clone(), params, &context).await {
                        Ok(doc) => {
                            self.put(id.clone(), doc.clone());
                            info!(collection, %id, size = self.store.len(), "Inserted");
                            let _ = respond_to.send(Ok(doc));
                        }
                        Err(e) => {
                            warn!(collection, %id, error = %e, "Insert failed");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                CollectionRequest::Get { id, respond_to } => {
                    let doc = self.store.get(&id).cloned();
                    debug!(collection, %id, found = doc.is_some(), "Get");
                    let _ = respond_to.send(Ok(doc));
                }
                CollectionRequest::Query { query, respond_to } => {
                    let candidates: Vec<&T> = self
                        .order
                        .iter()
                        .rev()
                        .filter_map(|id| self.store.get(id))
                        .collect();
                    let docs = T::select(candidates, &query);
                    debug!(collection, ?query, hits = docs.len(), "Query");
                    let _ = respond_to.send(Ok(docs));
                }
                CollectionRequest::Update {
                    id,
                    patch,
                    respond_to,
                } => {
                    debug!(collection, %id, ?patch, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    match draft.on_update(patch, &context).await {
                        Ok(()) => {
                            self.put(id.clone(), draft.clone());
                            info!(collection, %id, "Updated");
                            let _ = respond_to.send(Ok(draft));
                        }
                        Err(e) => {
                            warn!(collection, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(StoreError::document(e)));
                        }
                    }
                }
                CollectionRequest::Delete { id, respond_to } => {
                    debug!(collection, %id, "Delete");
                    let Some(current) = self.store.get(&id) else {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = current.on_delete(&context).await {
                        warn!(collection, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(StoreError::document(e)));
                        continue;
                    }
                    self.remove(&id);
                    info!(collection, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                CollectionRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(collection, %id, ?action, "Action");
                    let Some(current) = self.store.get(&id) else {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    match draft.handle_action(action, &context).await {
                        Ok(result) => {
                            self.put(id.clone(), draft);
                            info!(collection, %id, "Action ok");
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(collection, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(StoreError::document(e)));
                        }
                    }
                }
            }
        }

        info!(collection, size = self.store.len(), "Shutdown");
    }

    async fn build(
        &self,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T, StoreError> {
        let mut doc = T::from_create_params(id, params).map_err(StoreError::document)?;
        doc.on_create(context).await.map_err(StoreError::document)?;
        Ok(doc)
    }
}
