//! # Document Trait
//!
//! The `Document` trait is the contract every stored type (recipes, user profiles, …)
//! implements to be served by a [`CollectionActor`](crate::CollectionActor). It fixes the
//! associated types for ids, create/patch payloads, queries, actions, context and errors,
//! and supplies the lifecycle hooks the actor drives.
//!
//! # Provided Methods (Hooks)
//! - [`Document::on_create`]
//! - [`Document::on_delete`]
//!
//! Both default to `Ok(())`. Everything else is required.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any stored document type must implement.
///
/// # Async & Context
/// Hooks are `async` so a document can consult other collections while it is being
/// written. The `Context` value is handed to [`CollectionActor::run`](crate::CollectionActor::run)
/// and injected into every hook, so dependencies are bound when the actor starts rather
/// than when it is constructed.
#[async_trait]
pub trait Document: Clone + Send + Sync + 'static {
    /// The document key. Must be convertible from `u32` for generated keys.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload used to create a new document.
    type Create: Send + Sync + Debug;

    /// Partial update. Fields left unset keep their stored value.
    type Patch: Send + Sync + Debug;

    /// Equality/range predicates plus ordering understood by [`Document::select`].
    type Query: Send + Sync + Debug;

    /// Document-specific operations that do not fit the CRUD model.
    type Action: Send + Sync + Debug;

    /// Result returned by [`Document::handle_action`].
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected at `run()` time. Use `()` when there are none.
    type Context: Send + Sync;

    /// One error type per collection, boxed into
    /// [`StoreError::Document`](crate::StoreError::Document) on the way out.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the stored document from its key and create payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the document becomes visible.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply a patch. The actor calls this on a copy and only stores the copy
    /// when the hook succeeds, so a failed patch leaves the stored document intact.
    async fn on_update(
        &mut self,
        patch: Self::Patch,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the document is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a document-specific action. Same copy-then-commit rule as `on_update`.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Select, order and truncate the documents answering `query`.
    ///
    /// `docs` arrives newest first (reverse insertion order), so a stable sort on
    /// a timestamp keeps same-instant writes newest first as well.
    fn select(docs: Vec<&Self>, query: &Self::Query) -> Vec<Self>;
}
