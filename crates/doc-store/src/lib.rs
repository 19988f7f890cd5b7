//! # Doc Store
//!
//! Typed, in-memory document collections served by Tokio tasks.
//!
//! Each collection is one [`CollectionActor`] owning its documents, reached through a
//! cloneable [`CollectionClient`]. The request set mirrors what a managed document
//! database offers a client application: generated-key create, caller-keyed insert,
//! point reads, predicate queries with ordering and limits, partial updates, deletes,
//! plus typed per-collection actions.
//!
//! ## Layers
//!
//! 1. **Document** ([`Document`]): what a collection stores and how patches, actions and
//!    queries apply to it.
//! 2. **Actor** ([`CollectionActor`]): sequential request processing, so writes to one
//!    document are applied in submission order and no locks guard the store.
//! 3. **Client** ([`CollectionClient`], [`DocumentClient`]): the async API.
//!
//! ## Context Injection
//!
//! Dependencies are passed to [`CollectionActor::run`] rather than the constructor, so
//! collections that consult each other can be created first and wired afterwards.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from scripted expectations and makes failure
//! injection a one-liner. See the [`mock`] module.

pub mod client;
pub mod collection;
pub mod document;
pub mod document_client;
pub mod error;
pub mod message;
pub mod mock;

pub use client::CollectionClient;
pub use collection::CollectionActor;
pub use document::Document;
pub use document_client::DocumentClient;
pub use error::StoreError;
pub use message::{CollectionRequest, Response};
