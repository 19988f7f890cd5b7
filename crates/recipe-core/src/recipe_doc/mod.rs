//! # Recipes Collection
//!
//! The `recipes` document collection: [`Recipe`] served by a
//! [`CollectionActor`], with favoriting and rating as custom actions.
//!
//! ## Structure
//!
//! - [`entity`] - [`Document`](doc_store::Document) implementation for [`Recipe`]
//! - [`actions`] - [`RecipeAction`] and [`RecipeActionResult`]
//! - [`error`] - [`RecipeError`]
//! - [`new()`] - factory returning the actor and a [`RecipeClient`]
//!
//! ## Usage
//!
//! ```rust
//! use recipe_core::recipe_doc;
//! use recipe_core::model::RecipeQuery;
//! use doc_store::DocumentClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = recipe_doc::new(16);
//!     tokio::spawn(actor.run(()));
//!
//!     let newest = client.query(RecipeQuery::recent(6)).await.unwrap();
//!     assert!(newest.is_empty());
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RecipeClient;
use crate::model::Recipe;
use doc_store::CollectionActor;

/// Creates the `recipes` collection and its client.
pub fn new(buffer_size: usize) -> (CollectionActor<Recipe>, RecipeClient) {
    let (actor, client) = CollectionActor::new("recipes", buffer_size);
    (actor, RecipeClient::new(client))
}
