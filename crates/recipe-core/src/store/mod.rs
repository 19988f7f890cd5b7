//! # Recipe Collection Store
//!
//! The session's recipe cache: the signed-in user's recipes, the home segments,
//! search results and a load status.
//!
//! - [`state`] - [`CollectionState`], [`StoreCommand`] and the pure [`reduce`]
//! - [`collection`] - [`RecipeCollection`], which talks to the `recipes`
//!   collection and publishes state through a `watch` channel
//!
//! ## Usage
//!
//! ```rust
//! use recipe_core::config::AppConfig;
//! use recipe_core::model::UserId;
//! use recipe_core::recipe_doc;
//! use recipe_core::store::RecipeCollection;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = recipe_doc::new(16);
//!     tokio::spawn(actor.run(()));
//!
//!     let store = RecipeCollection::new(client, Some(UserId::from("u1")), AppConfig::default());
//!     let mut updates = store.subscribe();
//!
//!     store.load_home().await.unwrap();
//!     assert!(updates.has_changed().unwrap());
//!     assert!(updates.borrow_and_update().recent.is_empty());
//! }
//! ```

pub mod collection;
pub mod state;

pub use collection::RecipeCollection;
pub use state::{reduce, CollectionState, LoadStatus, StoreCommand};
