//! Domain wrappers around [`CollectionClient`](doc_store::CollectionClient).

pub mod profile_client;
pub mod recipe_client;

pub use profile_client::*;
pub use recipe_client::*;
