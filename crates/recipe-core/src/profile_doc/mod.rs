//! # Profiles Collection
//!
//! [`UserProfile`] documents keyed by the identity provider's uid. Profiles are
//! always inserted under a caller-chosen key, never a generated one.
//!
//! - [`entity`] - [`Document`](doc_store::Document) implementation,
//!   [`ProfileAction`], [`ProfileQuery`]
//! - [`error`] - [`ProfileError`]

pub mod entity;
pub mod error;

pub use entity::{ProfileAction, ProfileQuery};
pub use error::*;

use crate::clients::ProfileClient;
use crate::model::UserProfile;
use doc_store::CollectionActor;

/// Creates the `profiles` collection and its client.
pub fn new(buffer_size: usize) -> (CollectionActor<UserProfile>, ProfileClient) {
    let (actor, client) = CollectionActor::new("profiles", buffer_size);
    (actor, ProfileClient::new(client))
}
