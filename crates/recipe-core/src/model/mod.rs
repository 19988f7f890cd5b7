//! # Domain Model
//!
//! Plain data for the two stored document types, [`Recipe`] and [`UserProfile`],
//! plus their create payloads, patches and the [`RecipeQuery`] predicates.
//!
//! Everything here serializes with camelCase keys, matching the documents a
//! hosted backend would hold.

mod recipe;
mod user;

pub use recipe::*;
pub use user::*;
