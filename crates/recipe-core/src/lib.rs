//! # Recipe Core
//!
//! The state and logic layer of a recipe-sharing app: recipe and profile
//! models, their document collections, the signed-in session, the recipe
//! store and the filter engine behind the home and search screens.
//!
//! Start from [`lifecycle::RecipeSystem`], which runs the collections and hands
//! out [`session::Session`]s and [`store::RecipeCollection`]s.

pub mod clients;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod lifecycle;
pub mod model;
pub mod profile_doc;
pub mod recipe_doc;
pub mod session;
pub mod store;
