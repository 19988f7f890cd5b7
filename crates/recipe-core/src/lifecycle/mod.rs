//! # System Lifecycle
//!
//! Starting, wiring and stopping the collections behind the recipe app.
//!
//! [`RecipeSystem`] owns one task per collection (`recipes`, `profiles`) and the
//! identity provider. Sessions and recipe stores are handed out from it and
//! share the same running collections:
//!
//! ```rust,ignore
//! let system = RecipeSystem::new(AppConfig::default());
//! let session = system.session();
//! session.sign_up("Ada", "ada@example.com", "secret1", "secret1").await?;
//!
//! let recipes = system.collection_for(&session);
//! recipes.load_home().await?;
//!
//! system.shutdown().await?;
//! ```
//!
//! Shutdown drops the system's clients and waits for every collection task.
//! Clients cloned into sessions or stores keep their channel open, so drop
//! those first.
//!
//! [`setup_tracing`] installs the compact `tracing-subscriber` formatter,
//! filtered through `RUST_LOG`.

pub mod recipe_system;
pub mod tracing;

pub use self::recipe_system::RecipeSystem;
pub use self::tracing::setup_tracing;
