use crate::clients::{ProfileClient, RecipeClient};
use crate::config::AppConfig;
use crate::identity::MemoryIdentityProvider;
use crate::session::Session;
use crate::store::RecipeCollection;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Running collections plus the identity provider they authenticate against.
pub struct RecipeSystem {
    pub recipe_client: RecipeClient,
    pub profile_client: ProfileClient,
    pub identity: Arc<MemoryIdentityProvider>,
    config: AppConfig,
    handles: Vec<JoinHandle<()>>,
}

impl RecipeSystem {
    /// Spawns the `recipes` and `profiles` collections. Neither needs a
    /// context, so both run with `()`.
    pub fn new(config: AppConfig) -> Self {
        let (recipe_actor, recipe_client) = crate::recipe_doc::new(config.channel_buffer);
        let (profile_actor, profile_client) = crate::profile_doc::new(config.channel_buffer);

        let recipe_handle = tokio::spawn(recipe_actor.run(()));
        let profile_handle = tokio::spawn(profile_actor.run(()));

        info!(buffer = config.channel_buffer, "Recipe system started");
        Self {
            recipe_client,
            profile_client,
            identity: Arc::new(MemoryIdentityProvider::new()),
            config,
            handles: vec![recipe_handle, profile_handle],
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A fresh, signed-out session.
    pub fn session(&self) -> Session {
        Session::new(self.identity.clone(), self.profile_client.clone())
    }

    /// A recipe store scoped to whoever is signed in to `session` right now.
    /// Sign-in changes after this call are not picked up; build a new store.
    pub fn collection_for(&self, session: &Session) -> RecipeCollection {
        RecipeCollection::new(
            self.recipe_client.clone(),
            session.user_id(),
            self.config.clone(),
        )
    }

    /// Closes the system's channels and waits for both collection tasks.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down recipe system...");
        drop(self.recipe_client);
        drop(self.profile_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Collection task failed: {:?}", e);
                return Err(format!("Collection task failed: {:?}", e));
            }
        }

        info!("Recipe system shutdown complete.");
        Ok(())
    }
}
