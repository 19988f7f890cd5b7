//! The async side of the store: runs the external call, then feeds the outcome
//! to [`reduce`] and publishes the new state.

use super::state::{reduce, CollectionState, StoreCommand};
use crate::clients::RecipeClient;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::filter::{filter_recipes, FilterCriteria, HomeSegments};
use crate::model::{Recipe, RecipeCreate, RecipeDraft, RecipeId, RecipePatch, RecipeQuery, UserId};
use crate::recipe_doc::entity::check_rating;
use chrono::Utc;
use doc_store::DocumentClient;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Session-scoped recipe cache mediating every read and write.
///
/// # Contract
///
/// - Validation runs before any external call; a rejected draft or patch never
///   reaches the backend and comes back as [`AppError::Validation`].
/// - `create`, `update`, `delete` and `rate` change the cached lists only after
///   the backend confirms.
/// - `toggle_favorite` flips the flag in every cached copy at once and puts the
///   previous value back if the backend refuses.
/// - State is published through a `watch` channel and never locked across an
///   await.
pub struct RecipeCollection {
    client: RecipeClient,
    user: Option<UserId>,
    config: AppConfig,
    state: watch::Sender<CollectionState>,
}

impl RecipeCollection {
    /// `user` is the signed-in user, if any; mine-only views and writes need one.
    pub fn new(client: RecipeClient, user: Option<UserId>, config: AppConfig) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            client,
            user,
            config,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Drops the results of everything still in flight for the current view.
    pub fn navigate_away(&self) {
        debug!("Navigated away");
        self.dispatch(StoreCommand::Navigated);
    }

    fn dispatch(&self, command: StoreCommand) {
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, command);
        });
    }

    fn begin(&self) -> u64 {
        let epoch = self.state.borrow().epoch;
        self.dispatch(StoreCommand::Begin { epoch });
        epoch
    }

    fn fail(&self, epoch: u64, error: AppError) -> AppError {
        warn!(kind = ?error.kind(), %error, "Operation failed");
        self.dispatch(StoreCommand::Failed {
            epoch,
            message: error.to_string(),
        });
        error
    }

    fn require_user(&self, epoch: u64) -> Result<UserId, AppError> {
        self.user
            .clone()
            .ok_or_else(|| self.fail(epoch, AppError::Auth("User not authenticated".into())))
    }

    /// Reloads the signed-in user's recipes into `mine`.
    #[instrument(skip(self))]
    pub async fn refresh_mine(&self) -> Result<Vec<Recipe>, AppError> {
        let epoch = self.begin();
        let user = self.require_user(epoch)?;
        match self.client.query(RecipeQuery::by_author(user)).await {
            Ok(recipes) => {
                info!(count = recipes.len(), "Loaded own recipes");
                self.dispatch(StoreCommand::MineLoaded {
                    epoch,
                    recipes: recipes.clone(),
                });
                Ok(recipes)
            }
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }

    /// Fetches the recent, popular and own segments concurrently.
    ///
    /// The whole own list is cached in `mine`; only the returned segment is
    /// capped at `mine_limit`. Without a signed-in user the own segment is empty.
    #[instrument(skip(self))]
    pub async fn load_home(&self) -> Result<HomeSegments, AppError> {
        let epoch = self.begin();
        let recent_query = RecipeQuery::recent(self.config.recent_limit);
        let popular_query =
            RecipeQuery::popular(self.config.popular_min_rating, self.config.popular_limit);
        let mine_query = self
            .user
            .clone()
            .map(RecipeQuery::by_author);

        let (recent, popular, mine) = tokio::join!(
            self.client.query(recent_query),
            self.client.query(popular_query),
            async {
                match mine_query {
                    Some(q) => self.client.query(q).await,
                    None => Ok(Vec::new()),
                }
            }
        );

        let segments = match (recent, popular, mine) {
            (Ok(recent), Ok(popular), Ok(mine)) => HomeSegments {
                recent,
                popular,
                mine,
            },
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                return Err(self.fail(epoch, e.into()))
            }
        };

        info!(
            recent = segments.recent.len(),
            popular = segments.popular.len(),
            mine = segments.mine.len(),
            "Home loaded"
        );
        self.dispatch(StoreCommand::HomeLoaded {
            epoch,
            recent: segments.recent.clone(),
            popular: segments.popular.clone(),
            mine: segments.mine.clone(),
        });
        let mut segments = segments;
        segments.mine.truncate(self.config.mine_limit);
        Ok(segments)
    }

    /// Runs a search. Category, difficulty and cooking-time bounds are evaluated
    /// by the backend; text, favorites and mine-only are applied here.
    ///
    /// Empty criteria clear the results without a backend call.
    #[instrument(skip(self))]
    pub async fn search(&self, criteria: FilterCriteria) -> Result<Vec<Recipe>, AppError> {
        let epoch = self.state.borrow().epoch;
        if criteria.is_empty() {
            self.dispatch(StoreCommand::SearchCleared { epoch });
            return Ok(Vec::new());
        }

        let epoch = self.begin();
        let (query, rest) = criteria.split();
        match self.client.query(query).await {
            Ok(candidates) => {
                let results = filter_recipes(&candidates, &rest);
                debug!(
                    candidates = candidates.len(),
                    hits = results.len(),
                    "Search done"
                );
                self.dispatch(StoreCommand::SearchLoaded {
                    epoch,
                    results: results.clone(),
                });
                Ok(results)
            }
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }

    /// Reads one recipe for the detail view.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: RecipeId) -> Result<Recipe, AppError> {
        let epoch = self.begin();
        match self.client.get(id.clone()).await {
            Ok(Some(recipe)) => {
                self.dispatch(StoreCommand::Fetched {
                    epoch,
                    recipe: recipe.clone(),
                });
                Ok(recipe)
            }
            Ok(None) => Err(self.fail(epoch, AppError::NotFound(id.to_string()))),
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }

    /// Validates and stores a new recipe, then prepends it to `mine` and `recent`.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: RecipeDraft) -> Result<Recipe, AppError> {
        let epoch = self.begin();
        let author_id = self.require_user(epoch)?;
        if let Err(e) = draft.validate() {
            return Err(self.fail(epoch, e.into()));
        }

        let params = RecipeCreate {
            author_id,
            draft,
            created_at: Utc::now(),
        };
        match self.client.create_recipe(params.clone()).await {
            Ok(id) => {
                info!(%id, "Recipe created");
                let recipe = Recipe::from_create(id, params);
                self.dispatch(StoreCommand::Created {
                    epoch,
                    recipe: recipe.clone(),
                });
                Ok(recipe)
            }
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }

    /// Validates the provided fields, then merges the stored record into every
    /// list holding it.
    #[instrument(skip(self))]
    pub async fn update(&self, id: RecipeId, patch: RecipePatch) -> Result<Recipe, AppError> {
        let epoch = self.begin();
        if let Err(e) = patch.validate() {
            return Err(self.fail(epoch, e.into()));
        }
        match self.client.update_recipe(id, patch).await {
            Ok(recipe) => {
                info!(id = %recipe.id, "Recipe updated");
                self.dispatch(StoreCommand::Updated {
                    epoch,
                    recipe: recipe.clone(),
                });
                Ok(recipe)
            }
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }

    /// Deletes remotely, then removes the id from every cached list.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecipeId) -> Result<(), AppError> {
        let epoch = self.begin();
        match self.client.delete(id.clone()).await {
            Ok(()) => {
                info!(%id, "Recipe deleted");
                self.dispatch(StoreCommand::Deleted { epoch, id });
                Ok(())
            }
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }

    /// Optimistically sets the favorite flag; reverts it if the backend fails.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: RecipeId, value: bool) -> Result<(), AppError> {
        let previous = self.state.borrow().find(&id).map(|r| r.is_favorite);
        self.dispatch(StoreCommand::FavoriteSet {
            id: id.clone(),
            value,
        });

        match self.client.set_favorite(id.clone(), value).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(%id, error = %e, "Favorite update failed, reverting");
                if let Some(previous) = previous {
                    self.dispatch(StoreCommand::FavoriteSet {
                        id,
                        value: previous,
                    });
                }
                Err(AppError::Persistence(format!(
                    "Failed to update favorite: {e}"
                )))
            }
        }
    }

    /// Sets the rating (0 to 5) and updates every cached copy.
    #[instrument(skip(self))]
    pub async fn rate(&self, id: RecipeId, rating: f32) -> Result<(), AppError> {
        let epoch = self.begin();
        if let Err(e) = check_rating(rating) {
            return Err(self.fail(epoch, e.into()));
        }
        match self.client.rate(id.clone(), rating).await {
            Ok(rating) => {
                self.dispatch(StoreCommand::Rated { epoch, id, rating });
                Ok(())
            }
            Err(e) => Err(self.fail(epoch, e.into())),
        }
    }
}
