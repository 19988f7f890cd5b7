//! # Recipe Client
//!
//! High-level API over the `recipes` collection. Wraps a
//! [`CollectionClient<Recipe>`] and turns engine errors back into [`RecipeError`].
use crate::model::{Recipe, RecipeCreate, RecipeId, RecipePatch};
use crate::recipe_doc::{RecipeAction, RecipeActionResult, RecipeError};
use async_trait::async_trait;
use doc_store::{CollectionClient, DocumentClient, StoreError};
use tracing::{debug, instrument};

/// Client for the `recipes` collection.
#[derive(Clone)]
pub struct RecipeClient {
    inner: CollectionClient<Recipe>,
}

impl RecipeClient {
    pub fn new(inner: CollectionClient<Recipe>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentClient<Recipe> for RecipeClient {
    type Error = RecipeError;

    fn inner(&self) -> &CollectionClient<Recipe> {
        &self.inner
    }

    /// Recovers the document's own error when the collection rejected a write.
    fn map_error(e: StoreError) -> RecipeError {
        match e {
            StoreError::NotFound(id) => RecipeError::NotFound(id),
            StoreError::Document(inner) => match inner.downcast::<RecipeError>() {
                Ok(err) => *err,
                Err(other) => RecipeError::StoreCommunicationError(other.to_string()),
            },
            other => RecipeError::StoreCommunicationError(other.to_string()),
        }
    }
}

impl RecipeClient {
    #[instrument(skip(self, params), fields(author = %params.author_id))]
    pub async fn create_recipe(&self, params: RecipeCreate) -> Result<RecipeId, RecipeError> {
        debug!(title = %params.draft.title, "Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Applies a patch and returns the record as stored.
    #[instrument(skip(self))]
    pub async fn update_recipe(
        &self,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, RecipeError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn set_favorite(&self, id: RecipeId, value: bool) -> Result<bool, RecipeError> {
        debug!("Setting favorite on recipe {} to {}", id, value);
        match self
            .inner
            .perform_action(id, RecipeAction::SetFavorite(value))
            .await
            .map_err(Self::map_error)?
        {
            RecipeActionResult::Favorite(stored) => Ok(stored),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn rate(&self, id: RecipeId, rating: f32) -> Result<f32, RecipeError> {
        debug!("Rating recipe {} with {}", id, rating);
        match self
            .inner
            .perform_action(id, RecipeAction::Rate(rating))
            .await
            .map_err(Self::map_error)?
        {
            RecipeActionResult::Rated(stored) => Ok(stored),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: RecipeActionResult) -> RecipeError {
    RecipeError::StoreCommunicationError(format!("unexpected action result: {result:?}"))
}
