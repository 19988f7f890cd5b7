//! # Profile Client
//!
//! High-level API over the `profiles` collection.
use crate::model::{DietaryRestriction, ProfileCreate, ProfilePatch, RecipeId, UserId, UserProfile};
use crate::profile_doc::{ProfileAction, ProfileError};
use async_trait::async_trait;
use doc_store::{CollectionClient, DocumentClient, StoreError};
use tracing::{debug, instrument};

/// Client for the `profiles` collection.
#[derive(Clone)]
pub struct ProfileClient {
    inner: CollectionClient<UserProfile>,
}

impl ProfileClient {
    pub fn new(inner: CollectionClient<UserProfile>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentClient<UserProfile> for ProfileClient {
    type Error = ProfileError;

    fn inner(&self) -> &CollectionClient<UserProfile> {
        &self.inner
    }

    fn map_error(e: StoreError) -> ProfileError {
        match e {
            StoreError::NotFound(id) => ProfileError::NotFound(id),
            StoreError::AlreadyExists(id) => ProfileError::AlreadyExists(id),
            StoreError::Document(inner) => match inner.downcast::<ProfileError>() {
                Ok(err) => *err,
                Err(other) => ProfileError::StoreCommunicationError(other.to_string()),
            },
            other => ProfileError::StoreCommunicationError(other.to_string()),
        }
    }
}

impl ProfileClient {
    /// Stores a new profile under the given uid.
    #[instrument(skip(self, params))]
    pub async fn create_profile(
        &self,
        id: UserId,
        params: ProfileCreate,
    ) -> Result<UserProfile, ProfileError> {
        debug!(email = %params.email, "Sending request");
        self.inner.insert(id, params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<UserProfile, ProfileError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(Self::map_error)
    }

    pub async fn add_favorite(
        &self,
        id: UserId,
        recipe: RecipeId,
    ) -> Result<UserProfile, ProfileError> {
        self.act(id, ProfileAction::AddFavorite(recipe)).await
    }

    pub async fn remove_favorite(
        &self,
        id: UserId,
        recipe: RecipeId,
    ) -> Result<UserProfile, ProfileError> {
        self.act(id, ProfileAction::RemoveFavorite(recipe)).await
    }

    pub async fn add_dietary_restriction(
        &self,
        id: UserId,
        restriction: DietaryRestriction,
    ) -> Result<UserProfile, ProfileError> {
        self.act(id, ProfileAction::AddDietaryRestriction(restriction))
            .await
    }

    pub async fn remove_dietary_restriction(
        &self,
        id: UserId,
        restriction: DietaryRestriction,
    ) -> Result<UserProfile, ProfileError> {
        self.act(id, ProfileAction::RemoveDietaryRestriction(restriction))
            .await
    }

    #[instrument(skip(self))]
    async fn act(&self, id: UserId, action: ProfileAction) -> Result<UserProfile, ProfileError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use doc_store::mock::MockClient;

    #[tokio::test]
    async fn test_duplicate_insert_maps_to_already_exists() {
        let mut mock = MockClient::<UserProfile>::new();
        mock.expect_insert(UserId::from("u1"))
            .return_err(StoreError::AlreadyExists("u1".into()));

        let client = ProfileClient::new(mock.client());
        let params = ProfileCreate::provisioned("a@b.c", None, None, Utc::now());
        let err = client
            .create_profile(UserId::from("u1"), params)
            .await
            .unwrap_err();
        assert_eq!(err, ProfileError::AlreadyExists("u1".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_add_favorite_returns_stored_profile() {
        let mut mock = MockClient::<UserProfile>::new();
        let mut stored = UserProfile::from_create(
            UserId::from("u1"),
            ProfileCreate::provisioned("a@b.c", None, None, Utc::now()),
        );
        stored.favorite_recipes.push(RecipeId::from("r9"));
        mock.expect_action(UserId::from("u1")).return_ok(stored.clone());

        let client = ProfileClient::new(mock.client());
        let profile = client
            .add_favorite(UserId::from("u1"), RecipeId::from("r9"))
            .await
            .unwrap();
        assert_eq!(profile, stored);
        mock.verify();
    }
}
