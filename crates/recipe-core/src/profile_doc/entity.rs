//! Document trait implementation for [`UserProfile`].

use super::error::ProfileError;
use crate::model::{
    DietaryRestriction, ProfileCreate, ProfilePatch, RecipeId, Role, UserId, UserProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use doc_store::Document;

/// List edits on a profile. Each returns the stored profile afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    /// Adds a recipe to the favorites list unless it is already there.
    AddFavorite(RecipeId),
    RemoveFavorite(RecipeId),
    AddDietaryRestriction(DietaryRestriction),
    RemoveDietaryRestriction(DietaryRestriction),
}

/// Profile lookups. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileQuery {
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[async_trait]
impl Document for UserProfile {
    type Id = UserId;
    type Create = ProfileCreate;
    type Patch = ProfilePatch;
    type Query = ProfileQuery;
    type Action = ProfileAction;
    type ActionResult = UserProfile;
    type Context = ();
    type Error = ProfileError;

    fn from_create_params(id: UserId, params: ProfileCreate) -> Result<Self, ProfileError> {
        if params.email.trim().is_empty() {
            return Err(ProfileError::Validation("Email is required".into()));
        }
        Ok(UserProfile::from_create(id, params))
    }

    async fn on_update(&mut self, patch: ProfilePatch, _ctx: &()) -> Result<(), ProfileError> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ProfileError::Validation("Name cannot be empty".into()));
            }
            self.name = name.to_string();
        }
        if let Some(bio) = patch.bio {
            let bio = bio.trim().to_string();
            self.bio = (!bio.is_empty()).then_some(bio);
        }
        if let Some(image) = patch.profile_image {
            self.profile_image = (!image.is_empty()).then_some(image);
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = preferences;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProfileAction,
        _ctx: &(),
    ) -> Result<UserProfile, ProfileError> {
        match action {
            ProfileAction::AddFavorite(recipe) => {
                if !self.favorite_recipes.contains(&recipe) {
                    self.favorite_recipes.push(recipe);
                }
            }
            ProfileAction::RemoveFavorite(recipe) => {
                self.favorite_recipes.retain(|r| r != &recipe);
            }
            ProfileAction::AddDietaryRestriction(restriction) => {
                self.preferences.dietary_restrictions.insert(restriction);
            }
            ProfileAction::RemoveDietaryRestriction(restriction) => {
                self.preferences.dietary_restrictions.remove(&restriction);
            }
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }

    fn select(docs: Vec<&Self>, query: &ProfileQuery) -> Vec<Self> {
        docs.into_iter()
            .filter(|p| {
                query
                    .email
                    .as_ref()
                    .map_or(true, |e| p.email.eq_ignore_ascii_case(e))
                    && query.role.map_or(true, |r| p.role == r)
            })
            .cloned()
            .collect()
    }
}
