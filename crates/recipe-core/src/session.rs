//! # Session
//!
//! Who is signed in. A [`Session`] wraps an [`IdentityProvider`] and the
//! `profiles` collection, publishes [`SessionState`] through a `watch` channel
//! and is handed explicitly to whatever needs the current user.
//!
//! Signing in provisions a profile the first time an identity is seen. Signing
//! out tears the state back down to empty.

use crate::clients::ProfileClient;
use crate::error::AppError;
use crate::identity::{AuthError, Identity, IdentityProvider, MIN_PASSWORD_LEN};
use crate::model::{
    DietaryRestriction, ProfileCreate, ProfilePatch, Recipe, RecipeId, UserId, UserProfile,
};
use crate::profile_doc::ProfileError;
use crate::store::CollectionState;
use chrono::{DateTime, Utc};
use doc_store::DocumentClient;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub current_user: Option<UserProfile>,
    pub loading: bool,
}

/// Numbers shown on the profile screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileStats {
    pub total_recipes: usize,
    pub favorite_count: usize,
    pub account_age_days: u64,
}

pub struct Session {
    identity: Arc<dyn IdentityProvider>,
    profiles: ProfileClient,
    state: watch::Sender<SessionState>,
}

fn check(ok: bool, error: AuthError) -> Result<(), AppError> {
    if ok {
        Ok(())
    } else {
        Err(error.into())
    }
}

impl Session {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: ProfileClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            identity,
            profiles,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().current_user.clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.state.borrow().current_user.as_ref().map(|u| u.id.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_admin(&self) -> bool {
        self.state
            .borrow()
            .current_user
            .as_ref()
            .is_some_and(UserProfile::is_admin)
    }

    /// Edit and delete are offered on a recipe to its author and to admins.
    pub fn can_modify(&self, recipe: &Recipe) -> bool {
        self.state
            .borrow()
            .current_user
            .as_ref()
            .is_some_and(|u| u.is_admin() || recipe.is_owned_by(&u.id))
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.loading = loading);
    }

    fn set_user(&self, profile: UserProfile) {
        self.state.send_modify(move |s| s.current_user = Some(profile));
    }

    fn signed_in(&self) -> Result<UserId, AppError> {
        self.user_id().ok_or_else(|| AuthError::NotSignedIn.into())
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        check(!email.trim().is_empty(), AuthError::EmailRequired)?;
        self.set_loading(true);
        let result: Result<UserProfile, AppError> = async {
            let identity = self.identity.sign_in(email, password).await?;
            self.establish(identity).await
        }
        .await;
        self.set_loading(false);
        result
    }

    /// Creates an account. Name, password length and confirmation are checked
    /// before the identity provider is contacted.
    #[instrument(skip(self, password, confirm_password))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserProfile, AppError> {
        check(!name.trim().is_empty(), AuthError::NameRequired)?;
        check(!email.trim().is_empty(), AuthError::EmailRequired)?;
        check(password == confirm_password, AuthError::PasswordMismatch)?;
        check(password.len() >= MIN_PASSWORD_LEN, AuthError::PasswordTooShort)?;

        self.set_loading(true);
        let result: Result<UserProfile, AppError> = async {
            let identity = self.identity.sign_up(email, password, name.trim()).await?;
            self.establish(identity).await
        }
        .await;
        self.set_loading(false);
        result
    }

    async fn establish(&self, identity: Identity) -> Result<UserProfile, AppError> {
        let profile = self.provision(&identity).await?;
        info!(uid = %profile.id, "Session established");
        self.state.send_modify(|s| {
            s.identity = Some(identity);
            s.current_user = Some(profile.clone());
        });
        Ok(profile)
    }

    /// Loads the profile for `identity`, creating it with defaults if missing.
    async fn provision(&self, identity: &Identity) -> Result<UserProfile, AppError> {
        let uid = identity.uid.clone();
        if let Some(profile) = self.profiles.get(uid.clone()).await? {
            return Ok(profile);
        }

        let params = ProfileCreate::provisioned(
            &identity.email,
            identity.display_name.as_deref(),
            identity.photo_url.as_deref(),
            Utc::now(),
        );
        match self.profiles.create_profile(uid.clone(), params).await {
            Ok(profile) => {
                info!(%uid, "Provisioned profile");
                Ok(profile)
            }
            // Another sign-in for the same uid got there first.
            Err(ProfileError::AlreadyExists(_)) => self
                .profiles
                .get(uid.clone())
                .await?
                .ok_or_else(|| AppError::NotFound(uid.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Signs out and drops all session state.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AppError> {
        if let Err(e) = self.identity.sign_out().await {
            warn!(error = %e, "Provider sign-out failed");
            return Err(e.into());
        }
        self.state.send_replace(SessionState::default());
        info!("Signed out");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        check(!email.trim().is_empty(), AuthError::EmailRequired)?;
        self.identity.send_password_reset(email).await?;
        Ok(())
    }

    /// Re-reads the signed-in user's profile.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<UserProfile, AppError> {
        let identity = self
            .state
            .borrow()
            .identity
            .clone()
            .ok_or(AuthError::NotSignedIn)?;
        let profile = self.provision(&identity).await?;
        self.set_user(profile.clone());
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<UserProfile, AppError> {
        let uid = self.signed_in()?;
        let profile = self.profiles.update_profile(uid, patch).await?;
        self.set_user(profile.clone());
        Ok(profile)
    }

    pub async fn add_favorite(&self, recipe: RecipeId) -> Result<UserProfile, AppError> {
        let uid = self.signed_in()?;
        let profile = self.profiles.add_favorite(uid, recipe).await?;
        self.set_user(profile.clone());
        Ok(profile)
    }

    pub async fn remove_favorite(&self, recipe: RecipeId) -> Result<UserProfile, AppError> {
        let uid = self.signed_in()?;
        let profile = self.profiles.remove_favorite(uid, recipe).await?;
        self.set_user(profile.clone());
        Ok(profile)
    }

    pub async fn add_dietary_restriction(
        &self,
        restriction: DietaryRestriction,
    ) -> Result<UserProfile, AppError> {
        let uid = self.signed_in()?;
        let profile = self
            .profiles
            .add_dietary_restriction(uid, restriction)
            .await?;
        self.set_user(profile.clone());
        Ok(profile)
    }

    pub async fn remove_dietary_restriction(
        &self,
        restriction: DietaryRestriction,
    ) -> Result<UserProfile, AppError> {
        let uid = self.signed_in()?;
        let profile = self
            .profiles
            .remove_dietary_restriction(uid, restriction)
            .await?;
        self.set_user(profile.clone());
        Ok(profile)
    }

    /// Profile screen numbers: own recipes in the store, favorites on the
    /// profile, and whole days since the profile was created.
    pub fn stats(&self, recipes: &CollectionState, now: DateTime<Utc>) -> ProfileStats {
        let state = self.state.borrow();
        let Some(user) = state.current_user.as_ref() else {
            return ProfileStats::default();
        };
        ProfileStats {
            total_recipes: recipes.mine.len(),
            favorite_count: user.favorite_recipes.len(),
            account_age_days: (now - user.created_at).num_days().max(0) as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::identity::MemoryIdentityProvider;
    use crate::model::{Role, SkillLevel};
    use crate::profile_doc;
    use chrono::Duration;
    use doc_store::mock::MockClient;
    use doc_store::StoreError;

    fn real_session() -> (Session, Arc<MemoryIdentityProvider>) {
        let (actor, profiles) = profile_doc::new(16);
        tokio::spawn(actor.run(()));
        let provider = Arc::new(MemoryIdentityProvider::new());
        (Session::new(provider.clone(), profiles), provider)
    }

    #[tokio::test]
    async fn test_sign_up_provisions_defaults() {
        let (session, _) = real_session();
        let profile = session
            .sign_up("Ann", "ann@example.com", "secret1", "secret1")
            .await
            .unwrap();

        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.role, Role::Customer);
        assert_eq!(profile.preferences.skill_level, SkillLevel::Beginner);
        assert!(profile.preferences.dietary_restrictions.is_empty());
        assert_eq!(session.current_user(), Some(profile));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_second_sign_in_reuses_profile() {
        let (session, _) = real_session();
        let first = session
            .sign_up("Ann", "ann@example.com", "secret1", "secret1")
            .await
            .unwrap();
        session
            .update_profile(ProfilePatch {
                bio: Some("Loves soup".into()),
                ..ProfilePatch::default()
            })
            .await
            .unwrap();
        session.sign_out().await.unwrap();
        assert_eq!(session.current_user(), None);

        let again = session.sign_in("ann@example.com", "secret1").await.unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.bio.as_deref(), Some("Loves soup"));
    }

    #[tokio::test]
    async fn test_sign_up_local_checks_skip_provider() {
        let (session, provider) = real_session();

        let err = session
            .sign_up("Ann", "ann@example.com", "secret1", "secret2")
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation("Passwords do not match".into()));

        let err = session
            .sign_up("Ann", "ann@example.com", "abc", "abc")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = session
            .sign_up("  ", "ann@example.com", "secret1", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // Nothing reached the provider: the address is still free.
        let err = provider.sign_in("ann@example.com", "secret1").await.unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_error() {
        let (session, _) = real_session();
        session
            .sign_up("Ann", "ann@example.com", "secret1", "secret1")
            .await
            .unwrap();
        session.sign_out().await.unwrap();

        let err = session.sign_in("ann@example.com", "nope").await.unwrap_err();
        assert_eq!(err, AppError::Auth("Incorrect password".into()));
        assert!(!session.is_loading());
        assert_eq!(session.current_user(), None);
    }

    #[tokio::test]
    async fn test_provisioning_failure_leaves_session_empty() {
        let mut mock = MockClient::<UserProfile>::new();
        let provider = Arc::new(MemoryIdentityProvider::new());
        let identity = provider.sign_up("bo@example.com", "secret1", "").await.unwrap();

        mock.expect_get(identity.uid.clone()).return_ok(None);
        mock.expect_insert(identity.uid.clone())
            .return_err(StoreError::ChannelClosed);

        let session = Session::new(provider, ProfileClient::new(mock.client()));
        let err = session.sign_in("bo@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(session.current_user(), None);
        mock.verify();
    }

    #[tokio::test]
    async fn test_can_modify_owner_or_admin() {
        let (session, _) = real_session();
        let me = session
            .sign_up("Ann", "ann@example.com", "secret1", "secret1")
            .await
            .unwrap();

        let mine = sample_recipe(me.id.clone());
        let theirs = sample_recipe(UserId::from("someone-else"));

        assert!(session.can_modify(&mine));
        assert!(!session.can_modify(&theirs));
        assert!(!session.is_admin());

        let mut admin = me.clone();
        admin.role = Role::Admin;
        session.set_user(admin);
        assert!(session.is_admin());
        assert!(session.can_modify(&theirs));
    }

    #[tokio::test]
    async fn test_favorites_and_stats() {
        let (session, _) = real_session();
        let me = session
            .sign_up("Ann", "ann@example.com", "secret1", "secret1")
            .await
            .unwrap();

        session.add_favorite(RecipeId::from("r1")).await.unwrap();
        session.add_favorite(RecipeId::from("r1")).await.unwrap();
        session.add_favorite(RecipeId::from("r2")).await.unwrap();
        let profile = session.remove_favorite(RecipeId::from("r2")).await.unwrap();
        assert_eq!(profile.favorite_recipes, vec![RecipeId::from("r1")]);

        session
            .add_dietary_restriction(DietaryRestriction::Vegan)
            .await
            .unwrap();
        let profile = session
            .add_dietary_restriction(DietaryRestriction::Vegan)
            .await
            .unwrap();
        assert_eq!(profile.preferences.dietary_restrictions.len(), 1);

        let recipes = CollectionState {
            mine: vec![sample_recipe(me.id.clone()), sample_recipe(me.id.clone())],
            ..CollectionState::default()
        };
        let stats = session.stats(&recipes, me.created_at + Duration::days(3));
        assert_eq!(
            stats,
            ProfileStats {
                total_recipes: 2,
                favorite_count: 1,
                account_age_days: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_profile_edits_need_sign_in() {
        let (session, _) = real_session();
        let err = session
            .add_favorite(RecipeId::from("r1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(session.refresh().await.unwrap_err().kind(), ErrorKind::Auth);
        assert_eq!(
            session.stats(&CollectionState::default(), Utc::now()),
            ProfileStats::default()
        );
    }

    fn sample_recipe(author: UserId) -> Recipe {
        use crate::model::{Category, Difficulty, Ingredient, RecipeCreate, RecipeDraft};
        Recipe::from_create(
            RecipeId::from("sample"),
            RecipeCreate {
                author_id: author,
                draft: RecipeDraft {
                    title: "Toast".into(),
                    description: String::new(),
                    category: Category::Breakfast,
                    difficulty: Difficulty::Easy,
                    cooking_time: 3,
                    servings: 1,
                    ingredients: vec![Ingredient::new("Bread", "2", "slices")],
                    instructions: vec!["Toast it".into()],
                    image_url: None,
                    tags: vec![],
                },
                created_at: Utc::now(),
            },
        )
    }
}
