use async_trait::async_trait;
use chrono::Utc;
use doc_store::mock::MockClient;
use doc_store::StoreError;
use recipe_core::clients::ProfileClient;
use recipe_core::error::ErrorKind;
use recipe_core::identity::{AuthError, Identity, IdentityProvider};
use recipe_core::model::{ProfileCreate, RecipeId, UserId, UserProfile};
use recipe_core::session::Session;
use std::sync::Arc;

/// Identity provider that always resolves to the same principal, so the
/// profile requests it triggers can be scripted by uid.
struct FixedIdentity;

fn identity() -> Identity {
    Identity {
        uid: UserId::from("uid-7"),
        email: "grace@example.com".to_string(),
        display_name: None,
        photo_url: None,
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        Ok(identity())
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: &str,
    ) -> Result<Identity, AuthError> {
        Ok(identity())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

fn stored_profile() -> UserProfile {
    UserProfile::from_create(
        UserId::from("uid-7"),
        ProfileCreate::provisioned("grace@example.com", None, None, Utc::now()),
    )
}

/// Real session logic over a scripted `profiles` collection.
///
/// Two sign-ins for the same uid race: ours sees no profile, tries to insert
/// and loses. The session must fall back to reading the winner's profile.
#[tokio::test]
async fn test_sign_in_recovers_from_provisioning_race() {
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_get(UserId::from("uid-7")).return_ok(None);
    profiles
        .expect_insert(UserId::from("uid-7"))
        .return_err(StoreError::AlreadyExists("uid-7".to_string()));
    profiles
        .expect_get(UserId::from("uid-7"))
        .return_ok(Some(stored_profile()));

    let session = Session::new(Arc::new(FixedIdentity), ProfileClient::new(profiles.client()));
    let profile = session.sign_in("grace@example.com", "whatever").await.unwrap();

    assert_eq!(profile.id, UserId::from("uid-7"));
    // No display name: falls back to the email's local part.
    assert_eq!(profile.name, "grace");
    assert_eq!(session.user_id(), Some(UserId::from("uid-7")));
    assert!(!session.is_loading());
    profiles.verify();
}

#[tokio::test]
async fn test_favorite_failure_keeps_cached_profile() {
    let mut profiles = MockClient::<UserProfile>::new();
    profiles
        .expect_get(UserId::from("uid-7"))
        .return_ok(Some(stored_profile()));
    profiles
        .expect_action(UserId::from("uid-7"))
        .return_err(StoreError::ChannelClosed);

    let session = Session::new(Arc::new(FixedIdentity), ProfileClient::new(profiles.client()));
    session.sign_in("grace@example.com", "whatever").await.unwrap();

    let err = session
        .add_favorite(RecipeId::from("recipe_1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);

    let cached = session.current_user().unwrap();
    assert!(cached.favorite_recipes.is_empty());
    profiles.verify();
}

#[tokio::test]
async fn test_blank_email_never_reaches_collection() {
    let profiles = MockClient::<UserProfile>::new();
    let session = Session::new(Arc::new(FixedIdentity), ProfileClient::new(profiles.client()));

    let err = session.sign_in("   ", "whatever").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Please enter your email");
    assert_eq!(profiles.request_count(), 0);
    assert!(session.current_user().is_none());
}
