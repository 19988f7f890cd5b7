//! # Identity Provider
//!
//! The seam to whatever authenticates users. The core only consumes the resulting
//! [`Identity`]; credentials never leave the provider.
//!
//! [`MemoryIdentityProvider`] keeps accounts in memory and reports failures with
//! the same user-facing messages a hosted auth service produces.

use crate::model::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub uid: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("No account found with this email address")]
    UserNotFound,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("An account with this email already exists")]
    EmailInUse,
    #[error("Password is too weak")]
    WeakPassword,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Please enter your full name")]
    NameRequired,
    #[error("Please enter your email")]
    EmailRequired,
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Authentication failed: {0}")]
    Provider(String),
}

impl AuthError {
    /// True for failures detected before the provider is contacted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AuthError::PasswordMismatch
                | AuthError::PasswordTooShort
                | AuthError::NameRequired
                | AuthError::EmailRequired
        )
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

struct Account {
    uid: UserId,
    password: String,
    display_name: Option<String>,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    resets: Vec<String>,
}

/// In-memory [`IdentityProvider`]. Emails are matched case-insensitively and
/// uids are random v4 UUIDs.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<Accounts>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails that were sent a reset link, oldest first.
    pub async fn reset_requests(&self) -> Vec<String> {
        self.accounts.lock().await.resets.clone()
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email)?;
        let accounts = self.accounts.lock().await;
        let account = accounts.by_email.get(&email).ok_or(AuthError::UserNotFound)?;
        if account.password != password {
            warn!(%email, "Wrong password");
            return Err(AuthError::WrongPassword);
        }
        info!(uid = %account.uid, "Signed in");
        Ok(Identity {
            uid: account.uid.clone(),
            email,
            display_name: account.display_name.clone(),
            photo_url: None,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AuthError> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut accounts = self.accounts.lock().await;
        if accounts.by_email.contains_key(&email) {
            return Err(AuthError::EmailInUse);
        }

        let uid = UserId(Uuid::new_v4().to_string());
        let display_name = Some(display_name.trim().to_string()).filter(|n| !n.is_empty());
        accounts.by_email.insert(
            email.clone(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
                display_name: display_name.clone(),
            },
        );
        info!(%uid, "Account created");
        Ok(Identity {
            uid,
            email,
            display_name,
            photo_url: None,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        debug!("Signed out");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;
        let mut accounts = self.accounts.lock().await;
        if !accounts.by_email.contains_key(&email) {
            return Err(AuthError::UserNotFound);
        }
        info!(%email, "Password reset sent");
        accounts.resets.push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let provider = MemoryIdentityProvider::new();
        let created = provider
            .sign_up("Cook@Example.com", "secret1", "Cook")
            .await
            .unwrap();
        assert_eq!(created.email, "cook@example.com");

        let signed_in = provider.sign_in("cook@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
        assert_eq!(signed_in.display_name.as_deref(), Some("Cook"));
    }

    #[tokio::test]
    async fn test_provider_error_messages() {
        let provider = MemoryIdentityProvider::new();
        provider.sign_up("a@b.co", "secret1", "A").await.unwrap();

        let err = provider.sign_in("a@b.co", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password");

        let err = provider.sign_in("x@b.co", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "No account found with this email address");

        let err = provider.sign_up("a@b.co", "secret1", "A").await.unwrap_err();
        assert_eq!(err, AuthError::EmailInUse);

        let err = provider.sign_up("not-an-email", "secret1", "A").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidEmail);

        let err = provider.sign_up("c@b.co", "123", "C").await.unwrap_err();
        assert_eq!(err, AuthError::WeakPassword);
    }

    #[tokio::test]
    async fn test_password_reset_is_recorded() {
        let provider = MemoryIdentityProvider::new();
        provider.sign_up("a@b.co", "secret1", "A").await.unwrap();

        provider.send_password_reset("A@B.co").await.unwrap();
        assert_eq!(provider.reset_requests().await, vec!["a@b.co".to_string()]);

        let err = provider.send_password_reset("z@b.co").await.unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
    }
}
