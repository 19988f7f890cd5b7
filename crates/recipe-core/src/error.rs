//! # Application Errors
//!
//! [`AppError`] is what the store and session hand back to the presentation
//! layer. Its [`ErrorKind`] lets a screen tell a form mistake
//! apart from a rejected sign-in, a vanished record or a backend failure.

use crate::identity::AuthError;
use crate::profile_doc::ProfileError;
use crate::recipe_doc::RecipeError;
use doc_store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input broke a field rule, caught locally or by the collection
    /// re-checking it.
    Validation,
    Auth,
    NotFound,
    /// Network, permission or any other backend failure.
    Persistence,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Persistence(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Auth(_) => ErrorKind::Auth,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound(id),
            other => AppError::Persistence(other.to_string()),
        }
    }
}

impl From<RecipeError> for AppError {
    fn from(e: RecipeError) -> Self {
        // Local and collection-side rule failures share a kind.
        match e {
            RecipeError::Validation(msg) => AppError::Validation(msg),
            RecipeError::InvalidRating(_) => AppError::Validation(e.to_string()),
            RecipeError::NotFound(id) => AppError::NotFound(id),
            RecipeError::StoreCommunicationError(msg) => AppError::Persistence(msg),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::Validation(msg) => AppError::Validation(msg),
            ProfileError::NotFound(id) => AppError::NotFound(id),
            other => AppError::Persistence(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.is_local() {
            AppError::Validation(e.to_string())
        } else {
            AppError::Auth(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_kinds() {
        let not_found: AppError = StoreError::NotFound("x".into()).into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let closed: AppError = StoreError::ChannelClosed.into();
        assert_eq!(closed.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_recipe_validation_keeps_message() {
        let err: AppError = RecipeError::Validation("Recipe title is required".into()).into();
        assert_eq!(err, AppError::Validation("Recipe title is required".into()));
        assert_eq!(err.to_string(), "Recipe title is required");
    }

    #[test]
    fn test_collection_side_validation_is_still_validation() {
        use crate::clients::{ProfileClient, RecipeClient};
        use doc_store::DocumentClient;

        let wrapped = StoreError::document(RecipeError::Validation(
            "Recipe title cannot be empty".into(),
        ));
        let err: AppError = RecipeClient::map_error(wrapped).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let wrapped = StoreError::document(ProfileError::Validation("Name cannot be empty".into()));
        let err: AppError = ProfileClient::map_error(wrapped).into();
        assert_eq!(err, AppError::Validation("Name cannot be empty".into()));
    }

    #[test]
    fn test_auth_errors_split_local_and_provider() {
        let local: AppError = AuthError::PasswordMismatch.into();
        assert_eq!(local.kind(), ErrorKind::Validation);

        let remote: AppError = AuthError::WrongPassword.into();
        assert_eq!(remote.kind(), ErrorKind::Auth);
        assert_eq!(remote.to_string(), "Incorrect password");
    }
}
