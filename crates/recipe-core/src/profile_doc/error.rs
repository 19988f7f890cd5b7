//! Error types for the `profiles` collection.

use thiserror::Error;

/// Errors that can occur during profile operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    /// The requested profile was not found.
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// A profile already exists under this uid.
    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    /// The profile data provided is invalid.
    #[error("{0}")]
    Validation(String),

    /// An error occurred while talking to the profile collection.
    #[error("Profile store error: {0}")]
    StoreCommunicationError(String),
}
