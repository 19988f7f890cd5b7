//! Error types for the `recipes` collection.

use thiserror::Error;

/// Errors that can occur during recipe operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecipeError {
    /// A required field is missing or empty. The message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// The requested recipe was not found.
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// Ratings live on a 0 to 5 scale.
    #[error("Rating must be between 0 and 5, got {0}")]
    InvalidRating(f32),

    /// An error occurred while talking to the recipe collection.
    #[error("Recipe store error: {0}")]
    StoreCommunicationError(String),
}
