//! Custom actions for the `recipes` collection.
//!
//! Favoriting and rating are not author edits: any signed-in user may perform
//! them, and they never touch `updated_at`.

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeAction {
    /// Sets the favorite flag to the given value.
    SetFavorite(bool),
    /// Replaces the rating.
    ///
    /// # Errors
    /// Fails unless the value is within 0 to 5.
    Rate(f32),
}

/// Results from RecipeActions, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeActionResult {
    /// The stored flag after the action.
    Favorite(bool),
    /// The stored rating after the action.
    Rated(f32),
}
