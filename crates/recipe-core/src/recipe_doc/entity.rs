//! Document trait implementation for [`Recipe`].
//!
//! Creation re-checks the draft so a record that slipped past the caller's
//! validation is still refused. Queries are answered with [`RecipeQuery`]
//! predicates, ordering and limit.

use super::actions::{RecipeAction, RecipeActionResult};
use super::error::RecipeError;
use crate::model::{QueryOrder, Recipe, RecipeCreate, RecipeId, RecipePatch, RecipeQuery};
use async_trait::async_trait;
use chrono::Utc;
use doc_store::Document;

pub(crate) fn check_rating(rating: f32) -> Result<(), RecipeError> {
    if rating.is_finite() && (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(RecipeError::InvalidRating(rating))
    }
}

#[async_trait]
impl Document for Recipe {
    type Id = RecipeId;
    type Create = RecipeCreate;
    type Patch = RecipePatch;
    type Query = RecipeQuery;
    type Action = RecipeAction;
    type ActionResult = RecipeActionResult;
    type Context = ();
    type Error = RecipeError;

    fn from_create_params(id: RecipeId, params: RecipeCreate) -> Result<Self, RecipeError> {
        params.draft.validate()?;
        Ok(Recipe::from_create(id, params))
    }

    /// Applies the provided fields and stamps `updated_at`.
    async fn on_update(&mut self, patch: RecipePatch, _ctx: &()) -> Result<(), RecipeError> {
        patch.validate()?;
        self.apply(patch, Utc::now());
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RecipeAction,
        _ctx: &(),
    ) -> Result<RecipeActionResult, RecipeError> {
        match action {
            RecipeAction::SetFavorite(value) => {
                self.is_favorite = value;
                Ok(RecipeActionResult::Favorite(value))
            }
            RecipeAction::Rate(rating) => {
                check_rating(rating)?;
                self.rating = rating;
                Ok(RecipeActionResult::Rated(rating))
            }
        }
    }

    fn select(docs: Vec<&Self>, query: &RecipeQuery) -> Vec<Self> {
        let mut hits: Vec<Recipe> = docs
            .into_iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        match query.order {
            QueryOrder::NewestFirst => hits.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            QueryOrder::TopRated => hits.sort_by(|a, b| {
                b.rating
                    .total_cmp(&a.rating)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }

        if let Some(limit) = query.limit {
            hits.truncate(limit);
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Difficulty, Ingredient, RecipeDraft, UserId};
    use chrono::{Duration, TimeZone};

    fn recipe(id: &str, rating: f32, minutes_ago: i64) -> Recipe {
        let created =
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() - Duration::minutes(minutes_ago);
        let mut r = Recipe::from_create(
            RecipeId::from(id),
            RecipeCreate {
                author_id: UserId::from("u1"),
                draft: RecipeDraft {
                    title: id.to_string(),
                    description: String::new(),
                    category: Category::Dinner,
                    difficulty: Difficulty::Easy,
                    cooking_time: 20,
                    servings: 2,
                    ingredients: vec![Ingredient::new("rice", "1", "cup")],
                    instructions: vec!["cook".into()],
                    image_url: None,
                    tags: vec![],
                },
                created_at: created,
            },
        );
        r.rating = rating;
        r
    }

    #[test]
    fn test_top_rated_breaks_ties_newest_first() {
        let a = recipe("a", 4.5, 30);
        let b = recipe("b", 4.5, 10);
        let c = recipe("c", 3.0, 0);
        let d = recipe("d", 5.0, 60);

        let hits = Recipe::select(vec![&a, &b, &c, &d], &RecipeQuery::popular(4.0, 10));
        let ids: Vec<&str> = hits.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "a"]);
    }

    #[test]
    fn test_limit_applies_after_ordering() {
        let a = recipe("a", 0.0, 30);
        let b = recipe("b", 0.0, 10);
        let c = recipe("c", 0.0, 20);

        let hits = Recipe::select(vec![&a, &b, &c], &RecipeQuery::recent(2));
        let ids: Vec<&str> = hits.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_rate_rejects_out_of_range() {
        let mut r = recipe("a", 2.0, 0);
        let err = r.handle_action(RecipeAction::Rate(5.5), &()).await.unwrap_err();
        assert_eq!(err, RecipeError::InvalidRating(5.5));
        assert_eq!(r.rating, 2.0);

        let ok = r.handle_action(RecipeAction::Rate(4.0), &()).await.unwrap();
        assert_eq!(ok, RecipeActionResult::Rated(4.0));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let mut r = recipe("a", 0.0, 0);
        let patch = RecipePatch {
            title: Some("   ".into()),
            ..RecipePatch::default()
        };
        let err = r.on_update(patch, &()).await.unwrap_err();
        assert!(matches!(err, RecipeError::Validation(_)));
    }
}
