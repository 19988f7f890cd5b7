use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::user::UserId;
use crate::recipe_doc::RecipeError;

/// Type-safe identifier for Recipes.
///
/// Generated keys look like `recipe_7`; keys handed out by another backend can be
/// wrapped as-is with `RecipeId::from("abc")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl From<u32> for RecipeId {
    fn from(id: u32) -> Self {
        Self(format!("recipe_{id}"))
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Beverage,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Dinner => "dinner",
            Category::Dessert => "dessert",
            Category::Snack => "snack",
            Category::Beverage => "beverage",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }

    /// An ingredient counts only when both its name and quantity are filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.quantity.trim().is_empty()
    }

    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            unit: self.unit.trim().to_string(),
        }
    }
}

/// A user-authored recipe.
///
/// # Document Store
/// Stored in the `recipes` collection; see
/// [`impl Document for Recipe`](crate::recipe_doc) for creation, patch and action handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Minutes.
    pub cooking_time: u32,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rating: f32,
    pub is_favorite: bool,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Builds the stored record for a create request.
    ///
    /// The draft is normalized first. New recipes start unrated and not favorited.
    pub fn from_create(id: RecipeId, params: RecipeCreate) -> Self {
        let draft = params.draft.normalized();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            difficulty: draft.difficulty,
            cooking_time: draft.cooking_time,
            servings: draft.servings,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            image_url: draft.image_url,
            tags: draft.tags,
            rating: 0.0,
            is_favorite: false,
            author_id: params.author_id,
            created_at: params.created_at,
            updated_at: params.created_at,
        }
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// Applies a patch in place. Call [`RecipePatch::validate`] first.
    pub fn apply(&mut self, patch: RecipePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(cooking_time) = patch.cooking_time {
            self.cooking_time = cooking_time;
        }
        if let Some(servings) = patch.servings {
            self.servings = servings;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = clean_ingredients(ingredients);
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = clean_steps(instructions);
        }
        if let Some(image_url) = patch.image_url {
            let image_url = image_url.trim().to_string();
            self.image_url = (!image_url.is_empty()).then_some(image_url);
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

fn clean_ingredients(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    ingredients
        .into_iter()
        .filter(Ingredient::is_complete)
        .map(Ingredient::trimmed)
        .collect()
}

fn clean_steps(steps: Vec<String>) -> Vec<String> {
    steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Author-editable fields of a new recipe, as entered in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub cooking_time: u32,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeDraft {
    /// Checks the required fields.
    ///
    /// Blank ingredient rows and blank steps do not count, since the form drops
    /// them before saving.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.title.trim().is_empty() {
            return Err(RecipeError::Validation("Recipe title is required".into()));
        }
        if self.cooking_time == 0 {
            return Err(RecipeError::Validation(
                "Please enter a valid cooking time".into(),
            ));
        }
        if self.servings == 0 {
            return Err(RecipeError::Validation(
                "Please enter valid number of servings".into(),
            ));
        }
        if !self.ingredients.iter().any(Ingredient::is_complete) {
            return Err(RecipeError::Validation(
                "At least one ingredient is required".into(),
            ));
        }
        if !self.instructions.iter().any(|s| !s.trim().is_empty()) {
            return Err(RecipeError::Validation(
                "At least one instruction step is required".into(),
            ));
        }
        Ok(())
    }

    /// Trims text and strips blank ingredients and steps.
    pub fn normalized(self) -> Self {
        let image_url = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients: clean_ingredients(self.ingredients),
            instructions: clean_steps(self.instructions),
            image_url,
            ..self
        }
    }
}

/// Create payload for the `recipes` collection.
///
/// Carries the author and creation instant so the caller can rebuild exactly the
/// record the collection stores once it learns the generated id.
#[derive(Debug, Clone)]
pub struct RecipeCreate {
    pub author_id: UserId,
    pub draft: RecipeDraft,
    pub created_at: DateTime<Utc>,
}

/// Partial update. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub cooking_time: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    /// `Some("")` removes the image.
    pub image_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl RecipePatch {
    /// Any field that is present must not be empty.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(RecipeError::Validation(
                "Recipe title cannot be empty".into(),
            ));
        }
        if self.cooking_time == Some(0) {
            return Err(RecipeError::Validation(
                "Please enter a valid cooking time".into(),
            ));
        }
        if self.servings == Some(0) {
            return Err(RecipeError::Validation(
                "Please enter valid number of servings".into(),
            ));
        }
        if matches!(&self.ingredients, Some(list) if !list.iter().any(Ingredient::is_complete)) {
            return Err(RecipeError::Validation(
                "At least one ingredient is required".into(),
            ));
        }
        if matches!(&self.instructions, Some(steps) if !steps.iter().any(|s| !s.trim().is_empty()))
        {
            return Err(RecipeError::Validation(
                "Cooking instructions cannot be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryOrder {
    #[default]
    NewestFirst,
    /// Highest rating first, ties broken newest first.
    TopRated,
}

/// The predicates the `recipes` collection evaluates itself: equality and range
/// checks plus ordering and a limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeQuery {
    pub author: Option<UserId>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub max_cooking_time: Option<u32>,
    pub favorites_only: bool,
    pub min_rating: Option<f32>,
    pub order: QueryOrder,
    pub limit: Option<usize>,
}

impl RecipeQuery {
    pub fn by_author(author: UserId) -> Self {
        Self {
            author: Some(author),
            ..Self::default()
        }
    }

    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn popular(min_rating: f32, limit: usize) -> Self {
        Self {
            min_rating: Some(min_rating),
            order: QueryOrder::TopRated,
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.author.as_ref().map_or(true, |a| &recipe.author_id == a)
            && self.category.map_or(true, |c| recipe.category == c)
            && self.difficulty.map_or(true, |d| recipe.difficulty == d)
            && self.max_cooking_time.map_or(true, |m| recipe.cooking_time <= m)
            && (!self.favorites_only || recipe.is_favorite)
            && self.min_rating.map_or(true, |r| recipe.rating >= r)
    }
}
