//! # Filter Engine
//!
//! Pure functions deriving the displayable subset of a recipe list.
//!
//! [`FilterCriteria`] is a conjunction of [`Predicate`]s: a recipe is kept only
//! when it satisfies every one of them, so criteria compose with
//! [`FilterCriteria::and`] and filtering twice equals filtering once with the
//! combined criteria. Filtering is stable and never mutates its input.
//!
//! The home screen shows three overlapping segments. [`HomeSegments::apply`]
//! filters them together and, when mine-only is active, empties the recent and
//! popular segments instead of filtering them.

use crate::model::{Category, Difficulty, QueryOrder, Recipe, RecipeQuery, UserId};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Category(Category),
    /// Case-insensitive substring of the title, description or any ingredient name.
    Text(String),
    FavoritesOnly,
    /// Mine-only. `None` means nobody is signed in, which matches nothing.
    AuthoredBy(Option<UserId>),
    Difficulty(Difficulty),
    /// Inclusive upper bound in minutes.
    MaxCookingTime(u32),
}

impl Predicate {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Predicate::Category(c) => recipe.category == *c,
            Predicate::Text(needle) => text_matches(recipe, needle),
            Predicate::FavoritesOnly => recipe.is_favorite,
            Predicate::AuthoredBy(Some(user)) => recipe.is_owned_by(user),
            Predicate::AuthoredBy(None) => false,
            Predicate::Difficulty(d) => recipe.difficulty == *d,
            Predicate::MaxCookingTime(max) => recipe.cooking_time <= *max,
        }
    }
}

fn text_matches(recipe: &Recipe, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    recipe.title.to_lowercase().contains(&needle)
        || recipe.description.to_lowercase().contains(&needle)
        || recipe
            .ingredients
            .iter()
            .any(|i| i.name.to_lowercase().contains(&needle))
}

/// Active filters, ANDed together. The empty criteria keeps everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    predicates: Vec<Predicate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        if let Predicate::Text(q) = &predicate {
            if q.trim().is_empty() {
                return self;
            }
        }
        if !self.predicates.contains(&predicate) {
            self.predicates.push(predicate);
        }
        self
    }

    pub fn category(self, category: Category) -> Self {
        self.with(Predicate::Category(category))
    }

    /// Whitespace-only text is ignored.
    pub fn text(self, query: impl Into<String>) -> Self {
        self.with(Predicate::Text(query.into()))
    }

    pub fn favorites_only(self) -> Self {
        self.with(Predicate::FavoritesOnly)
    }

    pub fn mine_only(self, user: Option<UserId>) -> Self {
        self.with(Predicate::AuthoredBy(user))
    }

    pub fn difficulty(self, difficulty: Difficulty) -> Self {
        self.with(Predicate::Difficulty(difficulty))
    }

    pub fn max_cooking_time(self, minutes: u32) -> Self {
        self.with(Predicate::MaxCookingTime(minutes))
    }

    /// Conjunction: a recipe must satisfy both `self` and `other`.
    pub fn and(self, other: FilterCriteria) -> Self {
        other.predicates.into_iter().fold(self, Self::with)
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn is_mine_only(&self) -> bool {
        self.predicates
            .iter()
            .any(|p| matches!(p, Predicate::AuthoredBy(_)))
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.predicates.iter().all(|p| p.matches(recipe))
    }

    /// Splits the criteria into what the persistence provider can evaluate
    /// (equality and range checks) and the remainder applied locally.
    ///
    /// The query has one slot per field; a second predicate on the same field
    /// stays in the remainder.
    pub fn split(&self) -> (RecipeQuery, FilterCriteria) {
        let mut query = RecipeQuery {
            order: QueryOrder::NewestFirst,
            ..RecipeQuery::default()
        };
        let mut rest = FilterCriteria::new();
        for p in &self.predicates {
            match p {
                Predicate::Category(c) if query.category.is_none() => query.category = Some(*c),
                Predicate::Difficulty(d) if query.difficulty.is_none() => {
                    query.difficulty = Some(*d)
                }
                Predicate::MaxCookingTime(m) if query.max_cooking_time.is_none() => {
                    query.max_cooking_time = Some(*m)
                }
                other => rest.predicates.push(other.clone()),
            }
        }
        (query, rest)
    }
}

/// Stable filter: the result is a subsequence of `list`.
pub fn filter_recipes(list: &[Recipe], criteria: &FilterCriteria) -> Vec<Recipe> {
    list.iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// Concatenates the lists, keeping the first occurrence of each id.
pub fn dedupe_by_id<'a>(lists: impl IntoIterator<Item = &'a [Recipe]>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|r| seen.insert(r.id.clone()))
        .cloned()
        .collect()
}

/// Stable sort, newest `created_at` first.
pub fn sort_newest_first(list: &mut [Recipe]) {
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// The three home screen lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSegments {
    pub recent: Vec<Recipe>,
    pub popular: Vec<Recipe>,
    pub mine: Vec<Recipe>,
}

impl HomeSegments {
    /// Filters every segment with `criteria`. Under mine-only the recent and
    /// popular segments come back empty.
    pub fn apply(&self, criteria: &FilterCriteria) -> HomeSegments {
        if criteria.is_mine_only() {
            return HomeSegments {
                recent: Vec::new(),
                popular: Vec::new(),
                mine: filter_recipes(&self.mine, criteria),
            };
        }
        HomeSegments {
            recent: filter_recipes(&self.recent, criteria),
            popular: filter_recipes(&self.popular, criteria),
            mine: filter_recipes(&self.mine, criteria),
        }
    }

    /// Union of recent, popular and mine, in that order, without repeats.
    pub fn merged(&self) -> Vec<Recipe> {
        dedupe_by_id([
            self.recent.as_slice(),
            self.popular.as_slice(),
            self.mine.as_slice(),
        ])
    }
}

/// The filter switches on the home screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterToggles {
    pub category: Option<Category>,
    pub mine_only: bool,
    pub favorites_only: bool,
    pub query: String,
}

impl FilterToggles {
    /// Selecting the active category again clears it.
    pub fn select_category(&mut self, category: Category) {
        self.category = if self.category == Some(category) {
            None
        } else {
            Some(category)
        };
    }

    /// Mine-only and favorites-only exclude each other.
    pub fn toggle_mine_only(&mut self) {
        self.mine_only = !self.mine_only;
        self.favorites_only = false;
    }

    pub fn toggle_favorites_only(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.mine_only = false;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn criteria(&self, current_user: Option<&UserId>) -> FilterCriteria {
        let mut criteria = FilterCriteria::new().text(self.query.clone());
        if let Some(category) = self.category {
            criteria = criteria.category(category);
        }
        if self.favorites_only {
            criteria = criteria.favorites_only();
        }
        if self.mine_only {
            criteria = criteria.mine_only(current_user.cloned());
        }
        criteria
    }
}
