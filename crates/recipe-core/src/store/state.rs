//! Collection state and its pure reducer.
//!
//! Every change to [`CollectionState`] goes through [`reduce`], so the whole
//! state machine is testable without a runtime or a backend.
//!
//! ## Epochs
//!
//! The state carries a view epoch that [`StoreCommand::Navigated`] bumps. Each
//! completion is tagged with the epoch its operation started under:
//!
//! - list loads and status changes from an older epoch are dropped;
//! - record changes the backend already confirmed (created, updated, deleted,
//!   rated) are still applied to the cached lists, but leave the status alone.

use crate::filter::HomeSegments;
use crate::model::{Recipe, RecipeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Human-readable failure message.
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    /// The signed-in user's own recipes, newest first.
    pub mine: Vec<Recipe>,
    pub recent: Vec<Recipe>,
    pub popular: Vec<Recipe>,
    pub search_results: Vec<Recipe>,
    pub status: LoadStatus,
    pub epoch: u64,
}

impl CollectionState {
    /// The home screen's view: `mine` is cut to its first `mine_limit` entries.
    pub fn segments(&self, mine_limit: usize) -> HomeSegments {
        HomeSegments {
            recent: self.recent.clone(),
            popular: self.popular.clone(),
            mine: self.mine.iter().take(mine_limit).cloned().collect(),
        }
    }

    /// First cached copy of the recipe, looking through every list.
    pub fn find(&self, id: &RecipeId) -> Option<&Recipe> {
        self.lists().flat_map(|l| l.iter()).find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.find(id).is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    fn lists(&self) -> impl Iterator<Item = &Vec<Recipe>> {
        [&self.mine, &self.recent, &self.popular, &self.search_results].into_iter()
    }

    fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<Recipe>> {
        [
            &mut self.mine,
            &mut self.recent,
            &mut self.popular,
            &mut self.search_results,
        ]
        .into_iter()
    }

    fn for_each_copy(&mut self, id: &RecipeId, mut f: impl FnMut(&mut Recipe)) {
        for list in self.lists_mut() {
            list.iter_mut().filter(|r| &r.id == id).for_each(&mut f);
        }
    }
}

/// Everything that can happen to the collection state.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// An operation started.
    Begin { epoch: u64 },
    MineLoaded { epoch: u64, recipes: Vec<Recipe> },
    HomeLoaded {
        epoch: u64,
        recent: Vec<Recipe>,
        popular: Vec<Recipe>,
        mine: Vec<Recipe>,
    },
    SearchLoaded { epoch: u64, results: Vec<Recipe> },
    SearchCleared { epoch: u64 },
    /// A single record was read; refresh any cached copy.
    Fetched { epoch: u64, recipe: Recipe },
    /// Prepended to `mine` and `recent`.
    Created { epoch: u64, recipe: Recipe },
    /// The stored record replaces every cached copy.
    Updated { epoch: u64, recipe: Recipe },
    Deleted { epoch: u64, id: RecipeId },
    Rated { epoch: u64, id: RecipeId, rating: f32 },
    /// Optimistic flip or its rollback. Applies regardless of epoch and never
    /// touches the status.
    FavoriteSet { id: RecipeId, value: bool },
    Failed { epoch: u64, message: String },
    Navigated,
}

/// Applies one command, returning the next state.
pub fn reduce(mut state: CollectionState, command: StoreCommand) -> CollectionState {
    let current = state.epoch;
    let fresh = |epoch: u64| epoch >= current;

    match command {
        StoreCommand::Begin { epoch } if fresh(epoch) => {
            state.status = LoadStatus::Loading;
        }
        StoreCommand::MineLoaded { epoch, recipes } if fresh(epoch) => {
            state.mine = recipes;
            state.status = LoadStatus::Loaded;
        }
        StoreCommand::HomeLoaded {
            epoch,
            recent,
            popular,
            mine,
        } if fresh(epoch) => {
            state.recent = recent;
            state.popular = popular;
            state.mine = mine;
            state.status = LoadStatus::Loaded;
        }
        StoreCommand::SearchLoaded { epoch, results } if fresh(epoch) => {
            state.search_results = results;
            state.status = LoadStatus::Loaded;
        }
        StoreCommand::SearchCleared { epoch } if fresh(epoch) => {
            state.search_results.clear();
            state.status = LoadStatus::Idle;
        }
        StoreCommand::Failed { epoch, message } if fresh(epoch) => {
            state.status = LoadStatus::Error(message);
        }
        StoreCommand::Fetched { epoch, recipe } => {
            let id = recipe.id.clone();
            state.for_each_copy(&id, |r| *r = recipe.clone());
            settle(&mut state, fresh(epoch));
        }
        StoreCommand::Created { epoch, recipe } => {
            if !state.mine.iter().any(|r| r.id == recipe.id) {
                state.mine.insert(0, recipe.clone());
            }
            if !state.recent.iter().any(|r| r.id == recipe.id) {
                state.recent.insert(0, recipe);
            }
            settle(&mut state, fresh(epoch));
        }
        StoreCommand::Updated { epoch, recipe } => {
            let id = recipe.id.clone();
            state.for_each_copy(&id, |r| *r = recipe.clone());
            settle(&mut state, fresh(epoch));
        }
        StoreCommand::Deleted { epoch, id } => {
            for list in state.lists_mut() {
                list.retain(|r| r.id != id);
            }
            settle(&mut state, fresh(epoch));
        }
        StoreCommand::Rated { epoch, id, rating } => {
            state.for_each_copy(&id, |r| r.rating = rating);
            settle(&mut state, fresh(epoch));
        }
        StoreCommand::FavoriteSet { id, value } => {
            state.for_each_copy(&id, |r| r.is_favorite = value);
        }
        StoreCommand::Navigated => {
            state.epoch += 1;
            if state.status == LoadStatus::Loading {
                state.status = LoadStatus::Idle;
            }
        }
        // Stale list loads and status changes.
        _ => {}
    }
    state
}

fn settle(state: &mut CollectionState, fresh: bool) {
    if fresh {
        state.status = LoadStatus::Loaded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Category, Difficulty, Ingredient, RecipeCreate, RecipeDraft, UserId,
    };
    use chrono::Utc;

    fn recipe(id: &str) -> Recipe {
        Recipe::from_create(
            RecipeId::from(id),
            RecipeCreate {
                author_id: UserId::from("u1"),
                draft: RecipeDraft {
                    title: id.to_uppercase(),
                    description: String::new(),
                    category: Category::Snack,
                    difficulty: Difficulty::Medium,
                    cooking_time: 5,
                    servings: 1,
                    ingredients: vec![Ingredient::new("nuts", "1", "handful")],
                    instructions: vec!["eat".into()],
                    image_url: None,
                    tags: vec![],
                },
                created_at: Utc::now(),
            },
        )
    }

    fn loaded_home() -> CollectionState {
        reduce(
            CollectionState::default(),
            StoreCommand::HomeLoaded {
                epoch: 0,
                recent: vec![recipe("x"), recipe("a")],
                popular: vec![recipe("x")],
                mine: vec![recipe("b"), recipe("x")],
            },
        )
    }

    #[test]
    fn test_status_transitions() {
        let s = reduce(CollectionState::default(), StoreCommand::Begin { epoch: 0 });
        assert_eq!(s.status, LoadStatus::Loading);

        let s = reduce(
            s,
            StoreCommand::Failed {
                epoch: 0,
                message: "offline".into(),
            },
        );
        assert_eq!(s.error(), Some("offline"));

        // Retry from error.
        let s = reduce(s, StoreCommand::Begin { epoch: 0 });
        assert!(s.is_loading());

        let s = reduce(
            s,
            StoreCommand::MineLoaded {
                epoch: 0,
                recipes: vec![recipe("a")],
            },
        );
        assert_eq!(s.status, LoadStatus::Loaded);
        assert_eq!(s.mine.len(), 1);
    }

    #[test]
    fn test_delete_removes_from_every_list() {
        let s = reduce(
            loaded_home(),
            StoreCommand::Deleted {
                epoch: 0,
                id: RecipeId::from("x"),
            },
        );
        assert!(!s.contains(&RecipeId::from("x")));
        assert_eq!(s.recent.len(), 1);
        assert!(s.popular.is_empty());
        assert_eq!(s.mine.len(), 1);
    }

    #[test]
    fn test_created_is_prepended() {
        let s = reduce(
            loaded_home(),
            StoreCommand::Created {
                epoch: 0,
                recipe: recipe("new"),
            },
        );
        assert_eq!(s.mine[0].id, RecipeId::from("new"));
        assert_eq!(s.recent[0].id, RecipeId::from("new"));
        assert_eq!(s.popular.len(), 1);
    }

    #[test]
    fn test_update_replaces_every_copy() {
        let mut changed = recipe("x");
        changed.title = "Renamed".into();
        let s = reduce(
            loaded_home(),
            StoreCommand::Updated {
                epoch: 0,
                recipe: changed,
            },
        );
        assert_eq!(s.recent[0].title, "Renamed");
        assert_eq!(s.popular[0].title, "Renamed");
        assert_eq!(s.mine[1].title, "Renamed");
        assert_eq!(s.mine[0].title, "B");
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let s = reduce(loaded_home(), StoreCommand::Begin { epoch: 0 });
        let s = reduce(s, StoreCommand::Navigated);
        assert_eq!(s.epoch, 1);
        assert_eq!(s.status, LoadStatus::Idle);

        let before = s.clone();
        let s = reduce(
            s,
            StoreCommand::MineLoaded {
                epoch: 0,
                recipes: vec![],
            },
        );
        assert_eq!(s, before);

        let s = reduce(
            s,
            StoreCommand::Failed {
                epoch: 0,
                message: "late".into(),
            },
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_stale_confirmed_delete_still_applies() {
        let s = reduce(loaded_home(), StoreCommand::Navigated);
        let s = reduce(
            s,
            StoreCommand::Deleted {
                epoch: 0,
                id: RecipeId::from("x"),
            },
        );
        assert!(!s.contains(&RecipeId::from("x")));
        assert_eq!(s.status, LoadStatus::Loaded);
    }

    #[test]
    fn test_favorite_flip_and_rollback() {
        let s = reduce(
            loaded_home(),
            StoreCommand::FavoriteSet {
                id: RecipeId::from("x"),
                value: true,
            },
        );
        assert!(s.recent[0].is_favorite && s.popular[0].is_favorite && s.mine[1].is_favorite);

        let s = reduce(
            s,
            StoreCommand::FavoriteSet {
                id: RecipeId::from("x"),
                value: false,
            },
        );
        assert!(!s.find(&RecipeId::from("x")).unwrap().is_favorite);
    }
}
