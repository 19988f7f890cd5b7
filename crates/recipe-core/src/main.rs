//! # Recipe Core Demo
//!
//! Walks one user through the app against in-memory collections:
//! sign-up, creating a recipe, the home screen, favoriting, search, the
//! profile stats and finally deleting everything and signing out.
//!
//! Run with `RUST_LOG=info cargo run -p recipe-core` to see each step.

use chrono::Utc;
use recipe_core::config::AppConfig;
use recipe_core::filter::{FilterCriteria, FilterToggles};
use recipe_core::lifecycle::{setup_tracing, RecipeSystem};
use recipe_core::model::{Category, Difficulty, Ingredient, RecipeDraft};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!("Starting recipe demo");

    let system = RecipeSystem::new(config);
    let session = system.session();

    let span = tracing::info_span!("sign_up");
    let profile = async {
        session
            .sign_up("Ada Lovelace", "ada@example.com", "engine42", "engine42")
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(user_id = %profile.id, name = %profile.name, "Signed up");

    let recipes = system.collection_for(&session);

    let draft = RecipeDraft {
        title: "Shakshuka".to_string(),
        description: "Eggs poached in spiced tomato sauce".to_string(),
        category: Category::Breakfast,
        difficulty: Difficulty::Easy,
        cooking_time: 25,
        servings: 2,
        ingredients: vec![
            Ingredient::new("eggs", "4", "pcs"),
            Ingredient::new("tomatoes", "400", "g"),
            Ingredient::new("cumin", "1", "tsp"),
        ],
        instructions: vec![
            "Simmer the tomatoes with cumin".to_string(),
            "Crack in the eggs and cover until set".to_string(),
        ],
        image_url: None,
        tags: vec!["vegetarian".to_string()],
    };

    let span = tracing::info_span!("create_recipe");
    let recipe = async { recipes.create(draft).await.map_err(|e| e.to_string()) }
        .instrument(span)
        .await?;
    info!(recipe_id = %recipe.id, "Recipe created");

    let home = recipes.load_home().await.map_err(|e| e.to_string())?;
    info!(
        recent = home.recent.len(),
        popular = home.popular.len(),
        mine = home.mine.len(),
        "Home loaded"
    );

    if let Err(e) = recipes.toggle_favorite(recipe.id.clone(), true).await {
        error!(error = %e, "Favorite toggle failed");
    }
    session
        .add_favorite(recipe.id.clone())
        .await
        .map_err(|e| e.to_string())?;

    let mut toggles = FilterToggles::default();
    toggles.set_query("egg");
    let criteria = toggles
        .criteria(session.user_id().as_ref())
        .and(FilterCriteria::new().max_cooking_time(30));
    let found = recipes.search(criteria).await.map_err(|e| e.to_string())?;
    info!(matches = found.len(), "Search finished");

    let stats = session.stats(&recipes.snapshot(), Utc::now());
    info!(
        total_recipes = stats.total_recipes,
        favorites = stats.favorite_count,
        age_days = stats.account_age_days,
        "Profile stats"
    );

    recipes
        .delete(recipe.id.clone())
        .await
        .map_err(|e| e.to_string())?;
    session.sign_out().await.map_err(|e| e.to_string())?;

    drop(recipes);
    drop(session);
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
