//! @acp:module "Panel"
//! @acp:summary "Recipe panel interactions over the catalog and the state store"
//! @acp:domain brew
//! @acp:layer service
//!
//! # Interactions
//!
//! - **Today**: one recipe per calendar date. The first request for a date
//!   runs the daily pick and records it; later requests on the same date
//!   reuse the recorded recipe unless a preference change has ruled it out.
//! - **Surprise**: a random recipe other than the one on screen, recorded as
//!   the last shown recipe. Today's recipe is left as it was.
//! - **Favorites** and **preferences**: read and update persisted state.
//!
//! Every recipe view is a `RecipeCard` with the favorite flag and related
//! recipes filled in.

use serde::Serialize;
use tracing::{debug, info};

use crate::recipes::selection::{Pick, PoolSource};
use crate::recipes::types::Recipe;
use crate::recipes::{FavoritesView, PreferencesView, RecipeCard, Selector, UserPreferences};
use crate::state::AppState;
use crate::store::{PreferencesPatch, StatePatch, StoreError};

/// Today's date as the `YYYY-MM-DD` key used for daily picks
pub fn today_key() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// A recipe put on screen, with how it was chosen
#[derive(Debug, Clone, Serialize)]
pub struct Shown {
    pub card: RecipeCard,
    /// Date key for daily picks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Reused from state instead of picked again
    pub cached: bool,
    /// Preferences matched nothing, so the whole catalog was eligible
    pub full_catalog_fallback: bool,
    /// The previously shown recipe came up again for lack of alternatives
    pub repeated: bool,
}

/// Panel controller
#[derive(Clone)]
pub struct Panel {
    state: AppState,
}

impl Panel {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Recipe of the day for `date` (default: local today)
    pub async fn today(&self, date: Option<&str>) -> Result<Shown, PanelError> {
        let date = date.map(str::to_string).unwrap_or_else(today_key);
        let stored = self.state.store().get_state().await;
        let catalog = self.state.catalog();

        if stored.last_shown_date == date {
            if let Some(recipe) = catalog.get_by_id(&stored.daily_recipe_id) {
                let prefs = &stored.user_preferences;
                // A fallback pick never matches; it stays valid while nothing does
                let fallback = catalog.filtered(prefs).is_empty();
                if fallback || prefs.matches(recipe) {
                    debug!(date = %date, recipe = %recipe.id, "Reusing today's recipe");
                    return Ok(Shown {
                        card: self.card(recipe).await,
                        date: Some(date),
                        cached: true,
                        full_catalog_fallback: fallback,
                        repeated: false,
                    });
                }
                debug!(recipe = %recipe.id, "Today's recipe no longer matches preferences");
            }
        }

        let pick = Selector::new(catalog).daily_pick(
            &date,
            &stored.last_recipe_id,
            &stored.user_preferences,
        );

        self.state
            .store()
            .update_state(StatePatch {
                last_shown_date: Some(date.clone()),
                daily_recipe_id: Some(pick.recipe.id.clone()),
                last_recipe_id: Some(pick.recipe.id.clone()),
                ..Default::default()
            })
            .await?;
        info!(date = %date, recipe = %pick.recipe.id, "New daily recipe");

        Ok(self.shown(pick, Some(date)).await)
    }

    /// Random recipe other than `current` (default: the last shown recipe)
    pub async fn surprise(&self, current: Option<&str>) -> Result<Shown, PanelError> {
        let stored = self.state.store().get_state().await;
        let current = current.unwrap_or(&stored.last_recipe_id);

        // ThreadRng is not Send; keep it out of the await points
        let pick = {
            let mut rng = rand::rng();
            Selector::new(self.state.catalog()).surprise_pick(
                &mut rng,
                current,
                &stored.user_preferences,
            )
        };

        self.state
            .store()
            .update_state(StatePatch {
                last_recipe_id: Some(pick.recipe.id.clone()),
                ..Default::default()
            })
            .await?;
        debug!(recipe = %pick.recipe.id, "Surprise recipe");

        Ok(self.shown(pick, None).await)
    }

    /// Card for a recipe by id
    pub async fn show(&self, id: &str) -> Result<RecipeCard, PanelError> {
        let recipe = self.find(id)?;
        Ok(self.card(recipe).await)
    }

    /// Up to `count` related recipes
    pub fn similar(&self, id: &str, count: usize) -> Result<Vec<Recipe>, PanelError> {
        let recipe = self.find(id)?;
        Ok(self
            .state
            .catalog()
            .similar(recipe, count)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns true if the recipe is now a favorite
    pub async fn toggle_favorite(&self, id: &str) -> Result<bool, PanelError> {
        self.find(id)?;
        Ok(self.state.store().toggle_favorite(id).await?)
    }

    /// Favorites in stored order; ids no longer in the catalog are skipped
    pub async fn favorites(&self) -> FavoritesView {
        let stored = self.state.store().get_state().await;
        let catalog = self.state.catalog();

        let recipes = stored
            .favorites
            .iter()
            .filter_map(|id| {
                let recipe = catalog.get_by_id(id);
                if recipe.is_none() {
                    debug!(recipe = %id, "Skipping unknown favorite");
                }
                recipe.cloned()
            })
            .collect();

        FavoritesView { recipes }
    }

    pub async fn preferences(&self) -> PreferencesView {
        PreferencesView {
            preferences: self.state.store().get_state().await.user_preferences,
        }
    }

    pub async fn save_preferences(
        &self,
        patch: PreferencesPatch,
    ) -> Result<PreferencesView, PanelError> {
        let preferences: UserPreferences = self.state.store().update_preferences(patch).await?;
        info!(
            categories = preferences.preferred_categories.len(),
            caffeine = preferences.caffeine_filter.as_str(),
            "Preferences saved"
        );
        Ok(PreferencesView { preferences })
    }

    fn find(&self, id: &str) -> Result<&Recipe, PanelError> {
        self.state
            .catalog()
            .get_by_id(id)
            .ok_or_else(|| PanelError::NotFound(id.to_string()))
    }

    async fn card(&self, recipe: &Recipe) -> RecipeCard {
        let similar = self
            .state
            .catalog()
            .similar(recipe, self.state.config().similar_count)
            .into_iter()
            .cloned()
            .collect();

        RecipeCard {
            recipe: recipe.clone(),
            is_favorite: self.state.store().is_favorite(&recipe.id).await,
            similar,
        }
    }

    async fn shown(&self, pick: Pick<'_>, date: Option<String>) -> Shown {
        Shown {
            card: self.card(pick.recipe).await,
            date,
            cached: false,
            full_catalog_fallback: pick.pool_source == PoolSource::FullCatalog,
            repeated: pick.repeated,
        }
    }
}

/// Panel errors
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Recipe not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::testing::small_catalog;
    use crate::recipes::{CaffeineFilter, Category};
    use crate::store::StorageState;
    use tempfile::TempDir;

    fn create_test_panel() -> (TempDir, Panel) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::for_testing(small_catalog(), &dir.path().join("state.json"));
        (dir, Panel::new(state))
    }

    #[test]
    fn test_today_key_format() {
        let key = today_key();
        assert_eq!(key.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&key, "%Y-%m-%d").is_ok());
    }

    #[tokio::test]
    async fn test_today_picks_and_persists() {
        let (_dir, panel) = create_test_panel();

        let shown = panel.today(Some("2026-02-10")).await.unwrap();
        assert_eq!(shown.card.recipe.id, "recipe-a");
        assert!(!shown.cached);
        assert_eq!(shown.date.as_deref(), Some("2026-02-10"));

        let stored = panel.state().store().get_state().await;
        assert_eq!(stored.last_shown_date, "2026-02-10");
        assert_eq!(stored.daily_recipe_id, "recipe-a");
        assert_eq!(stored.last_recipe_id, "recipe-a");
    }

    #[tokio::test]
    async fn test_today_reuses_recipe_on_same_date() {
        let (_dir, panel) = create_test_panel();
        panel
            .state()
            .store()
            .set_state(&StorageState {
                last_shown_date: "2026-02-10".to_string(),
                daily_recipe_id: "recipe-c".to_string(),
                last_recipe_id: "recipe-b".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let shown = panel.today(Some("2026-02-10")).await.unwrap();
        assert_eq!(shown.card.recipe.id, "recipe-c");
        assert!(shown.cached);
    }

    #[tokio::test]
    async fn test_today_new_date_avoids_previous_recipe() {
        let (_dir, panel) = create_test_panel();
        panel.today(Some("2026-02-10")).await.unwrap();

        let shown = panel.today(Some("2026-07-01")).await.unwrap();
        assert_eq!(shown.card.recipe.id, "recipe-b");
        assert!(!shown.cached);
        assert_eq!(
            panel.state().store().get_state().await.last_recipe_id,
            "recipe-b"
        );
    }

    #[tokio::test]
    async fn test_today_repicks_when_cached_id_is_unknown() {
        let (_dir, panel) = create_test_panel();
        panel
            .state()
            .store()
            .set_state(&StorageState {
                last_shown_date: "2026-02-10".to_string(),
                daily_recipe_id: "retired-recipe".to_string(),
                last_recipe_id: "retired-recipe".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let shown = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(!shown.cached);
        assert_eq!(shown.card.recipe.id, "recipe-a");
    }

    #[tokio::test]
    async fn test_today_reports_full_catalog_fallback() {
        let (_dir, panel) = create_test_panel();
        panel
            .save_preferences(PreferencesPatch {
                preferred_categories: Some(vec![Category::PourOver]),
                caffeine_filter: None,
            })
            .await
            .unwrap();

        let shown = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(shown.full_catalog_fallback);
    }

    #[tokio::test]
    async fn test_surprise_avoids_last_shown_and_persists() {
        let (_dir, panel) = create_test_panel();
        panel.today(Some("2026-02-10")).await.unwrap();

        for _ in 0..10 {
            let before = panel.state().store().get_state().await.last_recipe_id;
            let shown = panel.surprise(None).await.unwrap();
            assert_ne!(shown.card.recipe.id, before);
            assert_eq!(
                panel.state().store().get_state().await.last_recipe_id,
                shown.card.recipe.id
            );
        }
    }

    #[tokio::test]
    async fn test_surprise_with_explicit_current() {
        let (_dir, panel) = create_test_panel();
        let shown = panel.surprise(Some("recipe-d")).await.unwrap();
        assert_ne!(shown.card.recipe.id, "recipe-d");
        assert!(shown.date.is_none());
    }

    #[tokio::test]
    async fn test_show_includes_similar_and_favorite_flag() {
        let (_dir, panel) = create_test_panel();
        panel.toggle_favorite("recipe-c").await.unwrap();

        let card = panel.show("recipe-c").await.unwrap();
        assert!(card.is_favorite);
        let similar: Vec<&str> = card.similar.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(similar, vec!["recipe-d", "recipe-b", "recipe-a"]);
    }

    #[tokio::test]
    async fn test_show_unknown_recipe() {
        let (_dir, panel) = create_test_panel();
        assert!(matches!(
            panel.show("nope").await,
            Err(PanelError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_similar_respects_count() {
        let (_dir, panel) = create_test_panel();
        let similar = panel.similar("recipe-c", 1).unwrap();
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].id, "recipe-d");
    }

    #[tokio::test]
    async fn test_toggle_favorite_unknown_recipe() {
        let (_dir, panel) = create_test_panel();
        assert!(matches!(
            panel.toggle_favorite("nope").await,
            Err(PanelError::NotFound(_))
        ));
        assert!(panel.favorites().await.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_favorites_skip_unknown_ids() {
        let (_dir, panel) = create_test_panel();
        panel
            .state()
            .store()
            .set_state(&StorageState {
                favorites: vec![
                    "recipe-b".to_string(),
                    "retired-recipe".to_string(),
                    "recipe-a".to_string(),
                ],
                ..Default::default()
            })
            .await
            .unwrap();

        let ids: Vec<String> = panel
            .favorites()
            .await
            .recipes
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["recipe-b", "recipe-a"]);
    }

    #[tokio::test]
    async fn test_save_preferences_affects_daily_pick() {
        let (_dir, panel) = create_test_panel();
        let view = panel
            .save_preferences(PreferencesPatch {
                preferred_categories: None,
                caffeine_filter: Some(CaffeineFilter::Decaf),
            })
            .await
            .unwrap();
        assert_eq!(view.preferences.caffeine_filter, CaffeineFilter::Decaf);
        assert_eq!(
            panel.preferences().await.preferences.caffeine_filter,
            CaffeineFilter::Decaf
        );

        let shown = panel.today(Some("2026-02-10")).await.unwrap();
        assert_eq!(shown.card.recipe.id, "recipe-d");
    }

    #[tokio::test]
    async fn test_surprise_leaves_todays_recipe_alone() {
        let (_dir, panel) = create_test_panel();
        let daily = panel.today(Some("2026-02-10")).await.unwrap();

        let surprise = panel.surprise(None).await.unwrap();
        assert_ne!(surprise.card.recipe.id, daily.card.recipe.id);

        let again = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(again.cached);
        assert_eq!(again.card.recipe.id, daily.card.recipe.id);
    }

    #[tokio::test]
    async fn test_preference_change_replaces_cached_daily_recipe() {
        let (_dir, panel) = create_test_panel();
        let daily = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(daily.card.recipe.caffeinated);

        panel
            .save_preferences(PreferencesPatch {
                preferred_categories: None,
                caffeine_filter: Some(CaffeineFilter::Decaf),
            })
            .await
            .unwrap();

        let shown = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(!shown.cached);
        assert!(!shown.card.recipe.caffeinated);
        assert_eq!(shown.card.recipe.id, "recipe-d");

        let again = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(again.cached);
        assert_eq!(again.card.recipe.id, "recipe-d");
    }

    #[tokio::test]
    async fn test_fallback_daily_recipe_is_cached() {
        let (_dir, panel) = create_test_panel();
        panel
            .save_preferences(PreferencesPatch {
                preferred_categories: Some(vec![Category::IcedCoffee]),
                caffeine_filter: None,
            })
            .await
            .unwrap();

        let first = panel.today(Some("2026-02-10")).await.unwrap();
        let second = panel.today(Some("2026-02-10")).await.unwrap();
        assert!(second.cached);
        assert!(second.full_catalog_fallback);
        assert_eq!(first.card.recipe.id, second.card.recipe.id);
    }
}
