//! @acp:module "Recipes"
//! @acp:summary "Recipe catalog, daily selection and panel rendering"
//! @acp:domain brew
//! @acp:layer service
//!
//! # Daily Recipe Selection
//!
//! - **Catalog**: immutable recipe list with lookup, preference filtering,
//!   category listing and similarity ranking
//! - **Daily pick**: the date key is hashed into a 32-bit seed that drives a
//!   Mulberry32 generator, so the same date, last recipe and preferences
//!   always produce the same recipe
//! - **Surprise pick**: the same pool logic fed by an unseeded generator
//! - **Graceful fallback**: preferences that exclude everything widen the pool
//!   to the full catalog; excluding the last recipe never empties the pool
//! - **Rendering**: recipe card, favorites and preferences panels

pub mod catalog;
pub mod random;
pub mod rendering;
pub mod scoring;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

use catalog::Catalog;
use types::Recipe;

/// Recipes bundled with the binary (from data/recipes.json)
const BUNDLED_RECIPES_JSON: &str = include_str!("../../data/recipes.json");

/// Loader for catalog data. This is the only place the bundled dataset is
/// referenced; everything downstream receives a `Catalog` by value.
pub struct RecipeBook;

impl RecipeBook {
    /// Catalog from the embedded dataset
    pub fn bundled() -> Result<Catalog, CatalogError> {
        Self::from_json(BUNDLED_RECIPES_JSON)
    }

    /// Catalog from a JSON array of recipes
    pub fn from_json(json: &str) -> Result<Catalog, CatalogError> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;

        if recipes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for recipe in &recipes {
            if !seen.insert(recipe.id.as_str()) {
                warn!("Duplicate recipe id in catalog: {}", recipe.id);
            }
        }

        Ok(Catalog::new(recipes))
    }

    /// Catalog from a JSON file on disk
    pub async fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::Read(path.display().to_string(), e))?;
        Self::from_json(&content)
    }
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read recipes from {0}: {1}")]
    Read(String, #[source] std::io::Error),
    #[error("Failed to parse recipes: {0}")]
    Parse(String),
    #[error("Recipe catalog is empty")]
    Empty,
}

// Re-export commonly used types
pub use rendering::{FavoritesView, PanelRenderer, PreferencesView, RecipeCard};
pub use selection::Selector;
pub use types::{CaffeineFilter, Category, OutputFormat, UserPreferences};
