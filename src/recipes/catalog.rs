//! @acp:module "Recipe Catalog"
//! @acp:summary "Immutable recipe collection with lookup, filter and similarity queries"
//! @acp:domain brew
//! @acp:layer service
//!
//! The catalog is built once from an explicit recipe list and never mutated.
//! Every query borrows from it, so it can be shared freely behind an `Arc`.

use super::scoring::{rank, score_candidates};
use super::types::{Category, Recipe, UserPreferences};

/// Ordered, read-only set of recipes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// All recipes in load order
    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Recipes passing the category and caffeine preferences, in catalog order.
    /// An empty result is a normal outcome.
    pub fn filtered(&self, prefs: &UserPreferences) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| prefs.matches(r)).collect()
    }

    /// Up to `count` other recipes ranked by similarity to `recipe`
    pub fn similar(&self, recipe: &Recipe, count: usize) -> Vec<&Recipe> {
        let mut scored = score_candidates(recipe, &self.recipes);
        rank(&mut scored);

        scored.into_iter().take(count).map(|s| s.recipe).collect()
    }

    /// Distinct categories in first-occurrence order
    pub fn categories(&self) -> Vec<Category> {
        let mut seen: Vec<Category> = Vec::new();
        for recipe in &self.recipes {
            if !seen.contains(&recipe.category) {
                seen.push(recipe.category);
            }
        }
        seen
    }

    pub fn by_category(&self, category: Category) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}
