//! @acp:module "Recipe Selection"
//! @acp:summary "Date-seeded daily pick and unseeded surprise pick over the candidate pool"
//! @acp:domain brew
//! @acp:layer service

use tracing::debug;

use super::catalog::Catalog;
use rand::RngCore;

use super::random::{pick_index, Mulberry32};
use super::types::{Recipe, UserPreferences};

/// Where the candidate pool came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    /// Recipes matching the user's preferences
    Preferences,
    /// Preferences excluded everything, so the full catalog was used
    FullCatalog,
}

/// Selection result
#[derive(Debug, Clone, Copy)]
pub struct Pick<'a> {
    pub recipe: &'a Recipe,
    pub pool_source: PoolSource,
    /// Size of the pool the index was drawn from
    pub pool_size: usize,
    /// The excluded id had to be returned because nothing else was eligible
    pub repeated: bool,
}

/// Stateless picker over a borrowed catalog
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    catalog: &'a Catalog,
}

impl<'a> Selector<'a> {
    /// # Panics
    ///
    /// Panics if the catalog is empty: no recipe could ever be returned.
    /// Assembly points reject empty catalogs before getting here.
    pub fn new(catalog: &'a Catalog) -> Self {
        assert!(!catalog.is_empty(), "selector requires a non-empty catalog");
        Self { catalog }
    }

    /// Deterministic recipe for `date_key`, avoiding `last_recipe_id` when
    /// anything else is eligible
    #[allow(dead_code)]
    pub fn daily_recipe(
        &self,
        date_key: &str,
        last_recipe_id: &str,
        prefs: &UserPreferences,
    ) -> &'a Recipe {
        self.daily_pick(date_key, last_recipe_id, prefs).recipe
    }

    pub fn daily_pick(
        &self,
        date_key: &str,
        last_recipe_id: &str,
        prefs: &UserPreferences,
    ) -> Pick<'a> {
        let (candidates, pool_source) = self.candidate_pool(prefs);

        let excluded = exclude(&candidates, last_recipe_id);
        let repeated = excluded.is_empty();
        let pool = if repeated { candidates } else { excluded };

        let mut rng = Mulberry32::from_date_key(date_key);
        let recipe = pool[pick_index(&mut rng, pool.len())];

        debug!(
            date_key,
            recipe = %recipe.id,
            pool_size = pool.len(),
            ?pool_source,
            repeated,
            "Daily recipe selected"
        );

        Pick {
            recipe,
            pool_source,
            pool_size: pool.len(),
            repeated,
        }
    }

    /// Random recipe other than `current_recipe_id` when possible
    #[allow(dead_code)]
    pub fn surprise_me(&self, current_recipe_id: &str, prefs: &UserPreferences) -> &'a Recipe {
        self.surprise_pick(&mut rand::rng(), current_recipe_id, prefs)
            .recipe
    }

    pub fn surprise_pick<R: RngCore + ?Sized>(
        &self,
        source: &mut R,
        current_recipe_id: &str,
        prefs: &UserPreferences,
    ) -> Pick<'a> {
        let (candidates, pool_source) = self.candidate_pool(prefs);
        let excluded = exclude(&candidates, current_recipe_id);

        if excluded.is_empty() {
            debug!(
                current = current_recipe_id,
                "No alternative candidate, repeating first in pool"
            );
            return Pick {
                recipe: candidates[0],
                pool_source,
                pool_size: candidates.len(),
                repeated: true,
            };
        }

        let recipe = excluded[pick_index(source, excluded.len())];
        Pick {
            recipe,
            pool_source,
            pool_size: excluded.len(),
            repeated: false,
        }
    }

    /// Preference-filtered pool, or the whole catalog when that is empty
    fn candidate_pool(&self, prefs: &UserPreferences) -> (Vec<&'a Recipe>, PoolSource) {
        let candidates = self.catalog.filtered(prefs);
        if candidates.is_empty() {
            debug!("Preferences matched no recipes, falling back to full catalog");
            (self.catalog.all().iter().collect(), PoolSource::FullCatalog)
        } else {
            (candidates, PoolSource::Preferences)
        }
    }
}

fn exclude<'a>(pool: &[&'a Recipe], id: &str) -> Vec<&'a Recipe> {
    pool.iter().copied().filter(|r| r.id != id).collect()
}
