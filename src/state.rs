//! @acp:module "Application State"
//! @acp:summary "Shared state: configuration, recipe catalog and state store"
//! @acp:domain brew
//! @acp:layer service
//!
//! Assembles everything a request handler needs from the data directory and
//! provides cheap, clonable access to it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::BrewConfig;
use crate::recipes::catalog::Catalog;
use crate::recipes::RecipeBook;
use crate::store::StateStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Data directory (config, state, custom catalog)
    data_dir: PathBuf,
    config: BrewConfig,
    /// Read-only after load
    catalog: Catalog,
    store: StateStore,
}

impl AppState {
    /// Load config, catalog and state store from a data directory
    pub async fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let config = BrewConfig::load(data_dir).await?;

        let catalog = match config.catalog_path(data_dir) {
            Some(path) => {
                info!("Loading recipes from {}", path.display());
                RecipeBook::load(&path).await?
            }
            None => RecipeBook::bundled()?,
        };

        let state_path = config.state_path(data_dir);
        if !state_path.exists() {
            info!("No state file at {}, starting fresh", state_path.display());
        }

        info!(
            "Loaded catalog with {} recipes in {} categories",
            catalog.len(),
            catalog.categories().len()
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                data_dir: data_dir.to_path_buf(),
                config,
                catalog,
                store: StateStore::new(state_path),
            }),
        })
    }

    /// State over an in-memory catalog and a given state file
    #[cfg(test)]
    pub fn for_testing(catalog: Catalog, state_path: &Path) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                data_dir: state_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
                config: BrewConfig::default(),
                catalog,
                store: StateStore::new(state_path),
            }),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    pub fn config(&self) -> &BrewConfig {
        &self.inner.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn store(&self) -> &StateStore {
        &self.inner.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    #[tokio::test]
    async fn test_load_defaults_to_bundled_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::load(dir.path()).await.unwrap();

        assert!(!state.catalog().is_empty());
        assert_eq!(state.data_dir(), dir.path());
        assert_eq!(
            state.store().path(),
            dir.path().join(".brew").join("state.json")
        );
    }

    #[tokio::test]
    async fn test_load_custom_catalog_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("house.json"),
            r#"[{"id": "house-blend", "name": "House Blend", "category": "pour-over", "caffeinated": true}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"catalogPath": "house.json", "similarCount": 1}"#,
        )
        .unwrap();

        let state = AppState::load(dir.path()).await.unwrap();
        assert_eq!(state.catalog().len(), 1);
        assert!(state.catalog().get_by_id("house-blend").is_some());
        assert_eq!(state.config().similar_count, 1);
    }

    #[tokio::test]
    async fn test_load_rejects_empty_custom_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.json"), "[]").unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"catalogPath": "empty.json"}"#,
        )
        .unwrap();

        assert!(AppState::load(dir.path()).await.is_err());
    }
}
