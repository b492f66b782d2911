//! @acp:module "State Store"
//! @acp:summary "File-backed persistence of favorites, preferences and last-shown recipe"
//! @acp:domain brew
//! @acp:layer storage
//!
//! The whole user state is one small JSON document. Reads merge whatever is
//! on disk with defaults; writes replace the document atomically.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::recipes::{CaffeineFilter, Category, UserPreferences};

/// Persisted user state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageState {
    /// Date key of the last daily pick ("" if never shown)
    #[serde(default)]
    pub last_shown_date: String,
    /// Id of the daily pick made on `last_shown_date` ("" if none)
    #[serde(default)]
    pub daily_recipe_id: String,
    /// Id of the last recipe shown, daily or surprise ("" if none)
    #[serde(default)]
    pub last_recipe_id: String,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub user_preferences: UserPreferences,
}

/// Partial update of `StorageState`; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub last_shown_date: Option<String>,
    pub daily_recipe_id: Option<String>,
    pub last_recipe_id: Option<String>,
    pub favorites: Option<Vec<String>>,
    pub user_preferences: Option<PreferencesPatch>,
}

/// Partial update of `UserPreferences`
#[derive(Debug, Clone, Default)]
pub struct PreferencesPatch {
    pub preferred_categories: Option<Vec<Category>>,
    pub caffeine_filter: Option<CaffeineFilter>,
}

impl PreferencesPatch {
    pub fn apply(&self, prefs: &mut UserPreferences) {
        if let Some(ref categories) = self.preferred_categories {
            prefs.preferred_categories = categories.clone();
        }
        if let Some(filter) = self.caffeine_filter {
            prefs.caffeine_filter = filter;
        }
    }
}

impl StatePatch {
    pub fn apply(&self, state: &mut StorageState) {
        if let Some(ref date) = self.last_shown_date {
            state.last_shown_date = date.clone();
        }
        if let Some(ref id) = self.daily_recipe_id {
            state.daily_recipe_id = id.clone();
        }
        if let Some(ref id) = self.last_recipe_id {
            state.last_recipe_id = id.clone();
        }
        if let Some(ref favorites) = self.favorites {
            state.favorites = favorites.clone();
        }
        if let Some(ref prefs) = self.user_preferences {
            prefs.apply(&mut state.user_preferences);
        }
    }
}

/// JSON file store for `StorageState`
pub struct StateStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state; defaults when nothing has been stored yet or the file
    /// cannot be read
    pub async fn get_state(&self) -> StorageState {
        let _guard = self.lock.lock().await;
        self.read().await.unwrap_or_else(|e| {
            warn!("Failed to read state: {}", e);
            StorageState::default()
        })
    }

    #[allow(dead_code)]
    pub async fn set_state(&self, state: &StorageState) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(state).await
    }

    /// Merge `patch` into the stored state and return the result
    pub async fn update_state(&self, patch: StatePatch) -> Result<StorageState, StoreError> {
        let _guard = self.lock.lock().await;
        let mut state = self.read().await?;
        patch.apply(&mut state);
        self.write(&state).await?;
        Ok(state)
    }

    /// Add or remove a favorite. Returns true if the recipe is now a favorite.
    pub async fn toggle_favorite(&self, recipe_id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut state = self.read().await?;

        let added = match state.favorites.iter().position(|id| id == recipe_id) {
            Some(index) => {
                state.favorites.remove(index);
                false
            }
            None => {
                state.favorites.push(recipe_id.to_string());
                true
            }
        };

        self.write(&state).await?;
        debug!(recipe = recipe_id, added, "Favorite toggled");
        Ok(added)
    }

    pub async fn is_favorite(&self, recipe_id: &str) -> bool {
        self.get_state()
            .await
            .favorites
            .iter()
            .any(|id| id == recipe_id)
    }

    pub async fn update_preferences(
        &self,
        patch: PreferencesPatch,
    ) -> Result<UserPreferences, StoreError> {
        let state = self
            .update_state(StatePatch {
                user_preferences: Some(patch),
                ..Default::default()
            })
            .await?;
        Ok(state.user_preferences)
    }

    /// A missing or malformed file reads as defaults. Any other I/O failure
    /// is an error so that read-modify-write callers never overwrite a file
    /// they could not read.
    async fn read(&self) -> Result<StorageState, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StorageState::default());
            }
            Err(e) => return Err(StoreError::Io(self.path.display().to_string(), e)),
        };

        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Failed to parse state at {}: {}", self.path.display(), e);
                Ok(StorageState::default())
            }
        }
    }

    async fn write(&self, state: &StorageState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io(parent.display().to_string(), e))?;
                info!("Created state directory {}", parent.display());
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Io(tmp.display().to_string(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(self.path.display().to_string(), e))?;
        Ok(())
    }
}

/// State store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}
