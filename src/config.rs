//! @acp:module "Configuration"
//! @acp:summary "Optional brew.config.json in the data directory"
//! @acp:domain brew
//! @acp:layer config

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::recipes::OutputFormat;

pub const CONFIG_FILE_NAME: &str = "brew.config.json";

/// Data directory configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewConfig {
    /// Custom recipe JSON; the bundled catalog is used when absent
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// State file location
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Related recipes shown on a card
    #[serde(default = "default_similar_count")]
    pub similar_count: usize,

    /// Default output format for rendered panels
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".brew").join("state.json")
}

fn default_similar_count() -> usize {
    3
}

impl Default for BrewConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            state_file: default_state_file(),
            similar_count: default_similar_count(),
            format: OutputFormat::default(),
        }
    }
}

impl BrewConfig {
    /// Load `brew.config.json` from `data_dir`, falling back to defaults
    pub async fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            info!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&config_path).await?;
        serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse {}: {}", config_path.display(), e)
        })
    }

    /// State file resolved against `data_dir`
    pub fn state_path(&self, data_dir: &Path) -> PathBuf {
        resolve(data_dir, &self.state_file)
    }

    /// Catalog file resolved against `data_dir`, if configured
    pub fn catalog_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.catalog_path.as_deref().map(|p| resolve(data_dir, p))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BrewConfig::load(dir.path()).await.unwrap();

        assert!(config.catalog_path.is_none());
        assert_eq!(config.similar_count, 3);
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(
            config.state_path(dir.path()),
            dir.path().join(".brew").join("state.json")
        );
    }

    #[tokio::test]
    async fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"similarCount": 5, "format": "compact"}"#,
        )
        .unwrap();

        let config = BrewConfig::load(dir.path()).await.unwrap();
        assert_eq!(config.similar_count, 5);
        assert_eq!(config.format, OutputFormat::Compact);
        assert_eq!(config.state_file, default_state_file());
    }

    #[tokio::test]
    async fn test_relative_paths_resolve_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"catalogPath": "my-recipes.json", "stateFile": "state/brew.json"}"#,
        )
        .unwrap();

        let config = BrewConfig::load(dir.path()).await.unwrap();
        assert_eq!(
            config.catalog_path(dir.path()),
            Some(dir.path().join("my-recipes.json"))
        );
        assert_eq!(
            config.state_path(dir.path()),
            dir.path().join("state").join("brew.json")
        );
    }

    #[tokio::test]
    async fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ nope").unwrap();

        assert!(BrewConfig::load(dir.path()).await.is_err());
    }
}
