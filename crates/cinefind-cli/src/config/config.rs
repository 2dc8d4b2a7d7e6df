//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cinefind_db::home_dir;
use cinefind_tui::orchestrator::DEFAULT_TRENDING_LIMIT;
use cinefind_tui::{SearchSettings, StaleResponsePolicy};
use serde::{Deserialize, Serialize};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default debounce quiet period in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Search tuning.
    #[serde(default)]
    pub search: SearchConfig,
    /// Catalog client overrides.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Trending list settings.
    #[serde(default)]
    pub trending: TrendingConfig,
}

/// Search tuning.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before a typed query is searched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// `discard` or `apply` results of superseded searches.
    #[serde(default)]
    pub stale_responses: StaleResponsePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

/// Catalog client overrides.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API base URL (default: TMDB v3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Response language (e.g. "ja-JP").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Trending list settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendingConfig {
    /// Number of entries shown.
    #[serde(default = "default_trending_limit")]
    pub limit: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_trending_limit() -> usize {
    DEFAULT_TRENDING_LIMIT
}

impl AppConfig {
    /// Config file location: `{dir}/config.toml` when `dir` is given,
    /// otherwise `~/.config/cinefind/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and the home directory is unknown.
    pub fn path(dir: Option<&PathBuf>) -> Result<PathBuf> {
        let config_dir = match dir {
            Some(d) => d.clone(),
            None => home_dir()?.join(".config").join("cinefind"),
        };
        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Loads the config file found in `dir` (see [`path`](Self::path)).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the file is invalid.
    pub fn load_from_dir(dir: Option<&PathBuf>) -> Result<Self> {
        let path = Self::path(dir).context("failed to resolve config path")?;
        Self::load(&path)
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Orchestrator settings derived from this config.
    #[must_use]
    pub const fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            quiet_period: Duration::from_millis(self.search.debounce_ms),
            stale_responses: self.search.stale_responses,
            trending_limit: self.trending.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.search.debounce_ms, 1000);
        assert_eq!(config.search.stale_responses, StaleResponsePolicy::Discard);
        assert_eq!(config.trending.limit, 5);
        assert!(config.catalog.base_url.is_none());
    }

    #[test]
    fn test_path_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/cinefind-project");

        // Act
        let path = AppConfig::path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/cinefind-project/config.toml"));
    }

    #[test]
    fn test_path_default_is_under_home_config() {
        // Arrange & Act
        let path = AppConfig::path(None).unwrap();

        // Assert
        assert!(path.starts_with(home_dir().unwrap()));
        assert!(path.ends_with(".config/cinefind/config.toml"));
    }

    #[test]
    fn test_load_from_dir_reads_config_toml() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[trending]\nlimit = 3\n").unwrap();

        // Act
        let config = AppConfig::load_from_dir(Some(&dir.path().to_path_buf())).unwrap();

        // Assert
        assert_eq!(config.trending.limit, 3);
        assert_eq!(config.search.debounce_ms, 1000);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[search]
debounce_ms = 300
stale_responses = "apply"

[catalog]
base_url = "http://localhost:8080/3/"
language = "ja-JP"

[trending]
limit = 10
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.stale_responses, StaleResponsePolicy::Apply);
        assert_eq!(
            config.catalog.base_url.as_deref(),
            Some("http://localhost:8080/3/")
        );
        assert_eq!(config.catalog.language.as_deref(), Some("ja-JP"));
        assert_eq!(config.trending.limit, 10);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndebounce_ms = 250\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.stale_responses, StaleResponsePolicy::Discard);
        assert_eq!(config.trending, TrendingConfig::default());
    }

    #[test]
    fn test_load_rejects_unknown_policy() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nstale_responses = \"sometimes\"\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_search_settings_from_config() {
        // Arrange
        let config = AppConfig {
            search: SearchConfig {
                debounce_ms: 400,
                stale_responses: StaleResponsePolicy::Apply,
            },
            ..AppConfig::default()
        };

        // Act
        let settings = config.search_settings();

        // Assert
        assert_eq!(settings.quiet_period, Duration::from_millis(400));
        assert_eq!(settings.stale_responses, StaleResponsePolicy::Apply);
        assert_eq!(settings.trending_limit, 5);
    }
}
