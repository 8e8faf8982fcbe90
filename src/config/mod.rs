//! Project configuration.
//!
//! Settings come from the first source that exists:
//!
//! 1. the file passed with `--config`
//! 2. `.citation-manager.toml` in the current directory
//! 3. built-in defaults
//!
//! `CITATION_MANAGER_SCOPE` overrides the configured scope directory.
//!
//! ```toml
//! scope = "docs"
//! full_files = false
//!
//! [suggestions]
//! similarity_threshold = 0.3
//! max_suggestions = 5
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{
    ANCHOR_SIMILARITY_THRESHOLD, CONFIG_FILE_NAME, MAX_ANCHOR_SUGGESTIONS, SCOPE_ENV_VAR,
};
use crate::core::CiteError;

/// Anchor suggestion tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Minimum normalized Levenshtein score
    pub similarity_threshold: f64,
    /// Maximum suggestions per broken anchor
    pub max_suggestions: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: ANCHOR_SIMILARITY_THRESHOLD,
            max_suggestions: MAX_ANCHOR_SUGGESTIONS,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory indexed for filename fallback lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<PathBuf>,
    /// Extract whole files for links without anchors
    pub full_files: bool,
    /// Suggestion tuning
    pub suggestions: SuggestionConfig,
}

impl Config {
    /// Load from `path` when given, else from the project file in the current
    /// directory, else defaults. The scope environment override is applied last.
    ///
    /// # Errors
    ///
    /// Fails when an explicit `path` is missing, or when a config file cannot
    /// be read or parsed.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CiteError::ConfigError {
                        file: path.display().to_string(),
                        reason: "file does not exist".to_string(),
                    }
                    .into());
                }
                Self::load_from(path).await?
            }
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load_from(&local).await?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a specific configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for [`Config`].
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(scope) = std::env::var(SCOPE_ENV_VAR) {
            if !scope.is_empty() {
                self.scope = Some(PathBuf::from(scope));
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.suggestions.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CiteError::ConfigError {
                file: CONFIG_FILE_NAME.to_string(),
                reason: format!("similarity_threshold must be between 0 and 1, got {threshold}"),
            }
            .into());
        }
        Ok(())
    }
}
