//! Configuration system for lexis.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{LexisError, LexisResult};
use crate::types::LearnerSettings;

/// Settings for the vocabulary bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Words written per store call.
    pub batch_size: usize,
    /// Remove existing words and progress before loading.
    pub clean_first: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            clean_first: true,
        }
    }
}

/// Main lexis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexisConfig {
    /// SQLite database path. `None` keeps everything in memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Settings used for learners who have not saved their own.
    pub default_settings: LearnerSettings,
    /// Number of answer options requested when none is given.
    pub option_count: usize,
    /// Seeding configuration.
    pub seed: SeedConfig,
}

impl Default for LexisConfig {
    fn default() -> Self {
        Self {
            database_path: Some(default_database_path()),
            default_settings: LearnerSettings::default(),
            option_count: 3,
            seed: SeedConfig::default(),
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".lexis"))
        .unwrap_or_else(|| PathBuf::from(".lexis"))
        .join("lexis.db")
}

impl LexisConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> LexisResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| LexisError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| LexisError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| LexisError::Configuration(e.to_string()))?,
            _ => {
                return Err(LexisError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `LEXIS_DB_PATH` (default: `~/.lexis/lexis.db`)
    /// - `LEXIS_IN_MEMORY` (set to keep the store in memory)
    /// - `LEXIS_OPTION_COUNT` (default: 3)
    /// - `LEXIS_SEED_BATCH_SIZE` (default: 50)
    /// - `LEXIS_SEED_KEEP_EXISTING` (set to skip cleaning before a seed)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("LEXIS_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        if std::env::var("LEXIS_IN_MEMORY").is_ok() {
            self.database_path = None;
        }

        if let Ok(count) = std::env::var("LEXIS_OPTION_COUNT") {
            if let Ok(count) = count.parse() {
                self.option_count = count;
            }
        }

        if let Ok(size) = std::env::var("LEXIS_SEED_BATCH_SIZE") {
            if let Ok(size) = size.parse::<usize>() {
                self.seed.batch_size = size.max(1);
            }
        }

        if std::env::var("LEXIS_SEED_KEEP_EXISTING").is_ok() {
            self.seed.clean_first = false;
        }
    }

    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> LexisResult<()> {
        self.default_settings
            .validate()
            .map_err(|e| LexisError::Configuration(format!("default_settings: {}", e)))?;

        if self.seed.batch_size == 0 {
            return Err(LexisError::Configuration(
                "seed.batch_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> LexisConfigBuilder {
        LexisConfigBuilder::default()
    }
}

/// Builder for LexisConfig.
#[derive(Default)]
pub struct LexisConfigBuilder {
    config: LexisConfig,
}

impl LexisConfigBuilder {
    /// Store data in a SQLite database at this path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = Some(path.into());
        self
    }

    /// Keep all data in memory.
    pub fn in_memory(mut self) -> Self {
        self.config.database_path = None;
        self
    }

    /// Set the settings used for learners without their own.
    pub fn default_settings(mut self, settings: LearnerSettings) -> Self {
        self.config.default_settings = settings;
        self
    }

    /// Set the default option count.
    pub fn option_count(mut self, count: usize) -> Self {
        self.config.option_count = count;
        self
    }

    /// Set seeding configuration.
    pub fn seed(mut self, seed: SeedConfig) -> Self {
        self.config.seed = seed;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LexisResult<LexisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
