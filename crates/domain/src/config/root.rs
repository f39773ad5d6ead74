use serde::{Deserialize, Serialize};

use super::elasticsearch::ElasticsearchConfig;
use super::errors::ConfigError;
use super::ingest::{IngestConfig, PipelineMode};
use super::logging::LoggingConfig;
use super::normalize::NormalizeConfig;
use crate::bulk::IdPolicy;

const LOCAL_CONFIG_PATH: &str = "sonar-ingest.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/sonar-ingest/config.toml";

/// Main configuration structure for sonar-ingest
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Source, destination and batching
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Record normalization overrides
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Document store connection and index settings
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. sonar-ingest.toml in current directory
    /// 3. /etc/sonar-ingest/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(index) = overrides.index {
            self.ingest.index = index;
        }
        if let Some(source) = overrides.source {
            self.ingest.source = source;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.ingest.batch_size = batch_size;
        }
        if let Some(policy) = overrides.id_policy {
            self.ingest.id_policy = policy;
        }
        if let Some(mode) = overrides.pipeline {
            self.ingest.pipeline = mode;
        }
        if let Some(url) = overrides.elasticsearch_url {
            self.elasticsearch.url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.batch_size == 0 {
            return Err(ConfigError::Validation(
                "Batch size must be at least 1".to_string(),
            ));
        }

        if self.ingest.index.trim().is_empty() {
            return Err(ConfigError::Validation("Index name is empty".to_string()));
        }

        if self.ingest.source.trim().is_empty() {
            return Err(ConfigError::Validation("Source path is empty".to_string()));
        }

        if self.elasticsearch.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Elasticsearch URL is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file that would be used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub index: Option<String>,
    pub source: Option<String>,
    pub batch_size: Option<usize>,
    pub id_policy: Option<IdPolicy>,
    pub pipeline: Option<PipelineMode>,
    pub elasticsearch_url: Option<String>,
    pub log_level: Option<String>,
}
