use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::database_retry::RetryConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: Option<u32>,
}

/// Retry schedule as it appears in the config file
///
/// Delays are humantime strings ("5s", "250ms"); the parsed [`RetryConfig`]
/// is built once at startup and shared with every repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_retry_delays")]
    pub delays: Vec<String>,
}

fn default_max_connections() -> Option<u32> {
    Some(10)
}

fn default_retry_delays() -> Vec<String> {
    vec!["5s".to_string(), "10s".to_string(), "15s".to_string()]
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            delays: default_retry_delays(),
        }
    }
}

impl RetrySettings {
    /// Parse the configured delay strings into a retry configuration
    pub fn retry_config(&self) -> Result<RetryConfig> {
        let delays = self
            .delays
            .iter()
            .map(|delay| {
                humantime::parse_duration(delay)
                    .with_context(|| format!("Invalid retry delay: {delay}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RetryConfig::new(delays))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://./football-manager.db".to_string(),
                max_connections: default_max_connections(),
            },
            retry: RetrySettings::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}
