use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::infrastructure::logging::parse_log_level;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".voxdesk";

/// Prefix for environment overrides, e.g. `VOXDESK_API__TOKEN`.
pub const ENV_PREFIX: &str = "VOXDESK_";

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base_url: {0:?}. Must be an http(s) URL")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid stale_after_secs: {0}. Must be at least 1")]
    InvalidStaleWindow(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("No API token configured. Set api.token in .voxdesk/config.yaml or VOXDESK_API__TOKEN")]
    MissingToken,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .voxdesk/config.yaml
    /// 3. .voxdesk/local.yaml (optional overrides)
    /// 4. Environment variables (VOXDESK_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::extract(Self::figment(None))
    }

    /// Like [`ConfigLoader::load`], but with `path` in place of the project files.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        Self::extract(Self::figment(Some(path)))
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// The merged provider chain, before extraction.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = match explicit {
            Some(path) => figment.merge(Yaml::file(path)),
            None => {
                let dir = Path::new(CONFIG_DIR);
                figment
                    .merge(Yaml::file(dir.join("config.yaml")))
                    .merge(Yaml::file(dir.join("local.yaml")))
            }
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let base_url = config.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(config.api.base_url.clone()));
        }

        if config.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.api.timeout_secs));
        }

        if config.cache.stale_after_secs == 0 {
            return Err(ConfigError::InvalidStaleWindow(config.cache.stale_after_secs));
        }

        if parse_log_level(&config.logging.level).is_err() {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }

    /// Checked separately: commands that never touch the network run without a token.
    pub fn require_token(config: &Config) -> Result<(), ConfigError> {
        if config.api.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }
}
