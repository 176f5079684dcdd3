//! Configuration loader with layered sources.

use crate::{format_validation_errors, ClientConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use onms_core::OnmsError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<ClientConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml` - Default values
    /// 2. `{dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{dir}/local.toml` - Local overrides
    /// 4. Environment variables with `ONMS__` prefix (e.g. `ONMS__SERVER__URL`)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, OnmsError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, OnmsError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> ClientConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), OnmsError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<ClientConfig, OnmsError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("ONMS_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading client configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ONMS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_onms_error)?;

        let client_config: ClientConfig = config
            .try_deserialize()
            .map_err(config_error_to_onms_error)?;

        ConfigValidator::validate(&client_config)
            .map_err(|errors| OnmsError::Configuration(format_validation_errors(&errors)))?;

        Ok(client_config)
    }
}

fn config_error_to_onms_error(err: ConfigError) -> OnmsError {
    OnmsError::Configuration(err.to_string())
}
