//! Configuration management for the relay
//!
//! Static settings live in [`RelayConfig`], loaded from an optional YAML file
//! and overridden by environment variables. Secrets and per-instance settings
//! are read on every use through a [`ConfigSource`].

pub mod models;
pub mod source;
pub mod validation;

pub use models::*;
pub use source::{ConfigSource, MapSource, ProcessEnv, SharedSource};
pub use validation::Validate;

use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const INTERVAL_ENV: &str = "RELAY_INTERVAL_SECS";
pub const MAX_CONCURRENCY_ENV: &str = "RELAY_MAX_CONCURRENCY";
pub const RUN_ON_START_ENV: &str = "RELAY_RUN_ON_START";
pub const AUTHORITY_HOST_ENV: &str = "AZURE_AUTHORITY_HOST";
pub const RESOURCE_MANAGER_ENV: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Main configuration struct for the relay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Tick schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Azure endpoints
    #[serde(default)]
    pub azure: AzureConfig,
    /// Availability probe settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Dynatrace client settings
    #[serde(default)]
    pub dynatrace: DynatraceConfig,
}

impl RelayConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RelayError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| RelayError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Apply environment overrides from a configuration source
    pub fn with_overrides(mut self, source: &dyn ConfigSource) -> Result<Self> {
        if let Some(interval) = source.get(INTERVAL_ENV) {
            self.schedule.interval_secs = interval
                .parse()
                .map_err(|e| RelayError::Config(format!("Invalid {}: {}", INTERVAL_ENV, e)))?;
        }
        if let Some(concurrency) = source.get(MAX_CONCURRENCY_ENV) {
            self.schedule.max_concurrency = concurrency.parse().map_err(|e| {
                RelayError::Config(format!("Invalid {}: {}", MAX_CONCURRENCY_ENV, e))
            })?;
        }
        if let Some(run_on_start) = source.get(RUN_ON_START_ENV) {
            self.schedule.run_on_start = parse_bool(&run_on_start).ok_or_else(|| {
                RelayError::Config(format!(
                    "Invalid {}: expected true/false, got {}",
                    RUN_ON_START_ENV, run_on_start
                ))
            })?;
        }
        if let Some(host) = source.get(AUTHORITY_HOST_ENV) {
            self.azure.authority_host = host;
        }
        if let Some(endpoint) = source.get(RESOURCE_MANAGER_ENV) {
            self.azure.resource_manager_endpoint = endpoint;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(RelayError::validation)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
