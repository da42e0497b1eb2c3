//! Relay configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::config::RelayConfig;
use tracing::debug;
use url::Url;

fn validate_http_url(value: &str, context: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        )),
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating relay configuration");

        self.schedule.validate()?;
        self.azure.validate()?;
        self.database.validate()?;
        self.dynatrace.validate()?;

        Ok(())
    }
}

impl Validate for ScheduleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_secs == 0 {
            return Err("Schedule interval must be greater than 0".to_string());
        }

        if self.max_concurrency == 0 {
            return Err("Max concurrency must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for AzureConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url(&self.authority_host, "Azure authority host")?;
        validate_http_url(
            &self.resource_manager_endpoint,
            "Azure Resource Manager endpoint",
        )?;

        if self.servers_api_version.is_empty() || self.metrics_api_version.is_empty() {
            return Err("Azure api-version values cannot be empty".to_string());
        }

        if self.metrics_window_secs == 0 {
            return Err("Metrics window must be greater than 0".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("Azure request timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Database port must be greater than 0".to_string());
        }

        if self.name.is_empty() {
            return Err("Database name cannot be empty".to_string());
        }

        if self.statement_timeout_ms == 0 {
            return Err("Statement timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for DynatraceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("Dynatrace request timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
