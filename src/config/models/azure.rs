//! Azure endpoint configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Azure AD, Resource Manager and Monitor endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Azure AD authority host
    #[serde(default = "default_authority_host")]
    pub authority_host: String,
    /// Resource Manager endpoint, also the token audience
    #[serde(default = "default_resource_manager_endpoint")]
    pub resource_manager_endpoint: String,
    /// api-version for the PostgreSQL servers list
    #[serde(default = "default_servers_api_version")]
    pub servers_api_version: String,
    /// api-version for the metrics query
    #[serde(default = "default_metrics_api_version")]
    pub metrics_api_version: String,
    /// Trailing metrics window in seconds
    #[serde(default = "default_metrics_window_secs")]
    pub metrics_window_secs: u64,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            authority_host: default_authority_host(),
            resource_manager_endpoint: default_resource_manager_endpoint(),
            servers_api_version: default_servers_api_version(),
            metrics_api_version: default_metrics_api_version(),
            metrics_window_secs: default_metrics_window_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AzureConfig {
    /// OAuth scope requested for Resource Manager tokens
    pub fn token_scope(&self) -> String {
        format!(
            "{}/.default",
            self.resource_manager_endpoint.trim_end_matches('/')
        )
    }

    /// Metrics window as a duration
    pub fn metrics_window(&self) -> Duration {
        Duration::from_secs(self.metrics_window_secs)
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
