//! Dynatrace ingestion settings

use super::*;
use crate::config::ConfigSource;
use crate::utils::error::Result;
use crate::utils::logging::redact;
use crate::utils::normalize_base_url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DYNATRACE_TOKEN_KEY: &str = "dynatrace_token";
pub const DYNATRACE_ENDPOINT_KEY: &str = "dynatrace_endpoint";
pub const DYNATRACE_ENVIRONMENT_KEY: &str = "dynatrace_environment_id";

/// Static Dynatrace client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynatraceConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DynatraceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DynatraceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where and how to push one payload; resolved per publish
#[derive(Clone)]
pub struct DynatraceTarget {
    pub token: String,
    pub endpoint: String,
    pub environment_id: String,
}

impl DynatraceTarget {
    /// Read token, endpoint and environment id from the source
    pub fn resolve(source: &dyn ConfigSource) -> Result<Self> {
        Ok(Self {
            token: source.require(DYNATRACE_TOKEN_KEY)?,
            endpoint: source.require(DYNATRACE_ENDPOINT_KEY)?,
            environment_id: source.require(DYNATRACE_ENVIRONMENT_KEY)?,
        })
    }

    /// Custom-device ingestion URL for an instance
    pub fn custom_device_url(&self, instance_name: &str) -> String {
        format!(
            "{}/e/{}/api/v1/entity/infrastructure/custom/{}",
            normalize_base_url(&self.endpoint),
            self.environment_id,
            instance_name
        )
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Api-Token {}", self.token)
    }
}

impl fmt::Debug for DynatraceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynatraceTarget")
            .field("token", &redact(Some(&self.token)))
            .field("endpoint", &self.endpoint)
            .field("environment_id", &self.environment_id)
            .finish()
    }
}
