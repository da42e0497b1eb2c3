//! Configuration models
//!
//! Static settings (schedule, endpoints, timeouts) are deserialized from YAML.
//! Secrets are resolved on demand through a [`ConfigSource`](super::ConfigSource).

pub mod account;
pub mod azure;
pub mod database;
pub mod dynatrace;
pub mod schedule;

pub use account::*;
pub use azure::*;
pub use database::*;
pub use dynatrace::*;
pub use schedule::*;

// Default value functions

pub fn default_interval_secs() -> u64 {
    300
}

pub fn default_max_concurrency() -> usize {
    4
}

pub fn default_true() -> bool {
    true
}

pub fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}

pub fn default_resource_manager_endpoint() -> String {
    "https://management.azure.com".to_string()
}

pub fn default_servers_api_version() -> String {
    "2017-12-01".to_string()
}

pub fn default_metrics_api_version() -> String {
    "2018-01-01".to_string()
}

pub fn default_metrics_window_secs() -> u64 {
    300
}

pub fn default_request_timeout_secs() -> u64 {
    30
}

pub fn default_db_port() -> u16 {
    5432
}

pub fn default_db_name() -> String {
    "azure_db_postgresql".to_string()
}

pub fn default_statement_timeout_ms() -> u64 {
    3000
}

pub fn default_connect_timeout_secs() -> u64 {
    5
}
