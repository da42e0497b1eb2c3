//! # pg-dynatrace-relay
//!
//! Ships health and utilization metrics of Azure Database for PostgreSQL
//! servers to Dynatrace on a timer.
//!
//! ## Pipeline
//!
//! - **Discover**: list the servers of one resource group and keep those tagged
//!   `EnableMonitoring = "true"`
//! - **Probe**: ask each server `SELECT pg_is_in_recovery()` to tell primaries
//!   from standbys
//! - **Fetch**: pull `active_connections`, `storage_used` and `cpu_percent`
//!   from Azure Monitor for the last five minutes
//! - **Publish**: POST a custom-device payload per server to Dynatrace
//!
//! ## Running a single tick
//!
//! ```rust,no_run
//! use pg_dynatrace_relay::{ProcessEnv, Relay, RelayConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::default();
//!     let relay = Relay::azure(&config, Arc::new(ProcessEnv))?;
//!     let report = relay.run_tick().await;
//!     println!("published {} of {}", report.published, report.discovered);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{ConfigSource, MapSource, ProcessEnv, RelayConfig, SharedSource};
pub use crate::core::relay::{InstanceOutcome, Relay, TickReport};
pub use crate::core::scheduler::Scheduler;
pub use crate::core::types::{Availability, MetricSnapshot};
pub use utils::error::{RelayError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Relay build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
