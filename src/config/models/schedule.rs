//! Tick schedule configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often the pipeline runs and how wide it fans out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Run a tick immediately instead of waiting one interval
    #[serde(default = "default_true")]
    pub run_on_start: bool,
    /// Instances processed concurrently within a tick
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            run_on_start: true,
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
